//! Character-classification-driven parsers over [`char`]-tokened inputs.
//!
//! Classification (`is_alphabetic`, `is_numeric`, `is_whitespace`) delegates to the
//! standard library's Unicode tables — the host platform is the external collaborator for
//! "what counts as a letter," not anything this crate implements itself.

use crate::combinator::{skip_many, skip_many1};
use crate::error::Message;
use crate::input::{Input, TextInput};
use crate::lib::std::borrow::Cow;
use crate::lib::std::format;
use crate::lib::std::string::String;
use crate::parser::{label, satisfy, Parser};
use crate::reply::{Consumed, ParseResult, Reply};

/// Matches a single alphabetic character.
pub fn alpha<I>(input: I) -> ParseResult<I, char>
where
    I: Input<Token = char>,
{
    label(satisfy(|c: &char| c.is_alphabetic()), "a letter").parse(input)
}

/// Matches a single numeric character (Unicode `is_numeric`, not just ASCII `0`-`9`).
pub fn digit<I>(input: I) -> ParseResult<I, char>
where
    I: Input<Token = char>,
{
    label(satisfy(|c: &char| c.is_numeric()), "a digit").parse(input)
}

/// Matches a single whitespace character.
pub fn space<I>(input: I) -> ParseResult<I, char>
where
    I: Input<Token = char>,
{
    label(satisfy(|c: &char| c.is_whitespace()), "whitespace").parse(input)
}

/// Matches and discards one or more whitespace characters.
pub fn wspace<I>(input: I) -> ParseResult<I, ()>
where
    I: Input<Token = char>,
{
    label(skip_many1(space), "whitespace").parse(input)
}

/// Matches and discards zero or more whitespace characters. Never fails.
pub fn wspaces<I>(input: I) -> ParseResult<I, ()>
where
    I: Input<Token = char>,
{
    skip_many(space).parse(input)
}

/// Matches exactly the character `c`.
pub fn chr<I>(c: char) -> impl Parser<I, char>
where
    I: Input<Token = char>,
{
    label(satisfy(move |t: &char| *t == c), format!("'{c}'"))
}

/// Matches one or more consecutive alphanumeric characters, returning them as an owned
/// `String`.
pub fn alpha_num<I>(input: I) -> ParseResult<I, String>
where
    I: TextInput,
{
    let pos = input.position();
    let available = input.char_sequence_from(None);
    let matched_len = available.chars().take_while(|c| c.is_alphanumeric()).count();
    if matched_len == 0 {
        let msg = match input.current() {
            Some(tok) => Message::unexpected_token(pos, tok, "an alphanumeric character"),
            None => Message::end_of_input(pos, "an alphanumeric character"),
        };
        return Consumed::empty(Reply::Error { msg });
    }
    let matched: String = available.chars().take(matched_len).collect();
    let rest = input.advance_matched(&matched);
    Consumed::consumed(Reply::Ok {
        value: matched,
        rest,
        msg: Message::empty(pos),
    })
}

/// Matches the literal text `literal` exactly.
///
/// A partial match that ultimately fails is a *consumed* error — `string("let")` against
/// `"le "` has committed to the `let` branch by the time it notices the mismatch, the same
/// way [`satisfy`][crate::satisfy] commits after consuming a token. Wrap the call in
/// [`attempt`][crate::attempt] if the caller needs to fall back to a different alternative
/// on a partial match.
pub fn string<I>(literal: &'static str) -> impl Parser<I, Cow<'static, str>>
where
    I: TextInput,
{
    move |input: I| {
        let pos = input.position();
        let available = input.char_sequence_from(Some(literal.chars().count()));
        if available == literal {
            let rest = input.advance_matched(literal);
            return Consumed::consumed(Reply::Ok {
                value: Cow::Borrowed(literal),
                rest,
                msg: Message::empty(pos),
            });
        }
        let matched_prefix = common_prefix_len(&available, literal);
        let msg = Message::empty(pos).expect(format!("\"{literal}\""));
        if matched_prefix > 0 {
            Consumed::consumed(Reply::Error { msg })
        } else {
            Consumed::empty(Reply::Error { msg })
        }
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
