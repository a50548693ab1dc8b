//! The black-box regular-expression engine and the numeric literal parsers built on it.
//!
//! `regex()` only exists for `I: TextInput` — there is no `Input` impl without
//! [`char_sequence_from`][crate::input::TextInput::char_sequence_from] to match against, so
//! misuse (trying to run a pattern against a raw byte/token stream) is a compile error rather
//! than a runtime failure.

use crate::error::Message;
use crate::input::{Input, TextInput};
use crate::lib::std::format;
use crate::lib::std::string::{String, ToString};
use crate::parser::{label, Parser};
use crate::reply::{Consumed, ParseResult, Reply};
use ::regex::Regex;

/// A compiled pattern anchored to match only at the start of whatever text it's given.
///
/// This is the "looking at" style of match `java.util.regex.Matcher::lookingAt` provides:
/// unlike a bare search, a [`Matcher`] never skips ahead to find a match later in the text.
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Compiles `pattern`, anchoring it to the start of the search text.
    ///
    /// Panics if `pattern` is not a valid regular expression — this is always a programmer
    /// error (a malformed literal baked into the call site), never a parse-time failure.
    pub fn new(pattern: &str) -> Self {
        let anchored = format!("\\A(?:{pattern})");
        let regex = Regex::new(&anchored).expect("invalid regex pattern");
        Matcher { regex }
    }

    /// The byte length of the match starting at the beginning of `text`, if any.
    pub fn looking_at(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.end())
    }
}

/// Compiles `pattern` into a [`Matcher`].
pub fn compile(pattern: &str) -> Matcher {
    Matcher::new(pattern)
}

/// Matches `pattern` against the text starting at the cursor, returning the matched text.
///
/// A zero-length match (e.g. `a*` against input starting with `b`) yields an `Empty` outcome
/// — it matched, but consumed nothing, so backtracking alternatives downstream of it are
/// still reachable via [`or`][crate::or]. Any match of one or more characters is a `Consumed`
/// outcome, same as every other primitive that advances the cursor.
pub fn regex<I>(pattern: &str) -> impl Parser<I, String>
where
    I: TextInput,
{
    let matcher = Matcher::new(pattern);
    move |input: I| {
        let pos = input.position();
        let available = input.char_sequence_from(None);
        match matcher.looking_at(&available) {
            Some(0) => Consumed::empty(Reply::Ok {
                value: String::new(),
                rest: input.clone(),
                msg: Message::empty(pos),
            }),
            Some(byte_len) => {
                let matched = &available[..byte_len];
                let matched = matched.to_string();
                let rest = input.advance_matched(&matched);
                Consumed::consumed(Reply::Ok {
                    value: matched,
                    rest,
                    msg: Message::empty(pos),
                })
            }
            None => {
                let expected = format!("text matching /{pattern}/");
                let msg = match input.current() {
                    Some(tok) => Message::unexpected_token(pos, tok, expected),
                    None => Message::end_of_input(pos, expected),
                };
                Consumed::empty(Reply::Error { msg })
            }
        }
    }
}

const INTEGER_PATTERN: &str = "-?[0-9]+";
const DOUBLE_PATTERN: &str = "-?([0-9]+(\\.[0-9]*)?|[0-9]*\\.[0-9]+)([eE][+-]?[0-9]+)?[fFdD]?";

/// Matches a decimal `i32` literal, with an optional leading `-`.
///
/// Digits are matched greedily by `regex`, which commits to this branch once it has found at
/// least one digit. If the matched digits don't fit in an `i32`, that commitment is
/// deliberately undone: overflow is reported as an `EmptyError` (not a `ConsumedError`), so a
/// grammar trying `intr.or(lng.map(...))` can still fall back to a wider integer type instead
/// of being stuck with a branch that already consumed the digits.
pub fn intr<I>(input: I) -> ParseResult<I, i32>
where
    I: TextInput,
{
    parse_integer(input, "an i32 literal")
}

/// Matches a decimal `i64` literal, with an optional leading `-`. See [`intr`] for the
/// overflow policy.
pub fn lng<I>(input: I) -> ParseResult<I, i64>
where
    I: TextInput,
{
    parse_integer(input, "an i64 literal")
}

/// Matches a decimal floating-point literal as `f64`: `1`, `1.5`, `-1.5e10`, `1E-3`, and a
/// trailing `f`/`F`/`d`/`D` type suffix are all accepted (the suffix is discarded).
///
/// Unlike [`intr`]/[`lng`], a magnitude too large for `f64` does not fail — it rounds to
/// `f64::INFINITY`/`f64::NEG_INFINITY`, the same way the host's own floating-point parser
/// does, since a double is already an approximation and overflow is just the far end of its
/// range rather than a distinct error condition.
pub fn dble<I>(input: I) -> ParseResult<I, f64>
where
    I: TextInput,
{
    let pos = input.position();
    let text = label(regex(DOUBLE_PATTERN), "a floating-point literal").parse(input);
    let (consumed, reply) = text.into_parts();
    match reply {
        Reply::Ok { value, rest, msg } => {
            let trimmed = value.trim_end_matches(['f', 'F', 'd', 'D']);
            match trimmed.parse::<f64>() {
                Ok(n) => Consumed::new(consumed, Reply::Ok { value: n, rest, msg }),
                Err(_) => Consumed::new(
                    consumed,
                    Reply::Error {
                        msg: Message::empty(pos).expect("a floating-point literal"),
                    },
                ),
            }
        }
        Reply::Error { msg } => Consumed::new(consumed, Reply::Error { msg }),
    }
}

/// Either exact branch of [`number`]'s result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// The literal had no fractional part and its value fits exactly in an `i64`.
    Integer(i64),
    /// The literal had a fractional part, an exponent, or didn't fit exactly in an `i64`.
    Double(f64),
}

/// Matches the same literal shape as [`dble`], but returns [`Number::Integer`] when the
/// parsed value is an exact, in-range `i64` and [`Number::Double`] otherwise.
pub fn number<I>(input: I) -> ParseResult<I, Number>
where
    I: TextInput,
{
    dble(input).map(|n| {
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
            Number::Integer(n as i64)
        } else {
            Number::Double(n)
        }
    })
}

fn parse_integer<I, O>(input: I, expected: &'static str) -> ParseResult<I, O>
where
    I: TextInput,
    O: core::str::FromStr,
{
    let pos = input.position();
    let text = label(regex(INTEGER_PATTERN), expected).parse(input);
    let (_, reply) = text.into_parts();
    match reply {
        Reply::Ok { value, rest, msg } => match value.parse::<O>() {
            Ok(n) => Consumed::consumed(Reply::Ok { value: n, rest, msg }),
            Err(_) => Consumed::empty(Reply::Error {
                msg: Message::empty(pos).expect(expected),
            }),
        },
        Reply::Error { msg } => Consumed::empty(Reply::Error { msg }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::from_string;
    use crate::parser::parse;

    #[test]
    fn regex_matches_and_consumes() {
        assert_eq!(
            parse(regex("[a-z]+"), from_string("hello world")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn regex_no_match_is_an_empty_error() {
        assert!(parse(regex("[0-9]+"), from_string("abc")).is_err());
    }

    #[test]
    fn regex_zero_length_match_is_an_empty_outcome() {
        // "a*" matches the empty string against input starting with "b" — this must not
        // commit, so an alternative tried afterwards with `or` still sees the original input.
        let p = regex::<crate::input::StrInput>("a*").bind(|matched| {
            if matched.is_empty() {
                crate::parser::retn('?')
            } else {
                crate::parser::retn('!')
            }
        });
        assert_eq!(parse(p, from_string("bcd")).unwrap(), '?');

        let fallback = regex::<crate::input::StrInput>("a*")
            .bind(|matched: String| {
                if matched.is_empty() {
                    crate::parser::fail("a nonempty match")
                } else {
                    crate::parser::retn(matched)
                }
            })
            .or(crate::parser::retn(String::from("untouched")));
        let result = parse(fallback, from_string("bcd"));
        assert_eq!(result.unwrap(), "untouched");
    }

    #[test]
    fn intr_parses_negative_numbers() {
        assert_eq!(parse(intr, from_string("-42 ")).unwrap(), -42);
    }

    #[test]
    fn intr_overflow_is_a_parse_error() {
        assert!(parse(intr, from_string("99999999999999999999")).is_err());
    }

    #[test]
    fn lng_parses_values_too_large_for_i32() {
        assert_eq!(parse(lng, from_string("9000000000")).unwrap(), 9_000_000_000i64);
    }

    #[test]
    fn dble_parses_scientific_notation() {
        assert_eq!(parse(dble, from_string("-1.5e10")).unwrap(), -1.5e10);
    }

    #[test]
    fn number_distinguishes_by_the_parsed_value_not_the_literal_shape() {
        assert_eq!(parse(number, from_string("3")).unwrap(), Number::Integer(3));
        // "3.0" parses to the double value 3.0, which is an exact i64 — still Integer, even
        // though the literal itself has a decimal point.
        assert_eq!(parse(number, from_string("3.0")).unwrap(), Number::Integer(3));
        assert_eq!(parse(number, from_string("3.5")).unwrap(), Number::Double(3.5));
    }
}
