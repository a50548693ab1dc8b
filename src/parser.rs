//! The `Parser` trait and the core combinator algebra every other combinator is built from.

use crate::error::Message;
use crate::error::ParseErrorReport;
use crate::input::Input;
use crate::lib::std::borrow::Cow;
use crate::lib::std::boxed::Box;
use crate::reply::{Consumed, ParseResult, Reply};
use crate::trace::trace;

/// A parser from `I` to `O`: a (possibly stateful) function `Input -> Consumed<Reply<O>>`.
///
/// Closures and plain `fn` items matching `FnMut(I) -> ParseResult<I, O>` implement this
/// automatically (see the blanket impl below) — most of the combinators in this crate are
/// written as closures returned from a factory function, not as structs implementing this
/// trait directly.
pub trait Parser<I, O>
where
    I: Input,
{
    /// Runs the parser once against `input`.
    fn parse(&mut self, input: I) -> ParseResult<I, O>;

    /// Transforms a successful result with `f`, leaving failures untouched.
    fn map<O2>(self, f: impl FnMut(O) -> O2 + 'static) -> Box<dyn Parser<I, O2>>
    where
        Self: Sized + 'static,
        I: 'static,
        O: 'static,
    {
        let mut parser = self;
        let mut f = f;
        Box::new(move |input: I| parser.parse(input).map(&mut f))
    }

    /// Runs `self`, then `next`, discarding `self`'s value and keeping `next`'s.
    fn then<O2>(self, next: impl Parser<I, O2> + 'static) -> Box<dyn Parser<I, O2>>
    where
        Self: Sized + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        Box::new(then(self, next))
    }

    /// Runs `self`, then feeds its value to `f` to build the next parser to run.
    fn bind<O2, Q>(self, f: impl FnMut(O) -> Q + 'static) -> Box<dyn Parser<I, O2>>
    where
        Self: Sized + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
        Q: Parser<I, O2> + 'static,
    {
        Box::new(bind(self, f))
    }

    /// Tries `self`; if it fails without consuming input, tries `alt` on the same input.
    fn or(self, alt: impl Parser<I, O> + 'static) -> Box<dyn Parser<I, O>>
    where
        Self: Sized + 'static,
        I: 'static,
        O: 'static,
    {
        Box::new(or(self, alt))
    }

    /// Runs `self`; on failure, rewinds the commitment so a later `or` can still try an
    /// alternative, even if `self` had consumed input before failing.
    fn attempt(self) -> Box<dyn Parser<I, O>>
    where
        Self: Sized + 'static,
        I: 'static,
        O: 'static,
    {
        Box::new(attempt(self))
    }

    /// Replaces the expected-set of a failing or non-consuming result with `name`.
    fn label(self, name: impl Into<Cow<'static, str>>) -> Box<dyn Parser<I, O>>
    where
        Self: Sized + 'static,
        I: 'static,
        O: 'static,
    {
        Box::new(label(self, name))
    }
}

impl<I, O, F> Parser<I, O> for F
where
    I: Input,
    F: FnMut(I) -> ParseResult<I, O>,
{
    fn parse(&mut self, input: I) -> ParseResult<I, O> {
        self(input)
    }
}

impl<I, O> Parser<I, O> for Box<dyn Parser<I, O>>
where
    I: Input,
{
    fn parse(&mut self, input: I) -> ParseResult<I, O> {
        (**self).parse(input)
    }
}

/// A parser that always succeeds with a clone of `value`, consuming no input.
///
/// This is Parsec's `return`/`unit`: the monadic identity. `value` must be [`Clone`]
/// because the returned parser may be run more than once (inside `many`, for instance).
pub fn retn<I, O>(value: O) -> impl Parser<I, O>
where
    I: Input,
    O: Clone,
{
    trace("retn", move |input: I| {
        let pos = input.position();
        Consumed::empty(Reply::Ok {
            value: value.clone(),
            rest: input,
            msg: Message::empty(pos),
        })
    })
}

/// A parser that always fails with `expected` as its sole expectation, consuming no input.
pub fn fail<I, O>(expected: impl Into<Cow<'static, str>>) -> impl Parser<I, O>
where
    I: Input,
{
    let expected = expected.into();
    trace("fail", move |input: I| {
        let pos = input.position();
        Consumed::empty(Reply::Error {
            msg: Message::empty(pos).expect(expected.clone()),
        })
    })
}

/// Succeeds with `()`, consuming no input, only if the input has no tokens left.
pub fn eof<I>() -> impl Parser<I, ()>
where
    I: Input,
{
    trace("eof", move |input: I| {
        let pos = input.position();
        if input.is_at_end() {
            Consumed::empty(Reply::Ok {
                value: (),
                rest: input,
                msg: Message::empty(pos),
            })
        } else {
            let msg = match input.current() {
                Some(tok) => Message::unexpected_token(pos, tok, "end of input"),
                None => Message::end_of_input(pos, "end of input"),
            };
            Consumed::empty(Reply::Error { msg })
        }
    })
}

/// Consumes and returns the current token if `pred` accepts it, otherwise fails without
/// consuming input.
pub fn satisfy<I, F>(mut pred: F) -> impl Parser<I, I::Token>
where
    I: Input,
    F: FnMut(&I::Token) -> bool,
{
    trace("satisfy", move |input: I| {
        let pos = input.position();
        match input.current() {
            Some(tok) if pred(&tok) => {
                let rest = input.advance(1);
                Consumed::consumed(Reply::Ok {
                    value: tok,
                    rest,
                    msg: Message::empty(pos),
                })
            }
            Some(tok) => Consumed::empty(Reply::Error {
                msg: Message::unexpected_token(pos, tok, "a token satisfying the predicate"),
            }),
            None => Consumed::empty(Reply::Error {
                msg: Message::end_of_input(pos, "a token satisfying the predicate"),
            }),
        }
    })
}

/// Runs `p`, feeds its value to `f`, and runs the parser `f` returns on what `p` left
/// behind — the monadic bind of the parser algebra.
///
/// The `consumed` flags of the two steps are combined by logical-or (once either step
/// advances the cursor, the whole sequence has committed), and their messages are merged.
pub fn bind<I, O, O2, P, F, Q>(mut p: P, mut f: F) -> impl Parser<I, O2>
where
    I: Input,
    P: Parser<I, O>,
    F: FnMut(O) -> Q,
    Q: Parser<I, O2>,
{
    trace("bind", move |input: I| {
        let (c1, r1) = p.parse(input).into_parts();
        match r1 {
            Reply::Error { msg } => Consumed::new(c1, Reply::Error { msg }),
            Reply::Ok {
                value,
                rest,
                msg: msg1,
            } => {
                let mut q = f(value);
                let (c2, r2) = q.parse(rest).into_parts();
                let merged = match r2 {
                    Reply::Ok {
                        value,
                        rest,
                        msg: msg2,
                    } => Reply::Ok {
                        value,
                        rest,
                        msg: msg1.merge(msg2),
                    },
                    Reply::Error { msg: msg2 } => Reply::Error {
                        msg: msg1.merge(msg2),
                    },
                };
                Consumed::new(c1 || c2, merged)
            }
        }
    })
}

/// Runs `p`, then `q`, discarding `p`'s value.
///
/// Equivalent to `bind(p, move |_| q)`, written directly so `q` doesn't need to be
/// reconstructed on every call.
pub fn then<I, O, O2, P, Q>(mut p: P, mut q: Q) -> impl Parser<I, O2>
where
    I: Input,
    P: Parser<I, O>,
    Q: Parser<I, O2>,
{
    trace("then", move |input: I| {
        let (c1, r1) = p.parse(input).into_parts();
        match r1 {
            Reply::Error { msg } => Consumed::new(c1, Reply::Error { msg }),
            Reply::Ok {
                rest, msg: msg1, ..
            } => {
                let (c2, r2) = q.parse(rest).into_parts();
                let merged = match r2 {
                    Reply::Ok {
                        value,
                        rest,
                        msg: msg2,
                    } => Reply::Ok {
                        value,
                        rest,
                        msg: msg1.merge(msg2),
                    },
                    Reply::Error { msg: msg2 } => Reply::Error {
                        msg: msg1.merge(msg2),
                    },
                };
                Consumed::new(c1 || c2, merged)
            }
        }
    })
}

/// Tries `p`; if it produces an `Empty` reply (Ok or Error — it never consumed input),
/// tries `q` on the same starting input and merges the two messages. A `Consumed` reply
/// from `p` is returned immediately, committing to that branch.
///
/// This is the combinator that needs `I: Clone` (via [`Input`]): both branches may need to
/// start from the same position, so the input has to be duplicated before the first
/// attempt.
pub fn or<I, O, P, Q>(mut p: P, mut q: Q) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
    Q: Parser<I, O>,
{
    trace("or", move |input: I| {
        let first = p.parse(input.clone());
        if first.is_consumed() {
            return first;
        }
        let (_, r1) = first.into_parts();
        match r1 {
            Reply::Error { msg: msg1 } => {
                let second = q.parse(input);
                if second.is_consumed() {
                    return second;
                }
                let (_, r2) = second.into_parts();
                let merged = match r2 {
                    Reply::Ok {
                        value,
                        rest,
                        msg: msg2,
                    } => Reply::Ok {
                        value,
                        rest,
                        msg: msg1.merge(msg2),
                    },
                    Reply::Error { msg: msg2 } => Reply::Error {
                        msg: msg1.merge(msg2),
                    },
                };
                Consumed::empty(merged)
            }
            Reply::Ok { value, rest, msg: msg1 } => {
                let second = q.parse(input);
                if second.is_consumed() {
                    return second;
                }
                let (_, r2) = second.into_parts();
                let msg2 = match r2 {
                    Reply::Ok { msg, .. } => msg,
                    Reply::Error { msg } => msg,
                };
                Consumed::empty(Reply::Ok {
                    value,
                    rest,
                    msg: msg1.merge(msg2),
                })
            }
        }
    })
}

/// Runs `p`; if it fails, discards whatever it consumed so a surrounding [`or`] can still
/// try an alternative starting from the original position.
///
/// This is the only way to get arbitrary lookahead back once a parser has committed by
/// consuming input — the price is that `p`'s partial progress is invisible to the caller
/// on failure, so only wrap `attempt` around the minimal span that needs backtracking.
pub fn attempt<I, O, P>(mut p: P) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
{
    trace("attempt", move |input: I| {
        let (consumed, reply) = p.parse(input).into_parts();
        match reply {
            Reply::Error { msg } => Consumed::empty(Reply::Error { msg }),
            ok => Consumed::new(consumed, ok),
        }
    })
}

/// Runs `p`; if its reply was `Empty` (Ok or Error), replaces the expected set with a
/// single `name`. A `Consumed` reply — one where `p` made progress before settling — is
/// passed through unchanged, since a failure deeper in the grammar is more informative
/// than the label wrapping it.
pub fn label<I, O, P>(mut p: P, name: impl Into<Cow<'static, str>>) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
{
    let name = name.into();
    let trace_name = name.clone();
    trace(trace_name, move |input: I| {
        let result = p.parse(input);
        if result.is_consumed() {
            return result;
        }
        let (_, reply) = result.into_parts();
        let relabeled = match reply {
            Reply::Ok { value, rest, msg } => Reply::Ok {
                value,
                rest,
                msg: msg.expect(name.clone()),
            },
            Reply::Error { msg } => Reply::Error {
                msg: msg.expect(name.clone()),
            },
        };
        Consumed::empty(relabeled)
    })
}

/// Runs `p` against `input` to completion, producing the parsed value or a user-facing
/// error report.
///
/// This does not require the parser to consume the entire input; wrap `p` in
/// `then(p, eof())` (or call [`eof`] explicitly) if trailing input should be an error.
pub fn parse<I, O>(mut p: impl Parser<I, O>, input: I) -> Result<O, ParseErrorReport>
where
    I: Input,
{
    let (_, reply) = p.parse(input).into_parts();
    match reply {
        Reply::Ok { value, .. } => Ok(value),
        Reply::Error { msg } => Err(msg.into_report()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::from_string;

    #[test]
    fn retn_succeeds_without_consuming() {
        let report = parse(retn::<_, i32>(42), from_string("x")).unwrap();
        assert_eq!(report, 42);
    }

    #[test]
    fn fail_never_succeeds() {
        let err = parse(fail::<_, i32>("a number"), from_string("x")).unwrap_err();
        assert_eq!(err.expected, vec!["a number"]);
    }

    #[test]
    fn eof_succeeds_only_at_end() {
        assert!(parse(eof(), from_string("")).is_ok());
        assert!(parse(eof(), from_string("x")).is_err());
    }

    #[test]
    fn satisfy_consumes_a_matching_token() {
        let mut p = satisfy(|c: &char| *c == 'a');
        let report = parse(&mut p, from_string("abc")).unwrap();
        assert_eq!(report, 'a');
    }

    #[test]
    fn satisfy_rejects_without_consuming() {
        let mut p = satisfy(|c: &char| *c == 'a');
        let err = parse(&mut p, from_string("bcd")).unwrap_err();
        assert_eq!(err.position, 0);
    }

    #[test]
    fn then_discards_the_first_value() {
        let p = satisfy(|c: &char| *c == 'a').then(satisfy(|c: &char| *c == 'b'));
        let report = parse(p, from_string("ab")).unwrap();
        assert_eq!(report, 'b');
    }

    #[test]
    fn or_falls_through_on_empty_failure() {
        let p = satisfy(|c: &char| *c == 'a').or(satisfy(|c: &char| *c == 'b'));
        assert_eq!(parse(p, from_string("b")).unwrap(), 'b');
    }

    #[test]
    fn or_commits_after_consuming_input() {
        let first = then(satisfy(|c: &char| *c == 'a'), satisfy(|c: &char| *c == 'x'));
        let p = or(first, satisfy(|c: &char| *c == 'a'));
        // "ay" consumes 'a' then fails on 'x' vs 'y' — consumed, so `or` must not retry.
        assert!(parse(p, from_string("ay")).is_err());
    }

    #[test]
    fn attempt_restores_lookahead_after_consuming_failure() {
        let first = attempt(then(satisfy(|c: &char| *c == 'a'), satisfy(|c: &char| *c == 'x')));
        let p = or(first, satisfy(|c: &char| *c == 'a'));
        assert_eq!(parse(p, from_string("ay")).unwrap(), 'a');
    }

    #[test]
    fn label_replaces_rather_than_unions() {
        let p = label(label(fail::<_, char>("a"), "b"), "c");
        let err = parse(p, from_string("x")).unwrap_err();
        assert_eq!(err.expected, vec!["c"]);
    }

    #[test]
    fn label_does_not_override_a_consumed_failure() {
        let inner = then(satisfy(|c: &char| *c == 'a'), fail::<_, char>("inner"));
        let p = label(inner, "outer");
        let err = parse(p, from_string("ax")).unwrap_err();
        assert_eq!(err.expected, vec!["inner"]);
    }

    #[test]
    fn bind_sequences_and_merges_messages() {
        let p = bind(satisfy(|c: &char| c.is_ascii_digit()), |d: char| {
            retn::<_, char>(d)
        });
        assert_eq!(parse(p, from_string("5")).unwrap(), '5');
    }
}
