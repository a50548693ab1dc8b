use crate::error::Message;
use crate::input::Input;
use crate::lib::std::boxed::Box;
use crate::lib::std::vec::Vec;
use crate::parser::{or, retn, Parser};
use crate::reply::{Consumed, ParseResult, Reply};

/// Tries each parser in `parsers` in order, the way [`or`] chains two: the first one that
/// consumes input or succeeds wins, and consecutive `Empty` results have their messages
/// merged.
///
/// Fails immediately (without consuming) if `parsers` is empty.
pub fn choice<I, O, P>(parsers: Vec<P>) -> impl Parser<I, O>
where
    I: Input + 'static,
    O: 'static,
    P: Parser<I, O> + 'static,
{
    let mut acc: Option<Box<dyn Parser<I, O>>> = None;
    for p in parsers {
        acc = Some(match acc {
            None => Box::new(p),
            Some(prev) => Box::new(or(prev, p)),
        });
    }
    move |input: I| match &mut acc {
        Some(p) => p.parse(input),
        None => {
            let pos = input.position();
            Consumed::empty(Reply::Error {
                msg: Message::empty(pos).expect("a non-empty list of alternatives"),
            })
        }
    }
}

/// Runs `p`; if it fails without consuming input, succeeds with `default` instead.
///
/// `option(default, p)` is `or(p, retn(default))` spelled out for readability at call
/// sites, matching Parsec's `option`.
pub fn option<I, O, P>(default: O, p: P) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
    O: Clone,
{
    or(p, retn(default))
}

/// Runs `p`; succeeds with `()` whether or not `p` matched, discarding its value on
/// success and its failure on non-consuming failure.
///
/// This is Parsec's `optional`: useful when a grammar element may or may not be present
/// and its value, if any, doesn't matter.
pub fn optional<I, O, P>(mut p: P) -> impl Parser<I, ()>
where
    I: Input,
    P: Parser<I, O>,
{
    move |input: I| {
        let first = p.parse(input.clone());
        if first.is_consumed() {
            return first.map(|_| ());
        }
        let (_, reply) = first.into_parts();
        match reply {
            Reply::Ok { rest, msg, .. } => Consumed::empty(Reply::Ok {
                value: (),
                rest,
                msg,
            }),
            Reply::Error { msg } => Consumed::empty(Reply::Ok {
                value: (),
                rest: input,
                msg,
            }),
        }
    }
}

/// Runs `p`; succeeds with `Some(value)` if `p` matched, or `None` without consuming
/// input if it didn't.
///
/// This is Parsec's `optionMaybe`: like [`optional`], but keeps the value around.
pub fn optional_opt<I, O, P>(mut p: P) -> impl Parser<I, Option<O>>
where
    I: Input,
    P: Parser<I, O>,
{
    move |input: I| {
        let first = p.parse(input.clone());
        if first.is_consumed() {
            return first.map(Some);
        }
        let (_, reply) = first.into_parts();
        match reply {
            Reply::Ok { value, rest, msg } => Consumed::empty(Reply::Ok {
                value: Some(value),
                rest,
                msg,
            }),
            Reply::Error { msg } => Consumed::empty(Reply::Ok {
                value: None,
                rest: input,
                msg,
            }),
        }
    }
}

/// Runs `open`, then `p`, then `close`, keeping only `p`'s value.
///
/// Messages from all three steps are merged in order; any of the three failing fails the
/// whole thing, with the `consumed` flags combined by logical-or as usual.
pub fn between<I, O, OpenO, CloseO, Po, P, Pc>(
    mut open: Po,
    mut p: P,
    mut close: Pc,
) -> impl Parser<I, O>
where
    I: Input,
    Po: Parser<I, OpenO>,
    P: Parser<I, O>,
    Pc: Parser<I, CloseO>,
{
    move |input: I| {
        let (c1, r1) = open.parse(input).into_parts();
        let (rest, msg1) = match r1 {
            Reply::Error { msg } => return Consumed::new(c1, Reply::Error { msg }),
            Reply::Ok { rest, msg, .. } => (rest, msg),
        };
        let (c2, r2) = p.parse(rest).into_parts();
        let (value, rest, msg12) = match r2 {
            Reply::Error { msg } => {
                return Consumed::new(c1 || c2, Reply::Error { msg: msg1.merge(msg) })
            }
            Reply::Ok { value, rest, msg } => (value, rest, msg1.merge(msg)),
        };
        let (c3, r3) = close.parse(rest).into_parts();
        match r3 {
            Reply::Error { msg } => {
                Consumed::new(c1 || c2 || c3, Reply::Error { msg: msg12.merge(msg) })
            }
            Reply::Ok { rest, msg, .. } => Consumed::new(
                c1 || c2 || c3,
                Reply::Ok {
                    value,
                    rest,
                    msg: msg12.merge(msg),
                },
            ),
        }
    }
}

/// A parser rebuilt fresh from a factory on every call.
///
/// Rust's `impl Trait` return types can't name themselves, so a grammar with mutual or
/// direct recursion (`fn expr` calling a combinator built from `expr` itself) can't close
/// the loop through an opaque return type the way plain recursive `fn` items do for
/// non-combinator recursion. `Lazy` breaks the cycle with one layer of indirection: the
/// factory is called each time the parser runs, so it only needs to exist, not have a
/// nameable type, at the point the recursive reference is written.
pub struct Lazy<I, O>
where
    I: Input + 'static,
    O: 'static,
{
    factory: Box<dyn FnMut() -> Box<dyn Parser<I, O>>>,
}

impl<I, O> Parser<I, O> for Lazy<I, O>
where
    I: Input + 'static,
    O: 'static,
{
    fn parse(&mut self, input: I) -> ParseResult<I, O> {
        let mut p = (self.factory)();
        p.parse(input)
    }
}

/// Builds a [`Lazy`] parser from `factory`, deferring construction of the actual parser
/// until the moment it's run.
///
/// ```rust
/// use parsec_rs::ascii::chr;
/// use parsec_rs::combinator::lazy;
/// use parsec_rs::input::StrInput;
/// use parsec_rs::parser::Parser;
///
/// // Counts levels of `(...)` nesting: "(())" -> 2, "" -> 0.
/// fn nesting_depth(input: StrInput) -> parsec_rs::ParseResult<StrInput, u32> {
///     let inner = lazy(|| Box::new(nesting_depth) as Box<dyn Parser<StrInput, u32>>);
///     let nested = chr('(')
///         .then(inner)
///         .bind(|depth: u32| chr(')').then(parsec_rs::retn(depth + 1)));
///     nested.or(parsec_rs::retn(0u32)).parse(input)
/// }
///
/// assert_eq!(parsec_rs::parse(nesting_depth, StrInput::new("(())")).unwrap(), 2);
/// ```
pub fn lazy<I, O>(factory: impl FnMut() -> Box<dyn Parser<I, O>> + 'static) -> Lazy<I, O>
where
    I: Input + 'static,
    O: 'static,
{
    Lazy {
        factory: Box::new(factory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::chr;
    use crate::input::from_string;
    use crate::parser::parse;

    #[test]
    fn choice_picks_the_first_match() {
        let p = choice(vec![chr('a'), chr('b'), chr('c')]);
        assert_eq!(parse(p, from_string("b")).unwrap(), 'b');
    }

    #[test]
    fn choice_of_nothing_fails_without_consuming() {
        let p = choice::<_, char, fn(crate::input::StrInput) -> ParseResult<crate::input::StrInput, char>>(
            Vec::new(),
        );
        let err = parse(p, from_string("x")).unwrap_err();
        assert_eq!(err.position, 0);
    }

    #[test]
    fn option_supplies_a_default() {
        let p = option('z', chr('a'));
        assert_eq!(parse(p, from_string("b")).unwrap(), 'z');
    }

    #[test]
    fn optional_discards_the_value_either_way() {
        assert_eq!(parse(optional(chr('a')), from_string("a")).unwrap(), ());
        assert_eq!(parse(optional(chr('a')), from_string("b")).unwrap(), ());
    }

    #[test]
    fn optional_opt_keeps_the_value_when_present() {
        assert_eq!(parse(optional_opt(chr('a')), from_string("a")).unwrap(), Some('a'));
        assert_eq!(parse(optional_opt(chr('a')), from_string("b")).unwrap(), None);
    }

    #[test]
    fn between_keeps_only_the_middle_value() {
        let p = between(chr('('), chr('x'), chr(')'));
        assert_eq!(parse(p, from_string("(x)")).unwrap(), 'x');
    }

    #[test]
    fn between_fails_if_close_is_missing() {
        let p = between(chr('('), chr('x'), chr(')'));
        assert!(parse(p, from_string("(x")).is_err());
    }

    #[test]
    fn lazy_supports_self_recursive_grammars() {
        fn parens(input: crate::input::StrInput) -> ParseResult<crate::input::StrInput, u32> {
            let inner = lazy(|| Box::new(parens) as Box<dyn Parser<crate::input::StrInput, u32>>);
            let nested = chr('(')
                .then(inner)
                .bind(|depth: u32| chr(')').then(crate::parser::retn(depth + 1)));
            nested.or(crate::parser::retn(0u32)).parse(input)
        }

        assert_eq!(parse(parens, from_string("(())")).unwrap(), 2);
        assert_eq!(parse(parens, from_string("")).unwrap(), 0);
    }
}
