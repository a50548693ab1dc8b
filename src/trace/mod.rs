//! Parser execution tracing.
//!
//! Wrapping a parser in [`trace`] logs each call to stderr: the parser's name, the input it
//! was given, and whether it matched, failed, and how much it consumed. This is a purely
//! diagnostic layer — `trace(name, p)` behaves exactly like `p` otherwise — gated behind the
//! `debug` feature so it costs nothing (not even the `name` formatting) when the feature is
//! off.

#[cfg(feature = "debug")]
mod internals;

use crate::input::Input;
use crate::parser::Parser;

#[cfg(all(feature = "debug", not(feature = "std")))]
compile_error!("`debug` requires `std`");

/// Wraps `parser` so every call logs its name, input, and outcome to stderr.
///
/// A no-op beyond moving `parser` into the returned closure unless the `debug` feature is
/// enabled, in which case it delegates to the internal renderer.
#[cfg_attr(not(feature = "debug"), allow(unused_variables))]
pub fn trace<I, O, P>(name: impl crate::lib::std::fmt::Display, mut parser: P) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
{
    #[cfg(feature = "debug")]
    {
        let mut call_count = 0usize;
        move |input: I| {
            let depth = internals::Depth::new();
            internals::start(*depth, &name, call_count, &input);

            let result = parser.parse(input);

            internals::end(*depth, &name, call_count, &result);
            call_count += 1;

            result
        }
    }
    #[cfg(not(feature = "debug"))]
    {
        move |input: I| parser.parse(input)
    }
}
