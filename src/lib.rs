//! # parsec-rs, direct-style monadic parser combinators
//!
//! `parsec-rs` is a parser combinator library modeled on Parsec (Leijen &
//! Meijer, "Parsec: Direct Style Monadic Parser Combinators for the Real
//! World"). It gives you a small algebra for composing parsers over
//! arbitrary symbol streams — strings, character vectors, or arrays of an
//! arbitrary token type — with principled error reporting and controllable
//! backtracking suitable for LL(∞) grammars.
//!
//! ## The core model
//!
//! Every parser is a pure function `Input -> Consumed<Reply<O>>`:
//!
//! - [`Reply`] is a two-case union: `Ok { value, rest, msg }` or
//!   `Error { msg }`.
//! - [`Consumed`] wraps a `Reply` with a `bool` recording whether the parser
//!   advanced the cursor before producing that `Reply`.
//!
//! That `consumed` flag, not the `Reply` itself, is what [`or`] and
//! [`many`][crate::combinator::many] use to decide whether to try an
//! alternative or keep looping — a parser that fails *after* consuming input
//! commits to that branch. [`attempt`] is the only way to discard that
//! commitment and get arbitrary lookahead back.
//!
//! ## Example
//!
//! ```rust
//! use parsec_rs::prelude::*;
//! use parsec_rs::ascii::{chr, string};
//! use parsec_rs::combinator::{chainl1, many};
//! use parsec_rs::input::StrInput;
//!
//! fn plus(input: StrInput) -> parsec_rs::ParseResult<StrInput, fn(i64, i64) -> i64> {
//!     chr('+').then(parsec_rs::retn((|a, b| a + b) as fn(i64, i64) -> i64)).parse(input)
//! }
//!
//! fn digit_value(input: StrInput) -> parsec_rs::ParseResult<StrInput, i64> {
//!     parsec_rs::ascii::digit
//!         .map(|c: char| i64::from(c.to_digit(10).unwrap()))
//!         .parse(input)
//! }
//!
//! let sum = chainl1(digit_value, plus);
//! let report = parsec_rs::parse(sum, StrInput::new("1+2+3")).unwrap();
//! assert_eq!(report, 6);
//! # let _ = string; let _ = many;
//! ```
//!
//! ## Scope
//!
//! Out of scope, by design: incremental or streaming input (an
//! [`Input`][crate::input::Input] is materialized and random-accessible by
//! position up front), left-recursion handling beyond
//! [`chainl1`][crate::combinator::chainl1], memoization/packrat parsing, and
//! parse-tree generation — combinators return whatever value you choose.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![allow(clippy::should_implement_trait)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// `std`/`alloc`/`core` facade so the rest of the crate can stay agnostic
/// about which allocator-bearing prelude is in scope.
#[doc(hidden)]
pub mod lib {
    #[cfg(not(feature = "std"))]
    pub mod std {
        pub use alloc::{borrow, boxed, format, rc, string, vec};
        pub use core::{cmp, convert, fmt, iter, mem, ops, option, result};
    }

    #[cfg(feature = "std")]
    pub mod std {
        pub use std::{borrow, boxed, cmp, convert, fmt, format, iter, mem, ops, option, rc, result, string, vec};
    }
}

pub mod ascii;
pub mod combinator;
pub mod error;
pub mod input;
pub mod parser;
pub mod regex;
pub mod reply;
pub mod trace;

pub use error::{Message, ParseErrorReport};
pub use parser::{attempt, bind, eof, fail, label, or, parse, retn, satisfy, then, Parser};
pub use reply::{Consumed, ParseResult, Reply};

/// Glob-importable surface for day-to-day grammar writing.
///
/// ```rust
/// use parsec_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::input::Input as _;
    pub use crate::parser::Parser as _;
    pub use crate::reply::ParseResult;
    pub use crate::{attempt, label, parse, retn};
}
