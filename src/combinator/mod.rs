//! Combinators built on top of the core algebra in [`crate::parser`].
//!
//! Everything here is written against [`Parser`][crate::parser::Parser]'s public surface —
//! nothing in this module reaches into [`Reply`][crate::reply::Reply]/
//! [`Consumed`][crate::reply::Consumed] internals that `parser.rs` doesn't already expose.

mod core;
mod multi;

pub use self::core::{between, choice, lazy, option, optional, optional_opt, Lazy};
pub use self::multi::{
    chainl, chainl1, chainr, chainr1, count, end_by, end_by1, many, many1, sep_by, sep_by1,
    sep_end_by, sep_end_by1, skip_many, skip_many1,
};
