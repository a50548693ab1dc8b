//! The result of running a parser: [`Reply`], wrapped in a progress flag, [`Consumed`].

use crate::error::Message;
use crate::input::Input;

/// The outcome of running a parser once: either a value and the input left over, or a
/// failure — each carrying the [`Message`] that would explain it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply<I, O>
where
    I: Input,
{
    /// The parser produced `value`, leaving `rest` to be parsed next.
    Ok {
        /// The parsed value.
        value: O,
        /// The input positioned just after what this parser consumed.
        rest: I,
        /// The message describing what else would have been accepted here — present even
        /// on success, since a later failure upstream may need to merge against it (for
        /// instance when a `many` loop stops because its element parser finally fails).
        msg: Message<I::Token>,
    },
    /// The parser failed.
    Error {
        /// The message explaining the failure.
        msg: Message<I::Token>,
    },
}

impl<I, O> Reply<I, O>
where
    I: Input,
{
    /// The message carried by this reply, regardless of which case it is.
    pub fn message(&self) -> &Message<I::Token> {
        match self {
            Reply::Ok { msg, .. } => msg,
            Reply::Error { msg } => msg,
        }
    }

    /// Whether this reply is the `Ok` case.
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok { .. })
    }
}

/// A [`Reply`] tagged with whether the parser that produced it advanced the input cursor.
///
/// This flag, not the `Reply` itself, is what [`or`][crate::or] and the `many` family use
/// to decide whether an alternative should be tried or a loop should stop: a parser that
/// fails *after* consuming input has committed to that branch, and `or` will not fall
/// through to its second argument. Only [`attempt`][crate::attempt] discards a `Consumed`
/// tag on failure, turning it back into `Empty` so backtracking can happen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consumed<I, O>
where
    I: Input,
{
    consumed: bool,
    reply: Reply<I, O>,
}

impl<I, O> Consumed<I, O>
where
    I: Input,
{
    /// Wraps `reply` as having consumed input.
    pub fn consumed(reply: Reply<I, O>) -> Self {
        Self {
            consumed: true,
            reply,
        }
    }

    /// Wraps `reply` as having consumed no input.
    pub fn empty(reply: Reply<I, O>) -> Self {
        Self {
            consumed: false,
            reply,
        }
    }

    /// Wraps `reply` under an explicit consumed flag.
    pub fn new(consumed: bool, reply: Reply<I, O>) -> Self {
        Self { consumed, reply }
    }

    /// Whether the underlying parser advanced the input cursor before producing `reply`.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// The wrapped reply.
    pub fn reply(&self) -> &Reply<I, O> {
        &self.reply
    }

    /// Consumes `self`, returning the consumed flag and the reply separately.
    pub fn into_parts(self) -> (bool, Reply<I, O>) {
        (self.consumed, self.reply)
    }

    /// Re-wraps the reply under a possibly different consumed flag.
    ///
    /// `consumed` is combined with the existing flag by logical-or: once a parse sequence
    /// has consumed input, a later empty step doesn't un-commit it.
    pub fn with_consumed(self, consumed: bool) -> Self {
        Self {
            consumed: self.consumed || consumed,
            reply: self.reply,
        }
    }

    /// Applies `f` to the contained value if this is an `Ok` reply, leaving the consumed
    /// flag and an `Error` reply untouched.
    pub fn map<P>(self, f: impl FnOnce(O) -> P) -> Consumed<I, P> {
        let reply = match self.reply {
            Reply::Ok { value, rest, msg } => Reply::Ok {
                value: f(value),
                rest,
                msg,
            },
            Reply::Error { msg } => Reply::Error { msg },
        };
        Consumed {
            consumed: self.consumed,
            reply,
        }
    }
}

/// The result type every [`Parser`][crate::parser::Parser] returns: a [`Consumed`]-tagged
/// [`Reply`].
pub type ParseResult<I, O> = Consumed<I, O>;
