//! Parse error messages and the user-facing report built from them.
//!
//! A [`Message`] is the internal, mergeable error record every combinator carries around:
//! a position, an optional unexpected symbol, and a set of expected-thing labels. Merging
//! two messages (see [`Message::merge`]) is how `or` combines the error from a failed
//! first alternative with the error from the one it falls back to.

use crate::lib::std::borrow::Cow;
use crate::lib::std::fmt;
use crate::lib::std::vec::Vec;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Unexpected<T> {
    Nothing,
    Token(T),
    EndOfInput,
}

/// A mergeable parse error: the position it occurred at, the symbol found (if any), and
/// the set of labels describing what would have been accepted there.
///
/// `T` is the token type of the [`Input`][crate::input::Input] being parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message<T> {
    position: usize,
    unexpected: Unexpected<T>,
    expected: Vec<Cow<'static, str>>,
}

impl<T> Message<T>
where
    T: Clone + PartialEq + fmt::Debug,
{
    /// A message with no unexpected symbol and no expectations, at `position`.
    ///
    /// Used as the starting point for combinators (like [`retn`][crate::retn]) that never
    /// fail and so never have anything interesting to report.
    pub fn empty(position: usize) -> Self {
        Self {
            position,
            unexpected: Unexpected::Nothing,
            expected: Vec::new(),
        }
    }

    /// A message reporting that `token` was found at `position` where `expected` was
    /// wanted instead.
    pub fn unexpected_token(
        position: usize,
        token: T,
        expected: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            position,
            unexpected: Unexpected::Token(token),
            expected: {
                let mut v = Vec::with_capacity(1);
                v.push(expected.into());
                v
            },
        }
    }

    /// A message reporting that the stream ended at `position` where `expected` was
    /// wanted instead.
    pub fn end_of_input(position: usize, expected: impl Into<Cow<'static, str>>) -> Self {
        Self {
            position,
            unexpected: Unexpected::EndOfInput,
            expected: {
                let mut v = Vec::with_capacity(1);
                v.push(expected.into());
                v
            },
        }
    }

    /// The position this message refers to.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Replaces the expected set with a single `name`, keeping the position and unexpected
    /// symbol unchanged.
    ///
    /// This is a replacement, not a union: `label(label(p, "a"), "b")` reports only `"b"`
    /// on failure. A grammar that wants both names in the report has to ask for that
    /// explicitly; silently accumulating every label a parser passed through on its way
    /// up would bury the name the caller actually chose under ones it wrapped.
    pub fn expect(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.expected = {
            let mut v = Vec::with_capacity(1);
            v.push(name.into());
            v
        };
        self
    }

    /// Combines two messages from alternative parse attempts at the same point.
    ///
    /// The message with the later position wins outright (it made more progress toward a
    /// diagnosis); at a tied position, the expected sets are unioned and `self`'s
    /// unexpected symbol is kept. That tie-break on `unexpected` means `merge` isn't fully
    /// commutative on the whole message — only the `expected` set is guaranteed
    /// commutative and associative.
    pub fn merge(self, other: Self) -> Self {
        use crate::lib::std::cmp::Ordering;
        match self.position.cmp(&other.position) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal => {
                let mut expected = self.expected;
                for label in other.expected {
                    if !expected.contains(&label) {
                        expected.push(label);
                    }
                }
                Self {
                    position: self.position,
                    unexpected: self.unexpected,
                    expected,
                }
            }
        }
    }

    /// Builds the user-facing report for this message.
    pub fn into_report(self) -> ParseErrorReport {
        let unexpected = match self.unexpected {
            Unexpected::Nothing => None,
            Unexpected::Token(t) => Some(crate::lib::std::format!("{t:?}")),
            Unexpected::EndOfInput => Some(crate::lib::std::format!("end of input")),
        };
        ParseErrorReport {
            position: self.position,
            unexpected,
            expected: self.expected.into_iter().map(Cow::into_owned).collect(),
        }
    }
}

/// The final, user-facing shape of a parse failure, returned by [`parse`][crate::parse].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseErrorReport {
    /// The position in the input where parsing stopped.
    pub position: usize,
    /// A textual rendering of the symbol found at `position`, or `None` if the stream had
    /// already ended somewhere else and no single symbol is being blamed.
    pub unexpected: Option<crate::lib::std::string::String>,
    /// The names of the things that would have been accepted at `position`.
    pub expected: Vec<crate::lib::std::string::String>,
}

impl fmt::Display for ParseErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unexpected {
            Some(found) => write!(f, "unexpected {found} at position {}", self.position)?,
            None => write!(f, "parse error at position {}", self.position)?,
        }
        if !self.expected.is_empty() {
            write!(f, ", expected one of: ")?;
            for (i, name) in self.expected.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{name}")?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseErrorReport {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_has_no_unexpected_or_expected() {
        let msg = Message::<char>::empty(3);
        let report = msg.into_report();
        assert_eq!(report.position, 3);
        assert_eq!(report.unexpected, None);
        assert!(report.expected.is_empty());
    }

    #[test]
    fn unexpected_token_reports_the_token_and_one_expectation() {
        let msg = Message::unexpected_token(1, 'x', "a letter");
        let report = msg.into_report();
        assert_eq!(report.unexpected, Some("'x'".into()));
        assert_eq!(report.expected, vec!["a letter"]);
    }

    #[test]
    fn end_of_input_reports_no_specific_token() {
        let msg = Message::<char>::end_of_input(5, "a digit");
        let report = msg.into_report();
        assert_eq!(report.unexpected, Some("end of input".into()));
    }

    #[test]
    fn expect_replaces_rather_than_unions() {
        let msg = Message::unexpected_token(0, 'x', "a").expect("b");
        assert_eq!(msg.into_report().expected, vec!["b"]);
    }

    #[test]
    fn merge_at_tied_position_unions_expected_and_keeps_self_unexpected() {
        let a = Message::unexpected_token(2, 'x', "a letter");
        let b = Message::unexpected_token(2, 'y', "a digit");
        let merged = a.merge(b);
        let report = merged.into_report();
        assert_eq!(report.position, 2);
        assert_eq!(report.unexpected, Some("'x'".into()));
        assert_eq!(report.expected, vec!["a letter", "a digit"]);
    }

    #[test]
    fn merge_at_tied_position_does_not_duplicate_shared_labels() {
        let a = Message::unexpected_token(0, 'x', "a letter");
        let b = Message::unexpected_token(0, 'y', "a letter");
        let merged = a.merge(b);
        assert_eq!(merged.into_report().expected, vec!["a letter"]);
    }

    #[test]
    fn merge_prefers_the_later_position_outright() {
        let earlier = Message::unexpected_token(0, 'x', "a letter");
        let later = Message::unexpected_token(4, 'y', "a digit");
        let merged = earlier.clone().merge(later.clone());
        assert_eq!(merged, later.clone());
        let merged_swapped = later.merge(earlier);
        assert_eq!(merged_swapped.position(), 4);
    }

    #[test]
    fn merge_is_associative_on_the_expected_set() {
        let a = Message::unexpected_token(0, 'x', "a");
        let b = Message::unexpected_token(0, 'x', "b");
        let c = Message::unexpected_token(0, 'x', "c");
        let left = a.clone().merge(b.clone()).merge(c.clone());
        let right = a.merge(b.merge(c));
        assert_eq!(left.into_report().expected, right.into_report().expected);
    }

    #[test]
    fn display_renders_readable_report() {
        let msg = Message::unexpected_token(2, 'x', "a digit").expect("a digit");
        let rendered = crate::lib::std::format!("{}", msg.into_report());
        assert_eq!(rendered, "unexpected 'x' at position 2, expected one of: a digit");
    }
}
