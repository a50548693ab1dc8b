//! Property tests for the algebraic laws the core combinators are required to obey.
//!
//! Equivalence between two parsers below means: run both against the same input and
//! compare the resulting `Reply` (value, rest position, and error shape) structurally.

use parsec_rs::ascii::digit;
use parsec_rs::input::{from_string, Input, StrInput};
use parsec_rs::parser::{attempt, bind, fail, or, retn, Parser};
use parsec_rs::reply::Reply;
use proptest::prelude::*;

fn run<O: Clone + PartialEq + std::fmt::Debug>(
    mut p: impl Parser<StrInput, O>,
    input: &str,
) -> Reply<StrInput, O> {
    p.parse(from_string(input)).reply().clone()
}

fn replies_match<O: PartialEq + std::fmt::Debug>(a: &Reply<StrInput, O>, b: &Reply<StrInput, O>) -> bool {
    match (a, b) {
        (Reply::Ok { value: v1, rest: r1, .. }, Reply::Ok { value: v2, rest: r2, .. }) => {
            v1 == v2 && r1.position() == r2.position()
        }
        (Reply::Error { .. }, Reply::Error { .. }) => true,
        _ => false,
    }
}

proptest! {
    #[test]
    fn left_identity_bind_retn_f_equals_f(x in 0i64..1000, input in "[a-z]{0,8}") {
        // bind(retn(x), f) ≡ f(x)
        let f = |n: i64| retn::<StrInput, i64>(n * 2);
        let lhs = run(bind(retn::<StrInput, i64>(x), f), &input);
        let rhs = run(f(x), &input);
        prop_assert!(replies_match(&lhs, &rhs));
    }

    #[test]
    fn right_identity_bind_p_retn_equals_p(input in "[a-z0-9]{0,8}") {
        // bind(p, retn) ≡ p
        let lhs = run(bind(digit, |c: char| retn::<StrInput, char>(c)), &input);
        let rhs = run(digit, &input);
        prop_assert!(replies_match(&lhs, &rhs));
    }

    #[test]
    fn bind_is_associative(input in "[0-9]{0,6}[a-z]{0,4}") {
        // bind(bind(p, f), g) ≡ bind(p, x -> bind(f(x), g))
        let f = |c: char| retn::<StrInput, i64>(c as i64);
        let g = |n: i64| retn::<StrInput, i64>(n + 1);

        let lhs = run(bind(bind(digit, f), g), &input);
        let rhs = run(bind(digit, move |c: char| bind(f(c), g)), &input);
        prop_assert!(replies_match(&lhs, &rhs));
    }

    #[test]
    fn or_with_fail_on_the_left_is_the_right_parser(input in "[a-z0-9]{0,8}") {
        // or(fail, p) ≡ p (on the resulting value/position; the merged message differs)
        let lhs = run(or(fail::<StrInput, char>("anything"), digit), &input);
        let rhs = run(digit, &input);
        prop_assert!(replies_match(&lhs, &rhs));
    }

    #[test]
    fn or_with_fail_on_the_right_is_the_left_parser(input in "[a-z0-9]{0,8}") {
        // or(p, fail) ≡ p
        let lhs = run(or(digit, fail::<StrInput, char>("anything")), &input);
        let rhs = run(digit, &input);
        prop_assert!(replies_match(&lhs, &rhs));
    }

    #[test]
    fn attempt_is_idempotent(input in "[a-z0-9]{0,8}") {
        // attempt(attempt(p)) ≡ attempt(p)
        let lhs = run(attempt(attempt(digit)), &input);
        let rhs = run(attempt(digit), &input);
        prop_assert!(replies_match(&lhs, &rhs));
    }

    #[test]
    fn progress_invariant_holds_for_satisfy(input in "[a-z0-9]{0,8}") {
        let mut p = digit;
        let entry = from_string(input.as_str());
        let entry_pos = entry.position();
        let result = p.parse(entry);
        match result.reply() {
            Reply::Ok { rest, .. } => {
                if result.is_consumed() {
                    prop_assert!(rest.position() > entry_pos);
                } else {
                    prop_assert_eq!(rest.position(), entry_pos);
                }
            }
            Reply::Error { .. } => {
                // satisfy-based parsers never report a ConsumedError: a mismatch is
                // noticed before advancing.
                prop_assert!(!result.is_consumed());
            }
        }
    }
}

#[test]
fn message_merge_is_commutative_on_the_expected_set() {
    use parsec_rs::error::Message;

    let a = Message::unexpected_token(3, 'x', "a letter");
    let b = Message::unexpected_token(3, 'y', "a digit");

    let left = a.clone().merge(b.clone()).into_report().expected;
    let mut right = b.merge(a).into_report().expected;
    right.sort();
    let mut left_sorted = left;
    left_sorted.sort();
    assert_eq!(left_sorted, right);
}

#[test]
fn message_merge_is_associative_on_the_expected_set() {
    use parsec_rs::error::Message;

    let a = Message::unexpected_token(0, 'x', "a");
    let b = Message::unexpected_token(0, 'x', "b");
    let c = Message::unexpected_token(0, 'x', "c");

    let left = a.clone().merge(b.clone()).merge(c.clone()).into_report().expected;
    let right = a.merge(b.merge(c)).into_report().expected;
    assert_eq!(left, right);
}

#[test]
fn message_merge_position_is_the_max_of_the_two() {
    use parsec_rs::error::Message;

    let earlier = Message::unexpected_token(1, 'x', "a");
    let later = Message::unexpected_token(9, 'y', "b");
    assert_eq!(earlier.merge(later).position(), 9);
}
