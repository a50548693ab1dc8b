//! Combinators that apply a parser zero, one, or many times over.
//!
//! Every loop here is a plain `while`/`loop`, never recursion: a long `many` chain must not
//! grow the call stack, and none of these combinators recurse into themselves.

use crate::error::Message;
use crate::input::Input;
use crate::lib::std::vec::Vec;
use crate::parser::{or, retn, Parser};
use crate::reply::{Consumed, Reply};

enum LoopOutcome<I, O>
where
    I: Input,
{
    Stopped {
        consumed_any: bool,
        rest: I,
        values: Vec<O>,
        msg: Message<I::Token>,
    },
    Failed {
        msg: Message<I::Token>,
    },
}

/// Repeats `p` until it fails without consuming input, accumulating into `values` (already
/// seeded by the caller, so `many`/`many1` can share this loop).
fn accumulate<I, O, P>(
    p: &mut P,
    mut current: I,
    mut values: Vec<O>,
    mut last_msg: Message<I::Token>,
    mut consumed_any: bool,
) -> LoopOutcome<I, O>
where
    I: Input,
    P: Parser<I, O>,
{
    loop {
        let (c, reply) = p.parse(current.clone()).into_parts();
        match reply {
            Reply::Ok { value, rest, msg } => {
                consumed_any = consumed_any || c;
                last_msg = msg;
                values.push(value);
                current = rest;
                if !c {
                    // Looping on an element that matched without consuming would hang.
                    break;
                }
            }
            Reply::Error { msg } => {
                if c {
                    return LoopOutcome::Failed {
                        msg: last_msg.merge(msg),
                    };
                }
                last_msg = last_msg.merge(msg);
                break;
            }
        }
    }
    LoopOutcome::Stopped {
        consumed_any,
        rest: current,
        values,
        msg: last_msg,
    }
}

/// Zero or more repetitions of `p`, collected into a `Vec`.
///
/// Stops (without error) the first time `p` fails without consuming input. A failure of
/// `p` *after* it consumed input is a hard error — it doesn't mean "end of list," it means
/// the grammar expected another full match and didn't get one.
pub fn many<I, O, P>(mut p: P) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
{
    move |input: I| {
        let pos = input.position();
        match accumulate(&mut p, input, Vec::new(), Message::empty(pos), false) {
            LoopOutcome::Stopped {
                consumed_any,
                rest,
                values,
                msg,
            } => Consumed::new(
                consumed_any,
                Reply::Ok {
                    value: values,
                    rest,
                    msg,
                },
            ),
            LoopOutcome::Failed { msg } => Consumed::new(true, Reply::Error { msg }),
        }
    }
}

/// One or more repetitions of `p`; fails if `p` doesn't match at least once.
pub fn many1<I, O, P>(mut p: P) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
{
    move |input: I| {
        let (c0, r0) = p.parse(input).into_parts();
        match r0 {
            Reply::Error { msg } => Consumed::new(c0, Reply::Error { msg }),
            Reply::Ok { value, rest, msg } => {
                let mut seed = Vec::new();
                seed.push(value);
                match accumulate(&mut p, rest, seed, msg, c0) {
                    LoopOutcome::Stopped {
                        consumed_any,
                        rest,
                        values,
                        msg,
                    } => Consumed::new(
                        consumed_any,
                        Reply::Ok {
                            value: values,
                            rest,
                            msg,
                        },
                    ),
                    LoopOutcome::Failed { msg } => Consumed::new(true, Reply::Error { msg }),
                }
            }
        }
    }
}

/// Like [`many`], but discards every value — useful for skipping whitespace or comments
/// without paying for a `Vec` of results nobody reads.
pub fn skip_many<I, O, P>(mut p: P) -> impl Parser<I, ()>
where
    I: Input,
    P: Parser<I, O>,
{
    move |input: I| {
        let mut current = input;
        let mut consumed_any = false;
        let mut last_msg = Message::empty(current.position());
        loop {
            let (c, reply) = p.parse(current.clone()).into_parts();
            match reply {
                Reply::Ok { rest, msg, .. } => {
                    consumed_any = consumed_any || c;
                    last_msg = msg;
                    current = rest;
                    if !c {
                        break;
                    }
                }
                Reply::Error { msg } => {
                    if c {
                        return Consumed::new(
                            true,
                            Reply::Error {
                                msg: last_msg.merge(msg),
                            },
                        );
                    }
                    last_msg = last_msg.merge(msg);
                    break;
                }
            }
        }
        Consumed::new(
            consumed_any,
            Reply::Ok {
                value: (),
                rest: current,
                msg: last_msg,
            },
        )
    }
}

/// Like [`many1`], but discards every value.
pub fn skip_many1<I, O, P>(mut p: P) -> impl Parser<I, ()>
where
    I: Input,
    P: Parser<I, O>,
{
    move |input: I| {
        let (c0, r0) = p.parse(input).into_parts();
        match r0 {
            Reply::Error { msg } => Consumed::new(c0, Reply::Error { msg }),
            Reply::Ok { rest, msg, .. } => {
                let mut current = rest;
                let mut consumed_any = c0;
                let mut last_msg = msg;
                loop {
                    let (c, reply) = p.parse(current.clone()).into_parts();
                    match reply {
                        Reply::Ok { rest, msg, .. } => {
                            consumed_any = consumed_any || c;
                            last_msg = msg;
                            current = rest;
                            if !c {
                                break;
                            }
                        }
                        Reply::Error { msg } => {
                            if c {
                                return Consumed::new(
                                    true,
                                    Reply::Error {
                                        msg: last_msg.merge(msg),
                                    },
                                );
                            }
                            last_msg = last_msg.merge(msg);
                            break;
                        }
                    }
                }
                Consumed::new(
                    consumed_any,
                    Reply::Ok {
                        value: (),
                        rest: current,
                        msg: last_msg,
                    },
                )
            }
        }
    }
}

/// One or more `p`, separated by `sep`; the separators' values are discarded.
///
/// A trailing separator with nothing after it is an error (use [`sep_end_by1`] if trailing
/// separators should be tolerated).
pub fn sep_by1<I, O, OS, P, S>(mut p: P, mut sep: S) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
    S: Parser<I, OS>,
{
    move |input: I| {
        let (c0, r0) = p.parse(input).into_parts();
        match r0 {
            Reply::Error { msg } => Consumed::new(c0, Reply::Error { msg }),
            Reply::Ok { value, rest, msg } => {
                let mut values = Vec::new();
                values.push(value);
                let mut consumed_any = c0;
                let mut current = rest;
                let mut last_msg = msg;
                loop {
                    let (cs, rs) = sep.parse(current.clone()).into_parts();
                    match rs {
                        Reply::Error { msg: msg_sep } => {
                            if cs {
                                return Consumed::new(
                                    true,
                                    Reply::Error {
                                        msg: last_msg.merge(msg_sep),
                                    },
                                );
                            }
                            last_msg = last_msg.merge(msg_sep);
                            break;
                        }
                        Reply::Ok {
                            rest: rest_sep,
                            msg: msg_sep,
                            ..
                        } => {
                            let (cp, rp) = p.parse(rest_sep).into_parts();
                            match rp {
                                Reply::Error { msg: msg_p } => {
                                    return Consumed::new(
                                        consumed_any || cs || cp,
                                        Reply::Error {
                                            msg: last_msg.merge(msg_sep).merge(msg_p),
                                        },
                                    );
                                }
                                Reply::Ok {
                                    value,
                                    rest,
                                    msg: msg_p,
                                } => {
                                    consumed_any = consumed_any || cs || cp;
                                    last_msg = msg_sep.merge(msg_p);
                                    values.push(value);
                                    current = rest;
                                }
                            }
                        }
                    }
                }
                Consumed::new(
                    consumed_any,
                    Reply::Ok {
                        value: values,
                        rest: current,
                        msg: last_msg,
                    },
                )
            }
        }
    }
}

/// Zero or more `p`, separated by `sep`; `[]` if `p` doesn't match at all.
pub fn sep_by<I, O, OS, P, S>(p: P, sep: S) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
    S: Parser<I, OS>,
{
    or(sep_by1(p, sep), retn(Vec::new()))
}

/// One or more `p`, each followed by `sep` with an optional trailing one already
/// consumed, *or* one that isn't: a separator after the last element is tolerated either
/// way, unlike [`sep_by1`].
pub fn sep_end_by1<I, O, OS, P, S>(mut p: P, mut sep: S) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
    S: Parser<I, OS>,
{
    move |input: I| {
        let (c0, r0) = p.parse(input).into_parts();
        match r0 {
            Reply::Error { msg } => Consumed::new(c0, Reply::Error { msg }),
            Reply::Ok { value, rest, msg } => {
                let mut values = Vec::new();
                values.push(value);
                let mut consumed_any = c0;
                let mut current = rest;
                let mut last_msg = msg;
                loop {
                    let (cs, rs) = sep.parse(current.clone()).into_parts();
                    match rs {
                        Reply::Error { msg: msg_sep } => {
                            if cs {
                                return Consumed::new(
                                    true,
                                    Reply::Error {
                                        msg: last_msg.merge(msg_sep),
                                    },
                                );
                            }
                            last_msg = last_msg.merge(msg_sep);
                            break;
                        }
                        Reply::Ok {
                            rest: rest_sep,
                            msg: msg_sep,
                            ..
                        } => {
                            let (cp, rp) = p.parse(rest_sep.clone()).into_parts();
                            match rp {
                                Reply::Error { msg: msg_p } => {
                                    if cp {
                                        return Consumed::new(
                                            true,
                                            Reply::Error {
                                                msg: last_msg.merge(msg_sep).merge(msg_p),
                                            },
                                        );
                                    }
                                    // Trailing separator, nothing following it: stop here.
                                    consumed_any = consumed_any || cs;
                                    last_msg = last_msg.merge(msg_sep).merge(msg_p);
                                    current = rest_sep;
                                    break;
                                }
                                Reply::Ok {
                                    value,
                                    rest,
                                    msg: msg_p,
                                } => {
                                    consumed_any = consumed_any || cs || cp;
                                    last_msg = msg_sep.merge(msg_p);
                                    values.push(value);
                                    current = rest;
                                }
                            }
                        }
                    }
                }
                Consumed::new(
                    consumed_any,
                    Reply::Ok {
                        value: values,
                        rest: current,
                        msg: last_msg,
                    },
                )
            }
        }
    }
}

/// Zero or more `p`, each followed by `sep`, with a tolerated trailing separator.
pub fn sep_end_by<I, O, OS, P, S>(p: P, sep: S) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
    S: Parser<I, OS>,
{
    or(sep_end_by1(p, sep), retn(Vec::new()))
}

/// Zero or more `p`, each one *required* to be followed by `sep` (unlike [`sep_end_by`],
/// a final element without a trailing separator is not matched).
pub fn end_by<I, O, OS, P, S>(mut p: P, mut sep: S) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
    S: Parser<I, OS>,
{
    move |input: I| {
        let mut values = Vec::new();
        let mut consumed_any = false;
        let mut current = input;
        let mut last_msg = Message::empty(current.position());
        loop {
            let (cp, rp) = p.parse(current.clone()).into_parts();
            match rp {
                Reply::Error { msg: msg_p } => {
                    if cp {
                        return Consumed::new(
                            true,
                            Reply::Error {
                                msg: last_msg.merge(msg_p),
                            },
                        );
                    }
                    last_msg = last_msg.merge(msg_p);
                    break;
                }
                Reply::Ok {
                    value,
                    rest,
                    msg: msg_p,
                } => {
                    let (cs, rs) = sep.parse(rest).into_parts();
                    match rs {
                        Reply::Error { msg: msg_sep } => {
                            return Consumed::new(
                                consumed_any || cp || cs,
                                Reply::Error {
                                    msg: msg_p.merge(msg_sep),
                                },
                            );
                        }
                        Reply::Ok {
                            rest: rest2,
                            msg: msg_sep,
                            ..
                        } => {
                            consumed_any = consumed_any || cp || cs;
                            values.push(value);
                            current = rest2;
                            last_msg = msg_p.merge(msg_sep);
                        }
                    }
                }
            }
        }
        Consumed::new(
            consumed_any,
            Reply::Ok {
                value: values,
                rest: current,
                msg: last_msg,
            },
        )
    }
}

/// Like [`end_by`], but requires at least one `p sep` pair.
pub fn end_by1<I, O, OS, P, S>(mut p: P, mut sep: S) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
    S: Parser<I, OS>,
{
    move |input: I| {
        let mut values = Vec::new();
        let mut consumed_any = false;
        let mut current = input;
        let mut last_msg = Message::empty(current.position());
        loop {
            let (cp, rp) = p.parse(current.clone()).into_parts();
            match rp {
                Reply::Error { msg: msg_p } => {
                    let merged = last_msg.merge(msg_p);
                    if cp {
                        return Consumed::new(true, Reply::Error { msg: merged });
                    }
                    if values.is_empty() {
                        return Consumed::new(consumed_any, Reply::Error { msg: merged });
                    }
                    last_msg = merged;
                    break;
                }
                Reply::Ok {
                    value,
                    rest,
                    msg: msg_p,
                } => {
                    let (cs, rs) = sep.parse(rest).into_parts();
                    match rs {
                        Reply::Error { msg: msg_sep } => {
                            return Consumed::new(
                                consumed_any || cp || cs,
                                Reply::Error {
                                    msg: msg_p.merge(msg_sep),
                                },
                            );
                        }
                        Reply::Ok {
                            rest: rest2,
                            msg: msg_sep,
                            ..
                        } => {
                            consumed_any = consumed_any || cp || cs;
                            values.push(value);
                            current = rest2;
                            last_msg = msg_p.merge(msg_sep);
                        }
                    }
                }
            }
        }
        Consumed::new(
            consumed_any,
            Reply::Ok {
                value: values,
                rest: current,
                msg: last_msg,
            },
        )
    }
}

/// Exactly `n` repetitions of `p`. `count(p, 0)` always succeeds with `[]` and consumes
/// nothing.
pub fn count<I, O, P>(n: usize, mut p: P) -> impl Parser<I, Vec<O>>
where
    I: Input,
    P: Parser<I, O>,
{
    move |input: I| {
        let mut values = Vec::with_capacity(n);
        let mut consumed_any = false;
        let mut current = input;
        let mut last_msg = Message::empty(current.position());
        for _ in 0..n {
            let (c, reply) = p.parse(current.clone()).into_parts();
            match reply {
                Reply::Error { msg } => {
                    return Consumed::new(
                        consumed_any || c,
                        Reply::Error {
                            msg: last_msg.merge(msg),
                        },
                    );
                }
                Reply::Ok { value, rest, msg } => {
                    consumed_any = consumed_any || c;
                    values.push(value);
                    current = rest;
                    last_msg = msg;
                }
            }
        }
        Consumed::new(
            consumed_any,
            Reply::Ok {
                value: values,
                rest: current,
                msg: last_msg,
            },
        )
    }
}

/// Left-associative chain: one or more `p`, separated by `op`, folded left-to-right —
/// `a op1 b op2 c` becomes `op2(op1(a, b), c)`.
///
/// The classic use is arithmetic expressions without needing a precedence-climbing parser
/// for a single precedence level.
pub fn chainl1<I, O, P, Op>(mut p: P, mut op: Op) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
    Op: Parser<I, fn(O, O) -> O>,
{
    move |input: I| {
        let (c0, r0) = p.parse(input).into_parts();
        match r0 {
            Reply::Error { msg } => Consumed::new(c0, Reply::Error { msg }),
            Reply::Ok {
                value,
                rest,
                msg: msg0,
            } => {
                let mut acc = value;
                let mut consumed_any = c0;
                let mut current = rest;
                let mut last_msg = msg0;
                loop {
                    let (co, ro) = op.parse(current.clone()).into_parts();
                    match ro {
                        Reply::Error { msg: msg_op } => {
                            if co {
                                return Consumed::new(
                                    true,
                                    Reply::Error {
                                        msg: last_msg.merge(msg_op),
                                    },
                                );
                            }
                            last_msg = last_msg.merge(msg_op);
                            break;
                        }
                        Reply::Ok {
                            value: f,
                            rest: rest_op,
                            msg: msg_op,
                        } => {
                            let (cp, rp) = p.parse(rest_op).into_parts();
                            match rp {
                                Reply::Error { msg: msg_p } => {
                                    return Consumed::new(
                                        consumed_any || co || cp,
                                        Reply::Error {
                                            msg: last_msg.merge(msg_op).merge(msg_p),
                                        },
                                    );
                                }
                                Reply::Ok {
                                    value: rhs,
                                    rest,
                                    msg: msg_p,
                                } => {
                                    consumed_any = consumed_any || co || cp;
                                    acc = f(acc, rhs);
                                    current = rest;
                                    last_msg = msg_op.merge(msg_p);
                                }
                            }
                        }
                    }
                }
                Consumed::new(
                    consumed_any,
                    Reply::Ok {
                        value: acc,
                        rest: current,
                        msg: last_msg,
                    },
                )
            }
        }
    }
}

/// [`chainl1`], but `default` is returned (consuming nothing) if `p` doesn't match at all.
pub fn chainl<I, O, P, Op>(p: P, op: Op, default: O) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
    Op: Parser<I, fn(O, O) -> O>,
    O: Clone,
{
    or(chainl1(p, op), retn(default))
}

/// Right-associative chain: one or more `p`, separated by `op`, folded right-to-left —
/// `a op1 b op2 c` becomes `op1(a, op2(b, c))`.
///
/// Operands and operators are collected iteratively, left to right, then folded from the
/// end of the collected list backward — the right-fold itself never recurses, so a long
/// chain doesn't grow the call stack.
pub fn chainr1<I, O, P, Op>(mut p: P, mut op: Op) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
    Op: Parser<I, fn(O, O) -> O>,
{
    move |input: I| {
        let mut operands: Vec<O> = Vec::new();
        let mut funcs: Vec<fn(O, O) -> O> = Vec::new();
        let mut consumed_any;
        let mut current;
        let mut last_msg;
        let (c0, r0) = p.parse(input).into_parts();
        match r0 {
            Reply::Error { msg } => return Consumed::new(c0, Reply::Error { msg }),
            Reply::Ok { value, rest, msg } => {
                operands.push(value);
                consumed_any = c0;
                current = rest;
                last_msg = msg;
            }
        }
        loop {
            let (co, ro) = op.parse(current.clone()).into_parts();
            match ro {
                Reply::Error { msg: msg_op } => {
                    if co {
                        return Consumed::new(
                            true,
                            Reply::Error {
                                msg: last_msg.merge(msg_op),
                            },
                        );
                    }
                    last_msg = last_msg.merge(msg_op);
                    break;
                }
                Reply::Ok {
                    value: f,
                    rest: rest_op,
                    msg: msg_op,
                } => {
                    let (cp, rp) = p.parse(rest_op).into_parts();
                    match rp {
                        Reply::Error { msg: msg_p } => {
                            return Consumed::new(
                                consumed_any || co || cp,
                                Reply::Error {
                                    msg: last_msg.merge(msg_op).merge(msg_p),
                                },
                            );
                        }
                        Reply::Ok { value, rest, msg: msg_p } => {
                            consumed_any = consumed_any || co || cp;
                            funcs.push(f);
                            operands.push(value);
                            current = rest;
                            last_msg = msg_op.merge(msg_p);
                        }
                    }
                }
            }
        }
        let mut acc = operands.pop().expect("chainr1 always parses at least one operand");
        while let Some(f) = funcs.pop() {
            let lhs = operands
                .pop()
                .expect("one fewer operator than operand was parsed");
            acc = f(lhs, acc);
        }
        Consumed::new(
            consumed_any,
            Reply::Ok {
                value: acc,
                rest: current,
                msg: last_msg,
            },
        )
    }
}

/// [`chainr1`], but `default` is returned (consuming nothing) if `p` doesn't match at all.
pub fn chainr<I, O, P, Op>(p: P, op: Op, default: O) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
    Op: Parser<I, fn(O, O) -> O>,
    O: Clone,
{
    or(chainr1(p, op), retn(default))
}
