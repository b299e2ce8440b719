//! Run-length folding and cancellation (O1, step one).

use crate::ir::{OpId, OpKind, Program};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Family {
    Ptr,
    Val,
}

#[derive(Clone, Copy)]
enum Polarity {
    Add,
    Sub,
}

fn classify(kind: OpKind) -> Option<(Family, Polarity, i64)> {
    match kind {
        OpKind::PtrAdd(n) => Some((Family::Ptr, Polarity::Add, n)),
        OpKind::PtrSub(n) => Some((Family::Ptr, Polarity::Sub, n)),
        OpKind::ValAdd(n) => Some((Family::Val, Polarity::Add, n)),
        OpKind::ValSub(n) => Some((Family::Val, Polarity::Sub, n)),
        _ => None,
    }
}

fn make(family: Family, polarity: Polarity, value: i64) -> OpKind {
    match (family, polarity) {
        (Family::Ptr, Polarity::Add) => OpKind::PtrAdd(value),
        (Family::Ptr, Polarity::Sub) => OpKind::PtrSub(value),
        (Family::Val, Polarity::Add) => OpKind::ValAdd(value),
        (Family::Val, Polarity::Sub) => OpKind::ValSub(value),
    }
}

enum Action {
    /// Same op, same family: combine into `cur`, drop `next`, re-examine `cur`.
    Merge(i64),
    /// Opposite polarity, equal magnitude: drop both, restart from head.
    CancelToZero,
    /// Opposite polarity, unequal magnitude: `cur` becomes the surviving
    /// kind with the given value, `next` is dropped, cursor advances.
    CancelToValue(OpKind, i64),
    /// Not an additive pair in the same family: advance past `cur`.
    NoMatch,
}

fn decide(cur: OpKind, next: OpKind) -> Action {
    let (Some((cf, cp, cv)), Some((nf, np, nv))) = (classify(cur), classify(next)) else {
        return Action::NoMatch;
    };
    if cf != nf {
        return Action::NoMatch;
    }
    match (cp, np) {
        (Polarity::Add, Polarity::Add) | (Polarity::Sub, Polarity::Sub) => Action::Merge(cv + nv),
        _ => {
            let d = cv - nv;
            if d == 0 {
                Action::CancelToZero
            } else if d > 0 {
                Action::CancelToValue(make(cf, cp, d), d)
            } else {
                Action::CancelToValue(make(cf, np, -d), -d)
            }
        }
    }
}

/// Runs the fold/cancel walk to a fixed point.
pub fn fold(program: &mut Program) {
    let mut cursor: Option<OpId> = program.head();
    while let Some(cur) = cursor {
        let Some(next) = program.next(cur) else {
            break;
        };
        match decide(program.kind(cur), program.kind(next)) {
            Action::Merge(combined) => {
                let family_kind = program.kind(cur);
                let merged = match family_kind {
                    OpKind::PtrAdd(_) => OpKind::PtrAdd(combined),
                    OpKind::PtrSub(_) => OpKind::PtrSub(combined),
                    OpKind::ValAdd(_) => OpKind::ValAdd(combined),
                    OpKind::ValSub(_) => OpKind::ValSub(combined),
                    other => other,
                };
                program.set_kind(cur, merged);
                program.remove(next);
                // cursor stays on `cur`; re-examine against the new successor.
            }
            Action::CancelToZero => {
                program.remove(next);
                program.remove(cur);
                cursor = program.head();
                continue;
            }
            Action::CancelToValue(new_kind, _) => {
                program.set_kind(cur, new_kind);
                program.remove(next);
                cursor = program.next(cur);
                continue;
            }
            Action::NoMatch => {
                cursor = Some(next);
                continue;
            }
        }
    }
}
