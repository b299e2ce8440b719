//! Clear-loop recognition (O1, step two): `[-]` becomes `SetZero`.

use crate::ir::{OpId, OpKind, Program};

pub fn recognize_clear_loops(program: &mut Program) {
    let mut cursor: Option<OpId> = program.head();
    while let Some(start) = cursor {
        let Some(mid) = program.next(start) else {
            break;
        };
        let Some(end) = program.next(mid) else {
            cursor = Some(mid);
            continue;
        };

        let is_match = match (program.kind(start), program.kind(mid), program.kind(end)) {
            (OpKind::LoopStart(open), OpKind::ValSub(1), OpKind::LoopEnd(close)) => {
                open == close
            }
            _ => false,
        };

        if is_match {
            cursor = program.replace_range(start, end, [OpKind::SetZero]);
        } else {
            cursor = Some(mid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_clear_loop() {
        let mut p = Program::new();
        p.push_back(OpKind::PtrAdd(1));
        p.push_back(OpKind::LoopStart(0));
        p.push_back(OpKind::ValSub(1));
        p.push_back(OpKind::LoopEnd(0));
        p.push_back(OpKind::Output);

        recognize_clear_loops(&mut p);
        let kinds: Vec<_> = p.iter().map(|(_, k)| k).collect();
        assert_eq!(
            kinds,
            vec![OpKind::PtrAdd(1), OpKind::SetZero, OpKind::Output]
        );
    }

    #[test]
    fn leaves_non_clear_loops_alone() {
        let mut p = Program::new();
        p.push_back(OpKind::LoopStart(0));
        p.push_back(OpKind::ValSub(2));
        p.push_back(OpKind::LoopEnd(0));
        recognize_clear_loops(&mut p);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn handles_back_to_back_clear_loops() {
        let mut p = Program::new();
        p.push_back(OpKind::LoopStart(0));
        p.push_back(OpKind::ValSub(1));
        p.push_back(OpKind::LoopEnd(0));
        p.push_back(OpKind::LoopStart(1));
        p.push_back(OpKind::ValSub(1));
        p.push_back(OpKind::LoopEnd(1));
        recognize_clear_loops(&mut p);
        let kinds: Vec<_> = p.iter().map(|(_, k)| k).collect();
        assert_eq!(kinds, vec![OpKind::SetZero, OpKind::SetZero]);
    }
}
