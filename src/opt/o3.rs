//! Multiply-add loop recognition (O3): `[->++<]`-shaped loops become a
//! single `AddMul` plus a `SetZero`, without assuming the 6-op shape O2
//! looks for — any flat body qualifies.

use crate::ir::{OpId, OpKind, Program};

pub fn recognize_multiply_add_loops(program: &mut Program) {
    let mut cursor: Option<OpId> = program.head();
    while let Some(id) = cursor {
        cursor = match try_fold_loop(program, id) {
            Some(next) => next,
            None => program.next(id),
        };
    }
}

struct Analysis {
    ptr_offset: i64,
    decrement_count: u32,
    pointer_moved: bool,
    value_multiply: Option<i64>,
    /// The running pointer offset at the moment `value_multiply` was
    /// captured — the cell the multiply actually targets, as opposed to
    /// `ptr_offset`, which keeps accumulating for the rest of the body
    /// and is usually back to 0 by loop end for a round-trip loop.
    multiply_offset: Option<i64>,
    flat: bool,
}

fn try_fold_loop(program: &mut Program, start: OpId) -> Option<Option<OpId>> {
    let OpKind::LoopStart(_) = program.kind(start) else {
        return None;
    };

    let end = find_matching_end(program, start)?;
    let analysis = analyze_range(program, start, end);

    if !analysis.flat {
        return None;
    }
    if analysis.ptr_offset.unsigned_abs() > 1 {
        return None;
    }
    if !analysis.pointer_moved || analysis.decrement_count == 0 {
        return None;
    }
    let factor = analysis.value_multiply?;
    if factor <= 0 {
        return None;
    }

    let offset = analysis.multiply_offset? as i32;
    Some(program.replace_range(
        start,
        end,
        [OpKind::AddMul { factor, offset }, OpKind::SetZero],
    ))
}

/// Finds the `LoopEnd` matching `start` via a nesting counter, so the
/// correct end is located regardless of loops nested inside the body
/// (those nested loops are what later disqualify the range as flat).
fn find_matching_end(program: &Program, start: OpId) -> Option<OpId> {
    let mut depth = 1i32;
    let mut cursor = program.next(start);
    while let Some(id) = cursor {
        match program.kind(id) {
            OpKind::LoopStart(_) => depth += 1,
            OpKind::LoopEnd(_) => {
                depth -= 1;
                if depth == 0 {
                    return Some(id);
                }
            }
            _ => {}
        }
        cursor = program.next(id);
    }
    None
}

fn analyze_range(program: &Program, start: OpId, end: OpId) -> Analysis {
    let mut ptr_offset: i64 = 0;
    let mut decrement_count = 0u32;
    let mut pointer_moved = false;
    let mut value_multiply = None;
    let mut multiply_offset = None;
    let mut flat = true;

    let mut cursor = program.next(start);
    while let Some(id) = cursor {
        if id == end {
            break;
        }
        match program.kind(id) {
            OpKind::PtrAdd(n) => {
                ptr_offset += n;
                pointer_moved = true;
            }
            OpKind::PtrSub(n) => {
                ptr_offset -= n;
                pointer_moved = true;
            }
            OpKind::ValSub(n) => {
                if ptr_offset == 0 {
                    decrement_count += n as u32;
                }
            }
            OpKind::ValAdd(n) if ptr_offset != 0 => {
                value_multiply = Some(n);
                multiply_offset = Some(ptr_offset);
            }
            OpKind::ValAdd(_) => {}
            _ => flat = false,
        }
        cursor = program.next(id);
    }

    Analysis {
        ptr_offset,
        decrement_count,
        pointer_moved,
        value_multiply,
        multiply_offset,
        flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_multiply_add_loop() {
        let mut p = Program::new();
        p.push_back(OpKind::LoopStart(0));
        p.push_back(OpKind::ValSub(1));
        p.push_back(OpKind::PtrAdd(1));
        p.push_back(OpKind::ValAdd(8));
        p.push_back(OpKind::PtrSub(1));
        p.push_back(OpKind::LoopEnd(0));
        recognize_multiply_add_loops(&mut p);
        let kinds: Vec<_> = p.iter().map(|(_, k)| k).collect();
        assert_eq!(
            kinds,
            vec![
                OpKind::AddMul { factor: 8, offset: 1 },
                OpKind::SetZero
            ]
        );
    }

    #[test]
    fn rejects_loops_with_nested_loops() {
        let mut p = Program::new();
        p.push_back(OpKind::LoopStart(0));
        p.push_back(OpKind::ValSub(1));
        p.push_back(OpKind::LoopStart(1));
        p.push_back(OpKind::Output);
        p.push_back(OpKind::LoopEnd(1));
        p.push_back(OpKind::PtrAdd(1));
        p.push_back(OpKind::ValAdd(1));
        p.push_back(OpKind::PtrSub(1));
        p.push_back(OpKind::LoopEnd(0));
        let before = p.len();
        recognize_multiply_add_loops(&mut p);
        assert_eq!(p.len(), before);
    }

    #[test]
    fn rejects_loops_with_io() {
        let mut p = Program::new();
        p.push_back(OpKind::LoopStart(0));
        p.push_back(OpKind::ValSub(1));
        p.push_back(OpKind::Output);
        p.push_back(OpKind::PtrAdd(1));
        p.push_back(OpKind::ValAdd(1));
        p.push_back(OpKind::PtrSub(1));
        p.push_back(OpKind::LoopEnd(0));
        let before = p.len();
        recognize_multiply_add_loops(&mut p);
        assert_eq!(p.len(), before);
    }

    #[test]
    fn rejects_loops_with_no_pointer_movement() {
        let mut p = Program::new();
        p.push_back(OpKind::LoopStart(0));
        p.push_back(OpKind::ValSub(1));
        p.push_back(OpKind::LoopEnd(0));
        let before = p.len();
        recognize_multiply_add_loops(&mut p);
        // this shape is the clear-loop pattern, not a multiply-add candidate
        assert_eq!(p.len(), before);
    }
}
