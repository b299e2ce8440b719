//! Move-loop and scan-loop recognition (O2).

use crate::ir::{OpId, OpKind, Program};

/// Recognizes a four-op loop body that nets to "move/add the current
/// cell into a cell at a fixed offset, then zero it" regardless of the
/// order the body writes those four ops in — `[->+<]` and the
/// pointer-first `[<+>-]` shape both describe the same effect, since a
/// pointer move and a cell write to a different cell commute.
pub fn recognize_move_loops(program: &mut Program) {
    let mut cursor: Option<OpId> = program.head();
    while let Some(start) = cursor {
        cursor = match try_match_move_loop(program, start) {
            Some(next) => next,
            None => program.next(start),
        };
    }
}

fn try_match_move_loop(program: &mut Program, start: OpId) -> Option<Option<OpId>> {
    let OpKind::LoopStart(open_id) = program.kind(start) else {
        return None;
    };

    let b1 = program.next(start)?;
    let b2 = program.next(b1)?;
    let b3 = program.next(b2)?;
    let b4 = program.next(b3)?;
    let end = program.next(b4)?;

    let OpKind::LoopEnd(close_id) = program.kind(end) else {
        return None;
    };
    if open_id != close_id {
        return None;
    }

    let body = [program.kind(b1), program.kind(b2), program.kind(b3), program.kind(b4)];
    let (offset, factor) = analyze_body(&body)?;

    let replacement = if factor == 1 {
        OpKind::MoveVal { offset }
    } else {
        OpKind::AddMul { factor, offset }
    };

    Some(program.replace_range(start, end, [replacement]))
}

/// Walks the four body ops tracking running pointer offset from the
/// loop's induction cell. Requires exactly one `ValSub(1)` at offset 0
/// (the self-decrement), exactly one `ValAdd(m)` at a nonzero offset,
/// a net pointer displacement of zero, and nothing else.
fn analyze_body(body: &[OpKind; 4]) -> Option<(i32, i64)> {
    let mut running_offset: i64 = 0;
    let mut decremented_origin = false;
    let mut captured: Option<(i64, i64)> = None;

    for &op in body {
        match op {
            OpKind::PtrAdd(n) => running_offset += n,
            OpKind::PtrSub(n) => running_offset -= n,
            OpKind::ValSub(1) if running_offset == 0 => {
                if decremented_origin {
                    return None;
                }
                decremented_origin = true;
            }
            OpKind::ValAdd(m) if running_offset != 0 => {
                if captured.is_some() {
                    return None;
                }
                captured = Some((running_offset, m));
            }
            _ => return None,
        }
    }

    if running_offset != 0 || !decremented_origin {
        return None;
    }
    let (offset, factor) = captured?;
    let offset = i32::try_from(offset).ok()?;
    Some((offset, factor))
}

/// Recognizes `[>]` / `[<]` as a pointer scan that runs while the
/// current cell is nonzero.
pub fn recognize_scan_loops(program: &mut Program) {
    let mut cursor: Option<OpId> = program.head();
    while let Some(start) = cursor {
        let Some(mid) = program.next(start) else {
            break;
        };
        let Some(end) = program.next(mid) else {
            cursor = Some(mid);
            continue;
        };

        let step = match (program.kind(start), program.kind(mid), program.kind(end)) {
            (OpKind::LoopStart(open), OpKind::PtrAdd(k), OpKind::LoopEnd(close))
                if open == close =>
            {
                Some(k)
            }
            (OpKind::LoopStart(open), OpKind::PtrSub(k), OpKind::LoopEnd(close))
                if open == close =>
            {
                Some(-k)
            }
            _ => None,
        };

        if let Some(step) = step {
            let step = step as i32;
            cursor = program.replace_range(start, end, [OpKind::ScanZero(step)]);
        } else {
            cursor = Some(mid);
        }
    }
}
