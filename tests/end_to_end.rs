use tapec::interp::run_structured;
use tapec::ir::builder::build_ir;
use tapec::ir::OpKind;
use tapec::opt::{optimize, OptLevel};
use tapec::token::{preprocess, tokenize};

fn build(src: &[u8]) -> tapec::ir::Program {
    let tokens = tokenize(&preprocess(src)).unwrap();
    build_ir(&tokens)
}

fn optimized(src: &[u8], level: OptLevel) -> tapec::ir::Program {
    let mut program = build(src);
    optimize(&mut program, level);
    program
}

#[test]
fn echo_and_increment() {
    let program = optimized(b",+.", OptLevel::O1);
    let mut out = Vec::new();
    run_structured(&program, &[0x41], &mut out);
    assert_eq!(out, vec![0x42]);
}

#[test]
fn multiply_loop_folds_to_add_mul() {
    let program = optimized(b"++++++++[>++++++++<-]>+.", OptLevel::O3);
    let mut out = Vec::new();
    run_structured(&program, &[], &mut out);
    assert_eq!(out, vec![0x41]);

    let kinds: Vec<_> = program.iter().map(|(_, k)| k).collect();
    assert!(kinds
        .iter()
        .any(|k| matches!(k, OpKind::AddMul { factor: 8, offset: 1 })));
    assert!(!kinds.iter().any(|k| matches!(k, OpKind::LoopStart(_))));
}

#[test]
fn clear_loop_zeroes_cell() {
    let program = optimized(b"+++[-]", OptLevel::O1);
    let kinds: Vec<_> = program.iter().map(|(_, k)| k).collect();
    assert_eq!(kinds, vec![OpKind::ValAdd(3), OpKind::SetZero]);
}

#[test]
fn move_loop_produces_tab_byte() {
    let program = optimized(b"++++>+++++[<+>-]<.", OptLevel::O2);
    let mut out = Vec::new();
    run_structured(&program, &[], &mut out);
    assert_eq!(out, vec![9]);

    let kinds: Vec<_> = program.iter().map(|(_, k)| k).collect();
    assert!(kinds.iter().any(|k| matches!(
        k,
        OpKind::MoveVal { offset: -1 } | OpKind::AddMul { factor: 1, offset: -1 }
    )));
}

#[test]
fn scan_zero_stops_at_preseeded_cell() {
    let mut program = build(b"+[>]");
    optimize(&mut program, OptLevel::O2);

    // run by hand against a tape preseeded with a zero at cell 7
    let mut tape = [1u8; 30_000];
    tape[0] = 1;
    tape[7] = 0;
    let mut ptr = 0usize;
    for (_, kind) in program.iter() {
        match kind {
            OpKind::ValAdd(n) => tape[ptr] = tape[ptr].wrapping_add(n as u8),
            OpKind::ScanZero(step) => {
                while tape[ptr] != 0 {
                    ptr = (ptr as i64 + step as i64) as usize;
                }
            }
            other => panic!("unexpected op in scan test: {other:?}"),
        }
    }
    assert_eq!(ptr, 7);

    let kinds: Vec<_> = program.iter().map(|(_, k)| k).collect();
    assert!(kinds.iter().any(|k| matches!(k, OpKind::ScanZero(1))));
}

#[test]
fn clear_then_move_combo() {
    let program = optimized(b"[-]+[->+<]", OptLevel::O2);
    let kinds: Vec<_> = program.iter().map(|(_, k)| k).collect();
    assert_eq!(kinds[0], OpKind::SetZero);
    assert_eq!(kinds[1], OpKind::ValAdd(1));
    assert!(matches!(
        kinds[2],
        OpKind::MoveVal { offset: 1 } | OpKind::AddMul { factor: 1, offset: 1 }
    ));
}

#[test]
fn invariants_hold_after_every_level() {
    let src = b"++++[>++++[>++<-]<-]>>.";
    for level in [OptLevel::O0, OptLevel::O1, OptLevel::O2, OptLevel::O3] {
        let program = optimized(src, level);
        assert!(program.loops_balanced());
        assert!(program.no_zero_magnitude_ops());
    }
}
