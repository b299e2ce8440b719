//! The optimization pipeline: folding, clear-loop, move/scan-loop, and
//! multiply-add recognition, staged into four levels.

mod clear;
mod fold;
mod o2;
mod o3;

use crate::ir::Program;

/// Optimization level selected on the CLI. `O0` runs no passes at all;
/// every other level concludes with a final fold pass since rewrites
/// can expose adjacencies a single forward walk would otherwise miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptLevel {
    O0,
    O1,
    O2,
    O3,
}

/// Runs every pass up to and including `level`, in place.
pub fn optimize(program: &mut Program, level: OptLevel) {
    if level == OptLevel::O0 {
        return;
    }

    log::debug!("optimize: level={level:?}, starting ops={}", program.len());

    fold::fold(program);
    clear::recognize_clear_loops(program);
    log::debug!("optimize: after O1, ops={}", program.len());

    if level >= OptLevel::O2 {
        o2::recognize_move_loops(program);
        o2::recognize_scan_loops(program);
        log::debug!("optimize: after O2, ops={}", program.len());
    }

    if level >= OptLevel::O3 {
        o3::recognize_multiply_add_loops(program);
        log::debug!("optimize: after O3, ops={}", program.len());
    }

    fold::fold(program);
    log::debug!("optimize: final fold, ops={}", program.len());

    debug_assert!(program.loops_balanced());
    debug_assert!(program.no_zero_magnitude_ops());
}
