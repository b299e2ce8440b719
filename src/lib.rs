//! An optimizing compiler for an eight-symbol tape machine, targeting
//! AArch64. Source bytes flow through a front-end lexer, a pattern-
//! rewriting optimizer staged into three levels, and a single-pass
//! machine-code emitter with deferred branch patching.

pub mod codegen;
pub mod encode;
pub mod error;
pub mod interp;
pub mod ir;
pub mod jit;
pub mod opt;
pub mod token;

pub use error::CompileError;
pub use opt::OptLevel;

use ir::Program;

/// Runs the full front-end-through-emitter pipeline over `source`,
/// returning the emitted code buffer.
pub fn compile(source: &[u8], level: OptLevel) -> Result<codegen::CodeBuffer, CompileError> {
    log::debug!("preprocess: {} source bytes", source.len());
    let filtered = token::preprocess(source);

    log::debug!("tokenize: {} significant bytes", filtered.len());
    let tokens = token::tokenize(&filtered)?;

    log::debug!("build_ir: {} tokens", tokens.len());
    let mut program = build_program(&tokens);

    opt::optimize(&mut program, level);

    log::debug!("emit: {} ops", program.len());
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("IR dump:\n{program}");
    }

    Ok(codegen::emit(&program))
}

fn build_program(tokens: &[token::TokenKind]) -> Program {
    ir::builder::build_ir(tokens)
}
