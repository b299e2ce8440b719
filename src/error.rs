//! Error taxonomy for every fallible stage of the pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every way the pipeline can fail before it has produced output.
///
/// An invalid branch patch is deliberately not one of these variants:
/// it is a non-fatal diagnostic (logged and skipped), never a
/// propagated error. `OutOfMemory` is kept for documentation parity
/// with the error kinds a caller might expect, but nothing in this
/// crate constructs it — an allocation failure aborts the process via
/// the global allocator before any code here would see it.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read source file {path}: {source}")]
    InputIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output file {path}: {source}")]
    OutputIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("out of memory while growing {0}")]
    OutOfMemory(&'static str),

    #[error("JIT execution is not available on this host: {0}")]
    JitUnavailable(&'static str),
}
