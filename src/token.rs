//! Front end: strips comment bytes and turns the remaining eight symbols
//! into a flat token stream with loop ids already assigned.

use crate::error::CompileError;

/// Bracket nesting deeper than this is rejected rather than accepted and
/// mishandled later by a fixed-size id table.
const MAX_LOOP_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    PtrInc,
    PtrDec,
    ValInc,
    ValDec,
    Output,
    Input,
    LoopStart(u32),
    LoopEnd(u32),
}

/// Filters `src` down to the eight significant bytes, discarding
/// everything else as a comment: no symbol table, no line tracking,
/// just a retain over the recognized alphabet.
pub fn preprocess(src: &[u8]) -> Vec<u8> {
    src.iter()
        .copied()
        .filter(|b| matches!(b, b'>' | b'<' | b'+' | b'-' | b'.' | b',' | b'[' | b']'))
        .collect()
}

/// Walks the filtered byte stream once, assigning each matched
/// `[`...`]` pair a loop id from a monotonically increasing counter.
///
/// An unmatched `]`, an unclosed `[`, or nesting beyond
/// [`MAX_LOOP_DEPTH`] is reported as [`CompileError::Syntax`].
pub fn tokenize(src: &[u8]) -> Result<Vec<TokenKind>, CompileError> {
    let mut tokens = Vec::with_capacity(src.len());
    let mut open_stack: Vec<usize> = Vec::new();
    let mut next_loop_id: u32 = 0;

    for &byte in src {
        let kind = match byte {
            b'>' => TokenKind::PtrInc,
            b'<' => TokenKind::PtrDec,
            b'+' => TokenKind::ValInc,
            b'-' => TokenKind::ValDec,
            b'.' => TokenKind::Output,
            b',' => TokenKind::Input,
            b'[' => {
                if open_stack.len() >= MAX_LOOP_DEPTH {
                    return Err(CompileError::Syntax(format!(
                        "loop nesting exceeds maximum depth of {MAX_LOOP_DEPTH}"
                    )));
                }
                let id = next_loop_id;
                next_loop_id += 1;
                open_stack.push(tokens.len());
                TokenKind::LoopStart(id)
            }
            b']' => {
                let open_index = open_stack.pop().ok_or_else(|| {
                    CompileError::Syntax("unmatched ']' with no preceding '['".to_string())
                })?;
                let id = match tokens[open_index] {
                    TokenKind::LoopStart(id) => id,
                    _ => unreachable!("open_stack only records LoopStart positions"),
                };
                TokenKind::LoopEnd(id)
            }
            _ => unreachable!("preprocess already filtered to the eight-symbol alphabet"),
        };
        tokens.push(kind);
    }

    if !open_stack.is_empty() {
        return Err(CompileError::Syntax(
            "unmatched '[' with no closing ']'".to_string(),
        ));
    }

    Ok(tokens)
}
