// src/lib.rs
//
// prettyhtml: canonical re-indentation of HTML documents.
//
// - One nesting level per open element, two spaces per level.
// - Text is collapsed to a single line, except inside pre and textarea.
// - Script and style bodies keep their own relative layout one level deeper.
// - Never fails: malformed nesting is recovered by dedenting, clamped at zero.
//
// `format` is a pure function of its input and is idempotent.

pub mod layout;
pub mod tags;
pub mod tokenizer;

use log::trace;

pub use layout::{layout, INDENT};
pub use tokenizer::{tokenize, Token, TokenKind};

/// Re-indent a whole document. The result always ends with a single `'\n'`;
/// the empty document becomes `"\n"`.
pub fn format(document: &str) -> String {
    let tokens = tokenize(document);
    trace!("{} bytes, {} tokens", document.len(), tokens.len());
    layout(&tokens)
}
