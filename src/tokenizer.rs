// src/tokenizer.rs
//
// Splits a document into a flat sequence of typed spans without looking at nesting.
//
// - Recognizers are tried at every '<' in priority order: comment, doctype, script block,
//   style block, generic tag. The first one that matches wins.
// - Bytes no recognizer claims are Text. Concatenating every token's `raw` gives back
//   the input exactly.
// - An opened but never closed comment, script or style turns the rest of the input,
//   from the opener onward, into a single Text token.

use log::trace;
use memchr::memchr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    Doctype,
    ScriptBlock,
    StyleBlock,
    Tag,
    Text,
}

/// A span of the source, delimiters included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub raw: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, raw: &'a str) -> Self {
        Token { kind, raw }
    }
}

enum Scan {
    /// Token kind and the index one past its last byte.
    Match(TokenKind, usize),
    /// A block opener with no closing delimiter before end of input.
    Unterminated,
    NoMatch,
}

pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let s = source.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0usize;
    let mut i = 0usize;

    while let Some(off) = memchr(b'<', &s[i..]) {
        let lt = i + off;
        match recognize(s, lt) {
            Scan::Match(kind, end) => {
                push_text(&mut tokens, &source[text_start..lt]);
                tokens.push(Token::new(kind, &source[lt..end]));
                text_start = end;
                i = end;
            }
            Scan::Unterminated => {
                trace!("unterminated block at byte {lt}, rest of input is text");
                push_text(&mut tokens, &source[text_start..lt]);
                text_start = lt;
                break;
            }
            Scan::NoMatch => i = lt + 1,
        }
    }
    push_text(&mut tokens, &source[text_start..]);
    tokens
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.is_empty() {
        tokens.push(Token::new(TokenKind::Text, text));
    }
}

/* ============================== Recognizers ============================= */

/// Try every recognizer at `i` (s[i] == '<').
fn recognize(s: &[u8], i: usize) -> Scan {
    let rest = &s[i..];

    if rest.starts_with(b"<!--") {
        return match comment_end(s, i + 4) {
            Some(end) => Scan::Match(TokenKind::Comment, end),
            None => Scan::Unterminated,
        };
    }

    if rest.len() >= 9 && rest[..9].eq_ignore_ascii_case(b"<!DOCTYPE") {
        if let Some(p) = memchr(b'>', &s[i + 9..]) {
            return Scan::Match(TokenKind::Doctype, i + 9 + p + 1);
        }
    }

    for (name, kind) in [
        (&b"script"[..], TokenKind::ScriptBlock),
        (&b"style"[..], TokenKind::StyleBlock),
    ] {
        if opens_block(rest, name) {
            return match block_end(s, i + 1 + name.len(), name) {
                Some(end) => Scan::Match(kind, end),
                None => Scan::Unterminated,
            };
        }
    }

    // Generic tag: '<', at least one non-'>' byte, then '>'.
    match memchr(b'>', &s[i + 1..]) {
        Some(p) if p > 0 => Scan::Match(TokenKind::Tag, i + 1 + p + 1),
        _ => Scan::NoMatch,
    }
}

/// Bytes that may follow an element name inside its start tag.
#[inline]
fn ends_tag_name(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

#[inline]
fn skip_ws(s: &[u8], mut i: usize) -> usize {
    while i < s.len() && s[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Index one past the first `--`, optional whitespace, `>` at or after `k`.
fn comment_end(s: &[u8], mut k: usize) -> Option<usize> {
    while k < s.len() {
        let j = k + memchr(b'-', &s[k..])?;
        if j + 1 < s.len() && s[j + 1] == b'-' {
            let m = skip_ws(s, j + 2);
            if m < s.len() && s[m] == b'>' {
                return Some(m + 1);
            }
        }
        k = j + 1;
    }
    None
}

/// `<name` followed by whitespace, `/`, `>` or end of input; `<style-box>` is a plain tag.
fn opens_block(rest: &[u8], name: &[u8]) -> bool {
    let len = 1 + name.len();
    rest.len() >= len
        && rest[1..len].eq_ignore_ascii_case(name)
        && rest.get(len).map_or(true, |&b| ends_tag_name(b))
}

/// Index one past the first `</name`, optional whitespace, `>` at or after `k`.
fn block_end(s: &[u8], mut k: usize, name: &[u8]) -> Option<usize> {
    while k < s.len() {
        let j = k + memchr(b'<', &s[k..])?;
        let name_end = j + 2 + name.len();
        if name_end <= s.len() && s[j + 1] == b'/' && s[j + 2..name_end].eq_ignore_ascii_case(name)
        {
            let m = skip_ws(s, name_end);
            if m < s.len() && s[m] == b'>' {
                return Some(m + 1);
            }
        }
        k = j + 1;
    }
    None
}
