// src/tags.rs
//
// Tag classification shared by the tokenizer and the layout engine.
//
// - Element names are matched ASCII-case-insensitively and reported lowercase.
// - Classification looks only at the tag's own text, never at its context.

/* =============================== Core sets =============================== */

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text keeps its line breaks and inner spacing.
pub const WHITESPACE_PRESERVING: [&str; 2] = ["pre", "textarea"];

pub fn is_void(name: &str) -> bool {
    matches_ignore_ascii_case(name, &VOID_ELEMENTS)
}

pub fn preserves_whitespace(name: &str) -> bool {
    matches_ignore_ascii_case(name, &WHITESPACE_PRESERVING)
}

fn matches_ignore_ascii_case(name: &str, set: &[&str]) -> bool {
    set.iter().any(|s| name.eq_ignore_ascii_case(s))
}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':'
}

/* =============================== Tag parsing ============================= */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>` that opens a nesting level.
    Start,
    /// `</name>`, including `</>` and other nameless end tags.
    End,
    /// `<name .../>` or a void element; never nests.
    SelfClosing,
    /// Declarations, processing instructions and nameless tags such as `< x>`.
    Other,
}

/// Lowercase element name directly after `<` or `</`, if there is one.
pub fn tag_name(tag: &str) -> Option<String> {
    let b = tag.as_bytes();
    if b.first() != Some(&b'<') {
        return None;
    }
    let start = if b.get(1) == Some(&b'/') { 2 } else { 1 };
    let len = b[start..].iter().take_while(|&&c| is_name_char(c)).count();
    if len == 0 {
        return None;
    }
    Some(tag[start..start + len].to_ascii_lowercase())
}

/// Explicit `/>` ending, trailing whitespace allowed.
pub fn is_self_closing(tag: &str) -> bool {
    tag.trim_end().ends_with("/>")
}

pub fn classify(tag: &str) -> TagKind {
    let tag = tag.trim();
    if tag.starts_with("</") {
        return TagKind::End;
    }
    if tag.starts_with("<!") || tag.starts_with("<?") {
        return TagKind::Other;
    }
    match tag_name(tag) {
        Some(name) if is_self_closing(tag) || is_void(&name) => TagKind::SelfClosing,
        Some(_) => TagKind::Start,
        None => TagKind::Other,
    }
}
