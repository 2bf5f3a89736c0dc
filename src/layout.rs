// src/layout.rs
//
// Folds the token stream into indented lines.
//
// - Start tags push their name and indent one level; matching end tags pop and dedent.
//   A mismatched end tag only dedents, and depth never drops below zero.
// - Void and self-closing tags, doctypes, comments, script and style blocks never nest.
// - Script/style bodies and comment continuation lines keep their relative indentation;
//   their common leading whitespace is replaced by the current indent.
// - Text inside pre/textarea keeps its lines verbatim; any other text is collapsed to one line.
// - Every line loses trailing spaces, tabs and carriage returns. Output ends with one '\n'.

use std::borrow::Cow;

use log::{debug, trace};

use crate::tags::{self, TagKind};
use crate::tokenizer::{Token, TokenKind};

/// One level of indentation.
pub const INDENT: &str = "  ";

pub fn layout(tokens: &[Token<'_>]) -> String {
    let mut state = Layout::default();
    for tok in tokens {
        state.token(tok);
    }
    if !state.open.is_empty() {
        trace!("{} element(s) left open: {:?}", state.open.len(), state.open);
    }
    state.finish()
}

#[derive(Default)]
struct Layout {
    depth: usize,
    open: Vec<String>,
    lines: Vec<String>,
}

impl Layout {
    fn token(&mut self, tok: &Token<'_>) {
        match tok.kind {
            TokenKind::Doctype => self.push_line(tok.raw.trim()),
            TokenKind::Comment => self.comment(tok.raw),
            TokenKind::ScriptBlock => self.block(tok.raw, "script"),
            TokenKind::StyleBlock => self.block(tok.raw, "style"),
            TokenKind::Text => self.text(tok.raw),
            TokenKind::Tag => self.tag(tok.raw.trim()),
        }
    }

    fn push_line(&mut self, s: &str) {
        self.push_at(self.depth, s);
    }

    fn push_at(&mut self, depth: usize, s: &str) {
        if s.is_empty() {
            self.lines.push(String::new());
            return;
        }
        let mut line = INDENT.repeat(depth);
        line.push_str(s);
        self.lines.push(line);
    }

    /* ================================ Tags ================================ */

    fn tag(&mut self, tag: &str) {
        match tags::classify(tag) {
            TagKind::End => {
                self.close(tag);
                self.push_line(tag);
            }
            TagKind::Start => {
                self.push_line(tag);
                // Start tags always carry a name.
                if let Some(name) = tags::tag_name(tag) {
                    self.open.push(name);
                    self.depth += 1;
                }
            }
            TagKind::SelfClosing | TagKind::Other => self.push_line(tag),
        }
    }

    fn close(&mut self, tag: &str) {
        let name = tags::tag_name(tag);
        match self.open.last() {
            Some(top) if name.as_deref() == Some(top.as_str()) => {
                self.open.pop();
            }
            Some(top) => debug!("{tag} does not close <{top}>, dedenting only"),
            None => debug!("{tag} has no open element"),
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /* ================================ Text ================================ */

    fn text(&mut self, text: &str) {
        let preformatted = self
            .open
            .last()
            .is_some_and(|name| tags::preserves_whitespace(name));
        if preformatted {
            self.preformatted(text);
            return;
        }
        let collapsed = collapse_whitespace(text);
        if !collapsed.is_empty() {
            self.push_line(&collapsed);
        }
    }

    fn preformatted(&mut self, text: &str) {
        let text = normalize_newlines(text);
        let mut lines: Vec<&str> = text.split('\n').collect();
        // The break after the previous token and the one before the next are the line join's.
        if lines.len() > 1 && is_blank(lines[0]) {
            lines.remove(0);
        }
        if lines.last().is_some_and(|l| is_blank(l)) {
            lines.pop();
        }

        // Already laid out at this depth: every line carries the indent, so take it off first.
        let prefix = INDENT.repeat(self.depth);
        let indented = !prefix.is_empty()
            && lines
                .iter()
                .all(|l| is_blank(l) || l.starts_with(prefix.as_str()));
        for line in lines {
            if is_blank(line) {
                self.lines.push(String::new());
            } else if indented {
                self.push_line(&line[prefix.len()..]);
            } else {
                self.push_line(line);
            }
        }
    }

    /* ========================== Comments & blocks ========================= */

    fn comment(&mut self, raw: &str) {
        let raw = normalize_newlines(raw);
        let mut lines = raw.split('\n');
        if let Some(first) = lines.next() {
            self.push_line(first);
        }
        let rest: Vec<&str> = lines.collect();
        self.push_dedented(&rest, self.depth);
    }

    fn block(&mut self, raw: &str, name: &str) {
        let Some((open, inner, close)) = split_block(raw, name) else {
            self.push_line(raw.trim());
            return;
        };
        self.push_line(open);
        if !is_blank(inner) {
            let inner = normalize_newlines(inner);
            let lines: Vec<&str> = inner.split('\n').collect();
            let first = lines.iter().position(|l| !is_blank(l)).unwrap_or(0);
            let last = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(0);
            self.push_dedented(&lines[first..=last], self.depth + 1);
        }
        self.push_line(close);
    }

    fn push_dedented(&mut self, lines: &[&str], depth: usize) {
        let margin = common_margin(lines);
        for line in lines {
            if is_blank(line) {
                self.lines.push(String::new());
            } else {
                self.push_at(depth, &line[margin..]);
            }
        }
    }

    fn finish(self) -> String {
        let joined = self.lines.join("\n");
        let mut out = String::with_capacity(joined.len() + 1);
        for line in joined.split('\n') {
            out.push_str(line.trim_end_matches([' ', '\t', '\r']));
            out.push('\n');
        }
        out
    }
}

/* ============================ Text utilities ============================= */

fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if s.contains("\r\n") {
        Cow::Owned(s.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(s)
    }
}

#[inline]
fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b.is_ascii_whitespace())
}

#[inline]
fn leading_ws(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ' || b == b'\t').count()
}

/// Shortest run of leading spaces/tabs over the non-blank lines.
fn common_margin(lines: &[&str]) -> usize {
    lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| leading_ws(l))
        .min()
        .unwrap_or(0)
}

/// Tab/CR/LF and space runs become one space; the ends are trimmed.
fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// `(open tag, inner content, close tag)` of a script or style block.
fn split_block<'a>(raw: &'a str, name: &str) -> Option<(&'a str, &'a str, &'a str)> {
    let raw = raw.trim();
    let open_end = raw.find('>')? + 1;
    let close_start = raw.rfind("</")?;
    if open_end > close_start {
        return None;
    }
    let close = &raw[close_start..];
    let after_name = close.get(2..2 + name.len())?;
    if !after_name.eq_ignore_ascii_case(name) || close[2 + name.len()..].trim_start() != ">" {
        return None;
    }
    Some((&raw[..open_end], &raw[open_end..close_start], close))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn fmt(src: &str) -> String {
        layout(&tokenize(src))
    }

    #[test]
    fn nests_start_tags() {
        assert_eq!(
            fmt("<div><p>Hi</p></div>"),
            "<div>\n  <p>\n    Hi\n  </p>\n</div>\n"
        );
    }

    #[test]
    fn void_and_self_closing_do_not_nest() {
        assert_eq!(
            fmt("<div><br><img src=a.png/><x-y /></div>"),
            "<div>\n  <br>\n  <img src=a.png/>\n  <x-y />\n</div>\n"
        );
    }

    #[test]
    fn end_tags_match_case_insensitively() {
        assert_eq!(fmt("<DIV>a</div>b"), "<DIV>\n  a\n</div>\nb\n");
    }

    #[test]
    fn mismatched_end_tag_dedents_without_popping() {
        assert_eq!(
            fmt("<div><span></div>x"),
            "<div>\n  <span>\n  </div>\n  x\n"
        );
    }

    #[test]
    fn unmatched_end_tags_clamp_at_zero() {
        assert_eq!(fmt("</a></b><p>x"), "</a>\n</b>\n<p>\n  x\n");
    }

    #[test]
    fn text_is_collapsed_and_blank_text_dropped() {
        assert_eq!(fmt("<p>  hello \n   world  </p>\n\n"), "<p>\n  hello world\n</p>\n");
    }

    #[test]
    fn doctype_and_other_markup_stay_flat() {
        assert_eq!(
            fmt("<?xml version=\"1.0\"?><!DOCTYPE html><html></html>"),
            "<?xml version=\"1.0\"?>\n<!DOCTYPE html>\n<html>\n</html>\n"
        );
    }

    #[test]
    fn comment_keeps_relative_indentation() {
        assert_eq!(
            fmt("<div><!--\n      one\n        two\n    --></div>"),
            "<div>\n  <!--\n    one\n      two\n  -->\n</div>\n"
        );
    }

    #[test]
    fn script_body_moves_one_level_in() {
        assert_eq!(
            fmt("<body><script>\n        if (a) {\n          b();\n        }\n\n        c();\n</script></body>"),
            "<body>\n  <script>\n    if (a) {\n      b();\n    }\n\n    c();\n  </script>\n</body>\n"
        );
    }

    #[test]
    fn empty_style_block_keeps_delimiters() {
        assert_eq!(fmt("<style>\n   \n</STYLE >"), "<style>\n</STYLE >\n");
    }

    #[test]
    fn pre_lines_are_kept() {
        assert_eq!(
            fmt("<pre>\n  a\n\tb\n\n c</pre>"),
            "<pre>\n    a\n  \tb\n\n   c\n</pre>\n"
        );
    }

    #[test]
    fn pre_lines_already_at_depth_are_not_shifted() {
        let once = "<pre>\n    a\n  \tb\n\n   c\n</pre>\n";
        assert_eq!(fmt(once), once);
        assert_eq!(fmt("<pre>\n  a\n  b</pre>"), "<pre>\n  a\n  b\n</pre>\n");
    }

    #[test]
    fn nbsp_is_content_in_pre() {
        assert_eq!(
            fmt("<pre>x\n\u{a0}\n\u{a0}</pre>"),
            "<pre>\n  x\n  \u{a0}\n  \u{a0}\n</pre>\n"
        );
    }

    #[test]
    fn textarea_is_preformatted_only_as_innermost() {
        assert_eq!(
            fmt("<textarea>a   b</textarea><div>a   b</div>"),
            "<textarea>\n  a   b\n</textarea>\n<div>\n  a b\n</div>\n"
        );
    }

    #[test]
    fn crlf_and_trailing_whitespace_are_normalized() {
        assert_eq!(
            fmt("<script>\r\n  x();   \r\n</script>"),
            "<script>\n  x();\n</script>\n"
        );
    }

    #[test]
    fn split_block_requires_matching_close() {
        assert_eq!(
            split_block("<script a=1>x</script >", "script"),
            Some(("<script a=1>", "x", "</script >"))
        );
        assert_eq!(split_block("<script</script>", "script"), None);
        assert_eq!(split_block("<style>x</script>", "style"), None);
    }

    #[test]
    fn margin_ignores_blank_lines() {
        assert_eq!(common_margin(&["    a", "", "  ", "      b"]), 4);
        assert_eq!(common_margin(&[]), 0);
    }

    #[test]
    fn no_tokens_gives_single_newline() {
        assert_eq!(layout(&[]), "\n");
    }
}
