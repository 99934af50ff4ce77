//! Result snippet extraction.

use super::tokenize::Token;

const ELLIPSIS: char = '…';

/// Cuts a window of at most `max_chars` characters of `source` around the
/// first token accepted by `is_match`.
///
/// Whitespace runs are collapsed to a single space. An ellipsis is added on
/// each side where text was cut off. Without a matching token the window
/// starts at the beginning of `source`.
pub(crate) fn extract(
    source: &str,
    tokens: &[Token],
    is_match: impl Fn(&str) -> bool,
    max_chars: usize,
) -> String {
    let anchor_byte = tokens
        .iter()
        .find(|token| is_match(&token.term))
        .map_or(0, |token| token.span.start);

    let (chars, anchor) = collapse_whitespace(source, anchor_byte);
    if chars.len() <= max_chars {
        return chars.into_iter().collect();
    }

    // Keep roughly a third of the window as leading context
    let lead = max_chars / 3;
    let end = (anchor.saturating_sub(lead) + max_chars).min(chars.len());
    let start = end - max_chars;

    let window: String = chars[start..end].iter().collect();
    let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len_utf8());
    if start > 0 {
        snippet.push(ELLIPSIS);
    }
    snippet.push_str(window.trim());
    if end < chars.len() {
        snippet.push(ELLIPSIS);
    }
    snippet
}

/// Collapses whitespace and trims, returning the characters and the char index
/// that byte offset `anchor_byte` maps to.
fn collapse_whitespace(source: &str, anchor_byte: usize) -> (Vec<char>, usize) {
    let mut chars = Vec::with_capacity(source.len());
    let mut anchor = 0;
    let mut pending_space = false;

    for (i, c) in source.char_indices() {
        if c.is_whitespace() {
            pending_space = !chars.is_empty();
            continue;
        }
        if pending_space {
            chars.push(' ');
            pending_space = false;
        }
        if i == anchor_byte {
            anchor = chars.len();
        }
        chars.push(c);
    }

    (chars, anchor)
}
