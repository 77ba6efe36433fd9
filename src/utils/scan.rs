//! Tag-boundary scanning over raw HTML text.
//!
//! A deliberately small structural scanner: it locates elements by tag name
//! (and optionally by attribute) without building a DOM. First match wins,
//! closing tags are matched literally, and `<div>` nesting is only tracked
//! where a caller asks for a balanced match.

use std::ops::Range;

/// Byte offsets of an element located in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Offset of the `<` of the opening tag
    pub start: usize,
    /// Offset just past the `>` of the opening tag
    pub inner_start: usize,
    /// Offset of the `<` of the closing tag
    pub inner_end: usize,
    /// Offset just past the `>` of the closing tag
    pub end: usize,
}

impl Block {
    /// Text between the opening and closing tags.
    pub fn inner<'t>(&self, text: &'t str) -> &'t str {
        &text[self.inner_start..self.inner_end]
    }

    /// Full element text, tags included.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Opening tag located in a document.
struct OpenTag<'t> {
    start: usize,
    inner_start: usize,
    attrs: &'t str,
}

/// First element with the given tag name.
pub fn find_element(text: &str, tag: &str) -> Option<Block> {
    find_element_where(text, 0, tag, |_| true)
}

/// First element carrying `attr="value"` in its opening tag.
pub fn find_element_with_attr(text: &str, tag: &str, attr: &str, value: &str) -> Option<Block> {
    find_element_where(text, 0, tag, |attrs| has_attr(attrs, attr, value))
}

/// First element, starting at `from`, whose opening-tag attribute text
/// satisfies `pred`. The predicate receives the trimmed text between the tag
/// name and the closing `>`.
pub fn find_element_where(
    text: &str,
    from: usize,
    tag: &str,
    pred: impl Fn(&str) -> bool,
) -> Option<Block> {
    let mut at = from;
    loop {
        let open = find_open_tag(text, at, tag)?;
        if pred(open.attrs) {
            return close_block(text, tag, &open);
        }
        at = open.inner_start;
    }
}

/// Whether an opening tag's attribute text carries `name="value"`.
///
/// Attributes are matched token-wise, so extra whitespace between attributes
/// is irrelevant; values with embedded spaces are not supported.
pub fn has_attr(attrs: &str, name: &str, value: &str) -> bool {
    attrs.split_whitespace().any(|token| {
        token
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
            .is_some_and(|v| v.trim_matches(|c| c == '"' || c == '\'') == value)
    })
}

/// Byte range of the literal comment `<!-- content -->`.
pub fn find_comment(text: &str, content: &str) -> Option<Range<usize>> {
    let needle = format!("<!-- {content} -->");
    let start = text.find(&needle)?;
    Some(start..start + needle.len())
}

/// First element with the given tag name starting at `from`, with nested
/// same-tag elements matched to their own closing tags.
pub fn find_balanced_element_from(text: &str, from: usize, tag: &str) -> Option<Block> {
    let open = find_open_tag(text, from, tag)?;
    let close_needle = format!("</{tag}>");

    let mut depth = 1usize;
    let mut at = open.inner_start;
    loop {
        let close_at = at + text[at..].find(&close_needle)?;
        match find_open_tag(text, at, tag) {
            Some(nested) if nested.start < close_at => {
                depth += 1;
                at = nested.inner_start;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(Block {
                        start: open.start,
                        inner_start: open.inner_start,
                        inner_end: close_at,
                        end: close_at + close_needle.len(),
                    });
                }
                at = close_at + close_needle.len();
            }
        }
    }
}

/// First opening tag `<tag ...>` at or after `from`.
///
/// The tag name must be followed by whitespace, `/`, or `>` so that e.g.
/// `<nav>` does not match `<navbar>`.
fn find_open_tag<'t>(text: &'t str, from: usize, tag: &str) -> Option<OpenTag<'t>> {
    let needle = format!("<{tag}");
    let mut at = from;
    while let Some(rel) = text.get(at..)?.find(&needle) {
        let start = at + rel;
        let after = start + needle.len();
        let rest = &text[after..];

        let at_boundary = rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_whitespace() || c == '>' || c == '/');
        if at_boundary && let Some(gt) = rest.find('>') {
            return Some(OpenTag {
                start,
                inner_start: after + gt + 1,
                attrs: text[after..after + gt].trim(),
            });
        }
        at = after;
    }
    None
}

/// Match an opening tag to the first literal closing tag after it.
fn close_block(text: &str, tag: &str, open: &OpenTag) -> Option<Block> {
    let needle = format!("</{tag}>");
    let rel = text[open.inner_start..].find(&needle)?;
    let inner_end = open.inner_start + rel;
    Some(Block {
        start: open.start,
        inner_start: open.inner_start,
        inner_end,
        end: inner_end + needle.len(),
    })
}
