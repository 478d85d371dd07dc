//! Rich-text to HTML rendering
//!
//! Renders the repository's structured rich-text blocks to markup. The
//! result is inserted into pages without sanitization, which is
//! acceptable only because the repository is a trusted,
//! access-controlled source. Text content is entity-escaped while the
//! tags are built; hyperlink targets are attribute-escaped but
//! otherwise passed through as authored.

use crate::content::{InlineSpan, RichTextSpan};
use std::collections::BTreeSet;

/// Render a block body to HTML
///
/// Consecutive `list-item` / `o-list-item` blocks group into a single
/// `<ul>` / `<ol>`; unknown block types degrade to paragraphs.
pub fn as_html(body: &[RichTextSpan]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&str> = None;

    for block in body {
        let list_tag = match block.span_type.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list.take() {
                html.push_str("</");
                html.push_str(tag);
                html.push('>');
            }
            if let Some(tag) = list_tag {
                html.push('<');
                html.push_str(tag);
                html.push('>');
                open_list = Some(tag);
            }
        }

        let inner = render_spans(&block.text, &block.spans);
        match block.span_type.as_str() {
            "heading1" => push_tag(&mut html, "h1", &inner),
            "heading2" => push_tag(&mut html, "h2", &inner),
            "heading3" => push_tag(&mut html, "h3", &inner),
            "heading4" => push_tag(&mut html, "h4", &inner),
            "heading5" => push_tag(&mut html, "h5", &inner),
            "heading6" => push_tag(&mut html, "h6", &inner),
            "preformatted" => push_tag(&mut html, "pre", &inner),
            "list-item" | "o-list-item" => push_tag(&mut html, "li", &inner),
            _ => push_tag(&mut html, "p", &inner),
        }
    }

    if let Some(tag) = open_list {
        html.push_str("</");
        html.push_str(tag);
        html.push('>');
    }

    html
}

/// Escape text content for insertion into markup
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Apply inline spans over the block text
///
/// Span offsets are char indices. The text is cut at every span
/// boundary and each segment is wrapped in the tags covering it, links
/// outermost so formatting nests inside them.
fn render_spans(text: &str, spans: &[InlineSpan]) -> String {
    if spans.is_empty() {
        return escape_html(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut bounds = BTreeSet::new();
    bounds.insert(0);
    bounds.insert(chars.len());
    for span in spans {
        bounds.insert(span.start.min(chars.len()));
        bounds.insert(span.end.min(chars.len()));
    }
    let bounds: Vec<usize> = bounds.into_iter().collect();

    let mut html = String::new();
    for pair in bounds.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let segment: String = chars[start..end].iter().collect();

        let mut covering: Vec<&InlineSpan> = spans
            .iter()
            .filter(|s| s.start <= start && end <= s.end.min(chars.len()))
            .collect();
        covering.sort_by_key(|s| match s.span_type.as_str() {
            "hyperlink" => 0,
            "strong" => 1,
            "em" => 2,
            _ => 3,
        });

        let mut open = String::new();
        let mut close = String::new();
        for span in &covering {
            match span.span_type.as_str() {
                "strong" => {
                    open.push_str("<strong>");
                    close.insert_str(0, "</strong>");
                }
                "em" => {
                    open.push_str("<em>");
                    close.insert_str(0, "</em>");
                }
                "hyperlink" => {
                    let url = span
                        .data
                        .as_ref()
                        .and_then(|d| d.url.as_deref())
                        .unwrap_or("");
                    open.push_str("<a href=\"");
                    open.push_str(&escape_html(url));
                    open.push_str("\">");
                    close.insert_str(0, "</a>");
                }
                // Unknown inline formats leave the text unwrapped
                _ => {}
            }
        }

        html.push_str(&open);
        html.push_str(&escape_html(&segment));
        html.push_str(&close);
    }

    html
}

fn push_tag(html: &mut String, tag: &str, inner: &str) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(inner);
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}
