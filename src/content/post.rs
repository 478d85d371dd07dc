//! Post models
//!
//! Two projections of the same repository document: [`Post`] is the
//! list-page shape, [`PostDetail`] carries the full content for a
//! detail page. Both hold the publication date already formatted for
//! display.

use serde::{Deserialize, Serialize};

/// A post as the list page shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Repository document id
    pub id: String,

    /// URL slug, absent on documents that never received one
    pub uid: Option<String>,

    /// Display-formatted publication date ("25 Mar 2021"),
    /// `None` for unpublished documents
    pub first_publication_date: Option<String>,

    /// List-level fields
    pub data: PostData,
}

/// List-level fields of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A post with its full content, as the detail page shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    /// Repository document id
    pub id: String,

    /// URL slug
    pub uid: Option<String>,

    /// Display-formatted publication date, `None` for unpublished
    pub first_publication_date: Option<String>,

    /// Detail-level fields
    pub data: DetailData,
}

/// Detail-level fields of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Banner,
    pub content: Vec<ContentBlock>,
}

/// Banner image reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Banner {
    pub url: Option<String>,
}

/// One content block: an optional heading and its rich-text body
///
/// Headings are not unique across a post; blocks are identified by
/// their position in the content vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    pub heading: Option<String>,
    pub body: Vec<RichTextSpan>,
}

/// One rich-text block inside a content body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextSpan {
    /// Block type: paragraph, heading1-6, list-item, o-list-item or
    /// preformatted. Unknown types render as paragraphs.
    #[serde(rename = "type")]
    pub span_type: String,

    /// Plain text of the block
    pub text: String,

    /// Inline formatting over char offsets of `text`
    pub spans: Vec<InlineSpan>,
}

impl Default for RichTextSpan {
    fn default() -> Self {
        Self {
            span_type: "paragraph".to_string(),
            text: String::new(),
            spans: Vec::new(),
        }
    }
}

/// Inline formatting applied to a char range of a block's text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineSpan {
    pub start: usize,
    pub end: usize,
    /// strong, em or hyperlink
    #[serde(rename = "type")]
    pub span_type: String,
    /// Extra payload, carries the target of a hyperlink
    pub data: Option<SpanData>,
}

/// Payload of an inline span
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanData {
    pub url: Option<String>,
}

/// A loaded window of the post list plus the cursor to the next page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPagination {
    pub results: Vec<Post>,
    pub next_page: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_detail_data() {
        let raw = r#"{
            "title": "Criando um app do zero",
            "subtitle": "Tudo sobre como criar a sua primeira aplicação",
            "author": "Joseph Oliveira",
            "banner": {"url": "https://images.example.com/banner.png"},
            "content": [
                {
                    "heading": "Proin et varius",
                    "body": [
                        {"type": "paragraph", "text": "Lorem ipsum dolor sit amet.", "spans": []}
                    ]
                }
            ]
        }"#;
        let data: DetailData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.title, "Criando um app do zero");
        assert_eq!(data.banner.url.as_deref(), Some("https://images.example.com/banner.png"));
        assert_eq!(data.content.len(), 1);
        assert_eq!(data.content[0].heading.as_deref(), Some("Proin et varius"));
        assert_eq!(data.content[0].body[0].span_type, "paragraph");
    }

    #[test]
    fn test_decode_inline_span() {
        let raw = r#"{
            "type": "paragraph",
            "text": "veja o guia",
            "spans": [
                {"start": 7, "end": 11, "type": "hyperlink", "data": {"url": "https://example.com"}}
            ]
        }"#;
        let span: RichTextSpan = serde_json::from_str(raw).unwrap();
        assert_eq!(span.spans.len(), 1);
        assert_eq!(span.spans[0].span_type, "hyperlink");
        assert_eq!(
            span.spans[0].data.as_ref().unwrap().url.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let data: DetailData = serde_json::from_str(r#"{"title": "Só título"}"#).unwrap();
        assert_eq!(data.title, "Só título");
        assert!(data.banner.url.is_none());
        assert!(data.content.is_empty());
    }
}
