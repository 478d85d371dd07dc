//! Post normalizer
//!
//! Rewrites raw repository documents into the shapes the pages consume.
//! Pure data mapping: no fetching, no caching. Malformed fields degrade
//! to defaults with a warning instead of failing the page.

use crate::cms::{Document, PageResponse};
use crate::config::SiteConfig;
use crate::content::{Post, PostDetail, PostPagination};
use crate::helpers::{format_publication_date, DateFormatError};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;

/// Maps repository documents to display-ready post shapes
#[derive(Debug, Clone, Default)]
pub struct PostNormalizer {
    timezone: Option<Tz>,
}

impl PostNormalizer {
    /// Normalizer keeping each timestamp's own offset
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer converting dates into the given display timezone
    pub fn with_timezone(timezone: Tz) -> Self {
        Self {
            timezone: Some(timezone),
        }
    }

    /// Build from the site config; unknown timezone names fall back to
    /// the repository offsets with a warning
    pub fn from_config(config: &SiteConfig) -> Self {
        if config.timezone.is_empty() {
            return Self::new();
        }
        match config.timezone.parse::<Tz>() {
            Ok(tz) => Self::with_timezone(tz),
            Err(_) => {
                tracing::warn!(
                    "unknown timezone {:?}, keeping repository offsets",
                    config.timezone
                );
                Self::new()
            }
        }
    }

    /// Normalize one document into a list entry
    pub fn normalize(&self, doc: &Document) -> Post {
        Post {
            id: doc.id.clone(),
            uid: doc.uid.clone(),
            first_publication_date: self.display_date(doc),
            data: self.parse_data(doc),
        }
    }

    /// Normalize one document into its detail shape
    pub fn normalize_detail(&self, doc: &Document) -> PostDetail {
        PostDetail {
            id: doc.id.clone(),
            uid: doc.uid.clone(),
            first_publication_date: self.display_date(doc),
            data: self.parse_data(doc),
        }
    }

    /// Normalize a whole query page, keeping repository order and cursor
    pub fn normalize_page(&self, page: &PageResponse) -> PostPagination {
        PostPagination {
            results: page.results.iter().map(|doc| self.normalize(doc)).collect(),
            next_page: page.next_page.clone(),
        }
    }

    /// A missing date stays `None` (unpublished previews are expected),
    /// an unparseable one is logged and also becomes `None`
    fn display_date(&self, doc: &Document) -> Option<String> {
        match format_publication_date(
            doc.first_publication_date.as_deref(),
            self.timezone.as_ref(),
        ) {
            Ok(formatted) => Some(formatted),
            Err(DateFormatError::Missing) => None,
            Err(err @ DateFormatError::Unparseable { .. }) => {
                tracing::warn!("document {}: {}", doc.id, err);
                None
            }
        }
    }

    fn parse_data<T>(&self, doc: &Document) -> T
    where
        T: DeserializeOwned + Default,
    {
        match serde_json::from_value(doc.data.clone()) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!("document {}: malformed data ({}), using defaults", doc.id, err);
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(uid: &str, date: Option<&str>) -> Document {
        Document {
            id: format!("id-{}", uid),
            uid: Some(uid.to_string()),
            first_publication_date: date.map(str::to_string),
            data: json!({
                "title": "Como utilizar Hooks",
                "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                "author": "Joseph Oliveira"
            }),
        }
    }

    #[test]
    fn test_normalize_formats_date() {
        let normalizer = PostNormalizer::new();
        let post = normalizer.normalize(&doc("como-utilizar-hooks", Some("2021-03-25T19:25:28+0000")));
        assert_eq!(post.first_publication_date.as_deref(), Some("25 Mar 2021"));
        assert_eq!(post.data.title, "Como utilizar Hooks");
        assert_eq!(post.data.author, "Joseph Oliveira");
    }

    #[test]
    fn test_missing_date_is_none() {
        let normalizer = PostNormalizer::new();
        let post = normalizer.normalize(&doc("preview", None));
        assert!(post.first_publication_date.is_none());
    }

    #[test]
    fn test_unparseable_date_is_none() {
        let normalizer = PostNormalizer::new();
        let post = normalizer.normalize(&doc("quebrado", Some("ontem à noite")));
        assert!(post.first_publication_date.is_none());
    }

    #[test]
    fn test_malformed_data_uses_defaults() {
        let normalizer = PostNormalizer::new();
        let broken = Document {
            id: "id-broken".to_string(),
            uid: Some("broken".to_string()),
            first_publication_date: Some("2021-03-25T19:25:28+0000".to_string()),
            data: json!({"title": ["não", "é", "string"]}),
        };
        let post = normalizer.normalize(&broken);
        // The date still formats even though the data payload did not decode
        assert_eq!(post.first_publication_date.as_deref(), Some("25 Mar 2021"));
        assert_eq!(post.data.title, "");
    }

    #[test]
    fn test_normalize_page_keeps_order_and_cursor() {
        let normalizer = PostNormalizer::new();
        let page = PageResponse {
            results: vec![
                doc("primeiro", Some("2021-03-25T19:25:28+0000")),
                doc("segundo", Some("2021-04-19T10:00:00+0000")),
            ],
            next_page: Some("https://repo.example.com/page2".to_string()),
        };
        let pagination = normalizer.normalize_page(&page);
        assert_eq!(pagination.results.len(), 2);
        assert_eq!(pagination.results[0].uid.as_deref(), Some("primeiro"));
        assert_eq!(pagination.results[1].uid.as_deref(), Some("segundo"));
        assert_eq!(
            pagination.next_page.as_deref(),
            Some("https://repo.example.com/page2")
        );
    }

    #[test]
    fn test_detail_normalization() {
        let normalizer = PostNormalizer::new();
        let detail_doc = Document {
            id: "id-detail".to_string(),
            uid: Some("criando-um-app".to_string()),
            first_publication_date: Some("2021-03-25T19:25:28+0000".to_string()),
            data: json!({
                "title": "Criando um app do zero",
                "subtitle": "Do setup ao deploy",
                "author": "Danilo Vieira",
                "banner": {"url": "https://images.example.com/banner.png"},
                "content": [{
                    "heading": "Começando",
                    "body": [{"type": "paragraph", "text": "Primeiro, instale as dependências.", "spans": []}]
                }]
            }),
        };
        let detail = normalizer.normalize_detail(&detail_doc);
        assert_eq!(detail.data.content.len(), 1);
        assert_eq!(detail.data.content[0].heading.as_deref(), Some("Começando"));
        assert_eq!(
            detail.data.banner.url.as_deref(),
            Some("https://images.example.com/banner.png")
        );
    }
}
