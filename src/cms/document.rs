//! Wire model of the content repository
//!
//! Deliberately loose: only the envelope fields the pipeline relies on
//! are typed here, the type-specific `data` payload stays free-form
//! JSON until the normalizer decodes it.

use serde::Deserialize;

/// One document as the repository returns it
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    /// ISO 8601 timestamp, absent for unpublished previews
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One page of query results with an opaque cursor to the next page
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub results: Vec<Document>,
    #[serde(default)]
    pub next_page: Option<String>,
}
