//! Content repository client

use crate::cms::{CmsError, Document, FetchError, PageResponse};
use crate::config::RepositoryConfig;
use crate::helpers::encode_segment;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Timeout applied to every repository request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The read operations the rendering pipeline needs from the repository
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First page of post documents, in repository order
    async fn query_posts(&self) -> Result<PageResponse, FetchError>;

    /// Follow an opaque `next_page` URL returned by an earlier page
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError>;

    /// A single document by its uid
    async fn get_by_uid(&self, uid: &str) -> Result<Document, CmsError>;
}

/// reqwest-backed [`ContentSource`] for the repository's REST API
#[derive(Clone)]
pub struct CmsClient {
    client: Client,
    api_endpoint: String,
    document_type: String,
    page_size: usize,
    access_token: Option<String>,
}

impl CmsClient {
    /// Build a client from the repository section of the site config
    pub fn new(config: &RepositoryConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            document_type: config.document_type.clone(),
            page_size: config.page_size,
            access_token: config.access_token.clone(),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(url);
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn fetch_json<T>(&self, url: &str) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        tracing::debug!("GET {}", url);
        let resp = self.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status(),
                url: url.to_string(),
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn query_posts(&self) -> Result<PageResponse, FetchError> {
        let url = format!(
            "{}/documents?type={}&page_size={}",
            self.api_endpoint, self.document_type, self.page_size
        );
        self.fetch_json(&url).await
    }

    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        // The cursor is opaque, follow it exactly as the repository gave it
        self.fetch_json(url).await
    }

    async fn get_by_uid(&self, uid: &str) -> Result<Document, CmsError> {
        let url = format!(
            "{}/documents/{}/{}",
            self.api_endpoint,
            self.document_type,
            encode_segment(uid)
        );
        tracing::debug!("GET {}", url);
        let resp = self.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CmsError::ContentNotFound {
                uid: uid.to_string(),
            });
        }
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status(),
                url,
            }
            .into());
        }
        Ok(resp.json::<Document>().await?)
    }
}
