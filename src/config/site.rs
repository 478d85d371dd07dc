//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,
    pub post_dir: String,

    // Directory
    pub public_dir: String,

    // Content repository
    #[serde(default)]
    pub repository: RepositoryConfig,

    // Revalidation
    #[serde(default)]
    pub revalidate: RevalidateConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),
            language: "pt-br".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            post_dir: "post".to_string(),

            public_dir: "public".to_string(),

            repository: RepositoryConfig::default(),
            revalidate: RevalidateConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Content repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Base API endpoint, e.g. https://example.cdn.prismic.io/api/v2
    pub api_endpoint: String,
    /// Document type to query for posts
    pub document_type: String,
    /// Documents per page
    pub page_size: usize,
    /// Optional bearer token for access-controlled repositories
    pub access_token: Option<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            document_type: "posts".to_string(),
            page_size: 20,
            access_token: None,
        }
    }
}

/// Revalidation windows in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevalidateConfig {
    /// Window for the post list page
    pub list: u64,
    /// Window for individual post pages
    pub post: u64,
}

impl Default for RevalidateConfig {
    fn default() -> Self {
        Self {
            list: 3600,
            post: 1800,
        }
    }
}
