//! Generator module - renders the repository content into static HTML files
//!
//! One build queries the repository once for the first page of posts,
//! writes the list page plus one detail page per listed uid, and drops
//! the shared assets and the fallback/404 pages next to them. The
//! single-page entry points exist so the server can regenerate the
//! list or one post when its revalidation window has passed.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::cms::{CmsError, ContentSource, Document, FetchError};
use crate::config::SiteConfig;
use crate::content::{richtext, PostDetail, PostNormalizer};
use crate::helpers::{post_url, reading_time};
use crate::templates::{ConfigData, PostEntry, PostPage, SectionData, TemplateRenderer};

/// Why a single page failed to generate
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Cms(#[from] CmsError),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("render failed: {0}")]
    Render(anyhow::Error),
}

impl GenerateError {
    /// Whether the failure means the document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, GenerateError::Cms(CmsError::ContentNotFound { .. }))
    }
}

impl From<FetchError> for GenerateError {
    fn from(err: FetchError) -> Self {
        GenerateError::Cms(err.into())
    }
}

/// Counts reported by a full build
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildSummary {
    /// Detail pages written
    pub posts: usize,
    /// Listed documents without a usable slug
    pub skipped: usize,
}

/// Static site generator over a content source
pub struct Generator<S: ContentSource> {
    config: SiteConfig,
    public_dir: PathBuf,
    source: S,
    normalizer: PostNormalizer,
    renderer: TemplateRenderer,
}

impl<S: ContentSource> Generator<S> {
    /// Create a new generator writing into `public_dir`
    pub fn new(config: SiteConfig, public_dir: PathBuf, source: S) -> Result<Self> {
        let normalizer = PostNormalizer::from_config(&config);
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            config,
            public_dir,
            source,
            normalizer,
            renderer,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<BuildSummary> {
        let start = std::time::Instant::now();
        fs::create_dir_all(&self.public_dir)?;

        self.write_assets()?;

        let page = self.source.query_posts().await?;
        self.write_index(&page.results, page.next_page.as_deref())?;

        let mut summary = BuildSummary::default();
        for doc in &page.results {
            match &doc.uid {
                Some(uid) if is_safe_slug(uid) => {
                    self.write_post_page(doc)?;
                    summary.posts += 1;
                }
                Some(uid) => {
                    tracing::warn!("skipping post with unsafe slug {:?}", uid);
                    summary.skipped += 1;
                }
                None => {
                    tracing::debug!("skipping post {} without uid", doc.id);
                    summary.skipped += 1;
                }
            }
        }

        let config_data = ConfigData::from(&self.config);
        fs::write(
            self.public_dir.join("fallback.html"),
            self.renderer.render_fallback(&config_data)?,
        )?;
        fs::write(
            self.public_dir.join("404.html"),
            self.renderer.render_not_found(&config_data)?,
        )?;

        tracing::info!(
            "Generated {} post pages ({} skipped) in {:.2}s",
            summary.posts,
            summary.skipped,
            start.elapsed().as_secs_f64()
        );
        Ok(summary)
    }

    /// Regenerate only the list page
    pub async fn generate_index(&self) -> Result<(), GenerateError> {
        let page = self.source.query_posts().await?;
        self.write_index(&page.results, page.next_page.as_deref())?;
        tracing::info!("Regenerated index ({} posts listed)", page.results.len());
        Ok(())
    }

    /// Regenerate one post page by its uid
    pub async fn generate_post(&self, uid: &str) -> Result<(), GenerateError> {
        let doc = self.source.get_by_uid(uid).await?;
        self.write_post_page(&doc)?;
        tracing::info!("Regenerated post {}", uid);
        Ok(())
    }

    fn write_assets(&self) -> Result<(), GenerateError> {
        fs::write(
            self.public_dir.join("style.css"),
            crate::templates::STYLE_CSS,
        )?;
        fs::write(
            self.public_dir.join("load_more.js"),
            crate::templates::LOAD_MORE_JS,
        )?;
        Ok(())
    }

    /// Render and write the list page
    ///
    /// Entries keep repository order; the cursor passes into the page
    /// verbatim so the load-more script can follow it.
    fn write_index(&self, docs: &[Document], next_page: Option<&str>) -> Result<(), GenerateError> {
        let entries: Vec<PostEntry> = docs
            .iter()
            .map(|doc| {
                let post = self.normalizer.normalize(doc);
                PostEntry {
                    title: post.data.title,
                    subtitle: post.data.subtitle,
                    author: post.data.author,
                    date: post.first_publication_date,
                    url: post
                        .uid
                        .as_deref()
                        .filter(|uid| is_safe_slug(uid))
                        .map(|uid| post_url(&self.config, uid)),
                }
            })
            .collect();

        let config_data = ConfigData::from(&self.config);
        let html = self
            .renderer
            .render_index(&config_data, &entries, next_page)
            .map_err(GenerateError::Render)?;
        fs::write(self.public_dir.join("index.html"), html)?;
        Ok(())
    }

    fn write_post_page(&self, doc: &Document) -> Result<(), GenerateError> {
        let detail = self.normalizer.normalize_detail(doc);
        let Some(uid) = detail.uid.as_deref().filter(|uid| is_safe_slug(uid)) else {
            tracing::warn!(
                "not writing detail page for {} (missing or unsafe uid)",
                doc.id
            );
            return Ok(());
        };

        let page = build_post_page(&detail);
        let config_data = ConfigData::from(&self.config);
        let html = self
            .renderer
            .render_post(&config_data, &page)
            .map_err(GenerateError::Render)?;

        let dir = self.public_dir.join(&self.config.post_dir).join(uid);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("index.html"), html)?;
        Ok(())
    }
}

/// Prepare a normalized detail post for rendering
fn build_post_page(detail: &PostDetail) -> PostPage {
    let sections = detail
        .data
        .content
        .iter()
        .map(|block| SectionData {
            heading: block.heading.clone(),
            html: richtext::as_html(&block.body),
        })
        .collect();

    PostPage {
        title: detail.data.title.clone(),
        author: detail.data.author.clone(),
        date: detail.first_publication_date.clone(),
        banner_url: detail.data.banner.url.clone(),
        reading_minutes: reading_time(&detail.data.content),
        sections,
    }
}

/// Whether a uid is safe to use as a path component
///
/// Generated and served slugs are restricted to `[A-Za-z0-9_-]`.
pub fn is_safe_slug(uid: &str) -> bool {
    !uid.is_empty()
        && uid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::CmsClient;
    use crate::config::RepositoryConfig;
    use serde_json::json;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer, public_dir: &Path) -> Generator<CmsClient> {
        let config = SiteConfig {
            repository: RepositoryConfig {
                api_endpoint: server.uri(),
                ..RepositoryConfig::default()
            },
            ..SiteConfig::default()
        };
        let client = CmsClient::new(&config.repository).unwrap();
        Generator::new(config, public_dir.to_path_buf(), client).unwrap()
    }

    fn doc(uid: &str, title: &str) -> serde_json::Value {
        json!({
            "id": format!("id-{}", uid),
            "uid": uid,
            "first_publication_date": "2021-03-25T19:25:28+0000",
            "data": {
                "title": title,
                "subtitle": "Subtítulo",
                "author": "Joseph Oliveira",
                "banner": {"url": "https://images.example.com/banner.png"},
                "content": [{
                    "heading": "Seção",
                    "body": [{"type": "paragraph", "text": "Um parágrafo de texto.", "spans": []}]
                }]
            }
        })
    }

    #[test]
    fn test_safe_slugs() {
        assert!(is_safe_slug("como-utilizar-hooks"));
        assert!(is_safe_slug("post_2"));
        assert!(!is_safe_slug(""));
        assert!(!is_safe_slug("../etc/passwd"));
        assert!(!is_safe_slug("a/b"));
        assert!(!is_safe_slug("acentuação"));
    }

    #[tokio::test]
    async fn test_full_generate_writes_pages_and_assets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [doc("primeiro-post", "Primeiro post")],
                "next_page": null,
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let generator = generator(&server, dir.path());
        let summary = generator.generate().await.unwrap();
        assert_eq!(summary.posts, 1);
        assert_eq!(summary.skipped, 0);

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("Primeiro post"));
        assert!(index.contains("25 Mar 2021"));
        // Last page, so no load-more button
        assert!(!index.contains("carregar mais posts"));

        let post = fs::read_to_string(dir.path().join("post/primeiro-post/index.html")).unwrap();
        assert!(post.contains("<p>Um parágrafo de texto.</p>"));
        assert!(post.contains("1 min"));

        assert!(dir.path().join("style.css").exists());
        assert!(dir.path().join("load_more.js").exists());
        assert!(dir.path().join("fallback.html").exists());
        assert!(dir.path().join("404.html").exists());
    }

    #[tokio::test]
    async fn test_uid_less_documents_are_listed_but_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    doc("com-uid", "Com uid"),
                    {
                        "id": "id-preview",
                        "uid": null,
                        "first_publication_date": null,
                        "data": {"title": "Rascunho", "subtitle": "", "author": ""}
                    }
                ],
                "next_page": null,
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let generator = generator(&server, dir.path());
        let summary = generator.generate().await.unwrap();
        assert_eq!(summary.posts, 1);
        assert_eq!(summary.skipped, 1);

        // The uid-less entry still shows on the list, unlinked
        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("Rascunho"));
    }

    #[tokio::test]
    async fn test_generate_post_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let generator = generator(&server, dir.path());
        let err = generator.generate_post("sumiu").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!dir.path().join("post/sumiu/index.html").exists());
    }

    #[tokio::test]
    async fn test_generate_index_keeps_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [doc("primeiro-post", "Primeiro post")],
                "next_page": "https://repo.example.com/page2",
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let generator = generator(&server, dir.path());
        generator.generate_index().await.unwrap();

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("carregar mais posts"));
        assert!(index.contains("data-next-page="));
    }
}
