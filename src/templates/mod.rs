//! Blog page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Autoescaping is
//! on; the only raw insertion is the rich-text HTML of a post section,
//! marked `| safe` in `post.html`. That markup comes unsanitized from
//! [`crate::content::richtext`], which is acceptable only because the
//! content repository is a trusted, access-controlled source.

use crate::config::SiteConfig;
use crate::helpers::url_for;
use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Stylesheet written next to the generated pages
pub const STYLE_CSS: &str = include_str!("blog/style.css");

/// Client-side load-more script for the post list
pub const LOAD_MORE_JS: &str = include_str!("blog/load_more.js");

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all blog templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("fallback.html", include_str!("blog/fallback.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render the post list page
    pub fn render_index(
        &self,
        config: &ConfigData,
        posts: &[PostEntry],
        next_page: Option<&str>,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", config);
        context.insert("posts", posts);
        context.insert("next_page", &next_page);
        context.insert("post_root", &config.post_root);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render a post detail page
    pub fn render_post(&self, config: &ConfigData, post: &PostPage) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", config);
        context.insert("post", post);
        Ok(self.tera.render("post.html", &context)?)
    }

    /// Render the interim page shown while an unseen post generates
    pub fn render_fallback(&self, config: &ConfigData) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", config);
        Ok(self.tera.render("fallback.html", &context)?)
    }

    /// Render the not-found page
    pub fn render_not_found(&self, config: &ConfigData) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", config);
        Ok(self.tera.render("not_found.html", &context)?)
    }
}

/// Data structures for template context

/// Site-level fields shared by every page
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
    /// Root of the detail routes, e.g. "/post/"
    pub post_root: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: url_for(config, ""),
            post_root: url_for(config, &format!("{}/", config.post_dir)),
        }
    }
}

/// One entry of the post list
#[derive(Debug, Clone, Serialize)]
pub struct PostEntry {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// Display-formatted date, `None` for unpublished documents
    pub date: Option<String>,
    /// Detail page URL, `None` for entries without a uid (rendered unlinked)
    pub url: Option<String>,
}

/// A fully prepared post detail page
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub title: String,
    pub author: String,
    pub date: Option<String>,
    pub banner_url: Option<String>,
    pub reading_minutes: usize,
    /// Content sections in document order, keyed by position
    pub sections: Vec<SectionData>,
}

/// One content block, heading plus its rendered rich-text body
#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: Option<String>,
    /// Pre-rendered HTML, inserted raw
    pub html: String,
}
