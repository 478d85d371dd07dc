//! Post list pagination
//!
//! [`PaginationController`] owns the progressively loaded post list and
//! the opaque cursor to the next page. `load_more` is the only mutation
//! and takes `&mut self`, so two loads can never overlap on one
//! controller; to share one across tasks, put it behind a
//! `tokio::sync::Mutex` and callers queue instead of interleaving.
//! Dropping the controller, or the `load_more` future itself, cancels
//! any in-flight request.

use crate::cms::{ContentSource, FetchError};
use crate::content::{Post, PostNormalizer, PostPagination};

/// What a `load_more` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Appended this many posts and moved the cursor
    Appended(usize),
    /// No next page existed, nothing was requested
    Exhausted,
}

/// Progressive loader for the post list
pub struct PaginationController<S: ContentSource> {
    source: S,
    normalizer: PostNormalizer,
    posts: Vec<Post>,
    next_page: Option<String>,
}

impl<S: ContentSource> PaginationController<S> {
    /// Start from an already-normalized first window, the same payload
    /// the list page is generated from
    pub fn new(source: S, normalizer: PostNormalizer, initial: PostPagination) -> Self {
        Self {
            source,
            normalizer,
            posts: initial.results,
            next_page: initial.next_page,
        }
    }

    /// Posts loaded so far, in fetch order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Opaque URL of the next page, if any
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Whether another page can still be requested
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Fetch and append the next page
    ///
    /// On success the whole batch lands after the posts already loaded,
    /// in response order, and the cursor moves to whatever the new page
    /// said; loaded posts are never reordered or dropped. On failure
    /// the list and cursor stay exactly as they were, so a later call
    /// retries the same page. Without a cursor nothing is requested.
    pub async fn load_more(&mut self) -> Result<LoadOutcome, FetchError> {
        let Some(url) = self.next_page.clone() else {
            return Ok(LoadOutcome::Exhausted);
        };

        let page = match self.source.fetch_page(&url).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!("failed to load next page: {}", err);
                return Err(err);
            }
        };

        // Normalize the whole batch before touching state so state only
        // changes once the page is fully usable
        let batch = self.normalizer.normalize_page(&page);
        let appended = batch.results.len();
        self.posts.extend(batch.results);
        self.next_page = batch.next_page;

        tracing::debug!("loaded {} more posts, {} total", appended, self.posts.len());
        Ok(LoadOutcome::Appended(appended))
    }
}
