//! Content repository boundary
//!
//! The repository is an external, access-controlled headless CMS. The
//! pipeline consumes exactly three read operations, expressed by the
//! [`ContentSource`] trait; [`CmsClient`] is the HTTP implementation.

mod client;
mod document;
mod error;

pub use client::{CmsClient, ContentSource};
pub use document::{Document, PageResponse};
pub use error::{CmsError, FetchError};
