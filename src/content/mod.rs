//! Content module - post models, normalization and rich-text rendering

mod normalizer;
mod post;
pub mod richtext;

pub use normalizer::PostNormalizer;
pub use post::{
    Banner, ContentBlock, DetailData, InlineSpan, Post, PostData, PostDetail, PostPagination,
    RichTextSpan, SpanData,
};
