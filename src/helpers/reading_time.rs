//! Reading time estimation
//!
//! Words are whitespace-delimited tokens across every block heading and
//! every body span, read at a fixed 200 words per minute and rounded up
//! to whole minutes. The tokenization is approximate by intent; it
//! mirrors how the estimate has always been presented to readers.

use crate::content::ContentBlock;

/// Fixed reading speed for the estimate
const WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-delimited words in a text fragment
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimate reading time in whole minutes for a post's content blocks
///
/// A post with no countable words reads in zero minutes.
pub fn reading_time(content: &[ContentBlock]) -> usize {
    let words: usize = content
        .iter()
        .map(|block| {
            let heading = block.heading.as_deref().map(count_words).unwrap_or(0);
            let body: usize = block.body.iter().map(|span| count_words(&span.text)).sum();
            heading + body
        })
        .sum();
    words.div_ceil(WORDS_PER_MINUTE)
}
