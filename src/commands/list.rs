//! List posts from the content repository

use anyhow::Result;

use crate::cms::{CmsClient, ContentSource};
use crate::content::{Post, PostNormalizer};
use crate::pagination::{LoadOutcome, PaginationController};
use crate::Spacetraveling;

/// List posts page by page
///
/// Prints the first query page, then follows the cursor for `pages`
/// more fetches (or until exhausted with `all`). A failed fetch warns
/// and stops; everything already printed stays valid because the
/// controller state did not advance.
pub async fn run(app: &Spacetraveling, pages: usize, all: bool) -> Result<()> {
    let client = CmsClient::new(&app.config.repository)?;
    let normalizer = PostNormalizer::from_config(&app.config);

    let first = client.query_posts().await?;
    let initial = normalizer.normalize_page(&first);
    let mut controller = PaginationController::new(client, normalizer, initial);

    print_posts(controller.posts());
    let mut printed = controller.len();
    let mut fetched = 0;

    while controller.has_more() && (all || fetched < pages) {
        match controller.load_more().await {
            Ok(LoadOutcome::Appended(_)) => {
                print_posts(&controller.posts()[printed..]);
                printed = controller.len();
                fetched += 1;
            }
            Ok(LoadOutcome::Exhausted) => break,
            Err(err) => {
                tracing::warn!("stopping after failed page fetch: {}", err);
                break;
            }
        }
    }

    println!("Posts ({})", controller.len());
    if controller.has_more() {
        println!("More pages available, rerun with --all to follow them");
    }

    Ok(())
}

fn print_posts(posts: &[Post]) {
    for post in posts {
        println!(
            "  {} - {} [{}]",
            post.first_publication_date.as_deref().unwrap_or("não publicado"),
            post.data.title,
            post.uid.as_deref().unwrap_or("-")
        );
    }
}
