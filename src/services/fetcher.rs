// src/services/fetcher.rs

//! Ranked post retrieval with score filtering.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Post, validate_community};

/// A forum that can list its top-ranked posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Return up to `limit` posts for `community`, best ranked first.
    async fn fetch(&self, community: &str, limit: usize) -> Result<Vec<Post>>;
}

/// Fetch the top posts of a community, dropping those below `min_score`.
///
/// Rank order from the source is preserved and at most `limit` posts are
/// returned. An empty result is not an error.
pub async fn fetch_top_posts(
    source: &dyn PostSource,
    community: &str,
    limit: usize,
    min_score: i64,
) -> Result<Vec<Post>> {
    if limit == 0 {
        return Err(AppError::config("post limit must be > 0"));
    }
    if min_score < 0 {
        return Err(AppError::config("minimum score must be >= 0"));
    }
    validate_community(community)?;

    log::info!("Fetching top {limit} posts from r/{community}...");
    let fetched = source.fetch(community, limit).await?;
    let total = fetched.len();

    let posts: Vec<Post> = fetched
        .into_iter()
        .filter(|post| post.score >= min_score)
        .take(limit)
        .collect();

    log::info!(
        "Fetched {} posts from r/{} ({} below score {})",
        posts.len(),
        community,
        total.saturating_sub(posts.len()),
        min_score
    );
    Ok(posts)
}
