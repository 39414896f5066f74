//! Post and digest data structures.

use chrono::{DateTime, Utc};

/// A ranked post retrieved from a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Community the post was listed in
    pub source_community: String,

    /// Post title
    pub title: String,

    /// Body text; raw when fetched, cleaned and truncated afterwards
    pub body_excerpt: String,

    /// Net score (upvotes)
    pub score: i64,

    /// Link target of the post
    pub url: String,

    /// Author username
    pub author: String,
}

impl Post {
    /// Short one-line description for log output.
    pub fn summary(&self) -> String {
        format!("{} ({} points, u/{})", self.title, self.score, self.author)
    }
}

/// Posts from one community, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub community: String,
    pub posts: Vec<Post>,
}

impl Section {
    pub fn new(community: impl Into<String>, posts: Vec<Post>) -> Self {
        Self {
            community: community.into(),
            posts,
        }
    }
}

/// The assembled newsletter for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

impl Digest {
    pub fn new(generated_at: DateTime<Utc>, sections: Vec<Section>) -> Self {
        Self {
            generated_at,
            sections,
        }
    }

    /// Total posts across all sections.
    pub fn post_count(&self) -> usize {
        self.sections.iter().map(|s| s.posts.len()).sum()
    }

    /// Whether no section carries any post.
    pub fn is_empty(&self) -> bool {
        self.post_count() == 0
    }
}
