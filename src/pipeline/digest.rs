// src/pipeline/digest.rs

//! Fetch → clean → format → send, over injected source and mailer.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Config, Credentials, Digest, Section};
use crate::services::{
    ContentFetcher, DigestFormatter, Mailer, OutgoingEmail, PostSource, clean, fetch_top_posts,
    should_skip,
};

/// Counts reported after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub communities: usize,
    pub posts: usize,
    pub skipped: usize,
}

/// Fetch every configured community, in order, and assemble the digest.
///
/// The first failing community aborts the whole digest.
pub async fn build_digest(
    config: &Config,
    source: &dyn PostSource,
    content: Option<&ContentFetcher>,
    generated_at: DateTime<Utc>,
) -> Result<(Digest, usize)> {
    let reddit = &config.reddit;
    let mut sections = Vec::with_capacity(reddit.communities.len());
    let mut skipped = 0;

    for community in &reddit.communities {
        let fetched =
            fetch_top_posts(source, community, reddit.post_limit, reddit.min_score).await?;

        let mut posts = Vec::with_capacity(fetched.len());
        for post in fetched {
            let post = match content {
                Some(fetcher) => fetcher.enrich(post).await,
                None => post,
            };
            let post = clean(post, &config.cleaning);
            if should_skip(&post, &config.cleaning) {
                log::debug!("Skipping {}", post.summary());
                skipped += 1;
                continue;
            }
            posts.push(post);
        }

        sections.push(Section::new(community.clone(), posts));
    }

    Ok((Digest::new(generated_at, sections), skipped))
}

/// Render the digest into a message from the sender to the receiver.
pub fn compose_email(
    config: &Config,
    credentials: &Credentials,
    digest: &Digest,
) -> Result<OutgoingEmail> {
    Ok(OutgoingEmail {
        from: credentials.email_sender.clone(),
        to: credentials.email_receiver.clone(),
        subject: DigestFormatter::subject(&config.email.subject, digest.generated_at),
        html_body: DigestFormatter::format(digest)?,
        text_body: DigestFormatter::format_text(digest)?,
    })
}

/// Run one digest end to end.
pub async fn run_digest(
    config: &Config,
    credentials: &Credentials,
    source: &dyn PostSource,
    content: Option<&ContentFetcher>,
    mailer: &dyn Mailer,
) -> Result<RunSummary> {
    let (digest, skipped) = build_digest(config, source, content, Utc::now()).await?;
    let email = compose_email(config, credentials, &digest)?;

    log::info!(
        "Sending digest with {} posts to {}...",
        digest.post_count(),
        email.to
    );
    mailer.send(&email).await?;

    Ok(RunSummary {
        communities: digest.sections.len(),
        posts: digest.post_count(),
        skipped,
    })
}
