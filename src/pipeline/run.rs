// src/pipeline/run.rs

use chrono::Utc;

use super::digest::{RunSummary, build_digest, run_digest};
use crate::error::Result;
use crate::models::{Config, Credentials};
use crate::services::{ContentFetcher, DigestFormatter, RedditClient, SmtpMailer};
use crate::utils::http;

/// Result of one invocation.
#[derive(Debug)]
pub enum Outcome {
    /// The digest was delivered.
    Sent(RunSummary),
    /// Dry run: the rendered HTML, not sent.
    Preview(String),
}

/// Run the digest against the live forum API and SMTP relay.
///
/// Credentials are resolved by the caller, so a missing variable has
/// already failed before anything here touches the network.
pub async fn run(config: &Config, credentials: &Credentials, dry_run: bool) -> Result<Outcome> {
    config.validate()?;

    log::info!(
        "Fetching top posts from {} communities (limit {}, min score {})",
        config.reddit.communities.len(),
        config.reddit.post_limit,
        config.reddit.min_score
    );

    let source = RedditClient::connect(&config.reddit, credentials).await?;
    let content = ContentFetcher::from_config(
        &config.content,
        http::create_client(&config.reddit, &credentials.user_agent)?,
    )?;

    if dry_run {
        let (digest, skipped) = build_digest(config, &source, content.as_ref(), Utc::now()).await?;
        log::info!(
            "Dry run: {} posts rendered, {} skipped",
            digest.post_count(),
            skipped
        );
        return Ok(Outcome::Preview(DigestFormatter::format(&digest)?));
    }

    let mailer = SmtpMailer::new(&config.email, credentials)?;
    let summary = run_digest(config, credentials, &source, content.as_ref(), &mailer).await?;

    log::info!(
        "Digest sent: {} posts across {} communities ({} skipped)",
        summary.posts,
        summary.communities,
        summary.skipped
    );
    Ok(Outcome::Sent(summary))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::AppError;
    use crate::models::sample_credentials;

    async fn reddit_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "token" })),
            )
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.reddit.communities = vec!["test".to_string()];
        config.reddit.min_score = 10;
        config.reddit.auth_url = format!("{}/api/v1/access_token", server.uri());
        config.reddit.api_url = server.uri();
        config
    }

    #[tokio::test]
    async fn test_dry_run_renders_without_sending() {
        let server = reddit_server().await;
        Mock::given(method("GET"))
            .and(path("/r/test/top"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "Listing",
                "data": { "children": [
                    { "kind": "t3", "data": {
                        "title": "Quarterly results",
                        "score": 120,
                        "url": "https://www.reddit.com/r/test/comments/abc/quarterly/",
                        "permalink": "/r/test/comments/abc/quarterly/",
                        "author": "analyst",
                        "selftext": "Revenue **up** 12%"
                    }},
                    { "kind": "t3", "data": {
                        "title": "Low effort",
                        "score": 3,
                        "url": "https://www.reddit.com/r/test/comments/def/low/",
                        "permalink": "/r/test/comments/def/low/",
                        "author": "someone",
                        "selftext": "meh"
                    }}
                ]}
            })))
            .mount(&server)
            .await;

        let outcome = run(&config_for(&server), &sample_credentials(), true)
            .await
            .unwrap();
        let Outcome::Preview(html) = outcome else {
            panic!("expected a preview");
        };
        assert!(html.contains("Quarterly results"));
        assert!(html.contains("Revenue up 12%"));
        assert!(!html.contains("Low effort"));
    }

    #[tokio::test]
    async fn test_crosspost_with_relative_url_renders() {
        let server = reddit_server().await;
        Mock::given(method("GET"))
            .and(path("/r/test/top"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "Listing",
                "data": { "children": [
                    { "kind": "t3", "data": {
                        "title": "Crosspost",
                        "score": 50,
                        "url": "/r/other/comments/2/c/",
                        "author": "relay"
                    }}
                ]}
            })))
            .mount(&server)
            .await;

        let outcome = run(&config_for(&server), &sample_credentials(), true)
            .await
            .unwrap();
        let Outcome::Preview(html) = outcome else {
            panic!("expected a preview");
        };
        assert!(html.contains(
            r#"<a href="https://www.reddit.com/r/other/comments/2/c/">Crosspost</a>"#
        ));
    }

    #[tokio::test]
    async fn test_unavailable_community_fails_run() {
        let server = reddit_server().await;
        Mock::given(method("GET"))
            .and(path("/r/test/top"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = run(&config_for(&server), &sample_credentials(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_network() {
        let mut config = Config::default();
        config.reddit.communities.clear();
        config.reddit.auth_url = "http://127.0.0.1:1/api/v1/access_token".to_string();

        let err = run(&config, &sample_credentials(), true).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
