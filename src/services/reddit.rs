// src/services/reddit.rs

//! Reddit API client.
//!
//! Authenticates with the OAuth2 password grant once, then lists the top
//! posts of each community with the bearer token.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Credentials, Post, RedditConfig};
use crate::services::PostSource;
use crate::utils::{http, resolve_url};

const SERVICE: &str = "reddit";
const WEB_BASE: &str = "https://www.reddit.com";
/// Largest page the listing endpoint serves.
const MAX_LISTING_LIMIT: usize = 100;

/// Authenticated client for the Reddit listing API.
pub struct RedditClient {
    client: Client,
    api_url: String,
    time_filter: String,
    access_token: SecretString,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    title: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    selftext: Option<String>,
}

impl RawPost {
    fn into_post(self, community: &str) -> Post {
        // Crossposts and self posts may list a site-relative url.
        let url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .or(self.permalink)
            .and_then(|href| {
                let base = Url::parse(WEB_BASE).ok()?;
                Some(resolve_url(&base, href.trim()))
            })
            .unwrap_or_default();

        // Link posts carry no self-text; the link itself stands in for it.
        let body_excerpt = self
            .selftext
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| url.clone());

        Post {
            source_community: community.to_string(),
            title: self.title,
            body_excerpt,
            score: self.score,
            url,
            author: self
                .author
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "[deleted]".to_string()),
        }
    }
}

impl RedditClient {
    /// Build the HTTP client and obtain an access token.
    pub async fn connect(config: &RedditConfig, credentials: &Credentials) -> Result<Self> {
        let client = http::create_client(config, &credentials.user_agent)?;
        let access_token = Self::request_token(&client, config, credentials).await?;
        log::debug!("Obtained Reddit access token for u/{}", credentials.reddit_username);

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            time_filter: config.time_filter.clone(),
            access_token,
        })
    }

    async fn request_token(
        client: &Client,
        config: &RedditConfig,
        credentials: &Credentials,
    ) -> Result<SecretString> {
        let response = client
            .post(&config.auth_url)
            .basic_auth(&credentials.client_id, Some(credentials.client_secret()))
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.reddit_username.as_str()),
                ("password", credentials.reddit_password()),
            ])
            .send()
            .await
            .map_err(|e| AppError::source_unavailable(&config.auth_url, e))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AppError::authentication(
                SERVICE,
                format!("token request rejected with HTTP {status}"),
            ));
        }
        if !status.is_success() {
            return Err(AppError::source_unavailable(
                &config.auth_url,
                format!("HTTP {status}"),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::source_unavailable(&config.auth_url, e))?;

        if let Some(error) = token.error {
            return Err(AppError::authentication(SERVICE, error));
        }
        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| AppError::authentication(SERVICE, "no access token in response"))
    }

    /// List the top posts of a community for the configured time window.
    pub async fn top_posts(&self, community: &str, limit: usize) -> Result<Vec<Post>> {
        let target = format!("r/{community}");
        let url = format!("{}/r/{}/top", self.api_url, community);
        let limit = limit.min(MAX_LISTING_LIMIT).to_string();

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.access_token.expose_secret())
            .query(&[
                ("t", self.time_filter.as_str()),
                ("limit", limit.as_str()),
                ("raw_json", "1"),
            ])
            .send()
            .await
            .map_err(|e| AppError::source_unavailable(&target, e))?;

        let listing: Listing = Self::check_status(response, &target)?
            .json()
            .await
            .map_err(|e| AppError::source_unavailable(&target, e))?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|thing| thing.data.into_post(community))
            .collect())
    }

    fn check_status(response: Response, target: &str) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::authentication(
                SERVICE,
                format!("access token rejected for {target}"),
            ));
        }
        if !status.is_success() {
            return Err(AppError::source_unavailable(target, format!("HTTP {status}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn fetch(&self, community: &str, limit: usize) -> Result<Vec<Post>> {
        self.top_posts(community, limit).await
    }
}
