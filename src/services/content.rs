// src/services/content.rs

//! Linked page enrichment.
//!
//! Posts without self-text carry only their link. When enabled, the linked
//! page is fetched and the text under a configured selector becomes the
//! body instead.

use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{ContentConfig, Post};
use crate::utils::{http, is_http_url, is_image_url};

/// Body used for posts that link straight to an image.
pub const SKIPPED_IMAGE: &str = "Skipped image content.";

/// Fetches linked pages to fill in bodies of link posts.
pub struct ContentFetcher {
    client: Client,
    body_selector: Selector,
}

impl ContentFetcher {
    /// Create a fetcher sharing `client`, or `None` when enrichment is off.
    pub fn from_config(config: &ContentConfig, client: Client) -> Result<Option<Self>> {
        if !config.fetch_linked_pages {
            return Ok(None);
        }
        let body_selector = parse_selector(&config.body_selector)?;
        Ok(Some(Self {
            client,
            body_selector,
        }))
    }

    /// Replace a link-only body with the linked page's text.
    ///
    /// Page failures are logged and leave the post untouched.
    pub async fn enrich(&self, mut post: Post) -> Post {
        if !is_link_only(&post) {
            return post;
        }
        if is_image_url(&post.url) {
            post.body_excerpt = SKIPPED_IMAGE.to_string();
            return post;
        }

        match http::fetch_page(&self.client, &post.url).await {
            Ok(document) => {
                if let Some(text) = self.extract_body(&document) {
                    post.body_excerpt = text;
                }
            }
            Err(e) => log::warn!("Failed to fetch content for {}: {}", post.url, e),
        }
        post
    }

    fn extract_body(&self, document: &Html) -> Option<String> {
        let text: String = document
            .select(&self.body_selector)
            .next()?
            .text()
            .collect::<Vec<_>>()
            .join(" ");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Whether the post body is just its own link.
fn is_link_only(post: &Post) -> bool {
    post.body_excerpt == post.url && is_http_url(&post.url)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
