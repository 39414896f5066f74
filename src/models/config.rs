//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
///
/// Holds every non-secret setting. Secrets live in [`super::Credentials`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Forum API and community selection
    #[serde(default)]
    pub reddit: RedditConfig,

    /// Body text preprocessing settings
    #[serde(default)]
    pub cleaning: CleaningConfig,

    /// Linked page enrichment
    #[serde(default)]
    pub content: ContentConfig,

    /// SMTP delivery settings
    #[serde(default)]
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::config(format!("Invalid config: {e}")))
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!(
                "Config file {} not found. Using defaults.",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.reddit.communities.is_empty() {
            return Err(AppError::config("reddit.communities is empty"));
        }
        for community in &self.reddit.communities {
            validate_community(community)?;
        }
        if self.reddit.post_limit == 0 {
            return Err(AppError::config("reddit.post_limit must be > 0"));
        }
        if self.reddit.min_score < 0 {
            return Err(AppError::config("reddit.min_score must be >= 0"));
        }
        if self.reddit.timeout_secs == 0 {
            return Err(AppError::config("reddit.timeout_secs must be > 0"));
        }
        if !TIME_FILTERS.contains(&self.reddit.time_filter.as_str()) {
            return Err(AppError::config(format!(
                "reddit.time_filter must be one of {}",
                TIME_FILTERS.join(", ")
            )));
        }
        if self.cleaning.max_excerpt_length <= self.cleaning.ellipsis.chars().count() {
            return Err(AppError::config(
                "cleaning.max_excerpt_length must exceed the ellipsis length",
            ));
        }
        if self.email.smtp_host.trim().is_empty() {
            return Err(AppError::config("email.smtp_host is empty"));
        }
        if self.email.smtp_port == 0 {
            return Err(AppError::config("email.smtp_port must be > 0"));
        }
        Ok(())
    }
}

/// Listing windows accepted by the `top` endpoint.
const TIME_FILTERS: &[&str] = &["hour", "day", "week", "month", "year", "all"];

/// Check that a community name is usable as a subreddit path segment.
pub fn validate_community(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::config(format!("Invalid community name '{name}'")))
    }
}

/// Forum API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    /// Communities to include, in digest order
    #[serde(default = "defaults::communities")]
    pub communities: Vec<String>,

    /// Maximum posts requested per community
    #[serde(default = "defaults::post_limit")]
    pub post_limit: usize,

    /// Posts scoring below this are dropped
    #[serde(default = "defaults::min_score")]
    pub min_score: i64,

    /// Ranking window for the `top` listing
    #[serde(default = "defaults::time_filter")]
    pub time_filter: String,

    /// OAuth2 token endpoint
    #[serde(default = "defaults::auth_url")]
    pub auth_url: String,

    /// Authenticated API base URL
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            communities: defaults::communities(),
            post_limit: defaults::post_limit(),
            min_score: defaults::min_score(),
            time_filter: defaults::time_filter(),
            auth_url: defaults::auth_url(),
            api_url: defaults::api_url(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Text cleaning and post filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Maximum excerpt length in characters, ellipsis included
    #[serde(default = "defaults::max_excerpt_length")]
    pub max_excerpt_length: usize,

    /// Marker appended to truncated excerpts
    #[serde(default = "defaults::ellipsis")]
    pub ellipsis: String,

    /// Posts whose excerpt contains any of these are left out
    #[serde(default = "defaults::skip_phrases")]
    pub skip_phrases: Vec<String>,

    /// Leave out image and gallery posts that carry no text
    #[serde(default = "defaults::skip_media_posts")]
    pub skip_media_posts: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            max_excerpt_length: defaults::max_excerpt_length(),
            ellipsis: defaults::ellipsis(),
            skip_phrases: defaults::skip_phrases(),
            skip_media_posts: defaults::skip_media_posts(),
        }
    }
}

/// Linked page enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Fetch the linked page for posts without self-text
    #[serde(default)]
    pub fetch_linked_pages: bool,

    /// CSS selector for the body text on a fetched page
    #[serde(default = "defaults::body_selector")]
    pub body_selector: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            fetch_linked_pages: false,
            body_selector: defaults::body_selector(),
        }
    }
}

/// SMTP delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay hostname
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// SMTP port (STARTTLS)
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Upgrade the session with STARTTLS; only local relays should disable it
    #[serde(default = "defaults::starttls")]
    pub starttls: bool,

    /// Subject line; `{date}` is replaced with the run date
    #[serde(default = "defaults::subject")]
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            starttls: defaults::starttls(),
            subject: defaults::subject(),
        }
    }
}

mod defaults {
    // Reddit defaults
    pub fn communities() -> Vec<String> {
        [
            "stocks",
            "investing",
            "StockMarket",
            "wallstreetbets",
            "ETFs_Europe",
            "ValueInvesting",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn post_limit() -> usize {
        10
    }
    pub fn min_score() -> i64 {
        20
    }
    pub fn time_filter() -> String {
        "day".into()
    }
    pub fn auth_url() -> String {
        "https://www.reddit.com/api/v1/access_token".into()
    }
    pub fn api_url() -> String {
        "https://oauth.reddit.com".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Cleaning defaults
    pub fn max_excerpt_length() -> usize {
        500
    }
    pub fn ellipsis() -> String {
        "...".into()
    }
    pub fn skip_phrases() -> Vec<String> {
        vec![
            "Skipped image content.".into(),
            "https://www.reddit.com/gallery".into(),
        ]
    }
    pub fn skip_media_posts() -> bool {
        true
    }

    // Content defaults
    pub fn body_selector() -> String {
        r#"div.text-neutral-content[slot="text-body"]"#.into()
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn starttls() -> bool {
        true
    }
    pub fn subject() -> String {
        "Reddit Top Posts | {date}".into()
    }
}
