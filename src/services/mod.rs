//! Service layer for the digest application.
//!
//! This module contains the business logic for:
//! - Forum access (`RedditClient`, behind `PostSource`)
//! - Score filtering (`fetch_top_posts`)
//! - Linked page enrichment (`ContentFetcher`)
//! - Body cleaning (`clean`, `should_skip`)
//! - Rendering (`DigestFormatter`)
//! - Delivery (`SmtpMailer`, behind `Mailer`)

pub mod cleaner;
mod content;
mod fetcher;
mod formatter;
mod mailer;
mod reddit;

pub use cleaner::{clean, should_skip};
pub use content::{ContentFetcher, SKIPPED_IMAGE};
pub use fetcher::{PostSource, fetch_top_posts};
pub use formatter::DigestFormatter;
pub use mailer::{Mailer, OutgoingEmail, SmtpMailer};
pub use reddit::RedditClient;

#[cfg(test)]
pub(crate) use fetcher::tests::{StubSource, stub_post};
#[cfg(test)]
pub(crate) use mailer::tests::RecordingMailer;
