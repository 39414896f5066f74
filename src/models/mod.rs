// src/models/mod.rs

//! Domain models for the digest application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod credentials;
mod post;

// Re-export all public types
pub use config::{
    CleaningConfig, Config, ContentConfig, EmailConfig, RedditConfig, validate_community,
};
pub use credentials::{Credentials, REQUIRED_VARS};
pub use post::{Digest, Post, Section};

#[cfg(test)]
pub(crate) use credentials::tests::sample_credentials;
