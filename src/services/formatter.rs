// src/services/formatter.rs

//! Digest rendering.
//!
//! Builds the HTML email body (and a plain-text alternative) from a
//! [`Digest`]. Sections and posts are rendered in the order given; nothing
//! here sorts.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Digest, Post, Section};
use crate::utils::is_http_url;

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; color: #1a1a1b; margin: 0; padding: 16px; }
        .digest { max-width: 720px; margin: 0 auto; }
        .generated { color: #787c7e; font-size: 12px; }
        h2 { font-size: 22px; margin: 24px 0 8px 0; border-bottom: 2px solid #FF4500; }
        ul.posts { list-style: none; padding: 0; margin: 0; }
        .container { margin-bottom: 20px; }
        h3 { font-size: 18px; margin: 0; }
        h3 a { color: black !important; text-decoration: none; font-weight: normal; }
        .meta { color: #787c7e; font-size: 12px; margin: 2px 0; }
        p { font-size: 14px; margin: 5px 0; }
        a { color: #FF4500 !important; text-decoration: none; font-weight: bold; }
"#;

/// Renders digests into email bodies.
pub struct DigestFormatter;

impl DigestFormatter {
    /// Render the digest as one self-contained HTML document.
    ///
    /// Communities without posts get no heading; an entirely empty digest
    /// is still a complete document.
    pub fn format(digest: &Digest) -> Result<String> {
        let mut sections_html = String::new();
        for section in &digest.sections {
            validate_section(section)?;
            if section.posts.is_empty() {
                continue;
            }

            let _ = write!(
                sections_html,
                "\n        <h2>r/{}</h2>\n        <ul class=\"posts\">",
                html_escape(&section.community)
            );
            for post in &section.posts {
                sections_html.push_str(&Self::post_html(post));
            }
            sections_html.push_str("\n        </ul>");
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>{STYLE}    </style>
</head>
<body>
    <div class="digest">
        <p class="generated">Generated {generated}</p>{sections_html}
    </div>
</body>
</html>
"#,
            generated = digest.generated_at.format("%Y-%m-%d %H:%M UTC"),
        ))
    }

    fn post_html(post: &Post) -> String {
        let mut html = format!(
            r#"
            <li class="container">
                <h3><a href="{url}">{title}</a></h3>
                <p class="meta">{score} points by u/{author}</p>"#,
            url = html_escape(&post.url),
            title = html_escape(&post.title),
            score = post.score,
            author = html_escape(&post.author),
        );

        let excerpt = post.body_excerpt.as_str();
        if is_http_url(excerpt) {
            let _ = write!(
                html,
                "\n                <p><a href=\"{0}\">{0}</a></p>",
                html_escape(excerpt.trim())
            );
        } else if !excerpt.is_empty() {
            let _ = write!(html, "\n                <p>{}</p>", html_escape(excerpt));
        }

        html.push_str("\n            </li>");
        html
    }

    /// Render the plain-text alternative body.
    pub fn format_text(digest: &Digest) -> Result<String> {
        let mut text = format!(
            "Reddit Top Posts ({})\n",
            digest.generated_at.format("%Y-%m-%d")
        );

        for section in &digest.sections {
            validate_section(section)?;
            if section.posts.is_empty() {
                continue;
            }

            let _ = write!(text, "\nr/{}\n", section.community);
            for (rank, post) in section.posts.iter().enumerate() {
                let _ = writeln!(
                    text,
                    "  {}. {} ({} points, u/{})\n     {}",
                    rank + 1,
                    post.title,
                    post.score,
                    post.author,
                    post.url
                );
                if !post.body_excerpt.is_empty() && post.body_excerpt != post.url {
                    let _ = writeln!(text, "     {}", post.body_excerpt);
                }
            }
        }

        if digest.is_empty() {
            text.push_str("\nNo posts met the score threshold today.\n");
        }
        Ok(text)
    }

    /// Build the subject line, replacing `{date}` with the run date.
    pub fn subject(template: &str, generated_at: DateTime<Utc>) -> String {
        template.replace("{date}", &generated_at.format("%Y-%m-%d").to_string())
    }
}

fn validate_section(section: &Section) -> Result<()> {
    if section.community.trim().is_empty() {
        return Err(AppError::format("section has an empty community name"));
    }
    for post in &section.posts {
        if post.title.trim().is_empty() {
            return Err(AppError::format(format!(
                "post in r/{} has an empty title",
                section.community
            )));
        }
        if !is_http_url(&post.url) {
            return Err(AppError::format(format!(
                "post '{}' in r/{} has an invalid url '{}'",
                post.title, section.community, post.url
            )));
        }
    }
    Ok(())
}

/// Simple HTML escaping for user content.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
