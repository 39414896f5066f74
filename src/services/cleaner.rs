// src/services/cleaner.rs

//! Post body cleaning and filtering.
//!
//! Turns raw post bodies (markdown, sometimes HTML) into short plain-text
//! excerpts, and decides which posts are not worth mailing.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{CleaningConfig, Post};
use crate::services::content::SKIPPED_IMAGE;
use crate::utils::{is_gallery_url, is_http_url, is_image_url};

static MD_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static MD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid regex"));
static MD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+").expect("valid regex"));
static MD_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>+[ \t]?").expect("valid regex"));
static MD_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*([-*_][ \t]*){3,}$").expect("valid regex"));
static MD_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").expect("valid regex"));
static MD_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|~~|__|`+").expect("valid regex"));

/// Clean a post's body into a bounded plain-text excerpt.
///
/// Only `body_excerpt` changes. Never fails: a body that is empty or pure
/// markup becomes an empty excerpt. A body that is a bare link skips markup
/// stripping, so the link survives unless it exceeds the length limit.
pub fn clean(mut post: Post, config: &CleaningConfig) -> Post {
    post.body_excerpt = if is_http_url(&post.body_excerpt) {
        truncate(
            post.body_excerpt.trim(),
            config.max_excerpt_length,
            &config.ellipsis,
        )
    } else {
        clean_text(&post.body_excerpt, config)
    };
    post
}

/// Strip markup, collapse whitespace, and truncate `text`.
pub fn clean_text(text: &str, config: &CleaningConfig) -> String {
    let plain = strip_markup(text);
    let collapsed = normalize_whitespace(&plain);
    truncate(&collapsed, config.max_excerpt_length, &config.ellipsis)
}

/// Whether a cleaned post should be left out of the digest.
pub fn should_skip(post: &Post, config: &CleaningConfig) -> bool {
    if config
        .skip_phrases
        .iter()
        .any(|phrase| !phrase.is_empty() && post.body_excerpt.contains(phrase.as_str()))
    {
        return true;
    }

    if config.skip_media_posts && (is_image_url(&post.url) || is_gallery_url(&post.url)) {
        let excerpt = post.body_excerpt.as_str();
        let has_text = !excerpt.is_empty() && excerpt != post.url && excerpt != SKIPPED_IMAGE;
        return !has_text;
    }

    false
}

fn strip_markup(text: &str) -> String {
    // Tags and entities; plain markdown skips the HTML parser entirely.
    let text = if text.contains('<') || text.contains('&') {
        Html::parse_fragment(text)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text.to_string()
    };

    let text = MD_IMAGE.replace_all(&text, "$1");
    let text = MD_LINK.replace_all(&text, "$1");
    let text = MD_RULE.replace_all(&text, "");
    let text = MD_HEADING.replace_all(&text, "");
    let text = MD_QUOTE.replace_all(&text, "");
    let text = MD_BULLET.replace_all(&text, "");
    let text = MD_EMPHASIS.replace_all(&text, "");

    text.replace(['\u{200B}', '\u{FEFF}'], "")
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, ellipsis included.
///
/// Grapheme clusters are kept whole.
fn truncate(text: &str, max_chars: usize, ellipsis: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let ellipsis_len = ellipsis.chars().count();
    if ellipsis_len >= max_chars {
        return ellipsis.chars().take(max_chars).collect();
    }

    let budget = max_chars - ellipsis_len;
    let mut kept = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let len = grapheme.chars().count();
        if used + len > budget {
            break;
        }
        kept.push_str(grapheme);
        used += len;
    }

    let mut result = kept.trim_end().to_string();
    result.push_str(ellipsis);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: usize) -> CleaningConfig {
        CleaningConfig {
            max_excerpt_length: max,
            ..CleaningConfig::default()
        }
    }

    fn post_with(body: &str, url: &str) -> Post {
        Post {
            source_community: "test".to_string(),
            title: "Title".to_string(),
            body_excerpt: body.to_string(),
            score: 1,
            url: url.to_string(),
            author: "a".to_string(),
        }
    }

    #[test]
    fn test_link_body_kept_verbatim() {
        for url in [
            "https://example.com/my__file_name",
            "https://example.com/search?q=a*b",
            "https://example.com/page?x=1&copy=2",
        ] {
            let cleaned = clean(post_with(url, url), &config(500));
            assert_eq!(cleaned.body_excerpt, url);
            assert!(!should_skip(&cleaned, &CleaningConfig::default()));
        }
    }

    #[test]
    fn test_overlong_link_body_still_bounded() {
        let url = format!("https://example.com/{}", "a".repeat(600));
        let cleaned = clean(post_with(&url, &url), &config(50));
        assert_eq!(cleaned.body_excerpt.chars().count(), 50);
        assert!(cleaned.body_excerpt.ends_with("..."));
    }

    #[test]
    fn test_link_followed_by_prose_is_cleaned() {
        let body = "https://example.com/report **huge** news";
        let cleaned = clean(post_with(body, "https://example.com/report"), &config(500));
        assert_eq!(cleaned.body_excerpt, "https://example.com/report huge news");
    }

    #[test]
    fn test_collapses_whitespace() {
        let cleaned = clean_text("  line one\n\n\tline   two  ", &config(100));
        assert_eq!(cleaned, "line one line two");
    }

    #[test]
    fn test_strips_markdown() {
        let text = "# Heading\n> quoted **bold** and _x_ [a link](https://x.com)\n- item\n\n---\n`code`";
        assert_eq!(
            clean_text(text, &config(200)),
            "Heading quoted bold and _x_ a link item code"
        );
    }

    #[test]
    fn test_strips_html_and_entities() {
        let text = "<div class=\"md\"><p>Tom &amp; Jerry</p><p>&lt;3</p></div>";
        assert_eq!(clean_text(text, &config(200)), "Tom & Jerry <3");
    }

    #[test]
    fn test_preserves_underscored_names() {
        assert_eq!(
            clean_text("see r/ETFs_Europe and u/some_user", &config(200)),
            "see r/ETFs_Europe and u/some_user"
        );
    }

    #[test]
    fn test_truncates_with_ellipsis() {
        let cleaned = clean_text("abcdefghijklmnopqrstuvwxyz", &config(10));
        assert_eq!(cleaned, "abcdefg...");
        assert_eq!(cleaned.chars().count(), 10);
    }

    #[test]
    fn test_short_text_is_not_marked() {
        assert_eq!(clean_text("short", &config(10)), "short");
        assert_eq!(clean_text("exactly10!", &config(10)), "exactly10!");
    }

    #[test]
    fn test_excerpt_never_exceeds_max() {
        let bodies = [
            String::new(),
            "a".to_string(),
            "word ".repeat(300),
            "é🇰🇷👍🏽 ".repeat(200),
            "**bold** <b>tag</b> ".repeat(100),
        ];
        for max in [4, 5, 17, 64, 500] {
            for body in &bodies {
                let cleaned = clean(post_with(body, "https://x.com"), &config(max));
                assert!(
                    cleaned.body_excerpt.chars().count() <= max,
                    "{max}: {}",
                    cleaned.body_excerpt
                );
            }
        }
    }

    #[test]
    fn test_graphemes_are_not_split() {
        let flags = "🇰🇷".repeat(10);
        let cleaned = clean_text(&flags, &config(8));
        assert_eq!(cleaned, "🇰🇷🇰🇷...");
    }

    #[test]
    fn test_empty_and_markup_only_bodies() {
        assert_eq!(clean_text("", &config(50)), "");
        assert_eq!(clean_text("<p></p>  \n ***", &config(50)), "");
    }

    #[test]
    fn test_clean_changes_only_body() {
        let post = post_with("  **hi**  ", "https://x.com");
        let cleaned = clean(post.clone(), &config(50));
        assert_eq!(cleaned.body_excerpt, "hi");
        assert_eq!(cleaned.title, post.title);
        assert_eq!(cleaned.url, post.url);
        assert_eq!(cleaned.score, post.score);
    }

    #[test]
    fn test_should_skip_phrases() {
        let cfg = CleaningConfig::default();
        assert!(should_skip(
            &post_with(SKIPPED_IMAGE, "https://x.com"),
            &cfg
        ));
        assert!(should_skip(
            &post_with("see https://www.reddit.com/gallery/abc", "https://x.com"),
            &cfg
        ));
        assert!(!should_skip(&post_with("plain text", "https://x.com"), &cfg));
    }

    #[test]
    fn test_should_skip_media_without_text() {
        let cfg = CleaningConfig::default();
        let url = "https://i.redd.it/chart.png";
        assert!(should_skip(&post_with(url, url), &cfg));
        assert!(!should_skip(&post_with("My analysis", url), &cfg));

        let keep_media = CleaningConfig {
            skip_media_posts: false,
            ..CleaningConfig::default()
        };
        assert!(!should_skip(&post_with(url, url), &keep_media));
    }
}
