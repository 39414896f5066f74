//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Image extensions recognised in post links.
const IMAGE_EXTENSIONS: &[&str] = &[".jpeg", ".jpg", ".png", ".gif", ".bmp", ".webp"];

/// Whether `text` is a single absolute http(s) URL.
pub fn is_http_url(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.contains(char::is_whitespace) {
        return false;
    }
    Url::parse(text)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Whether a URL points straight at an image file.
pub fn is_image_url(url_str: &str) -> bool {
    Url::parse(url_str)
        .map(|u| {
            let path = u.path().to_lowercase();
            IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        })
        .unwrap_or(false)
}

/// Whether a URL points at a reddit image gallery.
pub fn is_gallery_url(url_str: &str) -> bool {
    Url::parse(url_str)
        .map(|u| {
            let host = u.host_str().unwrap_or_default();
            (host == "reddit.com" || host.ends_with(".reddit.com"))
                && u.path().starts_with("/gallery/")
        })
        .unwrap_or(false)
}

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}
