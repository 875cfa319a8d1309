//! Shared URL normalizer used for de-duplication.

use url::Url;

/// Normalizes a URL for duplicate detection: case-folded, fragment and
/// trailing slash stripped, default port dropped.
///
/// Unparseable input is folded and trimmed as-is so dedup still behaves
/// predictably for malformed saved URLs.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            let mut text = url.to_string().to_lowercase();
            while text.ends_with('/') {
                text.pop();
            }
            text
        }
        Err(_) => raw.trim().trim_end_matches('/').to_lowercase(),
    }
}
