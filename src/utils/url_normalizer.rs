//! Destination URL validation and normalization.
//!
//! Normalization is deliberately light: the stored destination is the caller's
//! input with surrounding whitespace removed and `https://` prepended when no
//! scheme is given. The result must parse as an absolute HTTP(S) URL with a host.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Splits `input` into an RFC 3986 scheme and the rest after the `:`.
///
/// `host:port` is not a scheme: when everything between the `:` and the next
/// `/`, `?` or `#` is digits, the prefix is a host and `None` is returned.
fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = input.split_once(':')?;

    let mut chars = scheme.chars();
    let is_scheme = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return None;
    }

    let port = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((scheme, rest))
}

/// Returns `true` if `input` starts with an RFC 3986 scheme.
fn has_scheme(input: &str) -> bool {
    split_scheme(input).is_some()
}

/// Normalizes a destination URL.
///
/// # Normalization Rules
///
/// 1. Leading and trailing whitespace is trimmed
/// 2. Embedded control characters are rejected
/// 3. Input without a scheme gets `https://` prepended (`host:port` is not a scheme)
/// 4. Only `http` and `https` schemes are accepted
/// 5. The URL must have a non-empty host
///
/// Everything else (case, path, query, fragment) is preserved as given.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input.
/// Returns [`UrlNormalizationError::InvalidFormat`] for unparseable URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
/// Returns [`UrlNormalizationError::MissingHost`] when no host is present.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("  example.com ").unwrap(), "https://example.com");
/// assert_eq!(normalize_url("http://example.com/a").unwrap(), "http://example.com/a");
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL contains control characters".to_string(),
        ));
    }

    let candidate = match split_scheme(trimmed) {
        Some((_, rest)) if !rest.starts_with("//") => {
            // `https:example.com` parses, but is not what the caller meant to store.
            return match Url::parse(trimmed) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Err(
                    UrlNormalizationError::InvalidFormat("missing `//` after scheme".to_string()),
                ),
                _ => Err(UrlNormalizationError::UnsupportedProtocol),
            };
        }
        Some(_) => trimmed.to_string(),
        None => format!("https://{trimmed}"),
    };

    let url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    Ok(candidate)
}
