//! DTO for the shortening endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request body for `POST /shorten`.
///
/// The destination may omit its scheme; `https://` is assumed. Full URL
/// validation happens in the service after normalization.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Destination to shorten. `original_url` is accepted as an alias.
    #[serde(alias = "original_url")]
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}
