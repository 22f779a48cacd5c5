//! DTO for the mapping update endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request body for `PUT /shorten/{code}`.
///
/// Replaces the destination; code, access count and creation time are kept.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMappingRequest {
    #[serde(alias = "original_url")]
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}
