//! Splitting `data:<mime>;base64,<payload>` strings into an [`InlineImage`].

use crate::models::InlineImage;
use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Extract the declared MIME type, falling back to `image/jpeg`.
pub fn mime_type(data_url: &str) -> &str {
    let header = data_url.split_once(',').map_or(data_url, |(head, _)| head);
    header
        .split(';')
        .next()
        .and_then(|s| s.split_once(':'))
        .map(|(_, mime)| mime.trim())
        .filter(|mime| !mime.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME)
}

/// Everything after the first comma; a string without a comma is taken to be
/// a bare payload.
pub fn payload(data_url: &str) -> &str {
    data_url
        .split_once(',')
        .map_or(data_url, |(_, rest)| rest)
}

pub fn parse(data_url: &str) -> InlineImage {
    InlineImage {
        mime_type: mime_type(data_url).to_string(),
        data: payload(data_url).to_string(),
    }
}

/// Parse and check that the payload is base64 no larger than `max_bytes` once decoded.
pub fn parse_bounded(data_url: &str, max_bytes: usize) -> Result<InlineImage> {
    let image = parse(data_url);
    if image.data.is_empty() {
        bail!("image data URL has an empty payload");
    }
    // Reject obviously oversized input before decoding it.
    if image.data.len() / 4 * 3 > max_bytes + 2 {
        bail!("image exceeds {} bytes", max_bytes);
    }
    let decoded = STANDARD
        .decode(image.data.as_bytes())
        .context("image payload is not valid base64")?;
    if decoded.len() > max_bytes {
        bail!("image is {} bytes, limit is {}", decoded.len(), max_bytes);
    }
    Ok(image)
}
