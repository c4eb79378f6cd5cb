//! # Raster Asset Loading
//!
//! The `logo` and `signature` query parameters carry a raster image as plain
//! base64, a `data:` URI (base64 or percent-encoded), or an `http(s)` URL.
//! Loading is best-effort by design: a bad image must never abort document
//! generation, so callers treat any error here as "skip the overlay".

use std::io::Read;
use std::time::Duration;

use base64::Engine;

use crate::error::BlankiError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve one image parameter to raw image bytes.
pub fn load_raster(src: &str) -> Result<Vec<u8>, BlankiError> {
    if src.starts_with("data:") {
        load_data_uri(src)
    } else if src.starts_with("http://") || src.starts_with("https://") {
        load_remote(src)
    } else {
        decode_base64(src)
    }
}

/// `data:image/png;base64,xxxx` or `data:image/png,<percent-encoded bytes>`.
/// The header before the comma is stripped; it decides the decoding.
fn load_data_uri(src: &str) -> Result<Vec<u8>, BlankiError> {
    let (header, payload) = src
        .split_once(',')
        .ok_or_else(|| BlankiError::Image("invalid data URI: no comma".to_string()))?;

    if header.contains("base64") {
        decode_base64(payload)
    } else {
        let decoded = urlencoding::decode(payload)
            .map_err(|e| BlankiError::Image(format!("invalid data URI payload: {}", e)))?;
        Ok(decoded.into_owned().into_bytes())
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, BlankiError> {
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| BlankiError::Image(format!("base64 decode error: {}", e)))
}

fn load_remote(url: &str) -> Result<Vec<u8>, BlankiError> {
    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| BlankiError::Image(format!("image fetch failed: {}", e)))?;

    let mut bytes = Vec::new();
    response.into_reader().read_to_end(&mut bytes)?;
    Ok(bytes)
}
