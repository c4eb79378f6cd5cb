//! # Font Store
//!
//! The templates are Cyrillic, which the built-in PDF fonts cannot encode, so
//! the service downloads a Unicode TTF at startup. The download is strictly
//! best-effort: any failure (timeout, unreachable host, non-font response)
//! falls back to the built-in Helvetica faces and is never surfaced to a
//! caller.
//!
//! The store is resolved once per process and passed to the router as state —
//! font registration is not a per-render side effect.

use std::io::Read;
use std::time::Duration;

/// Default source for the regular body face.
pub const DEFAULT_REGULAR_URL: &str =
    "https://github.com/dejavu-fonts/dejavu-fonts/raw/master/ttf/DejaVuSans.ttf";
/// Default source for the bold face.
pub const DEFAULT_BOLD_URL: &str =
    "https://github.com/dejavu-fonts/dejavu-fonts/raw/master/ttf/DejaVuSans-Bold.ttf";

/// How long a font download may take before falling back to built-ins.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw TTF bytes for the two faces the renderer uses. `None` means the
/// corresponding built-in face is used instead.
#[derive(Debug, Default, Clone)]
pub struct FontStore {
    pub regular: Option<Vec<u8>>,
    pub bold: Option<Vec<u8>>,
}

impl FontStore {
    /// A store that uses only the built-in faces. No network access.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// A store backed by caller-supplied TTF bytes.
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Self {
        Self {
            regular: Some(regular),
            bold: Some(bold),
        }
    }

    /// Download both faces, honoring `BLANKI_FONT_URL` / `BLANKI_FONT_BOLD_URL`
    /// overrides. Failures degrade to `None` per face.
    pub fn fetch() -> Self {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();

        let regular_url = std::env::var("BLANKI_FONT_URL")
            .unwrap_or_else(|_| DEFAULT_REGULAR_URL.to_string());
        let bold_url = std::env::var("BLANKI_FONT_BOLD_URL")
            .unwrap_or_else(|_| DEFAULT_BOLD_URL.to_string());

        Self {
            regular: fetch_font(&agent, &regular_url),
            bold: fetch_font(&agent, &bold_url),
        }
    }
}

/// Fetch one TTF. Returns `None` on any failure, logging the degradation.
fn fetch_font(agent: &ureq::Agent, url: &str) -> Option<Vec<u8>> {
    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(e) => {
            eprintln!("font download failed ({}): {}; using built-in font", url, e);
            return None;
        }
    };

    let mut bytes = Vec::new();
    if let Err(e) = response.into_reader().read_to_end(&mut bytes) {
        eprintln!("font download failed ({}): {}; using built-in font", url, e);
        return None;
    }

    if !looks_like_ttf(&bytes) {
        eprintln!(
            "font download returned a non-font response ({}); using built-in font",
            url
        );
        return None;
    }

    println!("downloaded font {} ({} bytes)", url, bytes.len());
    Some(bytes)
}

/// Sanity check against HTML error pages served with a 200 status.
fn looks_like_ttf(bytes: &[u8]) -> bool {
    bytes.len() > 4
        && (bytes.starts_with(&[0x00, 0x01, 0x00, 0x00])
            || bytes.starts_with(b"OTTO")
            || bytes.starts_with(b"true"))
}
