//! Tag suggestion heuristics.
//!
//! Everything here is advisory: the classifiers propose tags for a moderator
//! to confirm, they never mutate a submission. Inputs that cannot be decoded
//! simply produce no tag, so a broken preview image degrades the suggestion
//! list instead of failing the request.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

pub const TAG_THEME: &str = "theme";
pub const TAG_SNIPPET: &str = "snippet";
pub const TAG_DARK: &str = "dark";
pub const TAG_LIGHT: &str = "light";

/// Classify base64-transported CSS as a full theme or a small snippet.
///
/// Returns `None` when the payload is not valid base64.
pub fn classify_content(encoded: &str) -> Option<&'static str> {
    let bytes = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let css = String::from_utf8_lossy(&bytes);
    Some(classify_css(&css))
}

/// The content rule itself: an `@import` directive or a body longer than
/// 500 characters reads as a theme, anything smaller as a snippet. Coarse
/// on purpose; no CSS grammar is consulted.
pub fn classify_css(css: &str) -> &'static str {
    if css.contains("@import") || css.len() > 500 {
        TAG_THEME
    } else {
        TAG_SNIPPET
    }
}

/// Classify preview image bytes as dark or light by mean channel value.
///
/// The mean is taken over R, G and B of every pixel on the 0-255 scale;
/// below 128 counts as dark. Undecodable bytes yield `None`.
pub fn classify_image(bytes: &[u8]) -> Option<&'static str> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let rgb = decoded.to_rgb8();

    let samples = (rgb.width() as u64) * (rgb.height() as u64) * 3;
    if samples == 0 {
        return None;
    }

    let total: u64 = rgb
        .pixels()
        .map(|p| p.0[0] as u64 + p.0[1] as u64 + p.0[2] as u64)
        .sum();
    let mean = total as f64 / samples as f64;

    Some(if mean < 128.0 { TAG_DARK } else { TAG_LIGHT })
}

/// Extract the raw bytes of a base64 `data:` URL, e.g.
/// `data:image/png;base64,iVBOR...`. Non-base64 data URLs carry no usable
/// image payload and yield `None`.
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    BASE64_STANDARD.decode(payload).ok()
}

/// Deduplicate tags while keeping first-seen order.
///
/// Shared by the suggestion union and by approve-time tag normalization, so
/// both surfaces agree on what a clean tag list looks like.
pub fn dedup_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.iter().any(|existing: &String| existing == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}
