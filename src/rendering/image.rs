//! Image references for the logo and badge icons.

use crate::profile::Badge;
use crate::{Error, Result};
use base64::Engine as _;
use image::ImageFormat;
use std::path::Path;

/// An image handed to the renderer: either a link used as-is or raw bytes
/// that get embedded into the card.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRef {
    Href(String),
    Bytes(Vec<u8>),
}

impl ImageRef {
    /// `http(s)` URLs are kept as links, anything else is read from disk.
    pub fn load(spec: &str) -> Result<Self> {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            return Ok(ImageRef::Href(spec.to_string()));
        }
        let bytes = std::fs::read(Path::new(spec))?;
        Ok(ImageRef::Bytes(bytes))
    }

    /// Value for an `href` attribute, or `None` when the bytes are not a known image format.
    pub fn href(&self) -> Option<String> {
        match self {
            ImageRef::Href(h) if !h.trim().is_empty() => Some(h.clone()),
            ImageRef::Href(_) => None,
            ImageRef::Bytes(b) => data_uri(b),
        }
    }
}

/// MIME type of an encoded image, judged from its content.
///
/// Raster formats come from the magic-byte table in `image`; only the ones an
/// SVG `<image>` can reliably carry are accepted. Markup is SVG when it opens
/// with a tag and contains an `<svg` element anywhere, so long prologs and
/// comments are fine.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return match format {
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP => {
                Some(format.to_mime_type())
            }
            _ => None,
        };
    }

    let text = std::str::from_utf8(bytes).ok()?;
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with('<') && text.contains("<svg") {
        return Some("image/svg+xml");
    }
    None
}

/// `data:` URI embedding `bytes`.
pub fn data_uri(bytes: &[u8]) -> Option<String> {
    let mime = sniff_mime(bytes)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Some(format!("data:{};base64,{}", mime, encoded))
}

/// Embeddable icon for a badge. Only downloaded bytes are used, so a failed
/// download leaves the icon area blank rather than linking a dead URL.
pub fn load_icon(badge: &Badge) -> Result<String> {
    let bytes = badge
        .icon_bytes
        .as_deref()
        .ok_or_else(|| Error::IconLoadError(format!("no icon downloaded for {:?}", badge.title)))?;
    data_uri(bytes).ok_or_else(|| {
        Error::IconLoadError(format!("unrecognized image format for {:?}", badge.title))
    })
}
