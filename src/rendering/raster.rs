//! PNG output: rasterize the composed SVG with resvg

use crate::{Error, Result};
#[cfg(feature = "raster")]
use std::sync::{Arc, OnceLock};

/// Upper bound on either canvas dimension.
const MAX_DIM: u32 = 16_384;

#[cfg(feature = "raster")]
static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

#[cfg(feature = "raster")]
fn system_fonts() -> Arc<usvg::fontdb::Database> {
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} font faces for rasterization", db.len());
            Arc::new(db)
        })
        .clone()
}

fn to_px(v: f64) -> Result<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(Error::RenderError(format!("invalid canvas dimension {}", v)));
    }
    let px = v.ceil() as u64;
    if px > MAX_DIM as u64 {
        return Err(Error::RenderError(format!("canvas dimension {} exceeds {}", px, MAX_DIM)));
    }
    Ok(px as u32)
}

/// Rasterize an SVG document to PNG bytes at 1:1 scale.
#[cfg(feature = "raster")]
pub fn rasterize_svg(svg: &str, width: f64, height: f64) -> Result<Vec<u8>> {
    let (w, h) = (to_px(width)?, to_px(height)?);

    let opts = usvg::Options {
        fontdb: system_fonts(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| Error::RenderError(format!("failed to parse card svg: {}", e)))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| Error::RenderError("failed to allocate card pixmap".into()))?;
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| Error::RenderError(format!("failed to encode png: {}", e)))
}

#[cfg(not(feature = "raster"))]
pub fn rasterize_svg(_svg: &str, width: f64, height: f64) -> Result<Vec<u8>> {
    to_px(width)?;
    to_px(height)?;
    Err(Error::RenderError(
        "PNG output requires the `raster` feature".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(to_px(0.0), Err(Error::RenderError(_))));
        assert!(matches!(to_px(f64::NAN), Err(Error::RenderError(_))));
        assert!(matches!(to_px(20_000.0), Err(Error::RenderError(_))));
        assert_eq!(to_px(349.2).unwrap(), 350);
    }

    #[cfg(feature = "raster")]
    #[test]
    fn rasterizes_to_png() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="16" viewBox="0 0 32 16"><rect width="32" height="16" fill="#00ab41"/></svg>"##;
        let png = rasterize_svg(svg, 32.0, 16.0).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[cfg(feature = "raster")]
    #[test]
    fn malformed_svg_is_render_error() {
        assert!(matches!(rasterize_svg("<svg", 10.0, 10.0), Err(Error::RenderError(_))));
    }
}
