//! Card rendering: layout, display list, SVG and PNG encoders

pub mod image;
pub mod layout;
pub mod paint;
pub mod raster;
pub mod svg;

pub use image::ImageRef;
pub use layout::{Layout, LayoutConfig};

use crate::profile::ProfileData;
use crate::{Error, Result};
use std::str::FromStr;

/// Encoding of the finished card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            other => Err(Error::ConfigError(format!("unsupported output format {:?}", other))),
        }
    }
}

/// A rendered card together with its pixel size and encoding.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub data: Vec<u8>,
}

impl RenderedCard {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Compose the card for `data` and encode it.
///
/// Missing names and icons degrade to placeholders; only PNG encoding can fail.
pub fn render_card(
    data: &ProfileData,
    logo: Option<&ImageRef>,
    format: OutputFormat,
    cfg: &LayoutConfig,
) -> Result<RenderedCard> {
    let layout = cfg.layout(data.badges.len());
    let cmds = paint::display_list(data, logo, cfg, &layout);
    let svg = svg::to_svg(layout.card_width, layout.card_height, &cmds, cfg);

    let bytes = match format {
        OutputFormat::Svg => svg.into_bytes(),
        OutputFormat::Png => raster::rasterize_svg(&svg, layout.card_width, layout.card_height)?,
    };

    Ok(RenderedCard {
        width: layout.card_width.ceil() as u32,
        height: layout.card_height.ceil() as u32,
        format,
        data: bytes,
    })
}

/// [`render_card`] with the default layout, returning just the bytes.
pub fn render(data: &ProfileData, logo: Option<&ImageRef>, format: OutputFormat) -> Result<Vec<u8>> {
    Ok(render_card(data, logo, format, &LayoutConfig::default())?.data)
}
