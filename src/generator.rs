//! End-to-end card generation for one username

use crate::extract::ProfileExtractor;
use crate::icons::{download, fetch_icons, IconStore};
use crate::rendering::image::sniff_mime;
use crate::rendering::{render_card, ImageRef, LayoutConfig, OutputFormat, RenderedCard};
use crate::{CardConfig, ProfileData, Result};
use std::sync::Arc;

/// Extracts a profile, downloads its icons and renders the card.
///
/// Holds only immutable configuration and a shared HTTP client, so one
/// generator can serve any number of concurrent requests.
pub struct CardGenerator {
    extractor: ProfileExtractor,
    layout: LayoutConfig,
    logo: Option<ImageRef>,
    icon_store: Option<Arc<dyn IconStore>>,
    fetch_icons: bool,
}

impl CardGenerator {
    pub fn new(config: CardConfig) -> Result<Self> {
        Ok(Self {
            extractor: ProfileExtractor::new(config)?,
            layout: LayoutConfig::default(),
            logo: None,
            icon_store: None,
            fetch_icons: true,
        })
    }

    pub fn with_logo(mut self, logo: Option<ImageRef>) -> Self {
        self.logo = logo;
        self
    }

    /// Resolve a logo given as a file path or an `http(s)` URL.
    ///
    /// Remote logos are downloaded once, with the same User-Agent and timeout
    /// as profile fetches, so they survive PNG rasterization. A failed or
    /// unrecognized download falls back to linking the URL, which only SVG
    /// viewers will follow. An unreadable file yields no logo.
    pub async fn load_logo(&self, spec: &str) -> Option<ImageRef> {
        let logo = match ImageRef::load(spec) {
            Ok(logo) => logo,
            Err(e) => {
                log::warn!("logo {} unavailable, rendering without it: {}", spec, e);
                return None;
            }
        };
        let url = match logo {
            ImageRef::Href(url) => url,
            local => return Some(local),
        };

        let fetched = download(self.extractor.client(), self.extractor.config(), &url).await;
        match fetched {
            Ok(bytes) if sniff_mime(&bytes).is_some() => {
                log::debug!("logo {} downloaded ({} bytes)", url, bytes.len());
                Some(ImageRef::Bytes(bytes))
            }
            Ok(_) => {
                log::warn!("logo {} is not a recognized image, linking it instead", url);
                Some(ImageRef::Href(url))
            }
            Err(e) => {
                log::warn!("logo download failed, linking it instead: {}", e);
                Some(ImageRef::Href(url))
            }
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_icon_store(mut self, store: Arc<dyn IconStore>) -> Self {
        self.icon_store = Some(store);
        self
    }

    /// Skip icon downloads entirely; badges are drawn without icons.
    pub fn without_icons(mut self) -> Self {
        self.fetch_icons = false;
        self
    }

    /// Scrape `username` and fill in badge icons.
    pub async fn profile(&self, username: &str) -> Result<ProfileData> {
        let mut data = self.extractor.extract(username).await?;
        if self.fetch_icons && !data.badges.is_empty() {
            let loaded = fetch_icons(
                self.extractor.client(),
                self.extractor.config(),
                &mut data.badges,
                self.icon_store.as_deref(),
            )
            .await;
            log::debug!("{}/{} badge icons loaded for {}", loaded, data.badges.len(), username);
        }
        Ok(data)
    }

    pub async fn generate(&self, username: &str, format: OutputFormat) -> Result<RenderedCard> {
        let data = self.profile(username).await?;
        render_card(&data, self.logo.as_ref(), format, &self.layout)
    }
}
