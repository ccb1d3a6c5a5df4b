//! badgecard
//!
//! Scrapes the public badge shelf of a HackerRank profile and renders it as a
//! shareable card, either as SVG markup or as a PNG raster.
//!
//! # Pipeline
//!
//! - [`extract::ProfileExtractor`] fetches the profile page and turns its HTML
//!   into a [`ProfileData`] record (badges sorted by stars, descending)
//! - [`icons::fetch_icons`] downloads badge icons concurrently, tolerating
//!   individual failures
//! - [`rendering::render`] lays the card out on a fixed-width canvas and
//!   serializes it
//!
//! [`CardGenerator`] wires the three together and is what the HTTP service
//! calls per request.
//!
//! # Example
//!
//! ```no_run
//! use badgecard::{CardConfig, CardGenerator, OutputFormat};
//!
//! # async fn run() -> badgecard::Result<()> {
//! let generator = CardGenerator::new(CardConfig::from_env())?;
//! let card = generator.generate("some_user", OutputFormat::Svg).await?;
//! std::fs::write("card.svg", &card.data)?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod dom;
pub mod error;
pub mod extract;
pub mod generator;
pub mod icons;
pub mod profile;
pub mod rendering;
pub mod server;

pub use error::{Error, Result};
pub use generator::CardGenerator;
pub use profile::{Badge, ProfileData, Tier};
pub use rendering::{ImageRef, LayoutConfig, OutputFormat, RenderedCard};

/// Environment variable overriding the outbound `User-Agent`.
pub const USER_AGENT_ENV: &str = "HACKERRANK_CARD_USER_AGENT";

/// User agent sent when nothing else is configured.
pub const DEFAULT_USER_AGENT: &str = "HackerRankCardApp";

/// Configuration for outbound requests made while building a card.
///
/// # Examples
///
/// ```
/// let cfg = badgecard::CardConfig::default();
/// assert_eq!(cfg.user_agent, "HackerRankCardApp");
/// ```
#[derive(Debug, Clone)]
pub struct CardConfig {
    /// User agent string sent with every request
    pub user_agent: String,
    /// Timeout for each outbound request in milliseconds
    pub timeout_ms: u64,
    /// Profile site root; the username is appended as a path segment
    pub profile_base_url: String,
    /// Extra headers for the profile request
    pub headers: HashMap<String, String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 10_000,
            profile_base_url: "https://www.hackerrank.com".to_string(),
            headers: HashMap::new(),
        }
    }
}

impl CardConfig {
    /// Defaults, with the user agent taken from `HACKERRANK_CARD_USER_AGENT` when set.
    pub fn from_env() -> Self {
        Self::default().with_user_agent_override(std::env::var(USER_AGENT_ENV).ok())
    }

    fn with_user_agent_override(mut self, ua: Option<String>) -> Self {
        if let Some(ua) = ua.filter(|s| !s.trim().is_empty()) {
            self.user_agent = ua;
        }
        self
    }
}
