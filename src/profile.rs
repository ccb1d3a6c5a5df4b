//! Profile data produced by extraction and consumed by rendering

use serde::Serialize;

/// Placeholder shown for any text field the page did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Badge colour tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
    Unknown,
}

impl Tier {
    /// Tier implied by a star rating: gold from 5 stars, silver from 3, bronze below.
    pub fn from_stars(stars: u32) -> Self {
        match stars {
            5.. => Tier::Gold,
            3..=4 => Tier::Silver,
            _ => Tier::Bronze,
        }
    }

    /// Tier hinted by an id/class/fill string, matched case-insensitively.
    pub fn from_markup_hint(hint: &str) -> Self {
        let hint = hint.to_ascii_lowercase();
        if hint.contains("gold") {
            Tier::Gold
        } else if hint.contains("silver") {
            Tier::Silver
        } else if hint.contains("bronze") {
            Tier::Bronze
        } else {
            Tier::Unknown
        }
    }
}

/// A single achievement badge scraped from a profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub title: String,
    pub icon_url: String,
    pub gradient_tier: Tier,
    pub stars: u32,
    /// Raw icon bytes, filled in by the icon fetcher when the download succeeded
    #[serde(skip)]
    pub icon_bytes: Option<Vec<u8>>,
}

impl Badge {
    pub fn new(title: impl Into<String>, icon_url: impl Into<String>, stars: u32) -> Self {
        Self {
            title: title.into(),
            icon_url: icon_url.into(),
            gradient_tier: Tier::Unknown,
            stars,
            icon_bytes: None,
        }
    }

    /// Whether `icon_url` points somewhere fetchable.
    pub fn has_icon_url(&self) -> bool {
        self.icon_url.starts_with("http://") || self.icon_url.starts_with("https://")
    }
}

/// Everything the card shows about one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileData {
    pub username: String,
    pub full_name: String,
    pub badges: Vec<Badge>,
}

impl ProfileData {
    /// Build a profile, ordering badges by descending stars.
    pub fn new(username: impl Into<String>, full_name: impl Into<String>, mut badges: Vec<Badge>) -> Self {
        sort_badges(&mut badges);
        Self {
            username: username.into(),
            full_name: full_name.into(),
            badges,
        }
    }
}

/// Sort badges by descending star count, keeping document order on ties.
pub fn sort_badges(badges: &mut [Badge]) {
    // `sort_by` is stable
    badges.sort_by(|a, b| b.stars.cmp(&a.stars));
}

/// Substitute [`NOT_AVAILABLE`] for blank text.
pub fn or_not_available(s: &str) -> &str {
    let t = s.trim();
    if t.is_empty() {
        NOT_AVAILABLE
    } else {
        t
    }
}
