//! Profile extraction: fetch a profile page and scrape its badge shelf.

use crate::dom::{Document, DomNode};
use crate::profile::{or_not_available, Badge, ProfileData, Tier, NOT_AVAILABLE};
use crate::{CardConfig, Error, Result};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Separator between the person's name and the site name in the page title.
const TITLE_SEPARATOR: &str = " - ";

const BADGE_SELECTOR: &str = ".hacker-badge";
const BADGE_TITLE_SELECTOR: &str = ".badge-title";
const BADGE_ICON_SELECTOR: &str = ".badge-icon";
const BADGE_STAR_SELECTOR: &str = ".badge-star";

/// Fetches profile pages with a shared HTTP client.
pub struct ProfileExtractor {
    client: Client,
    config: CardConfig,
}

impl ProfileExtractor {
    pub fn new(config: CardConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Fetch and scrape the profile of `username`.
    pub async fn extract(&self, username: &str) -> Result<ProfileData> {
        let url = profile_url(&self.config.profile_base_url, username)?;
        log::debug!("fetching profile {}", url);

        let mut req = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.config.user_agent.clone());
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchError(format!("{} timed out after {}ms", url, self.config.timeout_ms))
            } else {
                Error::FetchError(format!("Failed to fetch {}: {}", url, e))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::FetchError(format!(
                "User not found or request failed (HTTP {})",
                status.as_u16()
            )));
        }

        let page_url = resp.url().clone();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::FetchError(format!("Failed to read response body: {}", e)))?;

        let profile = parse_profile_at(username, &body, &page_url)?;
        log::debug!(
            "scraped {} badges for {} ({})",
            profile.badges.len(),
            profile.username,
            profile.full_name
        );
        Ok(profile)
    }
}

/// `{base}/{username}`, with the username escaped as a single path segment.
pub fn profile_url(base: &str, username: &str) -> Result<Url> {
    let mut url =
        Url::parse(base).map_err(|e| Error::ConfigError(format!("invalid profile base url {:?}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::ConfigError(format!("profile base url {:?} cannot take a path", base)))?
        .pop_if_empty()
        .push(username);
    Ok(url)
}

/// Scrape a profile page body. Fails only when the page has no usable title.
///
/// Icon URLs are kept as written; see [`parse_profile_at`] to resolve
/// relative ones.
pub fn parse_profile(username: &str, html: &str) -> Result<ProfileData> {
    scrape(username, html, None)
}

/// Like [`parse_profile`], resolving relative and protocol-relative icon URLs
/// against `page_url`.
pub fn parse_profile_at(username: &str, html: &str, page_url: &Url) -> Result<ProfileData> {
    scrape(username, html, Some(page_url))
}

fn scrape(username: &str, html: &str, page_url: Option<&Url>) -> Result<ProfileData> {
    let doc = Document::parse(html);
    let title = doc
        .title()?
        .ok_or_else(|| Error::ParseError("page has no title".into()))?;

    let full_name = full_name_from_title(&title);
    let badges = doc
        .root()
        .find_all(BADGE_SELECTOR)?
        .iter()
        .map(|b| parse_badge(b, page_url))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProfileData::new(username, full_name, badges))
}

/// First segment of `"Name - Site"`, or `"N/A"` without a separator.
pub fn full_name_from_title(title: &str) -> String {
    match title.split_once(TITLE_SEPARATOR) {
        Some((name, _)) => or_not_available(name).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn parse_badge<N: DomNode>(node: &N, page_url: Option<&Url>) -> Result<Badge> {
    let title = node
        .find_first(BADGE_TITLE_SELECTOR)?
        .map(|t| or_not_available(&t.text()).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let icon_url = node
        .find_first(BADGE_ICON_SELECTOR)?
        .and_then(|i| i.attr("href"))
        .map(|h| resolve_icon_url(or_not_available(&h), page_url))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let stars = node.find_all(BADGE_STAR_SELECTOR)?.len() as u32;

    let mut badge = Badge::new(title, icon_url, stars);
    badge.gradient_tier = tier_hint(node)?;
    Ok(badge)
}

/// Absolute form of an icon `href`. Hrefs that are already absolute, or that
/// cannot be joined onto the page URL, are returned unchanged.
pub fn resolve_icon_url(href: &str, page_url: Option<&Url>) -> String {
    if href == NOT_AVAILABLE || Url::parse(href).is_ok() {
        return href.to_string();
    }
    match page_url.map(|base| base.join(href)) {
        Some(Ok(url)) => url.into(),
        Some(Err(e)) => {
            log::debug!("icon href {:?} cannot be resolved: {}", href, e);
            href.to_string()
        }
        None => href.to_string(),
    }
}

/// First gold/silver/bronze hint in the `id`, `class` or `fill` of the badge or its descendants.
fn tier_hint<N: DomNode>(node: &N) -> Result<Tier> {
    let own = [node.attr("id"), node.attr("class"), node.attr("fill")];
    let mut hints: Vec<String> = own.into_iter().flatten().collect();
    for n in node.find_all("[id], [class], [fill]")? {
        hints.extend([n.attr("id"), n.attr("class"), n.attr("fill")].into_iter().flatten());
    }
    Ok(hints
        .iter()
        .map(|h| Tier::from_markup_hint(h))
        .find(|t| *t != Tier::Unknown)
        .unwrap_or(Tier::Unknown))
}
