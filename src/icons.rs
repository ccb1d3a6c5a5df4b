//! Badge icon downloads and the byte store that can keep them around.
//!
//! Icons are fetched concurrently; each result is written back to the badge
//! at its original index so the sorted order is never disturbed by which
//! download finished first.

use crate::profile::{Badge, NOT_AVAILABLE};
use crate::{CardConfig, Error, Result};
use futures::future::join_all;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Pluggable storage for downloaded icon bytes, keyed by [`icon_key`].
pub trait IconStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Process-local store, mostly useful in tests.
#[derive(Default)]
pub struct MemoryIconStore {
    icons: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryIconStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.icons.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IconStore for MemoryIconStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.icons.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut icons = self
            .icons
            .lock()
            .map_err(|_| Error::IconLoadError(format!("icon store lock poisoned while storing {}", key)))?;
        icons.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Stores each icon as `<dir>/<key>`.
pub struct DirIconStore {
    dir: PathBuf,
}

impl DirIconStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl IconStore for DirIconStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.path_for(key)).ok()
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        std::fs::write(self.path_for(key), bytes)?;
        Ok(())
    }
}

/// Store key for an icon URL: its file name (query and fragment stripped),
/// or a digest of the URL when the name is unusable as a file name.
pub fn icon_key(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let name = path.rsplit('/').next().unwrap_or("");
    let safe = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if safe {
        name.to_string()
    } else {
        let digest = Sha256::digest(url.as_bytes());
        hex::encode(&digest[..8])
    }
}

/// GET `url` with the configured User-Agent and timeout, returning the body.
///
/// Failures are reported as plain messages so each caller can pick its own
/// error kind.
pub(crate) async fn download(
    client: &Client,
    config: &CardConfig,
    url: &str,
) -> std::result::Result<Vec<u8>, String> {
    let resp = client
        .get(url)
        .header(USER_AGENT, config.user_agent.clone())
        .timeout(Duration::from_millis(config.timeout_ms))
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                format!("{} timed out after {}ms", url, config.timeout_ms)
            } else {
                format!("{}: {}", url, e)
            }
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(format!("{}: HTTP {}", url, status.as_u16()));
    }

    let bytes = resp.bytes().await.map_err(|e| {
        if e.is_timeout() {
            format!("{} timed out after {}ms", url, config.timeout_ms)
        } else {
            format!("{}: {}", url, e)
        }
    })?;
    Ok(bytes.to_vec())
}

/// Download a single icon, bounded by the configured timeout.
pub async fn fetch_icon(client: &Client, config: &CardConfig, url: &str) -> Result<Vec<u8>> {
    download(client, config, url).await.map_err(Error::IconLoadError)
}

/// Fill `icon_bytes` for every badge whose icon can be obtained.
///
/// Cached icons are served from `store`; fresh downloads are written to it.
/// Failures are logged and leave that badge without an icon. Returns the
/// number of badges that ended up with icon bytes.
pub async fn fetch_icons(
    client: &Client,
    config: &CardConfig,
    badges: &mut [Badge],
    store: Option<&dyn IconStore>,
) -> usize {
    let mut pending = Vec::new();
    for (i, badge) in badges.iter_mut().enumerate() {
        if !badge.has_icon_url() {
            if badge.icon_url != NOT_AVAILABLE {
                log::debug!("badge {:?}: icon {:?} is not fetchable", badge.title, badge.icon_url);
            }
            continue;
        }
        let key = icon_key(&badge.icon_url);
        if let Some(bytes) = store.and_then(|s| s.get(&key)) {
            badge.icon_bytes = Some(bytes);
            continue;
        }
        pending.push((i, key, badge.icon_url.clone()));
    }

    let results = join_all(pending.into_iter().map(|(i, key, url)| async move {
        let res = fetch_icon(client, config, &url).await;
        (i, key, res)
    }))
    .await;

    for (i, key, res) in results {
        match res {
            Ok(bytes) => {
                if let Some(s) = store {
                    if let Err(e) = s.put(&key, &bytes) {
                        log::warn!("could not store icon {}: {}", key, e);
                    }
                }
                badges[i].icon_bytes = Some(bytes);
            }
            Err(e) => log::warn!("badge {:?}: {}", badges[i].title, e),
        }
    }

    badges.iter().filter(|b| b.icon_bytes.is_some()).count()
}
