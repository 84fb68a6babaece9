//! # Texture Cache
//!
//! Memoized, asynchronous fetch of flag overlays keyed by country code.
//!
//! ```text
//!  frame N: get_or_start_fetch("de") ─┬─ loaded?  ──> Some(texture)
//!                                     ├─ pending? ──> None (skip overlay)
//!                                     └─ neither  ──> mark pending, fetch, None
//!
//!  any thread: on_loaded("de", Ok)  ──> loaded["de"] = texture (write-once)
//!              on_loaded("de", Err) ──> pending -= "de" (next request retries)
//! ```
//!
//! ## Invariants
//!
//! - At most one fetch in flight per key.
//! - A loaded entry is never replaced or refetched.
//! - The frame never blocks: a texture that is not loaded is skipped.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{TextureError, TextureResult};

/// Default flag source; `{key}` is replaced by the normalized key.
pub const DEFAULT_URL_TEMPLATE: &str = "https://flagcdn.com/w80/{key}.png";

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Single-color texture.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self { width, height, pixels }
    }

    /// Width over height, or 1 for an empty texture.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Completion callback handed to a fetcher. May be invoked from any thread,
/// including synchronously from inside [`TextureFetcher::fetch`].
pub type FetchCallback = Box<dyn FnOnce(TextureResult<Texture>) + Send + 'static>;

/// Starts a fetch and reports completion through the callback.
pub trait TextureFetcher: Send + Sync {
    /// Begins loading `url` for `key`. Must not block the caller on I/O.
    fn fetch(&self, key: &str, url: &str, done: FetchCallback);
}

/// Fetcher serving a fixed in-memory set, completing synchronously.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    textures: HashMap<String, Texture>,
}

impl StaticFetcher {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a texture for `key`.
    #[must_use]
    pub fn with(mut self, key: &str, texture: Texture) -> Self {
        self.textures.insert(key.to_ascii_lowercase(), texture);
        self
    }
}

impl TextureFetcher for StaticFetcher {
    fn fetch(&self, key: &str, _url: &str, done: FetchCallback) {
        let result = self
            .textures
            .get(key)
            .cloned()
            .ok_or_else(|| TextureError::NotFound(key.to_owned()));
        done(result);
    }
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureCacheStats {
    /// Entries in the loaded map.
    pub loaded: usize,
    /// Fetches in flight.
    pub pending: usize,
    /// Fetches started over the cache lifetime.
    pub fetches_started: u64,
    /// Failed fetches over the cache lifetime.
    pub failures: u64,
}

#[derive(Default)]
struct CacheState {
    loaded: HashMap<String, Arc<Texture>>,
    pending: HashSet<String>,
    fetches_started: u64,
    failures: u64,
}

struct Inner {
    fetcher: Arc<dyn TextureFetcher>,
    url_template: String,
    state: Mutex<CacheState>,
}

/// Owned flag texture cache. Cloning shares the same cache.
#[derive(Clone)]
pub struct TextureCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureCache")
            .field("url_template", &self.inner.url_template)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Lowercases `key` and rejects anything but ASCII alphanumerics, `-`, `_`.
fn normalize_key(key: &str) -> Option<String> {
    let key = key.trim();
    let valid = !key.is_empty()
        && key.len() <= 32
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    valid.then(|| key.to_ascii_lowercase())
}

impl TextureCache {
    /// Creates a cache over the default flag source.
    #[must_use]
    pub fn new(fetcher: Arc<dyn TextureFetcher>) -> Self {
        Self::with_source(fetcher, DEFAULT_URL_TEMPLATE)
    }

    /// Creates a cache with a custom URL template.
    #[must_use]
    pub fn with_source(fetcher: Arc<dyn TextureFetcher>, url_template: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                url_template: url_template.to_owned(),
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Returns the cached texture, starting a fetch on first request.
    ///
    /// Never blocks. Returns `None` while the texture is loading, after a
    /// failure (until the next call restarts the fetch), or for a key that
    /// cannot form a URL.
    pub fn get_or_start_fetch(&self, key: &str) -> Option<Arc<Texture>> {
        let key = normalize_key(key)?;
        {
            let mut state = self.inner.state.lock();
            if let Some(texture) = state.loaded.get(&key) {
                return Some(Arc::clone(texture));
            }
            if !state.pending.insert(key.clone()) {
                return None;
            }
            state.fetches_started += 1;
        }

        // Lock released: a synchronous fetcher re-enters through on_loaded.
        let url = self.inner.url_template.replace("{key}", &key);
        debug!(key = %key, url = %url, "texture fetch started");
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let callback_key = key.clone();
        let done: FetchCallback = Box::new(move |result| {
            if let Some(inner) = weak.upgrade() {
                TextureCache { inner }.on_loaded(&callback_key, result);
            }
        });
        self.inner.fetcher.fetch(&key, &url, done);

        let state = self.inner.state.lock();
        state.loaded.get(&key).map(Arc::clone)
    }

    /// Completes a fetch. The first successful load for a key wins.
    pub fn on_loaded(&self, key: &str, result: TextureResult<Texture>) {
        let Some(key) = normalize_key(key) else {
            return;
        };
        let mut state = self.inner.state.lock();
        state.pending.remove(&key);
        match result {
            Ok(texture) => {
                state
                    .loaded
                    .entry(key)
                    .or_insert_with(|| Arc::new(texture));
            }
            Err(err) => {
                state.failures += 1;
                debug!(key = %key, error = %err, "texture fetch failed");
            }
        }
    }

    /// Snapshot of the cache counters.
    #[must_use]
    pub fn stats(&self) -> TextureCacheStats {
        let state = self.inner.state.lock();
        TextureCacheStats {
            loaded: state.loaded.len(),
            pending: state.pending.len(),
            fetches_started: state.fetches_started,
            failures: state.failures,
        }
    }
}
