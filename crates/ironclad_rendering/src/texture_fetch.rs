//! HTTP flag fetcher (`http` feature).
//!
//! Each fetch runs on its own short-lived worker thread: blocking GET,
//! PNG decode, then the completion callback. The frame thread only pays
//! for spawning the worker.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::blocking::Client;
use tracing::warn;

use crate::error::{TextureError, TextureResult};
use crate::texture_cache::{FetchCallback, Texture, TextureFetcher};

/// Fetches textures over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpTextureFetcher {
    client: Client,
}

impl HttpTextureFetcher {
    /// Creates a fetcher with a 10 s request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Network`] if the TLS backend cannot start.
    pub fn new() -> TextureResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("ironclad-renderer/0.1")
            .build()
            .map_err(|e| TextureError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    fn download(client: &Client, url: &str) -> TextureResult<Texture> {
        let bytes = client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::bytes)
            .map_err(|e| TextureError::Network(e.to_string()))?;
        let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .map_err(|e| TextureError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Texture {
            width,
            height,
            pixels: image.into_raw(),
        })
    }
}

impl TextureFetcher for HttpTextureFetcher {
    fn fetch(&self, key: &str, url: &str, done: FetchCallback) {
        if reqwest::Url::parse(url).is_err() {
            done(Err(TextureError::InvalidKey(key.to_owned())));
            return;
        }
        let client = self.client.clone();
        let url = url.to_owned();
        // Shared so a failed spawn can still complete the fetch.
        let slot = Arc::new(Mutex::new(Some(done)));
        let worker_slot = Arc::clone(&slot);
        let spawned = thread::Builder::new().name(format!("flag-{key}")).spawn(move || {
            let result = Self::download(&client, &url);
            if let Some(done) = worker_slot.lock().take() {
                done(result);
            }
        });
        if let Err(e) = spawned {
            warn!(key = %key, error = %e, "could not spawn texture worker");
            if let Some(done) = slot.lock().take() {
                done(Err(TextureError::Network(e.to_string())));
            }
        }
    }
}
