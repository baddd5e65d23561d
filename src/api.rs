//! PokeAPI client with an on-disk response cache

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::state::Puzzle;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    species: NamedResource,
    sprites: PokemonSprites,
}

/// `/pokemon/{id}` names the default form (`deoxys-normal`); the species
/// carries the creature's name.
#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSprites {
    front_default: Option<String>,
}

impl From<PokemonResponse> for Puzzle {
    fn from(response: PokemonResponse) -> Self {
        Puzzle {
            id: response.id,
            name: response.species.name.to_lowercase(),
            image_url: response.sprites.front_default,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PokeApi {
    base: String,
    cache_root: Option<PathBuf>,
}

impl PokeApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            cache_root: Some(default_cache_root()),
        }
    }

    pub fn without_cache(mut self) -> Self {
        self.cache_root = None;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetch the creature with this national dex number.
    pub async fn fetch_puzzle(&self, id: u16) -> Result<Puzzle, ApiError> {
        let url = format!("{}/pokemon/{id}", self.base);
        let response: PokemonResponse = self.fetch_json(&url).await?;
        Ok(response.into())
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let cache_path = self.cache_path(url);
        if let Some(path) = &cache_path {
            if let Some(bytes) = read_cache(path).await {
                tracing::debug!(url, "cache hit");
                return Ok(bytes);
            }
        }

        tracing::debug!(url, "GET");
        let response = http_client().get(url).send().await?;
        let bytes = response.error_for_status()?.bytes().await?.to_vec();
        if let Some(path) = &cache_path {
            write_cache(path, &bytes).await;
        }
        Ok(bytes)
    }

    /// Drop the cached body for `url`, e.g. after it failed to decode.
    pub async fn evict(&self, url: &str) {
        if let Some(path) = self.cache_path(url) {
            if fs::remove_file(&path).await.is_ok() {
                tracing::debug!(url, "cache entry evicted");
            }
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let bytes = self.fetch_bytes(url).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.evict(url).await;
                Err(err.into())
            }
        }
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let root = self.cache_root.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Some(root.join("http").join(digest))
    }
}

impl Default for PokeApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn default_cache_root() -> PathBuf {
    let base = dirs_next::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("whosthat")
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    let tmp = path.with_extension("tmp");
    if fs::write(&tmp, bytes).await.is_err() {
        let _ = fs::remove_file(&tmp).await;
        return;
    }
    if fs::rename(&tmp, path).await.is_err() {
        let _ = fs::remove_file(&tmp).await;
    }
}
