use std::collections::HashMap;
use std::path::PathBuf;

use crate::assets::decode::decode_image_file;
use crate::assets::texture::Texture;
use crate::foundation::error::{StampError, StampResult};

/// Source of decoded textures, addressed by a relative asset path.
///
/// Implementations run on loader worker threads and must not touch render state.
pub trait AssetProvider: Send + Sync {
    /// Load and decode the texture at `path`.
    fn load_texture(&self, path: &str) -> StampResult<Texture>;
}

/// Loads image files from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsAssetProvider {
    root: PathBuf,
}

impl FsAssetProvider {
    /// Provider rooted at `root`; all requested paths resolve beneath it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Resolve a relative asset path against the root.
    pub fn resolve(&self, path: &str) -> StampResult<PathBuf> {
        let rel = normalize_rel_path(path)?;
        Ok(self.root.join(rel))
    }
}

impl AssetProvider for FsAssetProvider {
    #[tracing::instrument(skip(self))]
    fn load_texture(&self, path: &str) -> StampResult<Texture> {
        let full = self.resolve(path)?;
        decode_image_file(&full)
    }
}

/// Provider backed by a fixed map of textures, for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAssetProvider {
    textures: HashMap<String, Texture>,
}

impl InMemoryAssetProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `texture` under `path` (normalized).
    pub fn insert(&mut self, path: &str, texture: Texture) -> StampResult<()> {
        self.textures.insert(normalize_rel_path(path)?, texture);
        Ok(())
    }
}

impl AssetProvider for InMemoryAssetProvider {
    fn load_texture(&self, path: &str) -> StampResult<Texture> {
        let key = normalize_rel_path(path)?;
        self.textures
            .get(&key)
            .cloned()
            .ok_or_else(|| StampError::asset(format!("no texture registered at '{key}'")))
    }
}

/// Normalize and validate an asset path relative to a provider root.
///
/// Backslashes become `/`, empty and `.` segments are dropped. Rooted paths, drive or URL
/// prefixes (`C:/`, `file:`) and parent traversals (`..`) are rejected so the result always stays
/// beneath the root it is joined onto.
pub fn normalize_rel_path(source: &str) -> StampResult<String> {
    let unified = source.replace('\\', "/");
    if unified.trim().is_empty() {
        return Err(StampError::validation("asset path must be non-empty"));
    }
    if unified.starts_with('/') {
        return Err(StampError::validation(format!(
            "asset path '{source}' must be relative"
        )));
    }

    let segments: Vec<&str> = unified
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect();
    if let Some(first) = segments.first()
        && first.contains(':')
    {
        return Err(StampError::validation(format!(
            "asset path '{source}' must not carry a drive or scheme prefix"
        )));
    }
    if segments.contains(&"..") {
        return Err(StampError::validation(format!(
            "asset path '{source}' must not contain '..'"
        )));
    }
    if segments.is_empty() {
        return Err(StampError::validation(format!(
            "asset path '{source}' has no file name"
        )));
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/provider.rs"]
mod tests;
