//! On-disk versioned cache store
//!
//! One cache directory per version, named with the build version stamp.
//! Install populates the current version, activation purges every other
//! version, fetch is cache-first with a fallback to the bundled origin.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use super::assets;

/// Prefix shared by all cache directory names
pub const CACHE_PREFIX: &str = "mosaic-";

/// Versioned asset cache rooted at a directory
#[derive(Debug, Clone)]
pub struct AssetCache {
    root: PathBuf,
    version: String,
}

impl AssetCache {
    /// Cache for the current build, rooted under the user cache directory
    pub fn new() -> anyhow::Result<Self> {
        let root = dirs::cache_dir()
            .context("no cache directory available")?
            .join("mosaic");
        Ok(Self::with_root(root, env!("CARGO_PKG_VERSION")))
    }

    /// Cache with an explicit root and version stamp
    pub fn with_root(root: impl Into<PathBuf>, version: &str) -> Self {
        Self {
            root: root.into(),
            version: version.to_string(),
        }
    }

    /// Name of the current version's cache, e.g. `mosaic-0.3.0`
    pub fn cache_name(&self) -> String {
        format!("{}{}", CACHE_PREFIX, self.version)
    }

    fn cache_dir(&self) -> PathBuf {
        self.root.join(self.cache_name())
    }

    /// Populate the current version's cache with every bundled asset.
    ///
    /// Idempotent: an already-installed cache is overwritten in place.
    pub fn install(&self) -> anyhow::Result<()> {
        let dir = self.cache_dir();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        for name in assets::asset_names() {
            let data = assets::load(&name)
                .with_context(|| format!("bundled asset {} disappeared", name))?;
            let dest = dir.join(&name);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&dest, data)
                .with_context(|| format!("Failed to write {}", dest.display()))?;
        }

        log::info!("Installed asset cache {}", self.cache_name());
        Ok(())
    }

    /// Delete every cache version except the current one.
    ///
    /// Returns the number of stale versions purged. After activation
    /// exactly one cache (the current version) remains.
    pub fn activate(&self) -> anyhow::Result<usize> {
        let current = self.cache_name();
        let mut purged = 0;

        for name in self.versions()? {
            if name == current {
                continue;
            }
            let stale = self.root.join(&name);
            fs::remove_dir_all(&stale)
                .with_context(|| format!("Failed to purge {}", stale.display()))?;
            log::info!("Purged stale cache {}", name);
            purged += 1;
        }

        Ok(purged)
    }

    /// Serve `path` cache-first: return the cached entry when present,
    /// otherwise fall back to the bundled origin. Missing in both is an
    /// error.
    pub fn fetch(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let name = assets::entry_name(path);
        let cached = self.cache_dir().join(name);

        if let Ok(data) = fs::read(&cached) {
            log::debug!("Cache hit for {}", path);
            return Ok(data);
        }

        log::debug!("Cache miss for {}, falling back to origin", path);
        assets::load(name).with_context(|| format!("no cached or bundled entry for {}", path))
    }

    /// Names of all cache versions currently on disk
    pub fn versions(&self) -> anyhow::Result<Vec<String>> {
        let mut versions = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Ok(versions),
        };
        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to list {}", self.root.display()))?;
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(CACHE_PREFIX) {
                    versions.push(name.to_string());
                }
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Write an entry into the current version's cache directly.
    pub fn put(&self, path: &str, data: &[u8]) -> anyhow::Result<()> {
        let dest = self.cache_dir().join(assets::entry_name(path));
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dest, data).with_context(|| format!("Failed to write {}", dest.display()))
    }

    /// Remove an entry from the current version's cache, if present.
    pub fn evict(&self, path: &str) -> anyhow::Result<()> {
        let target = self.cache_dir().join(assets::entry_name(path));
        match fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to evict {}", target.display())),
        }
    }
}
