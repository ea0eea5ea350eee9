//! Content loaders for reading registry data from files.
//!
//! This module provides loaders that convert TOML/RON files into registry
//! configuration and content manifests, and a factory that registers a manifest.

pub mod config;
pub mod factory;
pub mod manifest;

pub use config::ConfigLoader;
pub use factory::{ContentFactory, RegistrationReport, Rejection, register_manifest};
pub use manifest::{ContentManifest, ManifestLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
