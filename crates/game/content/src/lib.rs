//! Data-driven content for the registry.
//!
//! This crate describes registrable content in data files and feeds it into a
//! [`content_core::ContentRegistry`]:
//! - Registry configuration (data-driven via TOML)
//! - Content manifests: NPCs, items, events, textures, rooms, builders and decor
//!   (data-driven via RON)
//!
//! Handles are [`AssetKey`]s: the host resolves each key to a loaded asset.

pub mod asset;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use asset::AssetKey;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ContentManifest, ManifestLoader, RegistrationReport, Rejection,
    register_manifest,
};
