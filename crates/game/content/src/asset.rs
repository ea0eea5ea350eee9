//! Asset keys used as content handles.

use std::fmt;
use std::sync::Arc;

/// Name of an asset the host loads on demand, e.g. `"npc/pomp"`.
///
/// Cheap to clone; the registry clones handles on every fetch.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetKey(Arc<str>);

impl AssetKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AssetKey {
    fn from(key: String) -> Self {
        Self(Arc::from(key))
    }
}

impl PartialEq<str> for AssetKey {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for AssetKey {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
