//! Content manifest loader.
//!
//! A manifest lists every piece of content to register, grouped by kind. Floors and
//! room categories are written as names and resolved at registration, so a typo
//! shows up as a rejected entry instead of a parse failure.

use std::path::Path;

use content_core::{FloorId, MapColor, PosterBoard, Surface};
use serde::{Deserialize, Serialize};

use crate::asset::AssetKey;
use crate::loaders::{LoadResult, read_file};

fn default_weight() -> i64 {
    100
}

fn default_max_count() -> u32 {
    1
}

/// Resolves floor names; unknown names become the sentinel.
pub(crate) fn floors(names: &[String]) -> Vec<FloorId> {
    names.iter().map(|name| FloorId::from_name(name)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedAsset {
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub floors: Vec<String>,
    #[serde(default)]
    pub replaces: Vec<String>,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSpec {
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub floors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub floors: Vec<String>,
    #[serde(default)]
    pub shop: Option<ShopSpec>,
    #[serde(default)]
    pub mystery: bool,
    #[serde(default)]
    pub party: bool,
    #[serde(default)]
    pub field_trip: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub floors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub floors: Vec<String>,
    pub surfaces: Vec<Surface>,
    #[serde(default)]
    pub classrooms: bool,
    #[serde(default)]
    pub faculties: bool,
    #[serde(default)]
    pub rooms_only: bool,
}

/// A new room category with its first builder and look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    pub builder: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub floors: Vec<String>,
    #[serde(default)]
    pub only_halls: bool,
    #[serde(default = "default_max_count")]
    pub min_count: u32,
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    #[serde(default)]
    pub door: Option<AssetKey>,
    #[serde(default)]
    pub ceilings: Vec<WeightedAsset>,
    #[serde(default)]
    pub walls: Vec<WeightedAsset>,
    #[serde(default)]
    pub floor_textures: Vec<WeightedAsset>,
    #[serde(default)]
    pub lights: Vec<WeightedAsset>,
    #[serde(default)]
    pub map_color: MapColor,
    #[serde(default)]
    pub dark: bool,
}

/// An extra builder for existing categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomBuilderSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub categories: Vec<String>,
    pub floors: Vec<String>,
}

/// A builder appended to a room declared in [`ContentManifest::rooms`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAdditionSpec {
    pub room: String,
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
}

/// A copy of a declared room with its own floors and count range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCopySpec {
    pub room: String,
    pub floors: Vec<String>,
    pub min_count: u32,
    pub max_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallBuilderSpec {
    pub name: String,
    pub asset: AssetKey,
    pub chance: i64,
}

/// Object builder; forced when `weight` is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectBuilderSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default)]
    pub weight: Option<i64>,
    pub floors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorSpec {
    pub name: String,
    pub asset: AssetKey,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub categories: Vec<String>,
    #[serde(default)]
    pub independent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterSpec {
    pub name: String,
    pub asset: AssetKey,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub board: PosterBoard,
}

/// Content manifest structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentManifest {
    pub npcs: Vec<NpcSpec>,
    pub items: Vec<ItemSpec>,
    pub events: Vec<EventSpec>,
    pub textures: Vec<TextureSpec>,
    pub rooms: Vec<RoomSpec>,
    pub room_builders: Vec<RoomBuilderSpec>,
    pub room_additions: Vec<RoomAdditionSpec>,
    pub room_copies: Vec<RoomCopySpec>,
    pub hall_builders: Vec<HallBuilderSpec>,
    pub object_builders: Vec<ObjectBuilderSpec>,
    pub decorators: Vec<DecoratorSpec>,
    pub decorations: Vec<DecorationSpec>,
    pub posters: Vec<PosterSpec>,
}

impl ContentManifest {
    /// Number of entries across all sections.
    pub fn len(&self) -> usize {
        self.npcs.len()
            + self.items.len()
            + self.events.len()
            + self.textures.len()
            + self.rooms.len()
            + self.room_builders.len()
            + self.room_additions.len()
            + self.room_copies.len()
            + self.hall_builders.len()
            + self.object_builders.len()
            + self.decorators.len()
            + self.decorations.len()
            + self.posters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loader for content manifests from RON files.
pub struct ManifestLoader;

impl ManifestLoader {
    /// Load a content manifest from a RON file.
    pub fn load(path: &Path) -> LoadResult<ContentManifest> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContentManifest> {
        let manifest: ContentManifest = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse content manifest RON: {}", e))?;

        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_default_to_empty() {
        let manifest = ManifestLoader::parse(
            r#"(
                events: [(name: "flood", asset: "events/flood", floors: ["F2", "end"])],
            )"#,
        )
        .unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.events[0].weight, 100);
        assert_eq!(
            floors(&manifest.events[0].floors),
            vec![FloorId::F2, FloorId::End]
        );
    }

    #[test]
    fn unknown_floor_names_resolve_to_sentinel() {
        assert_eq!(floors(&["attic".to_string()]), vec![FloorId::None]);
    }

    #[test]
    fn rooms_parse_with_style() {
        let manifest = ManifestLoader::parse(
            r#"(
                rooms: [(
                    name: "bathroom",
                    builder: "bathroom_builder",
                    asset: "rooms/bathroom",
                    floors: ["F1"],
                    min_count: 1,
                    max_count: 3,
                    walls: [(asset: "textures/tiles", weight: 50)],
                    map_color: (30, 140, 200),
                )],
            )"#,
        )
        .unwrap();

        let room = &manifest.rooms[0];
        assert_eq!(room.walls[0].weight, 50);
        assert_eq!(room.map_color, MapColor(30, 140, 200));
        assert!(room.ceilings.is_empty());
        assert!(!room.only_halls);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(ManifestLoader::parse("(npcs: [(name: 3)])").is_err());
    }
}
