//! Content factory for building a registry session from data files.

use std::fmt;
use std::path::{Path, PathBuf};

use content_core::{
    ContentRegistry, ContentSession, ItemExtras, ItemPools, NewRoom, NpcTraits, RegistryConfig,
    RoomCategoryId, RoomStyle, ShopListing, TexturePlacement, WeightedEntry,
};

use crate::asset::AssetKey;
use crate::loaders::manifest::{WeightedAsset, floors};
use crate::loaders::{ConfigLoader, ContentManifest, LoadResult, ManifestLoader};

/// One manifest entry the registry refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub section: &'static str,
    pub name: String,
    pub reason: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.section, self.name, self.reason)
    }
}

/// Outcome of registering a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
}

impl RegistrationReport {
    fn record<E: fmt::Display>(&mut self, section: &'static str, name: &str, result: Result<(), E>) {
        match result {
            Ok(()) => self.accepted += 1,
            Err(err) => self.rejected.push(Rejection {
                section,
                name: name.to_owned(),
                reason: err.to_string(),
            }),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

fn weighted_list(assets: &[WeightedAsset]) -> Result<Vec<WeightedEntry<AssetKey>>, content_core::RegistrationError> {
    assets
        .iter()
        .map(|asset| WeightedEntry::new(asset.asset.clone(), asset.weight))
        .collect()
}

fn categories(
    registry: &ContentRegistry<AssetKey>,
    names: &[String],
) -> Result<Vec<RoomCategoryId>, content_core::LookupError> {
    names.iter().map(|name| registry.room_category(name)).collect()
}

/// Registers every entry of `manifest`, section by section.
///
/// Rooms are registered before anything that names a room category, so manifest
/// entries may refer to rooms declared in the same file. A rejected entry is
/// recorded and skipped; the rest of the manifest still registers.
pub fn register_manifest(
    manifest: &ContentManifest,
    registry: &mut ContentRegistry<AssetKey>,
) -> RegistrationReport {
    let mut report = RegistrationReport::default();

    for npc in &manifest.npcs {
        let traits = NpcTraits {
            replaces: npc.replaces.clone(),
            is_static: npc.is_static,
        };
        let result = registry.register_npc(&npc.name, npc.asset.clone(), npc.weight, &floors(&npc.floors), traits);
        report.record("npcs", &npc.name, result);
    }

    for item in &manifest.items {
        let mut pools = ItemPools::empty();
        pools.set(ItemPools::MYSTERY, item.mystery);
        pools.set(ItemPools::PARTY, item.party);
        pools.set(ItemPools::FIELD_TRIP, item.field_trip);
        let extras = ItemExtras {
            shop: item.shop.as_ref().map(|shop| ShopListing {
                weight: shop.weight,
                floors: floors(&shop.floors),
            }),
            pools,
        };
        let result = registry.register_item(&item.name, item.asset.clone(), item.weight, &floors(&item.floors), extras);
        report.record("items", &item.name, result);
    }

    for event in &manifest.events {
        let result = registry.register_event(&event.name, event.asset.clone(), event.weight, &floors(&event.floors));
        report.record("events", &event.name, result);
    }

    for texture in &manifest.textures {
        let placement = TexturePlacement {
            classrooms: texture.classrooms,
            faculties: texture.faculties,
            rooms_only: texture.rooms_only,
        };
        let result = registry.register_texture(
            &texture.name,
            texture.asset.clone(),
            texture.weight,
            &floors(&texture.floors),
            &texture.surfaces,
            placement,
        );
        report.record("textures", &texture.name, result);
    }

    for room in &manifest.rooms {
        let result = (|| {
            let style = RoomStyle {
                door: room.door.clone(),
                ceilings: weighted_list(&room.ceilings)?,
                walls: weighted_list(&room.walls)?,
                floors: weighted_list(&room.floor_textures)?,
                lights: weighted_list(&room.lights)?,
                map_color: room.map_color,
                dark: room.dark,
            };
            registry
                .register_new_room(NewRoom {
                    name: room.name.clone(),
                    builder_name: room.builder.clone(),
                    builder: room.asset.clone(),
                    weight: room.weight,
                    floors: floors(&room.floors),
                    only_halls: room.only_halls,
                    min_count: room.min_count,
                    max_count: room.max_count,
                    style,
                })
                .map(|_| ())
        })();
        report.record("rooms", &room.name, result);
    }

    for builder in &manifest.room_builders {
        let result = categories(registry, &builder.categories)
            .map_err(|err| err.to_string())
            .and_then(|ids| {
                registry
                    .register_room_builder(&builder.name, builder.asset.clone(), builder.weight, &ids, &floors(&builder.floors))
                    .map_err(|err| err.to_string())
            });
        report.record("room_builders", &builder.name, result);
    }

    for addition in &manifest.room_additions {
        let result = registry.add_builder_to_room(&addition.room, &addition.name, addition.asset.clone(), addition.weight);
        report.record("room_additions", &addition.name, result);
    }

    for copy in &manifest.room_copies {
        let result = registry.duplicate_room(&copy.room, &floors(&copy.floors), copy.min_count, copy.max_count);
        report.record("room_copies", &copy.room, result);
    }

    for hall in &manifest.hall_builders {
        let result = registry.register_hall_builder(&hall.name, hall.asset.clone(), hall.chance);
        report.record("hall_builders", &hall.name, result);
    }

    for builder in &manifest.object_builders {
        let result = registry.register_object_builder(&builder.name, builder.asset.clone(), builder.weight, &floors(&builder.floors));
        report.record("object_builders", &builder.name, result);
    }

    for decorator in &manifest.decorators {
        let result = categories(registry, &decorator.categories)
            .map_err(|err| err.to_string())
            .and_then(|ids| {
                registry
                    .register_room_decorator(&decorator.name, decorator.asset.clone(), &ids)
                    .map_err(|err| err.to_string())
            });
        report.record("decorators", &decorator.name, result);
    }

    for decoration in &manifest.decorations {
        let result = categories(registry, &decoration.categories)
            .map_err(|err| err.to_string())
            .and_then(|ids| {
                registry
                    .register_decoration(
                        &decoration.name,
                        decoration.asset.clone(),
                        decoration.weight,
                        &ids,
                        decoration.independent,
                    )
                    .map_err(|err| err.to_string())
            });
        report.record("decorations", &decoration.name, result);
    }

    for poster in &manifest.posters {
        let result = registry
            .decor_mut()
            .register_poster(&poster.name, poster.asset.clone(), poster.weight, poster.board);
        report.record("posters", &poster.name, result);
    }

    for rejection in &report.rejected {
        tracing::warn!(section = rejection.section, name = %rejection.name, "skipped: {}", rejection.reason);
    }
    tracing::info!(
        accepted = report.accepted,
        rejected = report.rejected.len(),
        "content manifest registered"
    );
    report
}

/// Content factory that loads registry content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml   (optional)
/// └── content.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load registry configuration from `config.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<RegistryConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Ok(RegistryConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the content manifest from `content.ron`.
    pub fn load_manifest(&self) -> LoadResult<ContentManifest> {
        let path = self.data_dir.join("content.ron");
        ManifestLoader::load(&path)
    }

    /// Builds a session from the data directory and registers the manifest.
    pub fn build_session(&self) -> LoadResult<(ContentSession<AssetKey>, RegistrationReport)> {
        let config = self.load_config()?;
        let manifest = self.load_manifest()?;

        let mut session = ContentSession::new(config);
        let report = register_manifest(&manifest, session.registry_mut());
        Ok((session, report))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
