//! The content registry.
//!
//! [`ContentRegistry`] owns every floor-scoped table plus the supplemental content
//! collections. Everything is registered at startup, then read once per floor per
//! level. Handles are opaque: the registry clones them in and out and never looks
//! inside.

use bitflags::bitflags;

use crate::builders::BuilderSet;
use crate::config::RegistryConfig;
use crate::decor::DecorSet;
use crate::error::{LookupError, RegistrationError, RegistryError, SelectionError};
use crate::floor::{FloorId, FloorSet};
use crate::ids::RoomCategoryId;
use crate::room::{NewRoom, RoomTable};
use crate::table::{AccessFlags, FloorScopeTable};
use crate::texture::{RoomKind, Surface, TextureMeta, TexturePlacement};
use crate::weighted::{WeightedEntry, WeightedSampler, validate_weight};

/// Built-in characters that never move.
pub const BUILTIN_STATIC_NPCS: [&str; 2] = ["chalkles", "bully"];

/// The floor-scoped tables addressable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TableKind {
    Characters,
    Items,
    Events,
    Textures,
    Rooms,
}

/// Behaviour traits of a registered NPC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NpcTraits {
    /// Built-in characters this NPC substitutes. Non-empty marks a replacement NPC.
    pub replaces: Vec<String>,
    pub is_static: bool,
}

impl NpcTraits {
    pub fn is_replacement(&self) -> bool {
        !self.replaces.is_empty()
    }
}

bitflags! {
    /// Special item pools an item takes part in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ItemPools: u8 {
        const MYSTERY    = 1 << 0;
        const PARTY      = 1 << 1;
        const FIELD_TRIP = 1 << 2;
    }
}

/// Shop listing of an item; independent of its world spawn weight and floors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopListing {
    pub weight: i64,
    pub floors: Vec<FloorId>,
}

/// Optional item data beyond the world spawn entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemExtras {
    pub shop: Option<ShopListing>,
    pub pools: ItemPools,
}

fn log_rejected(table: &'static str, name: &str, err: &RegistrationError) {
    tracing::warn!(table, name, code = err.error_code(), "registration rejected: {err}");
}

/// Weighted, floor-scoped, one-time-consumable content registry.
#[derive(Clone, Debug)]
pub struct ContentRegistry<H> {
    characters: FloorScopeTable<H, NpcTraits>,
    items: FloorScopeTable<H, ItemPools>,
    shop: FloorScopeTable<H>,
    events: FloorScopeTable<H>,
    textures: FloorScopeTable<H, TextureMeta>,
    rooms: RoomTable<H>,
    builders: BuilderSet<H>,
    decor: DecorSet<H>,
    used_field_trip: bool,
    texture_lock: AccessFlags,
}

impl<H> ContentRegistry<H> {
    pub fn new() -> Self {
        Self {
            characters: FloorScopeTable::new("characters"),
            items: FloorScopeTable::new("items"),
            shop: FloorScopeTable::new("shop"),
            events: FloorScopeTable::new("events"),
            textures: FloorScopeTable::new("textures"),
            rooms: RoomTable::new(),
            builders: BuilderSet::new(),
            decor: DecorSet::new(),
            used_field_trip: false,
            texture_lock: AccessFlags::default(),
        }
    }

    pub fn with_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::new();
        registry.set_double_fetch_warning(config.warn_on_double_fetch);
        registry
    }

    pub fn set_double_fetch_warning(&mut self, enabled: bool) {
        self.characters.set_double_fetch_warning(enabled);
        self.items.set_double_fetch_warning(enabled);
        self.shop.set_double_fetch_warning(enabled);
        self.events.set_double_fetch_warning(enabled);
        self.textures.set_double_fetch_warning(enabled);
        self.rooms.set_double_fetch_warning(enabled);
    }

    // ===== registration =====

    pub fn register_npc(
        &mut self,
        name: &str,
        handle: H,
        weight: i64,
        floors: &[FloorId],
        traits: NpcTraits,
    ) -> Result<(), RegistrationError> {
        self.characters.register(name, handle, weight, floors, traits)?;
        Ok(())
    }

    /// Registers an item and, if listed, its shop entry.
    ///
    /// The shop listing is validated before anything is appended, so a bad listing
    /// rejects the whole item.
    pub fn register_item(
        &mut self,
        name: &str,
        handle: H,
        weight: i64,
        floors: &[FloorId],
        extras: ItemExtras,
    ) -> Result<(), RegistrationError>
    where
        H: Clone,
    {
        if let Some(shop) = &extras.shop {
            let listing = validate_weight(shop.weight).and_then(|_| FloorSet::from_floors(&shop.floors));
            if let Err(err) = listing {
                log_rejected("shop", name, &err);
                return Err(err);
            }
        }

        self.items
            .register(name, handle.clone(), weight, floors, extras.pools)?;
        if let Some(shop) = extras.shop {
            self.shop.register(name, handle, shop.weight, &shop.floors, ())?;
        }
        Ok(())
    }

    pub fn register_event(
        &mut self,
        name: &str,
        handle: H,
        weight: i64,
        floors: &[FloorId],
    ) -> Result<(), RegistrationError> {
        self.events.register(name, handle, weight, floors, ())?;
        Ok(())
    }

    pub fn register_texture(
        &mut self,
        name: &str,
        handle: H,
        weight: i64,
        floors: &[FloorId],
        surfaces: &[Surface],
        placement: TexturePlacement,
    ) -> Result<(), RegistrationError> {
        let meta = TextureMeta::new(surfaces, placement).inspect_err(|err| log_rejected("textures", name, err))?;
        self.textures.register(name, handle, weight, floors, meta)?;
        Ok(())
    }

    pub fn register_new_room(&mut self, room: NewRoom<H>) -> Result<RoomCategoryId, RegistrationError> {
        self.rooms.register_new_room(room)
    }

    pub fn register_room_builder(
        &mut self,
        name: &str,
        builder: H,
        weight: i64,
        categories: &[RoomCategoryId],
        floors: &[FloorId],
    ) -> Result<(), RegistrationError> {
        self.rooms
            .register_room_builder(name, builder, weight, categories, floors)?;
        Ok(())
    }

    pub fn register_room_decorator(
        &mut self,
        name: &str,
        handle: H,
        categories: &[RoomCategoryId],
    ) -> Result<(), RegistrationError> {
        self.builders
            .register_decorator(name, handle, categories, self.rooms.categories())
    }

    pub fn register_hall_builder(&mut self, name: &str, handle: H, chance: i64) -> Result<(), RegistrationError> {
        self.builders.register_hall_builder(name, handle, chance)
    }

    /// Registers an object builder. Without a weight it is forced onto every level
    /// of its floors.
    pub fn register_object_builder(
        &mut self,
        name: &str,
        handle: H,
        weight: Option<i64>,
        floors: &[FloorId],
    ) -> Result<(), RegistrationError> {
        match weight {
            Some(weight) => self
                .builders
                .register_object_builder(name, handle, weight, floors),
            None => self
                .builders
                .register_forced_object_builder(name, handle, floors),
        }
    }

    pub fn register_decoration(
        &mut self,
        name: &str,
        prefab: H,
        weight: i64,
        categories: &[RoomCategoryId],
        independent: bool,
    ) -> Result<(), RegistrationError> {
        self.decor
            .register_decoration(name, prefab, weight, categories, independent)
    }

    // ===== typed accessors =====

    pub fn characters(&self) -> &FloorScopeTable<H, NpcTraits> {
        &self.characters
    }

    pub fn items(&self) -> &FloorScopeTable<H, ItemPools> {
        &self.items
    }

    pub fn events(&self) -> &FloorScopeTable<H> {
        &self.events
    }

    pub fn textures(&self) -> &FloorScopeTable<H, TextureMeta> {
        &self.textures
    }

    pub fn rooms(&self) -> &RoomTable<H> {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut RoomTable<H> {
        &mut self.rooms
    }

    pub fn builders(&self) -> &BuilderSet<H> {
        &self.builders
    }

    pub fn decor(&self) -> &DecorSet<H> {
        &self.decor
    }

    pub fn decor_mut(&mut self) -> &mut DecorSet<H> {
        &mut self.decor
    }

    /// Resolves a room category by name, built-in or custom.
    pub fn room_category(&self, name: &str) -> Result<RoomCategoryId, LookupError> {
        self.rooms.categories().lookup(name)
    }

    // ===== lookups =====

    pub fn has_entry(&self, table: TableKind, name: &str) -> bool {
        match table {
            TableKind::Characters => self.characters.has(name),
            TableKind::Items => self.items.has(name),
            TableKind::Events => self.events.has(name),
            TableKind::Textures => self.textures.has(name),
            TableKind::Rooms => self.rooms.has_room_named(name),
        }
    }

    /// Handle registered under `name`. For rooms this is the first builder of the
    /// named room.
    pub fn get_entry(&self, table: TableKind, name: &str) -> Result<&H, LookupError> {
        match table {
            TableKind::Characters => self.characters.get(name),
            TableKind::Items => self.items.get(name),
            TableKind::Events => self.events.get(name),
            TableKind::Textures => self.textures.get(name),
            TableKind::Rooms => self
                .room_category(name)
                .ok()
                .and_then(|category| self.rooms.get_room(category).ok())
                .and_then(|room| room.builders().first())
                .map(|entry| &entry.handle)
                .ok_or_else(|| LookupError::NotFound(name.to_owned())),
        }
    }

    /// Returns true for the built-in static characters and for registered NPCs
    /// flagged static.
    pub fn is_npc_static(&self, name: &str) -> bool {
        BUILTIN_STATIC_NPCS
            .iter()
            .any(|builtin| builtin.eq_ignore_ascii_case(name))
            || self
                .characters
                .row(name)
                .is_ok_and(|row| row.meta.is_static)
    }

    /// Built-in characters the named NPC replaces.
    pub fn replaced_characters(&self, name: &str) -> Result<&[String], LookupError> {
        self.characters.row(name).map(|row| row.meta.replaces.as_slice())
    }

    // ===== texture lock =====

    /// Marks the texture queries of `floor` as consumed for this level.
    pub fn lock_texture_floor(&mut self, floor: FloorId) {
        self.texture_lock.mark(floor);
    }

    pub fn has_locked_texture_floor(&self, floor: FloorId) -> bool {
        self.texture_lock.is_set(floor)
    }

    // ===== lifecycle =====

    /// Clears every per-level flag: table access flags, the shop flags, the
    /// field-trip flag and the texture lock.
    pub fn reset_access(&mut self) {
        self.characters.reset_access();
        self.items.reset_access();
        self.shop.reset_access();
        self.events.reset_access();
        self.textures.reset_access();
        self.rooms.reset_access();
        self.used_field_trip = false;
        self.texture_lock.clear();
    }
}

impl<H: Clone> ContentRegistry<H> {
    // ===== per-level reads =====

    /// One-shot fetch of `table` for `floor`.
    ///
    /// The character table yields only non-replacement NPCs; the room table yields
    /// the builders of every room definition scoped to `floor`.
    pub fn fetch(&mut self, table: TableKind, floor: FloorId) -> Vec<WeightedEntry<H>> {
        match table {
            TableKind::Characters => self
                .characters
                .fetch_where(floor, |traits| !traits.is_replacement()),
            TableKind::Items => self.items.fetch(floor),
            TableKind::Events => self.events.fetch(floor),
            TableKind::Textures => self.textures.fetch(floor),
            TableKind::Rooms => self
                .rooms
                .fetch(floor)
                .into_iter()
                .flat_map(|room| room.builders().to_vec())
                .collect(),
        }
    }

    /// Replacement NPCs for `floor`. Reads no flag and sets none.
    pub fn fetch_replacements(&self, floor: FloorId) -> Vec<WeightedEntry<H>> {
        self.characters
            .peek_where(floor, NpcTraits::is_replacement)
    }

    /// One-shot fetch of the shop listing for `floor`.
    pub fn fetch_shop_items(&mut self, floor: FloorId) -> Vec<WeightedEntry<H>> {
        self.shop.fetch(floor)
    }

    /// Every registered item, all floors.
    pub fn global_items(&self) -> Vec<WeightedEntry<H>> {
        self.items.all_entries()
    }

    /// A registered item picked from the thread RNG.
    pub fn random_item(&self) -> Result<H, SelectionError> {
        WeightedSampler::random(&self.global_items()).cloned()
    }

    fn pool(&self, pool: ItemPools) -> Vec<WeightedEntry<H>> {
        self.items
            .rows()
            .filter(|row| row.meta.contains(pool))
            .map(|row| row.entry.clone())
            .collect()
    }

    pub fn mystery_items(&self) -> Vec<WeightedEntry<H>> {
        self.pool(ItemPools::MYSTERY)
    }

    pub fn party_items(&self) -> Vec<WeightedEntry<H>> {
        self.pool(ItemPools::PARTY)
    }

    /// Field-trip items. Answers once per level; empty until the next reset.
    pub fn field_trip_items(&mut self) -> Vec<WeightedEntry<H>> {
        if core::mem::replace(&mut self.used_field_trip, true) {
            return Vec::new();
        }
        self.pool(ItemPools::FIELD_TRIP)
    }

    /// School textures for a surface on `floor`.
    ///
    /// With a room kind, textures allowed in that room kind; without, textures that
    /// are not rooms-only. Empty once the floor's textures are locked.
    pub fn school_textures(&self, floor: FloorId, surface: Surface, room: Option<RoomKind>) -> Vec<WeightedEntry<H>> {
        if self.texture_lock.is_set(floor) {
            return Vec::new();
        }
        self.textures
            .peek_where(floor, |meta| meta.matches(surface, room))
    }

    pub fn add_builder_to_room(
        &mut self,
        room_name: &str,
        builder_name: &str,
        builder: H,
        weight: i64,
    ) -> Result<(), RegistrationError> {
        self.rooms
            .add_builder_to_room(room_name, builder_name, builder, weight)
    }

    pub fn duplicate_room(
        &mut self,
        room_name: &str,
        floors: &[FloorId],
        min_count: u32,
        max_count: u32,
    ) -> Result<(), RegistrationError> {
        self.rooms
            .duplicate_room(room_name, floors, min_count, max_count)?;
        Ok(())
    }
}

impl<H> Default for ContentRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
