//! Room definitions.
//!
//! Two kinds of definition share one list:
//!
//! - **new rooms** introduce a custom category together with its count range, look
//!   and builders; the planner places them.
//! - **extra builders** attach builders to categories that already exist; the host
//!   level generator asks for them by category.
//!
//! The list only ever grows. A definition is mutated only to append builders, and a
//! duplicate is a clone with its own floor scope and count range.

use std::collections::HashSet;

use crate::error::{LookupError, RegistrationError, RegistryError};
use crate::floor::{FloorId, FloorSet};
use crate::ids::{RoomCategories, RoomCategoryId};
use crate::table::FetchGuard;
use crate::weighted::WeightedEntry;

/// RGB colour used for the room on the minimap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapColor(pub u8, pub u8, pub u8);

impl MapColor {
    pub const WHITE: Self = Self(255, 255, 255);
}

impl Default for MapColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Look of a new room: door, surface textures, lights and map colour.
///
/// Empty texture or light lists are allowed; the host keeps its default for that
/// surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomStyle<H> {
    pub door: Option<H>,
    pub ceilings: Vec<WeightedEntry<H>>,
    pub walls: Vec<WeightedEntry<H>>,
    pub floors: Vec<WeightedEntry<H>>,
    pub lights: Vec<WeightedEntry<H>>,
    pub map_color: MapColor,
    pub dark: bool,
}

impl<H> Default for RoomStyle<H> {
    fn default() -> Self {
        Self {
            door: None,
            ceilings: Vec::new(),
            walls: Vec::new(),
            floors: Vec::new(),
            lights: Vec::new(),
            map_color: MapColor::WHITE,
            dark: false,
        }
    }
}

/// Input for [`RoomTable::register_new_room`].
#[derive(Clone, Debug)]
pub struct NewRoom<H> {
    /// Category name; must not collide with a built-in or earlier custom category.
    pub name: String,
    /// External name of the first builder.
    pub builder_name: String,
    pub builder: H,
    pub weight: i64,
    pub floors: Vec<FloorId>,
    /// Only slots adjacent to the main hall are eligible.
    pub only_halls: bool,
    pub min_count: u32,
    pub max_count: u32,
    pub style: RoomStyle<H>,
}

/// One room definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomDefinition<H> {
    categories: Vec<RoomCategoryId>,
    min_count: u32,
    max_count: u32,
    floors: FloorSet,
    builders: Vec<WeightedEntry<H>>,
    is_new_room_type: bool,
    only_halls: bool,
    style: Option<RoomStyle<H>>,
}

impl<H> RoomDefinition<H> {
    /// Primary category. New rooms have exactly one.
    pub fn category(&self) -> RoomCategoryId {
        self.categories
            .first()
            .copied()
            .unwrap_or(RoomCategoryId::NULL)
    }

    pub fn categories(&self) -> &[RoomCategoryId] {
        &self.categories
    }

    pub fn covers(&self, category: RoomCategoryId) -> bool {
        self.categories.contains(&category)
    }

    pub fn min_count(&self) -> u32 {
        self.min_count
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn floors(&self) -> FloorSet {
        self.floors
    }

    pub fn builders(&self) -> &[WeightedEntry<H>] {
        &self.builders
    }

    pub fn is_new_room_type(&self) -> bool {
        self.is_new_room_type
    }

    pub fn only_halls(&self) -> bool {
        self.only_halls
    }

    /// Look of the room; `None` for extra-builder definitions.
    pub fn style(&self) -> Option<&RoomStyle<H>> {
        self.style.as_ref()
    }
}

/// Repairs an inverted count range the way content authors expect: `max` becomes
/// `min + 1`.
fn repair_range(room: &str, min: u32, max: u32) -> (u32, u32) {
    if max < min {
        tracing::warn!(room, min, max, "max count below min count; using min + 1");
        return (min, min.saturating_add(1));
    }
    (min, max)
}

/// All room definitions plus the category id space they use.
#[derive(Clone, Debug)]
pub struct RoomTable<H> {
    categories: RoomCategories,
    definitions: Vec<RoomDefinition<H>>,
    builder_names: HashSet<String>,
    guard: FetchGuard,
}

impl<H> RoomTable<H> {
    pub fn new() -> Self {
        Self {
            categories: RoomCategories::new(),
            definitions: Vec::new(),
            builder_names: HashSet::new(),
            guard: FetchGuard::new(),
        }
    }

    pub fn categories(&self) -> &RoomCategories {
        &self.categories
    }

    /// Every definition in registration order. Planner indices refer to this slice.
    pub fn definitions(&self) -> &[RoomDefinition<H>] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Registers a builder for existing categories.
    ///
    /// # Errors
    ///
    /// `InvalidWeight`, `EmptyFloorScope`, `DuplicateName` for a reused builder
    /// name, `UnsupportedCategory` if `categories` is empty or names the null
    /// category or an id this table never issued.
    pub fn register_room_builder(
        &mut self,
        name: &str,
        builder: H,
        weight: i64,
        categories: &[RoomCategoryId],
        floors: &[FloorId],
    ) -> Result<usize, RegistrationError> {
        let result = (|| {
            let entry = WeightedEntry::new(builder, weight)?;
            let scope = FloorSet::from_floors(floors)?;
            if self.builder_names.contains(name) {
                return Err(RegistrationError::DuplicateName(name.to_owned()));
            }
            if let Some(bad) = self.unsupported(categories) {
                return Err(RegistrationError::UnsupportedCategory(bad));
            }

            self.builder_names.insert(name.to_owned());
            self.definitions.push(RoomDefinition {
                categories: categories.to_vec(),
                min_count: 0,
                max_count: 0,
                floors: scope,
                builders: vec![entry],
                is_new_room_type: false,
                only_halls: false,
                style: None,
            });
            Ok(self.definitions.len() - 1)
        })();
        self.log_result("room_builder", name, &result);
        result
    }

    fn unsupported(&self, categories: &[RoomCategoryId]) -> Option<String> {
        if categories.is_empty() {
            return Some(RoomCategoryId::NULL.to_string());
        }
        categories
            .iter()
            .find(|id| id.is_null() || self.categories.name(**id).is_none())
            .map(|id| id.to_string())
    }

    /// Registers a new room category with its first builder.
    ///
    /// # Errors
    ///
    /// `InvalidWeight`, `EmptyFloorScope`, `DuplicateName` if either the category
    /// name or the builder name is taken. Nothing is registered on error.
    pub fn register_new_room(&mut self, room: NewRoom<H>) -> Result<RoomCategoryId, RegistrationError> {
        let name = room.name.clone();
        let result = (|| {
            let entry = WeightedEntry::new(room.builder, room.weight)?;
            let scope = FloorSet::from_floors(&room.floors)?;
            if self.builder_names.contains(&room.builder_name) {
                return Err(RegistrationError::DuplicateName(room.builder_name));
            }
            let category = self.categories.register(&room.name)?;
            let (min_count, max_count) = repair_range(&room.name, room.min_count, room.max_count);

            self.builder_names.insert(room.builder_name);
            self.definitions.push(RoomDefinition {
                categories: vec![category],
                min_count,
                max_count,
                floors: scope,
                builders: vec![entry],
                is_new_room_type: true,
                only_halls: room.only_halls,
                style: Some(room.style),
            });
            Ok(category)
        })();
        self.log_result("new_room", &name, &result);
        result
    }

    /// Appends a builder to a new room, including any duplicates of it.
    ///
    /// # Errors
    ///
    /// `InvalidWeight`, `DuplicateName` for a reused builder name, `UnknownRoom` if
    /// `room_name` is not a registered new room.
    pub fn add_builder_to_room(
        &mut self,
        room_name: &str,
        builder_name: &str,
        builder: H,
        weight: i64,
    ) -> Result<(), RegistrationError>
    where
        H: Clone,
    {
        let result = (|| {
            let entry = WeightedEntry::new(builder, weight)?;
            if self.builder_names.contains(builder_name) {
                return Err(RegistrationError::DuplicateName(builder_name.to_owned()));
            }
            let category = self.new_room_category(room_name)?;

            self.builder_names.insert(builder_name.to_owned());
            for definition in self
                .definitions
                .iter_mut()
                .filter(|definition| definition.is_new_room_type && definition.covers(category))
            {
                definition.builders.push(entry.clone());
            }
            Ok(())
        })();
        self.log_result("room_builder", builder_name, &result);
        result
    }

    /// Clones a new room with its own floor scope and count range.
    ///
    /// # Errors
    ///
    /// `EmptyFloorScope` or `UnknownRoom`.
    pub fn duplicate_room(
        &mut self,
        room_name: &str,
        floors: &[FloorId],
        min_count: u32,
        max_count: u32,
    ) -> Result<usize, RegistrationError>
    where
        H: Clone,
    {
        let result = (|| {
            let scope = FloorSet::from_floors(floors)?;
            let category = self.new_room_category(room_name)?;
            let source = self
                .definitions
                .iter()
                .find(|definition| definition.is_new_room_type && definition.covers(category))
                .ok_or_else(|| RegistrationError::UnknownRoom(room_name.to_owned()))?;

            let (min_count, max_count) = repair_range(room_name, min_count, max_count);
            let mut copy = source.clone();
            copy.floors = scope;
            copy.min_count = min_count;
            copy.max_count = max_count;
            self.definitions.push(copy);
            Ok(self.definitions.len() - 1)
        })();
        self.log_result("duplicate_room", room_name, &result);
        result
    }

    fn new_room_category(&self, room_name: &str) -> Result<RoomCategoryId, RegistrationError> {
        self.categories
            .lookup(room_name)
            .ok()
            .filter(|id| self.categories.is_custom(*id))
            .ok_or_else(|| RegistrationError::UnknownRoom(room_name.to_owned()))
    }

    fn log_result<T>(&self, kind: &'static str, name: &str, result: &Result<T, RegistrationError>) {
        match result {
            Ok(_) => tracing::debug!(table = "rooms", kind, name, "registered"),
            Err(err) => tracing::warn!(
                table = "rooms",
                kind,
                name,
                code = err.error_code(),
                "registration rejected: {err}"
            ),
        }
    }

    /// First definition covering `category`.
    pub fn get_room(&self, category: RoomCategoryId) -> Result<&RoomDefinition<H>, LookupError> {
        self.definitions
            .iter()
            .find(|definition| definition.covers(category))
            .ok_or_else(|| LookupError::NotFound(category.to_string()))
    }

    pub fn rooms_for_category(&self, category: RoomCategoryId) -> impl Iterator<Item = &RoomDefinition<H>> {
        self.definitions
            .iter()
            .filter(move |definition| definition.covers(category))
    }

    pub fn rooms_for_floor(&self, floor: FloorId) -> impl Iterator<Item = &RoomDefinition<H>> {
        self.definitions
            .iter()
            .filter(move |definition| definition.floors.contains_floor(floor))
    }

    pub fn has_room(&self, category: RoomCategoryId) -> bool {
        self.definitions.iter().any(|definition| definition.covers(category))
    }

    /// Returns true if a category called `name` exists and some definition covers it.
    pub fn has_room_named(&self, name: &str) -> bool {
        self.categories
            .lookup(name)
            .is_ok_and(|category| self.has_room(category))
    }

    pub fn is_accessed(&self, floor: FloorId) -> bool {
        self.guard.is_accessed(floor)
    }

    pub fn reset_access(&mut self) {
        self.guard.reset();
    }

    /// Fetches of `floor` answered empty because it was already consumed.
    pub fn double_fetch_count(&self, floor: FloorId) -> u32 {
        self.guard.double_fetch_count(floor)
    }

    pub fn set_double_fetch_warning(&mut self, enabled: bool) {
        self.guard.set_warning(enabled);
    }

    pub fn double_fetch_warning(&self) -> bool {
        self.guard.warns_on_double_fetch()
    }
}

impl<H: Clone> RoomTable<H> {
    /// Builders registered for an existing category (not those of new rooms).
    pub fn new_room_builders(&self, category: RoomCategoryId) -> Vec<WeightedEntry<H>> {
        self.definitions
            .iter()
            .filter(|definition| !definition.is_new_room_type && definition.covers(category))
            .flat_map(|definition| definition.builders.iter().cloned())
            .collect()
    }

    /// One-shot fetch of the definitions scoped to `floor`.
    pub fn fetch(&mut self, floor: FloorId) -> Vec<RoomDefinition<H>> {
        if !self.guard.consume("rooms", floor) {
            return Vec::new();
        }
        self.rooms_for_floor(floor).cloned().collect()
    }
}

impl<H> Default for RoomTable<H> {
    fn default() -> Self {
        Self::new()
    }
}
