//! Seeded placement of custom rooms into a level's room slots.
//!
//! The host level generator pre-allocates generic room slots, asks the planner how
//! many custom rooms it needs, then hands the slots over for assignment. Every draw
//! comes from the level's controlled stream in a fixed order, so the layout is a
//! pure function of the registered definitions, the slots, the floor and the seed.
//!
//! # Draw order
//!
//! 1. One count per in-scope new-room definition, in registration order.
//! 2. Per definition with a non-zero count, per placed room: slot pick, ceiling,
//!    wall, floor texture, light, builder.
//!
//! Empty texture and light lists draw nothing.
//!
//! Slots are handed out once per level: a second [`RoomAllocationPlanner::assign_rooms`]
//! for the same floor returns nothing and draws nothing.

use crate::config::RegistryConfig;
use crate::floor::FloorId;
use crate::ids::RoomCategoryId;
use crate::rng::RngStream;
use crate::room::{MapColor, RoomDefinition, RoomTable};
use crate::weighted::{WeightedEntry, WeightedSampler};

/// A room slot pre-allocated by the host level generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomSlot {
    /// [`RoomCategoryId::NULL`] while unclaimed.
    pub category: RoomCategoryId,
    pub adjacent_to_main_hall: bool,
}

impl RoomSlot {
    pub const fn unclaimed(adjacent_to_main_hall: bool) -> Self {
        Self {
            category: RoomCategoryId::NULL,
            adjacent_to_main_hall,
        }
    }

    pub fn is_unclaimed(&self) -> bool {
        self.category.is_null()
    }
}

/// One slot handed to a custom room, with everything the host needs to build it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomAssignment<H> {
    /// Index into the slot slice passed to [`RoomAllocationPlanner::assign_rooms`].
    pub slot: usize,
    /// Index into [`RoomTable::definitions`].
    pub definition: usize,
    pub category: RoomCategoryId,
    pub door: Option<H>,
    pub ceiling: Option<H>,
    pub wall: Option<H>,
    pub floor: Option<H>,
    pub light: Option<H>,
    pub builder: H,
    pub map_color: MapColor,
    pub dark: bool,
}

#[derive(Clone, Debug)]
struct LevelCounts {
    floor: FloorId,
    counts: Vec<u32>,
    total: u32,
    assigned: bool,
}

/// Per-level room planner. Counts are drawn once and cached until [`reset`].
///
/// [`reset`]: RoomAllocationPlanner::reset
#[derive(Clone, Debug)]
pub struct RoomAllocationPlanner {
    mystery_room_bonus: u32,
    debug_mode: bool,
    cache: Option<LevelCounts>,
}

impl RoomAllocationPlanner {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            mystery_room_bonus: config.mystery_room_bonus,
            debug_mode: config.debug_mode,
            cache: None,
        }
    }

    /// Total number of custom rooms the level needs.
    ///
    /// The first call of a level draws one count per in-scope new-room definition
    /// and caches them; later calls return the cached total and consume nothing.
    pub fn room_count<H, R>(
        &mut self,
        rooms: &RoomTable<H>,
        floor: FloorId,
        mystery_active: bool,
        rng: &mut R,
    ) -> u32
    where
        R: RngStream + ?Sized,
    {
        if let Some(cache) = self.cache.as_ref().filter(|cache| cache.floor == floor) {
            return cache.total;
        }

        let counts: Vec<u32> = rooms
            .definitions()
            .iter()
            .map(|definition| {
                if definition.is_new_room_type() && definition.floors().contains_floor(floor) {
                    rng.range_inclusive(definition.min_count(), definition.max_count())
                } else {
                    0
                }
            })
            .collect();

        let bonus = if mystery_active { self.mystery_room_bonus } else { 0 };
        let total = counts
            .iter()
            .fold(bonus, |total, &count| total.saturating_add(count));
        if self.debug_mode {
            tracing::info!(%floor, ?counts, mystery_active, total, "drew custom room counts");
        } else {
            tracing::debug!(%floor, total, "drew custom room counts");
        }

        self.cache = Some(LevelCounts {
            floor,
            counts,
            total,
            assigned: false,
        });
        total
    }

    /// Cached per-definition counts, if drawn.
    pub fn counts(&self) -> Option<&[u32]> {
        self.cache.as_ref().map(|cache| cache.counts.as_slice())
    }

    /// Claims slots for every new-room definition with a non-zero count.
    ///
    /// Slots are claimed in place by setting their category. Draws the counts first
    /// if [`room_count`](Self::room_count) was not called for this floor. Runs once
    /// per level; later calls for the same floor return an empty list until
    /// [`reset`](Self::reset).
    pub fn assign_rooms<H, R>(
        &mut self,
        rooms: &RoomTable<H>,
        floor: FloorId,
        slots: &mut [RoomSlot],
        rng: &mut R,
    ) -> Vec<RoomAssignment<H>>
    where
        H: Clone,
        R: RngStream + ?Sized,
    {
        self.room_count(rooms, floor, false, rng);
        let Some(cache) = self.cache.as_mut() else {
            return Vec::new();
        };
        if cache.assigned {
            tracing::warn!(%floor, "custom rooms already assigned this level; assigning nothing");
            return Vec::new();
        }
        cache.assigned = true;
        let counts = cache.counts.clone();

        let mut assignments = Vec::new();
        for (index, definition) in rooms.definitions().iter().enumerate() {
            let count = counts.get(index).copied().unwrap_or(0);
            if !definition.is_new_room_type() || count == 0 {
                continue;
            }
            if definition.builders().is_empty() {
                tracing::warn!(definition = index, "room definition has no builder; skipping");
                continue;
            }

            let mut pool: Vec<usize> = slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| {
                    slot.is_unclaimed() && (!definition.only_halls() || slot.adjacent_to_main_hall)
                })
                .map(|(slot, _)| slot)
                .collect();

            for _ in 0..count {
                if pool.is_empty() {
                    tracing::debug!(definition = index, "no free slot left");
                    break;
                }
                let pick = rng.below(pool.len() as u32) as usize;
                let slot = pool.remove(pick);
                slots[slot].category = definition.category();

                if let Some(assignment) = Self::dress(index, slot, definition, rng) {
                    assignments.push(assignment);
                }
            }
        }

        tracing::debug!(%floor, placed = assignments.len(), "assigned custom rooms");
        assignments
    }

    fn dress<H, R>(
        definition_index: usize,
        slot: usize,
        definition: &RoomDefinition<H>,
        rng: &mut R,
    ) -> Option<RoomAssignment<H>>
    where
        H: Clone,
        R: RngStream + ?Sized,
    {
        let pick = |entries: &[WeightedEntry<H>], rng: &mut R| {
            WeightedSampler::controlled(entries, rng).ok().cloned()
        };

        let style = definition.style();
        let empty: &[WeightedEntry<H>] = &[];
        let ceiling = pick(style.map_or(empty, |s| s.ceilings.as_slice()), &mut *rng);
        let wall = pick(style.map_or(empty, |s| s.walls.as_slice()), &mut *rng);
        let floor = pick(style.map_or(empty, |s| s.floors.as_slice()), &mut *rng);
        let light = pick(style.map_or(empty, |s| s.lights.as_slice()), &mut *rng);
        let builder = pick(definition.builders(), &mut *rng)?;

        Some(RoomAssignment {
            slot,
            definition: definition_index,
            category: definition.category(),
            door: style.and_then(|s| s.door.clone()),
            ceiling,
            wall,
            floor,
            light,
            builder,
            map_color: style.map_or(MapColor::WHITE, |s| s.map_color),
            dark: style.is_some_and(|s| s.dark),
        })
    }

    /// Forgets the cached counts. Called between levels.
    pub fn reset(&mut self) {
        self.cache = None;
    }
}

impl Default for RoomAllocationPlanner {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}
