//! Registry lifecycle across generated levels.

use crate::config::RegistryConfig;
use crate::floor::FloorId;
use crate::planner::{RoomAllocationPlanner, RoomAssignment, RoomSlot};
use crate::registry::ContentRegistry;
use crate::rng::RngStream;

/// A registry, its room planner and their configuration, owned by the host.
///
/// The host builds one session at startup, registers content through
/// [`registry_mut`](Self::registry_mut), then for every level calls
/// [`reset_per_level_state`](Self::reset_per_level_state) before generating.
#[derive(Clone, Debug)]
pub struct ContentSession<H> {
    config: RegistryConfig,
    registry: ContentRegistry<H>,
    planner: RoomAllocationPlanner,
}

impl<H> ContentSession<H> {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            registry: ContentRegistry::with_config(&config),
            planner: RoomAllocationPlanner::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn registry(&self) -> &ContentRegistry<H> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ContentRegistry<H> {
        &mut self.registry
    }

    pub fn planner(&self) -> &RoomAllocationPlanner {
        &self.planner
    }

    /// Clears every per-level flag and the planner cache.
    ///
    /// Must run once before each level is generated. Skipping it leaves every
    /// floor consumed, so the next level's fetches come back empty.
    pub fn reset_per_level_state(&mut self) {
        self.registry.reset_access();
        self.planner.reset();
        tracing::debug!("per-level content state reset");
    }

    /// See [`RoomAllocationPlanner::room_count`].
    pub fn room_count<R>(&mut self, floor: FloorId, mystery_active: bool, rng: &mut R) -> u32
    where
        R: RngStream + ?Sized,
    {
        self.planner
            .room_count(self.registry.rooms(), floor, mystery_active, rng)
    }

    /// See [`RoomAllocationPlanner::assign_rooms`].
    pub fn assign_rooms<R>(&mut self, floor: FloorId, slots: &mut [RoomSlot], rng: &mut R) -> Vec<RoomAssignment<H>>
    where
        H: Clone,
        R: RngStream + ?Sized,
    {
        self.planner
            .assign_rooms(self.registry.rooms(), floor, slots, rng)
    }
}

impl<H> Default for ContentSession<H> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
