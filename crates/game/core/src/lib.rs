//! Weighted, floor-scoped content registry for a procedural level generator.
//!
//! `content-core` stores host-supplied content handles (NPCs, items, events,
//! textures, rooms and generator hooks) with a selection weight and the floors they
//! may appear on, and serves them back one floor at a time. Each table answers a
//! floor once per level; [`ContentSession::reset_per_level_state`] re-arms it.
//!
//! Custom rooms are placed by the [`RoomAllocationPlanner`], which draws every
//! decision from a caller-supplied [`RngStream`] so that layouts reproduce from
//! the level seed.
pub mod builders;
pub mod config;
pub mod decor;
pub mod error;
pub mod floor;
pub mod ids;
pub mod planner;
pub mod registry;
pub mod rng;
pub mod room;
pub mod session;
pub mod table;
pub mod texture;
pub mod weighted;

pub use builders::{BuilderSet, DECORATABLE_CATEGORIES, HallBuilder};
pub use config::RegistryConfig;
pub use decor::{DecorSet, PosterBoard};
pub use error::{ErrorSeverity, LookupError, RegistrationError, RegistryError, SelectionError};
pub use floor::{FloorId, FloorSet};
pub use ids::{RoomCategories, RoomCategoryId};
pub use planner::{RoomAllocationPlanner, RoomAssignment, RoomSlot};
pub use registry::{
    BUILTIN_STATIC_NPCS, ContentRegistry, ItemExtras, ItemPools, NpcTraits, ShopListing, TableKind,
};
pub use rng::{PcgStream, RngStream, level_seed};
pub use room::{MapColor, NewRoom, RoomDefinition, RoomStyle, RoomTable};
pub use session::ContentSession;
pub use table::{AccessFlags, FetchGuard, FloorScopeTable, TableRow};
pub use texture::{RoomKind, Surface, SurfaceSet, TextureMeta, TexturePlacement};
pub use weighted::{WeightedEntry, WeightedSampler};
