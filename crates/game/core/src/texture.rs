//! School texture metadata: which surfaces a texture covers and where it may go.

use bitflags::bitflags;

use crate::error::RegistrationError;

/// A texturable surface of a tile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Surface {
    Ceiling,
    Wall,
    Floor,
}

impl Surface {
    const fn flag(self) -> SurfaceSet {
        match self {
            Surface::Ceiling => SurfaceSet::CEILING,
            Surface::Wall => SurfaceSet::WALL,
            Surface::Floor => SurfaceSet::FLOOR,
        }
    }
}

bitflags! {
    /// Surfaces a texture may be applied to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SurfaceSet: u8 {
        const CEILING = 1 << 0;
        const WALL    = 1 << 1;
        const FLOOR   = 1 << 2;
    }
}

impl SurfaceSet {
    pub fn from_surfaces(surfaces: &[Surface]) -> Self {
        surfaces
            .iter()
            .fold(SurfaceSet::empty(), |set, surface| set | surface.flag())
    }

    #[inline]
    pub fn has(self, surface: Surface) -> bool {
        self.contains(surface.flag())
    }
}

/// Built-in room kinds a school texture can be restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoomKind {
    Classroom,
    Faculty,
}

/// Where a texture may be placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TexturePlacement {
    pub classrooms: bool,
    pub faculties: bool,
    /// Never used outside the room kinds above.
    pub rooms_only: bool,
}

impl TexturePlacement {
    pub fn allows(&self, kind: RoomKind) -> bool {
        match kind {
            RoomKind::Classroom => self.classrooms,
            RoomKind::Faculty => self.faculties,
        }
    }
}

/// Per-row metadata of the texture table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureMeta {
    surfaces: SurfaceSet,
    placement: TexturePlacement,
}

impl TextureMeta {
    /// # Errors
    ///
    /// [`RegistrationError::InvalidTextureSpec`] if no surface is given, or if the
    /// texture is rooms-only without any room kind.
    pub fn new(surfaces: &[Surface], placement: TexturePlacement) -> Result<Self, RegistrationError> {
        let surfaces = SurfaceSet::from_surfaces(surfaces);
        if surfaces.is_empty() {
            return Err(RegistrationError::InvalidTextureSpec("no surface selected"));
        }
        if placement.rooms_only && !placement.classrooms && !placement.faculties {
            return Err(RegistrationError::InvalidTextureSpec(
                "rooms-only texture is not allowed in any room kind",
            ));
        }
        Ok(Self { surfaces, placement })
    }

    pub fn surfaces(&self) -> SurfaceSet {
        self.surfaces
    }

    pub fn placement(&self) -> TexturePlacement {
        self.placement
    }

    /// Whether this texture answers a query for `surface`, optionally inside a room kind.
    pub fn matches(&self, surface: Surface, room: Option<RoomKind>) -> bool {
        if !self.surfaces.has(surface) {
            return false;
        }
        match room {
            Some(kind) => self.placement.allows(kind),
            None => !self.placement.rooms_only,
        }
    }
}
