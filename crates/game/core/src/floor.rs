//! Floor identifiers and floor scopes.
//!
//! Floors are the discrete progression stages of a run. Every piece of registered
//! content carries a [`FloorSet`] naming the floors it may appear on.

use bitflags::bitflags;

use crate::error::RegistrationError;

/// A level-progression stage.
///
/// `None` is a reserved sentinel: it is what unknown floor names parse to and it is
/// never accepted inside a registered floor scope.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum FloorId {
    /// Reserved sentinel, never valid in a scope.
    #[default]
    #[strum(serialize = "NONE")]
    #[cfg_attr(feature = "serde", serde(rename = "NONE"))]
    None,
    F1,
    F2,
    F3,
    /// Endless mode.
    #[strum(serialize = "END")]
    #[cfg_attr(feature = "serde", serde(rename = "END"))]
    End,
}

impl FloorId {
    /// Number of real (non-sentinel) floors.
    pub const COUNT: usize = 4;

    /// All real floors in progression order.
    pub const ALL: [FloorId; Self::COUNT] = [FloorId::F1, FloorId::F2, FloorId::F3, FloorId::End];

    /// Resolves a floor name, case-insensitively.
    ///
    /// Unknown names resolve to [`FloorId::None`] rather than failing, so that a bad
    /// name surfaces as an `EmptyFloorScope` rejection at registration.
    pub fn from_name(name: &str) -> Self {
        name.trim().parse().unwrap_or(FloorId::None)
    }

    /// Dense index of a real floor, `None` for the sentinel.
    #[inline]
    pub const fn index(self) -> Option<usize> {
        match self {
            FloorId::None => None,
            FloorId::F1 => Some(0),
            FloorId::F2 => Some(1),
            FloorId::F3 => Some(2),
            FloorId::End => Some(3),
        }
    }

    #[inline]
    pub const fn is_sentinel(self) -> bool {
        matches!(self, FloorId::None)
    }

    const fn flag(self) -> FloorSet {
        match self {
            FloorId::None => FloorSet::empty(),
            FloorId::F1 => FloorSet::F1,
            FloorId::F2 => FloorSet::F2,
            FloorId::F3 => FloorSet::F3,
            FloorId::End => FloorSet::END,
        }
    }
}

bitflags! {
    /// Set of floors a registered entry is eligible for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FloorSet: u8 {
        const F1  = 1 << 0;
        const F2  = 1 << 1;
        const F3  = 1 << 2;
        const END = 1 << 3;
    }
}

impl FloorSet {
    /// Builds a validated scope from a floor list.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::EmptyFloorScope`] if `floors` is empty or contains
    /// [`FloorId::None`].
    pub fn from_floors(floors: &[FloorId]) -> Result<Self, RegistrationError> {
        if floors.is_empty() || floors.iter().any(|floor| floor.is_sentinel()) {
            return Err(RegistrationError::EmptyFloorScope);
        }
        Ok(floors.iter().fold(FloorSet::empty(), |set, floor| set | floor.flag()))
    }

    /// Every real floor except the given ones.
    pub fn all_except(exceptions: &[FloorId]) -> Self {
        exceptions
            .iter()
            .fold(FloorSet::all(), |set, floor| set - floor.flag())
    }

    /// Returns true if `floor` is a real floor inside this scope.
    #[inline]
    pub fn contains_floor(self, floor: FloorId) -> bool {
        !floor.is_sentinel() && self.contains(floor.flag())
    }

    /// Iterates the floors of this scope in progression order.
    pub fn floors(self) -> impl Iterator<Item = FloorId> {
        FloorId::ALL
            .into_iter()
            .filter(move |floor| self.contains_floor(*floor))
    }
}

impl From<FloorId> for FloorSet {
    fn from(floor: FloorId) -> Self {
        floor.flag()
    }
}

impl core::fmt::Display for FloorSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        f.write_str("{")?;
        for floor in self.floors() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{floor}")?;
            first = false;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_floor_names_case_insensitively() {
        assert_eq!(FloorId::from_name("f1"), FloorId::F1);
        assert_eq!(FloorId::from_name("F3"), FloorId::F3);
        assert_eq!(FloorId::from_name("end"), FloorId::End);
        assert_eq!(FloorId::from_name("END"), FloorId::End);
        assert_eq!(FloorId::from_name("basement"), FloorId::None);
    }

    #[test]
    fn rejects_empty_and_sentinel_scopes() {
        assert_eq!(
            FloorSet::from_floors(&[]),
            Err(RegistrationError::EmptyFloorScope)
        );
        assert_eq!(
            FloorSet::from_floors(&[FloorId::F1, FloorId::None]),
            Err(RegistrationError::EmptyFloorScope)
        );
    }

    #[test]
    fn scope_membership_includes_endless() {
        let scope = FloorSet::from_floors(&[FloorId::F2, FloorId::End]).unwrap();
        assert!(scope.contains_floor(FloorId::F2));
        assert!(scope.contains_floor(FloorId::End));
        assert!(!scope.contains_floor(FloorId::F1));
        assert!(!scope.contains_floor(FloorId::None));
        assert_eq!(scope.to_string(), "{F2, END}");
    }

    #[test]
    fn all_except_removes_floors() {
        let scope = FloorSet::all_except(&[FloorId::F1]);
        assert_eq!(
            scope.floors().collect::<Vec<_>>(),
            vec![FloorId::F2, FloorId::F3, FloorId::End]
        );
    }
}
