//! Open identifier space for room categories.
//!
//! Room categories form an extensible classification: the host ships a fixed set
//! and content registers more at startup. Each name is interned once to a dense
//! [`RoomCategoryId`]; every comparison afterwards is done on the id.

use std::collections::HashMap;

use crate::error::{LookupError, RegistrationError};

/// Dense id of a room category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomCategoryId(pub u16);

impl RoomCategoryId {
    /// Unclaimed slot / no category.
    pub const NULL: Self = Self(0);
    pub const HALL: Self = Self(1);
    pub const CLASS: Self = Self(2);
    pub const FACULTY: Self = Self(3);
    pub const OFFICE: Self = Self(4);
    pub const CLOSET: Self = Self(5);
    pub const TEST: Self = Self(6);
    pub const FIELD_TRIP: Self = Self(7);
    pub const MYSTERY: Self = Self(8);

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }
}

impl core::fmt::Display for RoomCategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// Built-in categories, in id order.
const BUILTIN: [&str; 9] = [
    "null",
    "hall",
    "class",
    "faculty",
    "office",
    "closet",
    "test",
    "field_trip",
    "mystery",
];

/// Interner for room category names.
#[derive(Clone, Debug)]
pub struct RoomCategories {
    names: Vec<String>,
    ids: HashMap<String, RoomCategoryId>,
}

impl RoomCategories {
    /// Creates the id space pre-seeded with the built-in categories.
    pub fn new() -> Self {
        let mut categories = Self {
            names: Vec::with_capacity(BUILTIN.len()),
            ids: HashMap::new(),
        };
        for name in BUILTIN {
            categories.push(name);
        }
        categories
    }

    fn push(&mut self, name: &str) -> RoomCategoryId {
        let id = RoomCategoryId(self.names.len() as u16);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    /// Registers a custom category.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if the name is already taken,
    /// built-in or custom.
    pub fn register(&mut self, name: &str) -> Result<RoomCategoryId, RegistrationError> {
        if self.ids.contains_key(name) {
            return Err(RegistrationError::DuplicateName(name.to_owned()));
        }
        Ok(self.push(name))
    }

    /// Resolves a category name.
    pub fn lookup(&self, name: &str) -> Result<RoomCategoryId, LookupError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::NotFound(name.to_owned()))
    }

    /// Name of a category id, if the id was issued by this space.
    pub fn name(&self, id: RoomCategoryId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// True for ids registered at runtime rather than built in.
    pub fn is_custom(&self, id: RoomCategoryId) -> bool {
        (id.0 as usize) >= BUILTIN.len() && (id.0 as usize) < self.names.len()
    }

    /// All custom category ids, in registration order.
    pub fn custom(&self) -> impl Iterator<Item = RoomCategoryId> + '_ {
        (BUILTIN.len()..self.names.len()).map(|index| RoomCategoryId(index as u16))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RoomCategories {
    fn default() -> Self {
        Self::new()
    }
}
