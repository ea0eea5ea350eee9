//! Hall builders, object builders and room decorators.
//!
//! These are host-side generator hooks; the registry only stores the handles and
//! answers which ones apply to a floor or a room category. They are read freely,
//! without one-shot flags.

use std::collections::HashSet;

use crate::error::{RegistrationError, RegistryError};
use crate::floor::{FloorId, FloorSet};
use crate::ids::{RoomCategories, RoomCategoryId};
use crate::table::FloorScopeTable;
use crate::weighted::WeightedEntry;

/// Categories a room decorator may run in.
pub const DECORATABLE_CATEGORIES: [RoomCategoryId; 3] = [
    RoomCategoryId::CLASS,
    RoomCategoryId::OFFICE,
    RoomCategoryId::FACULTY,
];

/// A hall builder with its percentage chance to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HallBuilder<H> {
    pub handle: H,
    chance: u8,
}

impl<H> HallBuilder<H> {
    /// Chance in percent, `1..=100`.
    pub fn chance(&self) -> u8 {
        self.chance
    }
}

#[derive(Clone, Debug)]
struct ForcedBuilder<H> {
    handle: H,
    floors: FloorSet,
}

#[derive(Clone, Debug)]
struct Decorator<H> {
    name: String,
    handle: H,
    categories: Vec<RoomCategoryId>,
}

/// Every generator hook that is not a room builder.
#[derive(Clone, Debug)]
pub struct BuilderSet<H> {
    names: HashSet<String>,
    hall: Vec<HallBuilder<H>>,
    forced: Vec<ForcedBuilder<H>>,
    random: FloorScopeTable<H>,
    decorators: Vec<Decorator<H>>,
}

impl<H> BuilderSet<H> {
    pub fn new() -> Self {
        Self {
            names: HashSet::new(),
            hall: Vec::new(),
            forced: Vec::new(),
            random: FloorScopeTable::new("object_builders"),
            decorators: Vec::new(),
        }
    }

    fn claim(&mut self, name: &str) -> Result<(), RegistrationError> {
        if !self.names.insert(name.to_owned()) {
            return Err(RegistrationError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    fn log_rejected(kind: &'static str, name: &str, err: &RegistrationError) {
        tracing::warn!(
            table = "builders",
            kind,
            name,
            code = err.error_code(),
            "registration rejected: {err}"
        );
    }

    /// Registers a hall builder. `chance` is a percentage in `1..=100`.
    pub fn register_hall_builder(&mut self, name: &str, handle: H, chance: i64) -> Result<(), RegistrationError> {
        let result = if !(1..=100).contains(&chance) {
            Err(RegistrationError::InvalidWeight { weight: chance })
        } else {
            self.claim(name).map(|()| {
                self.hall.push(HallBuilder {
                    handle,
                    chance: chance as u8,
                });
            })
        };
        if let Err(err) = &result {
            Self::log_rejected("hall", name, err);
        }
        result
    }

    /// Registers an object builder that always runs on its floors.
    pub fn register_forced_object_builder(
        &mut self,
        name: &str,
        handle: H,
        floors: &[FloorId],
    ) -> Result<(), RegistrationError> {
        let result = FloorSet::from_floors(floors).and_then(|floors| {
            self.claim(name)?;
            self.forced.push(ForcedBuilder { handle, floors });
            Ok(())
        });
        if let Err(err) = &result {
            Self::log_rejected("forced_object", name, err);
        }
        result
    }

    /// Registers a weighted object builder.
    pub fn register_object_builder(
        &mut self,
        name: &str,
        handle: H,
        weight: i64,
        floors: &[FloorId],
    ) -> Result<(), RegistrationError> {
        if self.names.contains(name) {
            let err = RegistrationError::DuplicateName(name.to_owned());
            Self::log_rejected("object", name, &err);
            return Err(err);
        }
        self.random.register(name, handle, weight, floors, ())?;
        self.names.insert(name.to_owned());
        Ok(())
    }

    /// Registers a decorator run after the builders of the given categories.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UnsupportedCategory`] unless every category is one of
    /// [`DECORATABLE_CATEGORIES`].
    pub fn register_decorator(
        &mut self,
        name: &str,
        handle: H,
        categories: &[RoomCategoryId],
        known: &RoomCategories,
    ) -> Result<(), RegistrationError> {
        let unsupported = categories
            .iter()
            .find(|id| !DECORATABLE_CATEGORIES.contains(*id))
            .map(|id| known.name(*id).map_or_else(|| id.to_string(), str::to_owned));

        let result = match unsupported {
            Some(category) => Err(RegistrationError::UnsupportedCategory(category)),
            None if categories.is_empty() => Err(RegistrationError::UnsupportedCategory(
                RoomCategoryId::NULL.to_string(),
            )),
            None => self.claim(name).map(|()| {
                self.decorators.push(Decorator {
                    name: name.to_owned(),
                    handle,
                    categories: categories.to_vec(),
                });
            }),
        };
        if let Err(err) = &result {
            Self::log_rejected("decorator", name, err);
        }
        result
    }

    pub fn standard_hall_builders(&self) -> &[HallBuilder<H>] {
        &self.hall
    }
}

impl<H: Clone> BuilderSet<H> {
    pub fn forced_object_builders(&self, floor: FloorId) -> Vec<H> {
        self.forced
            .iter()
            .filter(|builder| builder.floors.contains_floor(floor))
            .map(|builder| builder.handle.clone())
            .collect()
    }

    pub fn object_builders(&self, floor: FloorId) -> Vec<WeightedEntry<H>> {
        self.random.peek_where(floor, |_| true)
    }

    /// Decorators for `category`, in registration order, with their names.
    pub fn decorators_for(&self, category: RoomCategoryId) -> Vec<(&str, H)> {
        self.decorators
            .iter()
            .filter(|decorator| decorator.categories.contains(&category))
            .map(|decorator| (decorator.name.as_str(), decorator.handle.clone()))
            .collect()
    }
}

impl<H> Default for BuilderSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hall_chance_is_a_percentage() {
        let mut set = BuilderSet::new();
        assert_eq!(
            set.register_hall_builder("lockers", "lockers", 101),
            Err(RegistrationError::InvalidWeight { weight: 101 })
        );
        assert_eq!(
            set.register_hall_builder("lockers", "lockers", 0),
            Err(RegistrationError::InvalidWeight { weight: 0 })
        );
        set.register_hall_builder("lockers", "lockers", 35).unwrap();
        assert_eq!(set.standard_hall_builders()[0].chance(), 35);
    }

    #[test]
    fn object_builders_by_floor() {
        let mut set = BuilderSet::new();
        set.register_forced_object_builder("bells", "bells", &FloorId::ALL).unwrap();
        set.register_object_builder("vents", "vents", 85, &[FloorId::F2, FloorId::F3, FloorId::End])
            .unwrap();

        assert_eq!(set.forced_object_builders(FloorId::F1), vec!["bells"]);
        assert!(set.object_builders(FloorId::F1).is_empty());
        assert_eq!(set.object_builders(FloorId::F2).len(), 1);
        // Not one-shot.
        assert_eq!(set.object_builders(FloorId::F2).len(), 1);
        assert_eq!(
            set.register_forced_object_builder("vents", "vents", &[FloorId::F1]),
            Err(RegistrationError::DuplicateName("vents".into()))
        );
    }

    #[test]
    fn decorators_only_for_builtin_rooms() {
        let known = RoomCategories::new();
        let mut set = BuilderSet::new();
        set.register_decorator(
            "clocks",
            "clocks",
            &[RoomCategoryId::CLASS, RoomCategoryId::OFFICE],
            &known,
        )
        .unwrap();
        assert_eq!(
            set.register_decorator("x", "x", &[RoomCategoryId::HALL], &known),
            Err(RegistrationError::UnsupportedCategory("hall".into()))
        );

        assert_eq!(set.decorators_for(RoomCategoryId::OFFICE), vec![("clocks", "clocks")]);
        assert!(set.decorators_for(RoomCategoryId::FACULTY).is_empty());
    }
}
