//! Decorative props and posters.

use crate::error::{RegistrationError, RegistryError};
use crate::ids::RoomCategoryId;
use crate::weighted::WeightedEntry;

/// Where a poster hangs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PosterBoard {
    Hallway,
    Chalkboard,
}

#[derive(Clone, Debug)]
struct Decoration<H> {
    name: String,
    prefab: WeightedEntry<H>,
    categories: Vec<RoomCategoryId>,
    independent: bool,
}

#[derive(Clone, Debug)]
struct Poster<H> {
    name: String,
    entry: WeightedEntry<H>,
    board: PosterBoard,
}

/// Decorations and posters.
#[derive(Clone, Debug)]
pub struct DecorSet<H> {
    decorations: Vec<Decoration<H>>,
    posters: Vec<Poster<H>>,
}

impl<H> DecorSet<H> {
    pub fn new() -> Self {
        Self {
            decorations: Vec::new(),
            posters: Vec::new(),
        }
    }

    /// Registers a decoration prop for the given room categories.
    ///
    /// A prop with no category could never be placed and is rejected.
    ///
    /// `independent` props are placed by themselves instead of with the room's
    /// standard furniture.
    pub fn register_decoration(
        &mut self,
        name: &str,
        prefab: H,
        weight: i64,
        categories: &[RoomCategoryId],
        independent: bool,
    ) -> Result<(), RegistrationError> {
        let result = WeightedEntry::new(prefab, weight).and_then(|prefab| {
            if categories.is_empty() {
                return Err(RegistrationError::UnsupportedCategory(RoomCategoryId::NULL.to_string()));
            }
            if self.decorations.iter().any(|decoration| decoration.name == name) {
                return Err(RegistrationError::DuplicateName(name.to_owned()));
            }
            self.decorations.push(Decoration {
                name: name.to_owned(),
                prefab,
                categories: categories.to_vec(),
                independent,
            });
            Ok(())
        });
        if let Err(err) = &result {
            tracing::warn!(table = "decorations", name, code = err.error_code(), "registration rejected: {err}");
        }
        result
    }

    pub fn register_poster(&mut self, name: &str, poster: H, weight: i64, board: PosterBoard) -> Result<(), RegistrationError> {
        let result = WeightedEntry::new(poster, weight).and_then(|entry| {
            if self.posters.iter().any(|poster| poster.name == name) {
                return Err(RegistrationError::DuplicateName(name.to_owned()));
            }
            self.posters.push(Poster {
                name: name.to_owned(),
                entry,
                board,
            });
            Ok(())
        });
        if let Err(err) = &result {
            tracing::warn!(table = "posters", name, code = err.error_code(), "registration rejected: {err}");
        }
        result
    }

    fn matching(&self, category: RoomCategoryId, independent: bool) -> impl Iterator<Item = &Decoration<H>> {
        self.decorations.iter().filter(move |decoration| {
            decoration.independent == independent && decoration.categories.contains(&category)
        })
    }
}

impl<H: Clone> DecorSet<H> {
    pub fn decorations(&self, category: RoomCategoryId, independent: bool) -> Vec<WeightedEntry<H>> {
        self.matching(category, independent)
            .map(|decoration| decoration.prefab.clone())
            .collect()
    }

    /// First matching decoration whose name contains `name`, ignoring case.
    pub fn find_decoration(&self, category: RoomCategoryId, independent: bool, name: &str) -> Option<H> {
        let needle = name.to_lowercase();
        self.matching(category, independent)
            .find(|decoration| decoration.name.to_lowercase().contains(&needle))
            .map(|decoration| decoration.prefab.handle.clone())
    }

    pub fn posters(&self, board: PosterBoard) -> Vec<WeightedEntry<H>> {
        self.posters
            .iter()
            .filter(|poster| poster.board == board)
            .map(|poster| poster.entry.clone())
            .collect()
    }
}

impl<H> Default for DecorSet<H> {
    fn default() -> Self {
        Self::new()
    }
}
