//! Weighted entries and weighted random selection.

use crate::error::{RegistrationError, SelectionError};
use crate::rng::RngStream;

/// An opaque content handle paired with a positive selection weight.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WeightedEntry<T> {
    pub handle: T,
    weight: u32,
}

impl<T> WeightedEntry<T> {
    /// Creates an entry, validating the weight.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidWeight`] when `weight <= 0`.
    pub fn new(handle: T, weight: i64) -> Result<Self, RegistrationError> {
        Ok(Self {
            handle,
            weight: validate_weight(weight)?,
        })
    }

    #[inline]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Maps the handle, keeping the weight.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WeightedEntry<U> {
        WeightedEntry {
            handle: f(self.handle),
            weight: self.weight,
        }
    }
}

/// Checks that a registration weight is positive and fits the weight type.
pub fn validate_weight(weight: i64) -> Result<u32, RegistrationError> {
    if weight <= 0 || weight > u32::MAX as i64 {
        return Err(RegistrationError::InvalidWeight { weight });
    }
    Ok(weight as u32)
}

/// Weighted random selection.
///
/// Two modes:
/// - **controlled**: draws from a caller-supplied stream, reproducible from a seed;
///   used for macro layout (which room gets which texture or builder).
/// - **random**: draws from the thread RNG; used for ordinary spawns.
///
/// Neither mode reorders its input: order is part of seed determinism.
pub struct WeightedSampler;

impl WeightedSampler {
    /// Picks an index with probability proportional to weight.
    ///
    /// Draws `r` in `[0, total)` and returns the first bucket whose cumulative weight
    /// exceeds `r`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EmptySelectionSet`] for an empty slice.
    pub fn select_index<T, R>(
        entries: &[WeightedEntry<T>],
        rng: &mut R,
    ) -> Result<usize, SelectionError>
    where
        R: RngStream + ?Sized,
    {
        if entries.is_empty() {
            return Err(SelectionError::EmptySelectionSet);
        }

        let total: u64 = entries.iter().map(|entry| entry.weight as u64).sum();
        let roll = if total > u32::MAX as u64 {
            let wide = ((rng.next_value() as u64) << 32) | rng.next_value() as u64;
            wide % total
        } else {
            rng.below(total as u32) as u64
        };

        let mut cumulative = 0u64;
        for (index, entry) in entries.iter().enumerate() {
            cumulative += entry.weight as u64;
            if roll < cumulative {
                return Ok(index);
            }
        }

        // Unreachable while every weight is positive.
        Ok(entries.len() - 1)
    }

    /// Seed-reproducible selection from a caller-supplied stream.
    pub fn controlled<'a, T, R>(
        entries: &'a [WeightedEntry<T>],
        rng: &mut R,
    ) -> Result<&'a T, SelectionError>
    where
        R: RngStream + ?Sized,
    {
        let index = Self::select_index(entries, rng)?;
        Ok(&entries[index].handle)
    }

    /// Selection from the thread RNG.
    pub fn random<T>(entries: &[WeightedEntry<T>]) -> Result<&T, SelectionError> {
        let mut rng = rand::thread_rng();
        Self::controlled(entries, &mut rng)
    }
}
