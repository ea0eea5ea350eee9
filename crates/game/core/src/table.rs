//! Floor-scoped weighted tables.
//!
//! A [`FloorScopeTable`] keeps registered content in parallel lists indexed
//! identically: entry *i*, its floor scope *i*, its metadata *i* and its external
//! name *i* always describe the same registration. Rows are only ever appended
//! together, and a rejected registration appends nothing.
//!
//! Reads through [`FloorScopeTable::fetch`] are one-shot per floor: the first fetch
//! of a floor marks it accessed and returns its entries, every later fetch returns
//! nothing until [`FloorScopeTable::reset_access`] runs. This stops a level
//! generator that asks twice from spawning everything twice.

use std::collections::HashMap;

use crate::error::{LookupError, RegistrationError, RegistryError};
use crate::floor::{FloorId, FloorSet};
use crate::weighted::WeightedEntry;

/// One accessed flag per real floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessFlags([bool; FloorId::COUNT]);

impl AccessFlags {
    /// Returns true if `floor` was already fetched. The sentinel is never accessed.
    #[inline]
    pub fn is_set(&self, floor: FloorId) -> bool {
        floor.index().is_some_and(|index| self.0[index])
    }

    /// Marks `floor` accessed and returns the previous value.
    pub fn mark(&mut self, floor: FloorId) -> bool {
        match floor.index() {
            Some(index) => core::mem::replace(&mut self.0[index], true),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.0 = [false; FloorId::COUNT];
    }
}

/// Per-floor one-shot state shared by every consumable table.
///
/// Tracks the accessed flags plus, per floor, how many fetches came back empty
/// because the floor was already consumed.
#[derive(Clone, Debug)]
pub struct FetchGuard {
    accessed: AccessFlags,
    double_fetches: [u32; FloorId::COUNT],
    warn_on_double_fetch: bool,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self {
            accessed: AccessFlags::default(),
            double_fetches: [0; FloorId::COUNT],
            warn_on_double_fetch: cfg!(debug_assertions),
        }
    }

    /// Marks `floor` consumed and returns true if this is its first fetch.
    ///
    /// The sentinel is never consumed. A repeated fetch bumps the floor's counter
    /// and, when enabled, logs a warning naming `table`.
    pub fn consume(&mut self, table: &'static str, floor: FloorId) -> bool {
        let Some(index) = floor.index() else {
            return false;
        };
        if !self.accessed.mark(floor) {
            return true;
        }

        self.double_fetches[index] = self.double_fetches[index].saturating_add(1);
        if self.warn_on_double_fetch {
            tracing::warn!(
                table,
                %floor,
                count = self.double_fetches[index],
                "floor already fetched this level; returning no entries"
            );
        }
        false
    }

    #[inline]
    pub fn is_accessed(&self, floor: FloorId) -> bool {
        self.accessed.is_set(floor)
    }

    pub fn lock(&mut self, floor: FloorId) {
        self.accessed.mark(floor);
    }

    /// Clears the accessed flags. Counters survive.
    pub fn reset(&mut self) {
        self.accessed.clear();
    }

    pub fn double_fetch_count(&self, floor: FloorId) -> u32 {
        floor.index().map_or(0, |index| self.double_fetches[index])
    }

    pub fn warns_on_double_fetch(&self) -> bool {
        self.warn_on_double_fetch
    }

    pub fn set_warning(&mut self, enabled: bool) {
        self.warn_on_double_fetch = enabled;
    }
}

impl Default for FetchGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed view of one table row.
#[derive(Debug)]
pub struct TableRow<'a, H, M> {
    pub name: &'a str,
    pub entry: &'a WeightedEntry<H>,
    pub floors: FloorSet,
    pub meta: &'a M,
}

/// Weighted, floor-scoped, one-time-consumable table.
#[derive(Clone, Debug)]
pub struct FloorScopeTable<H, M = ()> {
    label: &'static str,
    names: Vec<String>,
    entries: Vec<WeightedEntry<H>>,
    scopes: Vec<FloorSet>,
    metas: Vec<M>,
    index: HashMap<String, usize>,
    guard: FetchGuard,
}

impl<H, M> FloorScopeTable<H, M> {
    /// Creates an empty table. `label` names the table in log records.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            names: Vec::new(),
            entries: Vec::new(),
            scopes: Vec::new(),
            metas: Vec::new(),
            index: HashMap::new(),
            guard: FetchGuard::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Enables or disables the warning logged on repeated fetches.
    pub fn set_double_fetch_warning(&mut self, enabled: bool) {
        self.guard.set_warning(enabled);
    }

    pub fn double_fetch_warning(&self) -> bool {
        self.guard.warns_on_double_fetch()
    }

    /// Registers an entry.
    ///
    /// Validation order: weight, floor scope, name. On failure nothing is appended
    /// and a warning is logged.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidWeight`] when `weight <= 0`
    /// - [`RegistrationError::EmptyFloorScope`] when `floors` is empty or holds the sentinel
    /// - [`RegistrationError::DuplicateName`] when `name` is already registered; the
    ///   first registration is kept
    pub fn register(
        &mut self,
        name: &str,
        handle: H,
        weight: i64,
        floors: &[FloorId],
        meta: M,
    ) -> Result<usize, RegistrationError> {
        let result = self.try_register(name, handle, weight, floors, meta);
        if let Err(err) = &result {
            tracing::warn!(
                table = self.label,
                name,
                code = err.error_code(),
                "registration rejected: {err}"
            );
        }
        result
    }

    fn try_register(
        &mut self,
        name: &str,
        handle: H,
        weight: i64,
        floors: &[FloorId],
        meta: M,
    ) -> Result<usize, RegistrationError> {
        let entry = WeightedEntry::new(handle, weight)?;
        let scope = FloorSet::from_floors(floors)?;
        if self.index.contains_key(name) {
            return Err(RegistrationError::DuplicateName(name.to_owned()));
        }

        let row = self.entries.len();
        self.names.push(name.to_owned());
        self.entries.push(entry);
        self.scopes.push(scope);
        self.metas.push(meta);
        self.index.insert(name.to_owned(), row);

        tracing::debug!(table = self.label, name, row, floors = %scope, "registered");
        Ok(row)
    }

    /// Returns true if `name` is registered.
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Handle registered under `name`.
    pub fn get(&self, name: &str) -> Result<&H, LookupError> {
        self.row(name).map(|row| &row.entry.handle)
    }

    /// Full row registered under `name`.
    pub fn row(&self, name: &str) -> Result<TableRow<'_, H, M>, LookupError> {
        self.index
            .get(name)
            .map(|&index| self.row_at(index))
            .ok_or_else(|| LookupError::NotFound(name.to_owned()))
    }

    fn row_at(&self, index: usize) -> TableRow<'_, H, M> {
        TableRow {
            name: &self.names[index],
            entry: &self.entries[index],
            floors: self.scopes[index],
            meta: &self.metas[index],
        }
    }

    /// Iterates all rows in registration order.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_, H, M>> {
        (0..self.entries.len()).map(move |index| self.row_at(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `floor` has been fetched since the last reset.
    pub fn is_accessed(&self, floor: FloorId) -> bool {
        self.guard.is_accessed(floor)
    }

    /// Marks `floor` accessed without reading it.
    pub fn lock(&mut self, floor: FloorId) {
        self.guard.lock(floor);
    }

    /// Clears every accessed flag. Called once between levels.
    pub fn reset_access(&mut self) {
        self.guard.reset();
    }

    /// Number of fetches of `floor` that were answered empty because the floor had
    /// already been consumed.
    pub fn double_fetch_count(&self, floor: FloorId) -> u32 {
        self.guard.double_fetch_count(floor)
    }
}

impl<H: Clone, M> FloorScopeTable<H, M> {
    /// One-shot fetch of every entry scoped to `floor`.
    pub fn fetch(&mut self, floor: FloorId) -> Vec<WeightedEntry<H>> {
        self.fetch_where(floor, |_| true)
    }

    /// One-shot fetch of entries scoped to `floor` whose metadata matches `filter`.
    ///
    /// Returns an empty list, without error, if the floor was already fetched.
    pub fn fetch_where(
        &mut self,
        floor: FloorId,
        filter: impl Fn(&M) -> bool,
    ) -> Vec<WeightedEntry<H>> {
        if !self.guard.consume(self.label, floor) {
            return Vec::new();
        }

        let fetched = self.peek_where(floor, filter);
        tracing::debug!(table = self.label, %floor, count = fetched.len(), "fetched");
        fetched
    }

    /// Entries scoped to `floor` matching `filter`, without reading or writing the
    /// accessed flag.
    pub fn peek_where(&self, floor: FloorId, filter: impl Fn(&M) -> bool) -> Vec<WeightedEntry<H>> {
        self.entries
            .iter()
            .zip(&self.scopes)
            .zip(&self.metas)
            .filter(|((_, scope), meta)| scope.contains_floor(floor) && filter(*meta))
            .map(|((entry, _), _)| entry.clone())
            .collect()
    }

    /// Every entry regardless of floor.
    pub fn all_entries(&self) -> Vec<WeightedEntry<H>> {
        self.entries.clone()
    }
}
