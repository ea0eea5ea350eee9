/// Registry configuration and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegistryConfig {
    /// Extra rooms added to the level total while a mystery-room event is active.
    pub mystery_room_bonus: u32,
    /// Log a warning whenever a floor is fetched twice without a reset.
    pub warn_on_double_fetch: bool,
    /// Log every drawn room count.
    pub debug_mode: bool,
}

impl RegistryConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MYSTERY_ROOM_BONUS: u32 = 1;
    pub const DEFAULT_WARN_ON_DOUBLE_FETCH: bool = cfg!(debug_assertions);

    pub fn new() -> Self {
        Self {
            mystery_room_bonus: Self::DEFAULT_MYSTERY_ROOM_BONUS,
            warn_on_double_fetch: Self::DEFAULT_WARN_ON_DOUBLE_FETCH,
            debug_mode: false,
        }
    }

    pub fn with_mystery_room_bonus(mystery_room_bonus: u32) -> Self {
        Self {
            mystery_room_bonus,
            ..Self::new()
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
