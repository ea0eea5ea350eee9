//! Common error infrastructure for content-core.
//!
//! Every failure the registry can report falls in one of three families:
//!
//! - [`RegistrationError`]: raised synchronously while content is registered at startup.
//!   The offending entry is dropped and a warning is logged; registration of the
//!   remaining content continues.
//! - [`LookupError`]: a name or category lookup found nothing. Callers fall back to a
//!   default.
//! - [`SelectionError`]: the sampler was asked to choose from nothing. Callers skip the
//!   step or substitute a built-in default.
//!
//! None of them is fatal to the process.

use crate::floor::FloorId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller has an explicit fallback (skip, default, sentinel)
/// - **Validation**: invalid input that is rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller substitutes a default and carries on.
    ///
    /// Examples: room name not registered, empty texture list
    Recoverable,

    /// Validation error - invalid registration input, should not retry without changes.
    ///
    /// Examples: zero weight, empty floor scope, duplicate name
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all content-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait RegistryError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Used as the `code` field of log records and in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while registering content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Selection weight was zero or negative.
    #[error("weight {weight} must be greater than zero")]
    InvalidWeight { weight: i64 },

    /// Floor scope was empty or contained the reserved sentinel.
    #[error("floor scope is empty or contains the {} sentinel", FloorId::None)]
    EmptyFloorScope,

    /// An entry with the same external name already exists in the table.
    #[error("'{0}' is already registered")]
    DuplicateName(String),

    /// The room category is not supported by the requested operation.
    #[error("room category '{0}' is not supported by this operation")]
    UnsupportedCategory(String),

    /// Texture surfaces/placement flags are inconsistent.
    #[error("invalid texture spec: {0}")]
    InvalidTextureSpec(&'static str),

    /// A room operation named a room that was never registered as a new room.
    #[error("no new room named '{0}'")]
    UnknownRoom(String),
}

impl RegistryError for RegistrationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use RegistrationError::*;
        match self {
            InvalidWeight { .. } => "REGISTRATION_INVALID_WEIGHT",
            EmptyFloorScope => "REGISTRATION_EMPTY_FLOOR_SCOPE",
            DuplicateName(_) => "REGISTRATION_DUPLICATE_NAME",
            UnsupportedCategory(_) => "REGISTRATION_UNSUPPORTED_CATEGORY",
            InvalidTextureSpec(_) => "REGISTRATION_INVALID_TEXTURE_SPEC",
            UnknownRoom(_) => "REGISTRATION_UNKNOWN_ROOM",
        }
    }
}

/// Errors raised by name/category lookups.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Nothing is registered under the given key.
    #[error("'{0}' not found")]
    NotFound(String),
}

impl RegistryError for LookupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            LookupError::NotFound(_) => "LOOKUP_NOT_FOUND",
        }
    }
}

/// Errors raised by the weighted sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The candidate list was empty.
    #[error("cannot select from an empty weighted set")]
    EmptySelectionSet,
}

impl RegistryError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            SelectionError::EmptySelectionSet => "SELECTION_EMPTY_SET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_errors_are_validation() {
        let err = RegistrationError::InvalidWeight { weight: -3 };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "REGISTRATION_INVALID_WEIGHT");
        assert_eq!(err.to_string(), "weight -3 must be greater than zero");
    }

    #[test]
    fn consumption_errors_are_recoverable() {
        assert!(LookupError::NotFound("bathroom".into()).severity().is_recoverable());
        assert!(SelectionError::EmptySelectionSet.severity().is_recoverable());
    }
}
