//! Error types for the polystruct generator

use thiserror::Error;

/// Main error type for generator operations
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A compilation unit could not be parsed
    #[error("Failed to parse {unit}: {message}")]
    Parse { unit: String, message: String },

    /// The merged type name cannot be derived from the interface name
    #[error("Cannot derive a merged type name from `{interface}`: {reason}")]
    InvalidName { interface: String, reason: String },

    /// The interface declaration has a shape the generator does not support
    #[error("Unsupported polymorphic interface `{interface}`: {reason}")]
    UnsupportedInterface { interface: String, reason: String },

    /// One member of the interface hierarchy cannot be dispatched
    #[error("Unsupported member `{member}` of `{interface}`: {reason}")]
    UnsupportedMember {
        interface: String,
        member: String,
        reason: String,
    },

    /// A variant type cannot be merged
    #[error("Unsupported variant `{variant}`: {reason}")]
    UnsupportedVariant { variant: String, reason: String },

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GeneratorError {
    pub(crate) fn member(
        interface: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedMember {
            interface: interface.into(),
            member: member.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn interface(interface: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedInterface {
            interface: interface.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn variant(variant: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedVariant {
            variant: variant.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
