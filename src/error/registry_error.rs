use thiserror::Error;

use crate::error::ParseError;

/// Errors raised while defining user symbols.
///
/// A failed batch leaves the registry exactly as it was.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The serialized batch is not a JSON array of definitions.
    #[error("Malformed variable definitions: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A name or alias that is not a valid identifier.
    #[error("\"{name}\" is not a valid symbol name.")]
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// A name or alias already used by another entry.
    #[error("\"{name}\" is already defined by \"{existing}\".")]
    NameCollision {
        /// The colliding name.
        name:     String,
        /// Canonical name of the entry already holding it.
        existing: String,
    },
    /// A definition without a value.
    #[error("Variable \"{name}\" has an empty value.")]
    EmptyValue {
        /// The variable name.
        name: String,
    },
    /// A value that does not parse against the registry.
    #[error("The value of \"{name}\" is invalid: {source}")]
    InvalidValue {
        /// The variable name.
        name:   String,
        /// The parse failure.
        source: ParseError,
    },
}
