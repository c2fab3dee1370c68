//! Error types for the core planning-board logic.
//!
//! Key parsing is the only fallible operation at this level; everything
//! else is plain data. Transport and codec failures live in
//! `planboard-protocol`.

use thiserror::Error;

/// Failure to parse a `<kind>/<name>` entity key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// No `/` between kind and name.
    #[error("entity key `{0}` has no `/` separator")]
    MissingSeparator(String),

    /// The kind segment is not one of the four entity kinds.
    #[error("unknown entity kind `{0}`")]
    UnknownKind(String),

    /// Nothing after the separator.
    #[error("entity key has an empty name")]
    EmptyName,
}
