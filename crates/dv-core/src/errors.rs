//! Error types for graph mutations and snapshot restore

use thiserror::Error;

use crate::position::Position;

/// Fatal errors raised by mutating operations on the spatial graph
///
/// Every variant indicates a logic error in the caller (stale ids, a
/// broken convergence check, an attempt to rewire an existing edge).
/// Mutations that fail leave the graph untouched - there are no partial
/// writes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    #[error("room '{id}' is not registered")]
    UnknownRoom { id: String },

    #[error("position {position} is already occupied by '{occupant}' (while adding '{id}')")]
    DuplicatePosition {
        id: String,
        occupant: String,
        position: Position,
    },

    #[error("room id '{id}' is already registered at {existing} (while adding at {requested})")]
    DuplicateId {
        id: String,
        existing: Position,
        requested: Position,
    },

    #[error(
        "connection slot {direction} of '{from}' already targets '{existing}' (attempted '{attempted}')"
    )]
    ConnectionConflict {
        from: String,
        direction: crate::direction::Direction,
        existing: String,
        attempted: String,
    },

    #[error("room '{id}' cannot connect to itself")]
    SelfLoop { id: String },
}

/// Errors raised when rebuilding a navigator from an exported snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    #[error("snapshot has no origin room '{origin}'")]
    MissingOrigin { origin: String },

    #[error("room '{id}' carries no position and is not reachable from an anchored room")]
    Unanchored { id: String },

    #[error("snapshot violates graph invariants: {0}")]
    Invalid(#[from] SpatialError),

    #[error("room '{id}' appears more than once in the snapshot")]
    DuplicateRecord { id: String },

    #[error("restored graph failed validation with {count} finding(s); first: {first}")]
    FailedValidation { count: usize, first: String },
}
