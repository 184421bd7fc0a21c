//! Room node types
//!
//! The spatial engine tracks only where a room is and how it connects.
//! Descriptive content (prose, items, occupants) is an opaque payload
//! owned by external collaborators, keyed by the room id.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::position::Position;

/// Read-only snapshot of a room's spatial state
///
/// Assembled on demand by the navigator from the registry, the graph and
/// the per-room state; mutating the snapshot does not touch the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomNode {
    pub id: String,
    pub position: Position,
    pub connections: HashMap<Direction, String>,
    pub visited: bool,
    pub depth: u32,
}

/// Mutable per-room state owned by the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RoomState {
    pub depth: u32,
    pub visited: bool,
}
