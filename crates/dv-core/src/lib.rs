//! dv-core: spatial graph and procedural generation engine for delver
//!
//! Builds an unbounded dungeon lazily as the player explores it, on a
//! 3-axis integer lattice with hard consistency guarantees: every
//! connection is bidirectional, converging paths resolve to a single
//! room, and a path can always be retraced. A bounded ASCII projection
//! of the explored graph is rendered by [`MapProjector`].
//!
//! This crate contains no I/O. It is driven one movement at a time by a
//! single owner per world; all randomness comes from an injected
//! [`dv_rng::DelveRng`].

pub mod direction;
pub mod errors;
mod generator;
pub mod graph;
pub mod ident;
pub mod navigator;
pub mod policy;
pub mod position;
pub mod projector;
pub mod registry;
pub mod room;
pub mod save;

pub use direction::Direction;
pub use errors::{RestoreError, SpatialError};
pub use graph::{ConnectionGraph, ValidationFinding, ValidationReport};
pub use ident::{leading_direction, synthesize_id};
pub use navigator::{Navigator, ORIGIN_ID};
pub use policy::{DepthTier, ExitPolicy};
pub use position::Position;
pub use projector::{MapProjector, MapStyle};
pub use registry::PositionRegistry;
pub use room::RoomNode;
pub use save::{GraphSnapshot, RoomRecord};

pub use dv_rng::DelveRng;
