//! Spatial navigator: the owning façade over registry and graph
//!
//! One `Navigator` per active world. It holds the only mutable instance
//! of the position registry and the connection graph; every other
//! component is stateless or operates on data passed to it.

use hashbrown::HashMap;

use dv_rng::DelveRng;

use crate::direction::Direction;
use crate::errors::SpatialError;
use crate::generator;
use crate::graph::{ConnectionGraph, ValidationReport};
use crate::policy::ExitPolicy;
use crate::position::Position;
use crate::registry::PositionRegistry;
use crate::room::{RoomNode, RoomState};

/// Id of the origin room
pub const ORIGIN_ID: &str = "start";

/// The spatial engine's public entry point
///
/// Created once per game session and passed by reference to
/// collaborators - never a process-wide singleton.
#[derive(Debug, Clone)]
pub struct Navigator {
    registry: PositionRegistry,
    graph: ConnectionGraph,
    states: HashMap<String, RoomState>,
    policy: ExitPolicy,
    rng: DelveRng,
}

impl Navigator {
    /// Create a world with the default policy
    ///
    /// The origin room exists immediately, at the lattice origin, and is
    /// the only room the navigator itself marks visited.
    pub fn new(rng: DelveRng) -> Self {
        Self::with_policy(ExitPolicy::default(), rng)
    }

    pub fn with_policy(policy: ExitPolicy, rng: DelveRng) -> Self {
        let mut registry = PositionRegistry::new();
        registry
            .add_room(ORIGIN_ID, Position::ORIGIN)
            .expect("empty registry accepts the origin");
        let mut states = HashMap::new();
        states.insert(
            ORIGIN_ID.to_string(),
            RoomState {
                depth: 0,
                visited: true,
            },
        );
        Self {
            registry,
            graph: ConnectionGraph::new(),
            states,
            policy,
            rng,
        }
    }

    pub(crate) fn from_parts(
        registry: PositionRegistry,
        graph: ConnectionGraph,
        states: HashMap<String, RoomState>,
        policy: ExitPolicy,
        rng: DelveRng,
    ) -> Self {
        Self {
            registry,
            graph,
            states,
            policy,
            rng,
        }
    }

    /// Materialize the room one step from `from` in `direction`
    ///
    /// Converges onto an existing room when the target position is
    /// occupied; otherwise creates one at generation depth `depth`.
    pub fn generate_connected_room(
        &mut self,
        from: &str,
        direction: Direction,
        depth: u32,
    ) -> Result<String, SpatialError> {
        generator::generate_connected_room(
            &mut self.registry,
            &mut self.graph,
            &mut self.states,
            from,
            direction,
            depth,
        )
    }

    /// Choose the fresh exits a room offers, per the branching policy
    ///
    /// Returns directions only; callers instantiate each one through
    /// [`Navigator::generate_connected_room`] when the player takes it.
    pub fn generate_logical_exits(
        &mut self,
        room: &str,
        max_exits: u32,
        came_from: Option<Direction>,
    ) -> Result<Vec<Direction>, SpatialError> {
        generator::generate_logical_exits(
            &self.registry,
            &self.graph,
            &self.states,
            &self.policy,
            &mut self.rng,
            room,
            max_exits,
            came_from,
        )
    }

    /// Scan the whole graph against the invariants
    pub fn validate_connections(&self) -> ValidationReport {
        self.graph.validate(&self.registry)
    }

    /// Repair what can be repaired (missing reverse edges)
    ///
    /// Returns the number of edges installed. Geometry mismatches are
    /// left for upstream correction.
    pub fn fix_connections(&mut self) -> usize {
        let report = self.graph.validate(&self.registry);
        self.graph.repair(&report)
    }

    // Passthrough accessors

    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.registry.position_of(id)
    }

    pub fn room_at(&self, position: Position) -> Option<&str> {
        self.registry.room_at(position)
    }

    /// The neighbor reached via `direction`, if that exit exists
    ///
    /// `None` is the normal blocked-move outcome, not an error.
    pub fn connection(&self, id: &str, direction: Direction) -> Option<&str> {
        self.graph.connection(id, direction)
    }

    /// All connections of a room, in fixed direction order
    pub fn connections_of<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = (Direction, &'a str)> {
        self.graph.connections_of(id)
    }

    pub fn depth_of(&self, id: &str) -> Option<u32> {
        self.states.get(id).map(|s| s.depth)
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.states.get(id).is_some_and(|s| s.visited)
    }

    /// Record that the player actually entered a room
    ///
    /// Visitation is driven externally; generation only marks existence.
    pub fn mark_visited(&mut self, id: &str) -> Result<(), SpatialError> {
        match self.states.get_mut(id) {
            Some(state) => {
                state.visited = true;
                Ok(())
            }
            None => Err(SpatialError::UnknownRoom { id: id.to_string() }),
        }
    }

    /// Assemble a read-only snapshot of one room
    pub fn room(&self, id: &str) -> Option<RoomNode> {
        let position = self.registry.position_of(id)?;
        let state = self.states.get(id)?;
        Some(RoomNode {
            id: id.to_string(),
            position,
            connections: self
                .graph
                .connections_of(id)
                .map(|(d, to)| (d, to.to_string()))
                .collect(),
            visited: state.visited,
            depth: state.depth,
        })
    }

    /// Iterate over all room ids and positions
    pub fn rooms(&self) -> impl Iterator<Item = (&str, Position)> {
        self.registry.iter()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn policy(&self) -> &ExitPolicy {
        &self.policy
    }
}
