//! Graph export and restore
//!
//! The minimal persistence shape: one record per room carrying id,
//! position (optional), generation depth, connections and the visited
//! flag. Restore accepts records without positions and recovers them by
//! walking connections from the origin - the two paths external
//! persistence layers are allowed to take.

use hashbrown::HashMap;

use dv_rng::DelveRng;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::errors::RestoreError;
use crate::graph::ConnectionGraph;
use crate::navigator::{Navigator, ORIGIN_ID};
use crate::policy::ExitPolicy;
use crate::position::Position;
use crate::registry::PositionRegistry;
use crate::room::RoomState;

/// One room's exportable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: String,
    /// Optional: restore recomputes missing positions from connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub connections: HashMap<Direction, String>,
    #[serde(default)]
    pub visited: bool,
}

/// The whole graph, ready for an external persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub rooms: Vec<RoomRecord>,
}

impl Navigator {
    /// Export every room, sorted by id for stable output
    pub fn export(&self) -> GraphSnapshot {
        let mut rooms: Vec<RoomRecord> = self
            .rooms()
            .map(|(id, position)| RoomRecord {
                id: id.to_string(),
                position: Some(position),
                depth: self.depth_of(id).unwrap_or(0),
                connections: self
                    .connections_of(id)
                    .map(|(d, to)| (d, to.to_string()))
                    .collect(),
                visited: self.is_visited(id),
            })
            .collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        GraphSnapshot { rooms }
    }

    /// Rebuild a navigator from a snapshot
    ///
    /// Positions are taken from the records where present; the rest are
    /// recovered by applying direction vectors outward from anchored
    /// rooms. The restored graph is re-validated - a snapshot that
    /// violates the invariants is rejected, never silently corrected.
    pub fn restore(
        snapshot: &GraphSnapshot,
        policy: ExitPolicy,
        rng: DelveRng,
    ) -> Result<Self, RestoreError> {
        let mut positions: HashMap<&str, Position> = HashMap::new();
        let mut records: HashMap<&str, &RoomRecord> = HashMap::new();

        for record in &snapshot.rooms {
            if records.insert(record.id.as_str(), record).is_some() {
                return Err(RestoreError::DuplicateRecord {
                    id: record.id.clone(),
                });
            }
            if let Some(pos) = record.position {
                positions.insert(record.id.as_str(), pos);
            }
        }

        if !records.contains_key(ORIGIN_ID) {
            return Err(RestoreError::MissingOrigin {
                origin: ORIGIN_ID.to_string(),
            });
        }
        positions.entry(ORIGIN_ID).or_insert(Position::ORIGIN);

        // Propagate positions across connections until nothing new
        // resolves. Small graphs, so the quadratic fixpoint is fine.
        loop {
            let mut resolved: Vec<(&str, Position)> = Vec::new();
            for (id, record) in &records {
                let Some(from_pos) = positions.get(id).copied() else {
                    continue;
                };
                for (dir, to) in &record.connections {
                    if records.contains_key(to.as_str())
                        && !positions.contains_key(to.as_str())
                    {
                        resolved.push((to.as_str(), from_pos.step(*dir)));
                    }
                }
            }
            if resolved.is_empty() {
                break;
            }
            for (id, pos) in resolved {
                positions.entry(id).or_insert(pos);
            }
        }

        if let Some(record) = snapshot
            .rooms
            .iter()
            .find(|r| !positions.contains_key(r.id.as_str()))
        {
            return Err(RestoreError::Unanchored {
                id: record.id.clone(),
            });
        }

        let mut registry = PositionRegistry::new();
        let mut graph = ConnectionGraph::new();
        let mut states: HashMap<String, RoomState> = HashMap::new();

        for record in &snapshot.rooms {
            registry.add_room(&record.id, positions[record.id.as_str()])?;
            states.insert(
                record.id.clone(),
                RoomState {
                    depth: record.depth,
                    visited: record.visited,
                },
            );
        }
        for record in &snapshot.rooms {
            for dir in Direction::ALL {
                if let Some(to) = record.connections.get(&dir) {
                    graph.connect(&record.id, dir, to)?;
                }
            }
        }

        let report = graph.validate(&registry);
        if !report.is_clean() {
            return Err(RestoreError::FailedValidation {
                count: report.len(),
                first: report.findings[0].to_string(),
            });
        }

        Ok(Navigator::from_parts(registry, graph, states, policy, rng))
    }
}
