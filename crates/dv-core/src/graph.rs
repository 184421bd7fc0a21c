//! Connection graph: bidirectional edges between rooms
//!
//! Edges are added through [`ConnectionGraph::connect`], which writes both
//! half-edges atomically. `validate` scans the whole graph against the
//! position registry and reports findings as data; only missing reverse
//! edges are auto-repairable.

use hashbrown::HashMap;

use crate::direction::Direction;
use crate::errors::SpatialError;
use crate::registry::PositionRegistry;

/// Per-room adjacency: direction -> neighbor id
type Adjacency = HashMap<Direction, String>;

/// The dungeon's connection graph
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    edges: HashMap<String, Adjacency>,
}

/// A single problem discovered by [`ConnectionGraph::validate`]
///
/// Findings are collected and returned, never thrown. A missing reverse
/// edge can be repaired mechanically; the other kinds indicate an
/// upstream bug and are surfaced untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFinding {
    /// `from` reaches `to` via `direction`, but `to` has no edge back
    MissingReverse {
        from: String,
        direction: Direction,
        to: String,
    },
    /// An edge references an id absent from the registry
    Dangling {
        from: String,
        direction: Direction,
        to: String,
    },
    /// The actual position delta between the rooms is not the
    /// direction's unit vector
    GeometryMismatch {
        from: String,
        direction: Direction,
        to: String,
        expected: (i32, i32, i32),
        actual: (i32, i32, i32),
    },
    /// A room connects to itself
    SelfLoop { id: String, direction: Direction },
}

impl ValidationFinding {
    /// Whether `repair` can fix this finding mechanically
    pub fn is_repairable(&self) -> bool {
        matches!(self, ValidationFinding::MissingReverse { .. })
    }
}

impl core::fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationFinding::MissingReverse { from, direction, to } => {
                write!(f, "'{to}' has no reverse edge back to '{from}' ({direction})")
            }
            ValidationFinding::Dangling { from, direction, to } => {
                write!(f, "'{from}' -> {direction} references unregistered '{to}'")
            }
            ValidationFinding::GeometryMismatch {
                from,
                direction,
                to,
                expected,
                actual,
            } => write!(
                f,
                "'{from}' -> {direction} -> '{to}': expected delta {expected:?}, got {actual:?}"
            ),
            ValidationFinding::SelfLoop { id, direction } => {
                write!(f, "'{id}' connects to itself ({direction})")
            }
        }
    }
}

/// Outcome of a full graph scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter()
    }

    /// Findings that `repair` will act on
    pub fn repairable(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.is_repairable())
    }
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bidirectional connection between two rooms
    ///
    /// Sets `from`'s slot for `direction` to `to` and `to`'s slot for the
    /// opposite direction to `from`, or neither. A slot that already
    /// holds a different target is immutable; re-connecting an identical
    /// edge is a no-op.
    pub fn connect(
        &mut self,
        from: &str,
        direction: Direction,
        to: &str,
    ) -> Result<(), SpatialError> {
        self.check_connect(from, direction, to)?;

        let opposite = direction.opposite();
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(direction, to.to_string());
        self.edges
            .entry(to.to_string())
            .or_default()
            .insert(opposite, from.to_string());
        Ok(())
    }

    /// Check whether `connect(from, direction, to)` would succeed
    ///
    /// Checks both slots without touching either, so callers can
    /// validate an edge before committing other state (e.g. registering
    /// a new room).
    pub fn check_connect(
        &self,
        from: &str,
        direction: Direction,
        to: &str,
    ) -> Result<(), SpatialError> {
        if from == to {
            return Err(SpatialError::SelfLoop { id: from.to_string() });
        }
        if let Some(existing) = self.connection(from, direction) {
            if existing != to {
                return Err(SpatialError::ConnectionConflict {
                    from: from.to_string(),
                    direction,
                    existing: existing.to_string(),
                    attempted: to.to_string(),
                });
            }
        }
        let opposite = direction.opposite();
        if let Some(existing) = self.connection(to, opposite) {
            if existing != from {
                return Err(SpatialError::ConnectionConflict {
                    from: to.to_string(),
                    direction: opposite,
                    existing: existing.to_string(),
                    attempted: from.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The neighbor reached from `id` via `direction`, if any
    pub fn connection(&self, id: &str, direction: Direction) -> Option<&str> {
        self.edges
            .get(id)?
            .get(&direction)
            .map(String::as_str)
    }

    /// All connections of a room, in fixed direction order
    pub fn connections_of<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = (Direction, &'a str)> {
        let adjacency = self.edges.get(id);
        Direction::ALL.into_iter().filter_map(move |dir| {
            adjacency
                .and_then(|a| a.get(&dir))
                .map(|to| (dir, to.as_str()))
        })
    }

    /// Number of connected directions for a room
    pub fn degree(&self, id: &str) -> usize {
        self.edges.get(id).map_or(0, HashMap::len)
    }

    /// Remove one half-edge, leaving the reverse edge in place
    ///
    /// For external eviction collaborators and for exercising
    /// `validate`/`repair`. The navigator never calls it.
    pub fn remove_connection(&mut self, id: &str, direction: Direction) -> Option<String> {
        self.edges.get_mut(id)?.remove(&direction)
    }

    /// Scan every edge against the registry and the invariants
    pub fn validate(&self, registry: &PositionRegistry) -> ValidationReport {
        let mut report = ValidationReport::default();

        // Deterministic scan order keeps reports stable across runs.
        let mut ids: Vec<&String> = self.edges.keys().collect();
        ids.sort();

        for id in ids {
            for dir in Direction::ALL {
                let Some(target) = self.connection(id, dir) else {
                    continue;
                };

                if target == id.as_str() {
                    report.findings.push(ValidationFinding::SelfLoop {
                        id: id.clone(),
                        direction: dir,
                    });
                    continue;
                }

                if !registry.contains(target) {
                    report.findings.push(ValidationFinding::Dangling {
                        from: id.clone(),
                        direction: dir,
                        to: target.to_string(),
                    });
                    continue;
                }

                if self.connection(target, dir.opposite()) != Some(id.as_str()) {
                    report.findings.push(ValidationFinding::MissingReverse {
                        from: id.clone(),
                        direction: dir,
                        to: target.to_string(),
                    });
                }

                if let (Some(from_pos), Some(to_pos)) =
                    (registry.position_of(id), registry.position_of(target))
                {
                    let actual = to_pos.offset_from(&from_pos);
                    let expected = dir.delta();
                    if actual != expected {
                        report.findings.push(ValidationFinding::GeometryMismatch {
                            from: id.clone(),
                            direction: dir,
                            to: target.to_string(),
                            expected,
                            actual,
                        });
                    }
                }
            }
        }

        report
    }

    /// Install reverse edges for the report's missing-reverse findings
    ///
    /// Only writes into a slot that is empty or already agrees; anything
    /// else stays as-is and keeps showing up in the next validation.
    /// Returns the number of edges installed.
    pub fn repair(&mut self, report: &ValidationReport) -> usize {
        let mut installed = 0;
        for finding in report.repairable() {
            let ValidationFinding::MissingReverse { from, direction, to } = finding else {
                continue;
            };
            let opposite = direction.opposite();
            // Only fill an empty slot; an occupant (right or wrong)
            // stays for the next validation pass to judge
            if self.connection(to, opposite).is_none() {
                self.edges
                    .entry(to.clone())
                    .or_default()
                    .insert(opposite, from.clone());
                installed += 1;
            }
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn registry_with(rooms: &[(&str, Position)]) -> PositionRegistry {
        let mut reg = PositionRegistry::new();
        for (id, pos) in rooms {
            reg.add_room(id, *pos).unwrap();
        }
        reg
    }

    #[test]
    fn test_connect_sets_both_directions() {
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "n1").unwrap();
        assert_eq!(graph.connection("start", Direction::North), Some("n1"));
        assert_eq!(graph.connection("n1", Direction::South), Some("start"));
    }

    #[test]
    fn test_reconnect_same_edge_is_noop() {
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "n1").unwrap();
        graph.connect("start", Direction::North, "n1").unwrap();
        assert_eq!(graph.degree("start"), 1);
    }

    #[test]
    fn test_conflicting_forward_slot_rejected() {
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "n1").unwrap();
        let err = graph.connect("start", Direction::North, "other").unwrap_err();
        assert!(matches!(err, SpatialError::ConnectionConflict { .. }));
        // Nothing half-written
        assert_eq!(graph.connection("start", Direction::North), Some("n1"));
        assert_eq!(graph.connection("other", Direction::South), None);
    }

    #[test]
    fn test_conflicting_reverse_slot_leaves_forward_unset() {
        let mut graph = ConnectionGraph::new();
        graph.connect("a", Direction::North, "b").unwrap();
        // "c" -> North -> "b" would need b.South = "c", but b.South = "a"
        let err = graph.connect("c", Direction::North, "b").unwrap_err();
        assert!(matches!(err, SpatialError::ConnectionConflict { .. }));
        assert_eq!(graph.connection("c", Direction::North), None);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = ConnectionGraph::new();
        let err = graph.connect("start", Direction::Up, "start").unwrap_err();
        assert!(matches!(err, SpatialError::SelfLoop { .. }));
        assert_eq!(graph.degree("start"), 0);
    }

    #[test]
    fn test_connections_of_in_fixed_order() {
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::Down, "d1").unwrap();
        graph.connect("start", Direction::North, "n1").unwrap();
        graph.connect("start", Direction::East, "e1").unwrap();
        let dirs: Vec<Direction> =
            graph.connections_of("start").map(|(d, _)| d).collect();
        assert_eq!(
            dirs,
            vec![Direction::North, Direction::East, Direction::Down]
        );
    }

    #[test]
    fn test_validate_clean_graph() {
        let reg = registry_with(&[
            ("start", Position::ORIGIN),
            ("n1", Position::new(0, 1, 0)),
        ]);
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "n1").unwrap();
        assert!(graph.validate(&reg).is_clean());
    }

    #[test]
    fn test_validate_reports_missing_reverse() {
        let reg = registry_with(&[
            ("start", Position::ORIGIN),
            ("n1", Position::new(0, 1, 0)),
        ]);
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "n1").unwrap();
        graph.remove_connection("n1", Direction::South);

        let report = graph.validate(&reg);
        assert_eq!(report.len(), 1);
        assert!(matches!(
            report.findings[0],
            ValidationFinding::MissingReverse { .. }
        ));
    }

    #[test]
    fn test_validate_reports_dangling() {
        let reg = registry_with(&[("start", Position::ORIGIN)]);
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "ghost").unwrap();

        let report = graph.validate(&reg);
        assert!(report
            .iter()
            .any(|f| matches!(f, ValidationFinding::Dangling { to, .. } if to == "ghost")));
    }

    #[test]
    fn test_validate_reports_geometry_mismatch() {
        // "far" is registered two cells away but connected as a
        // one-step neighbor
        let reg = registry_with(&[
            ("start", Position::ORIGIN),
            ("far", Position::new(0, 2, 0)),
        ]);
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "far").unwrap();

        let report = graph.validate(&reg);
        let mismatch = report
            .iter()
            .find(|f| matches!(f, ValidationFinding::GeometryMismatch { .. }));
        match mismatch {
            Some(ValidationFinding::GeometryMismatch { expected, actual, .. }) => {
                assert_eq!(*expected, (0, 1, 0));
                assert_eq!(*actual, (0, 2, 0));
            }
            _ => panic!("expected a geometry mismatch finding"),
        }
        assert!(!report.findings.iter().any(ValidationFinding::is_repairable));
    }

    #[test]
    fn test_repair_installs_missing_reverse() {
        let reg = registry_with(&[
            ("start", Position::ORIGIN),
            ("n1", Position::new(0, 1, 0)),
        ]);
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "n1").unwrap();
        graph.remove_connection("n1", Direction::South);

        let report = graph.validate(&reg);
        assert_eq!(graph.repair(&report), 1);
        assert_eq!(graph.connection("n1", Direction::South), Some("start"));
        // Second pass is clean: repair is idempotent
        assert!(graph.validate(&reg).is_clean());
        assert_eq!(graph.repair(&graph.validate(&reg)), 0);
    }

    #[test]
    fn test_repair_leaves_geometry_mismatch_alone() {
        let reg = registry_with(&[
            ("start", Position::ORIGIN),
            ("far", Position::new(0, 2, 0)),
        ]);
        let mut graph = ConnectionGraph::new();
        graph.connect("start", Direction::North, "far").unwrap();

        let report = graph.validate(&reg);
        assert_eq!(graph.repair(&report), 0);
        let after = graph.validate(&reg);
        assert_eq!(report, after);
    }
}
