//! Procedural exit generation
//!
//! Two responsibilities: materializing the neighbor a move lands in
//! (converging onto an existing room when two paths geometrically meet),
//! and deciding which fresh exits a newly entered room offers. Every
//! probabilistic choice draws from the injected RNG; candidate lists are
//! built in fixed direction order so outcomes never depend on map
//! iteration.

use hashbrown::HashMap;

use dv_rng::DelveRng;

use crate::direction::Direction;
use crate::errors::SpatialError;
use crate::graph::ConnectionGraph;
use crate::ident::synthesize_id;
use crate::policy::ExitPolicy;
use crate::registry::PositionRegistry;
use crate::room::RoomState;

/// Materialize the room one step from `from` in `direction`
///
/// If the target position is already occupied, the existing room is
/// connected and returned - two paths converging on the same lattice
/// point always resolve to one room. Otherwise a new room is registered
/// at the target with the given depth. Either way the edge is
/// bidirectional on return, and a failure leaves registry and graph
/// untouched.
pub(crate) fn generate_connected_room(
    registry: &mut PositionRegistry,
    graph: &mut ConnectionGraph,
    states: &mut HashMap<String, RoomState>,
    from: &str,
    direction: Direction,
    depth: u32,
) -> Result<String, SpatialError> {
    let from_pos = registry
        .position_of(from)
        .ok_or_else(|| SpatialError::UnknownRoom {
            id: from.to_string(),
        })?;
    let target = from_pos.step(direction);

    // Convergence: the position is taken, connect instead of duplicating
    if let Some(existing) = registry.room_at(target) {
        let existing = existing.to_string();
        graph.connect(from, direction, &existing)?;
        return Ok(existing);
    }

    let id = synthesize_id(target, depth);

    // Validate the edge before registering so a conflict cannot leave a
    // half-created room behind.
    graph.check_connect(from, direction, &id)?;
    registry.add_room(&id, target)?;
    graph.connect(from, direction, &id)?;
    states.insert(
        id.clone(),
        RoomState {
            depth,
            visited: false,
        },
    );
    Ok(id)
}

/// Choose which fresh exits a room offers
///
/// Returns directions only; nothing is instantiated until the player
/// actually moves. The entry direction's opposite is reserved for the
/// backtrack edge that already exists, and already-connected directions
/// are never re-offered.
pub(crate) fn generate_logical_exits(
    registry: &PositionRegistry,
    graph: &ConnectionGraph,
    states: &HashMap<String, RoomState>,
    policy: &ExitPolicy,
    rng: &mut DelveRng,
    room: &str,
    max_exits: u32,
    came_from: Option<Direction>,
) -> Result<Vec<Direction>, SpatialError> {
    let room_pos = registry
        .position_of(room)
        .ok_or_else(|| SpatialError::UnknownRoom {
            id: room.to_string(),
        })?;
    let depth = states.get(room).map_or(0, |s| s.depth);
    let reserved = came_from.map(|d| d.opposite());

    let mut eligible: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| Some(*d) != reserved)
        .filter(|d| graph.connection(room, *d).is_none())
        .collect();

    let (min_exits, max_tier) = policy.exit_range(depth);
    let mut count = rng.range(min_exits, max_tier) as usize;
    count = count.min(max_exits as usize).min(eligible.len());

    // Deepening dead-end chance can zero the room out entirely
    if rng.chance(policy.dead_end_chance(depth)) {
        return Ok(Vec::new());
    }

    rng.shuffle(&mut eligible);
    let mut chosen: Vec<Direction> = eligible[..count].to_vec();

    // Vertical bias, independent of the tier sample: stairs up near the
    // surface, shafts down once the dungeon deepens
    if rng.chance(policy.vertical_chance) {
        if depth <= policy.up_max_depth
            && !chosen.contains(&Direction::Up)
            && eligible.contains(&Direction::Up)
            && rng.chance(policy.up_chance)
        {
            chosen.push(Direction::Up);
        }
        if depth >= policy.down_min_depth
            && !chosen.contains(&Direction::Down)
            && eligible.contains(&Direction::Down)
            && rng.chance(policy.down_chance)
        {
            chosen.push(Direction::Down);
        }
    }

    // Rare loop edge toward a visited, strictly shallower neighbor; the
    // edge materializes later through normal convergence, never by
    // fabricating geometry
    if depth > policy.loop_min_depth && rng.chance(policy.loop_chance) {
        let loop_candidates: Vec<Direction> = eligible
            .iter()
            .copied()
            .filter(|d| !chosen.contains(d))
            .filter(|d| {
                registry
                    .room_at(room_pos.step(*d))
                    .and_then(|id| states.get(id))
                    .is_some_and(|s| s.visited && s.depth < depth)
            })
            .collect();
        if let Some(dir) = rng.choose(&loop_candidates) {
            chosen.push(*dir);
        }
    }

    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    struct World {
        registry: PositionRegistry,
        graph: ConnectionGraph,
        states: HashMap<String, RoomState>,
    }

    fn seeded_world() -> World {
        let mut registry = PositionRegistry::new();
        registry.add_room("start", Position::ORIGIN).unwrap();
        let mut states = HashMap::new();
        states.insert(
            "start".to_string(),
            RoomState {
                depth: 0,
                visited: true,
            },
        );
        World {
            registry,
            graph: ConnectionGraph::new(),
            states,
        }
    }

    #[test]
    fn test_new_room_is_registered_and_connected() {
        let mut w = seeded_world();
        let id = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            "start",
            Direction::North,
            1,
        )
        .unwrap();
        assert_eq!(id, "n1");
        assert_eq!(w.registry.position_of("n1"), Some(Position::new(0, 1, 0)));
        assert_eq!(w.graph.connection("start", Direction::North), Some("n1"));
        assert_eq!(w.graph.connection("n1", Direction::South), Some("start"));
        assert_eq!(w.states["n1"].depth, 1);
        assert!(!w.states["n1"].visited);
    }

    #[test]
    fn test_unknown_source_room() {
        let mut w = seeded_world();
        let err = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            "ghost",
            Direction::North,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, SpatialError::UnknownRoom { .. }));
    }

    #[test]
    fn test_convergence_reuses_existing_room() {
        let mut w = seeded_world();
        // Square walk: north then east from start's two neighbors must
        // meet in one room at (1, 1, 0)
        let b = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            "start",
            Direction::North,
            1,
        )
        .unwrap();
        let c = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            "start",
            Direction::East,
            1,
        )
        .unwrap();
        let via_b = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            &b,
            Direction::East,
            2,
        )
        .unwrap();
        let via_c = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            &c,
            Direction::North,
            2,
        )
        .unwrap();
        assert_eq!(via_b, via_c);
        assert_eq!(w.registry.len(), 4);
        // The corner room keeps the depth it was first created at
        assert_eq!(w.states[&via_b].depth, 2);
    }

    #[test]
    fn test_backtrack_resolves_to_origin() {
        let mut w = seeded_world();
        let n1 = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            "start",
            Direction::North,
            1,
        )
        .unwrap();
        let back = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            &n1,
            Direction::South,
            2,
        )
        .unwrap();
        assert_eq!(back, "start");
        assert_eq!(w.registry.len(), 2);
    }

    #[test]
    fn test_exits_exclude_entry_and_connected() {
        let mut w = seeded_world();
        let n1 = generate_connected_room(
            &mut w.registry,
            &mut w.graph,
            &mut w.states,
            "start",
            Direction::North,
            1,
        )
        .unwrap();
        let mut rng = DelveRng::new(1);
        for _ in 0..200 {
            let exits = generate_logical_exits(
                &w.registry,
                &w.graph,
                &w.states,
                &ExitPolicy::default(),
                &mut rng,
                &n1,
                6,
                Some(Direction::North),
            )
            .unwrap();
            // South is both the entry backtrack and already connected
            assert!(!exits.contains(&Direction::South));
            let mut dedup = exits.clone();
            dedup.sort_by_key(|d| *d as u8);
            dedup.dedup();
            assert_eq!(dedup.len(), exits.len());
        }
    }

    #[test]
    fn test_exits_respect_max_exits() {
        let w = seeded_world();
        let mut rng = DelveRng::new(5);
        for _ in 0..100 {
            let exits = generate_logical_exits(
                &w.registry,
                &w.graph,
                &w.states,
                &ExitPolicy::tiers_only(),
                &mut rng,
                "start",
                1,
                None,
            )
            .unwrap();
            assert!(exits.len() <= 1);
        }
    }

    #[test]
    fn test_exits_unknown_room() {
        let w = seeded_world();
        let mut rng = DelveRng::new(5);
        let err = generate_logical_exits(
            &w.registry,
            &w.graph,
            &w.states,
            &ExitPolicy::default(),
            &mut rng,
            "ghost",
            3,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SpatialError::UnknownRoom { .. }));
    }
}
