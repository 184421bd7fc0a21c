//! Branching policy configuration
//!
//! All procedural tuning lives here rather than in the generator, so
//! tests and callers can pin or reshape the distribution without
//! touching generation code.

use serde::{Deserialize, Serialize};

/// One band of the depth-tiered exit-count distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthTier {
    /// Tier applies while depth <= max_depth
    pub max_depth: u32,
    pub min_exits: u32,
    pub max_exits: u32,
}

impl DepthTier {
    pub const fn new(max_depth: u32, min_exits: u32, max_exits: u32) -> Self {
        Self {
            max_depth,
            min_exits,
            max_exits,
        }
    }
}

/// Tuning knobs for exit generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitPolicy {
    /// Exit-count bands, ordered by ascending max_depth
    pub tiers: Vec<DepthTier>,
    /// Exit range past the deepest tier
    pub fallback_min_exits: u32,
    pub fallback_max_exits: u32,

    /// Dead-end probability grows by this much per depth level...
    pub dead_end_per_depth: f64,
    /// ...up to this cap
    pub dead_end_cap: f64,

    /// Chance of considering a vertical exit at all
    pub vertical_chance: f64,
    /// Within that: chance of an upward exit while depth <= up_max_depth
    pub up_chance: f64,
    pub up_max_depth: u32,
    /// Within that: chance of a downward exit once depth >= down_min_depth
    pub down_chance: f64,
    pub down_min_depth: u32,

    /// Chance of offering a loop edge toward a shallower known room
    pub loop_chance: f64,
    /// Loop edges only appear past this depth
    pub loop_min_depth: u32,
}

impl Default for ExitPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                DepthTier::new(5, 2, 3),
                DepthTier::new(10, 1, 3),
                DepthTier::new(15, 1, 2),
                DepthTier::new(25, 0, 2),
                DepthTier::new(40, 0, 1),
            ],
            fallback_min_exits: 0,
            fallback_max_exits: 1,

            dead_end_per_depth: 0.01,
            dead_end_cap: 0.15,

            vertical_chance: 0.3,
            up_chance: 0.7,
            up_max_depth: 3,
            down_chance: 0.6,
            down_min_depth: 2,

            loop_chance: 0.05,
            loop_min_depth: 3,
        }
    }
}

impl ExitPolicy {
    /// The exit-count range for a depth
    pub fn exit_range(&self, depth: u32) -> (u32, u32) {
        for tier in &self.tiers {
            if depth <= tier.max_depth {
                return (tier.min_exits, tier.max_exits);
            }
        }
        (self.fallback_min_exits, self.fallback_max_exits)
    }

    /// The dead-end probability at a depth
    pub fn dead_end_chance(&self, depth: u32) -> f64 {
        (f64::from(depth) * self.dead_end_per_depth).min(self.dead_end_cap)
    }

    /// A policy with every probabilistic override disabled
    ///
    /// Exit counts still follow the depth tiers; useful for tests that
    /// want the tier distribution unperturbed.
    pub fn tiers_only() -> Self {
        Self {
            dead_end_per_depth: 0.0,
            dead_end_cap: 0.0,
            vertical_chance: 0.0,
            loop_chance: 0.0,
            ..Self::default()
        }
    }
}
