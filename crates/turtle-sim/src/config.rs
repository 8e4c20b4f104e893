use serde::{Deserialize, Serialize};
use turtle_core::PenConfig;

/// Side length of the arena; positions are clamped to `[0, ARENA_SIZE]` on both axes.
pub const ARENA_SIZE: f64 = 11.088889;

/// Spawn coordinate of the first turtle, the arena center.
pub const SPAWN_XY: f64 = 5.544445;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub theta: f64,
}

impl Default for SpawnPose {
    fn default() -> Self {
        Self {
            x: SPAWN_XY,
            y: SPAWN_XY,
            theta: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub spawn: SpawnPose,
    pub arena_size: f64,

    /// Straight-line speed used when following an absolute navigation goal.
    pub goal_speed: f64,

    /// Pen state at spawn.
    pub pen: PenConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnPose::default(),
            arena_size: ARENA_SIZE,
            goal_speed: 2.0,
            pen: PenConfig::default(),
        }
    }
}
