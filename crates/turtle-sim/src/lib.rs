//! Simulated turtle: unicycle kinematics in a square arena with a drawing pen.

#![forbid(unsafe_code)]

pub mod config;
pub mod turtle;

pub use config::{SimConfig, SpawnPose, ARENA_SIZE, SPAWN_XY};
pub use turtle::{SimTurtle, TrailSegment};
