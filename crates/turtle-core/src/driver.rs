//! Boundary with the robot/world.
//!
//! Leaf actions talk to the turtle only through [`TurtleDriver`]; transports (a rosbridge socket,
//! the in-process simulator, a test double) implement it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use thiserror::Error;

use crate::TickContext;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("driver is not connected")]
    Disconnected,

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
}

/// Pose and velocities as reported by the turtle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub linear_velocity: f64,
    pub angular_velocity: f64,
}

impl Pose {
    pub fn at(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta,
            ..Self::default()
        }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}

/// Body-frame velocity command.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Twist {
    pub linear: f64,
    pub angular: f64,
}

impl Twist {
    pub const STOP: Twist = Twist {
        linear: 0.0,
        angular: 0.0,
    };

    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }
}

/// Absolute navigation goal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavGoal {
    pub x: f64,
    pub y: f64,
    pub theta: Option<f64>,
}

/// Pen configuration. `off == true` lifts the pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PenConfig {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub width: u8,
    pub off: bool,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
            width: 3,
            off: false,
        }
    }
}

pub trait TurtleDriver: 'static {
    /// Liveness check used by node setup.
    fn is_alive(&self) -> bool;

    fn pose(&self) -> Result<Pose, DriverError>;

    fn send_velocity(&mut self, twist: Twist) -> Result<(), DriverError>;

    fn send_goal(&mut self, goal: NavGoal) -> Result<(), DriverError>;

    fn set_pen(&mut self, pen: PenConfig) -> Result<(), DriverError>;

    /// Called once after every root tick. Simulated worlds integrate one tick period here; real
    /// transports advance on their own clock.
    fn advance(&mut self, _ctx: &TickContext) {}
}

/// Wrap an angle into `[-pi, pi]`. Angles already in range are returned unchanged; non-finite
/// input yields NaN.
pub fn normalize_angle(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        return angle;
    }
    (angle + PI).rem_euclid(2.0 * PI) - PI
}
