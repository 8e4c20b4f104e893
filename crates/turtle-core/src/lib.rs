//! Status model, blackboard, and driver interface for turtle behavior trees.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod driver;
pub mod status;
pub mod tick;

pub use blackboard::{BbKey, Blackboard};
pub use driver::{normalize_angle, DriverError, NavGoal, PenConfig, Pose, TurtleDriver, Twist};
pub use status::Status;
pub use tick::TickContext;
