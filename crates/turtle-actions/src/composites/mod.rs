//! Subtree builders: memory sequences of primitive leaves, assembled at construction time.

mod draw_shape;
mod patrol_waypoints;

pub use draw_shape::{DrawShape, Shape, MAX_SEGMENTS};
pub use patrol_waypoints::{PatrolWaypoints, Waypoint};
