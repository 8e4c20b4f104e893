//! Leaf actions. Each wraps one driver capability and a completion test.
//!
//! Driver errors never escape a leaf: they are logged and reported as `Failure`.

mod check_bounds;
mod get_pose;
mod goto_pose;
mod move_distance;
mod set_pen;

pub use check_bounds::CheckBounds;
pub use get_pose::{GetPose, PoseRecord, DEFAULT_POSE_KEY};
pub use goto_pose::{
    Gains, GoToPose, NavigationMode, DEFAULT_ANGLE_TOLERANCE, DEFAULT_POS_TOLERANCE,
};
pub use move_distance::MoveDistance;
pub use set_pen::SetPen;

use turtle_bt::SetupError;
use turtle_core::{DriverError, TurtleDriver, Twist};

/// Setup shared by every leaf: the driver must be reachable before the first tick.
pub(crate) fn require_alive<D>(driver: &D) -> Result<(), SetupError>
where
    D: TurtleDriver,
{
    if driver.is_alive() {
        Ok(())
    } else {
        Err(DriverError::Disconnected.into())
    }
}

/// Best-effort stop used from `terminate`, where there is no status left to report.
pub(crate) fn stop<D>(driver: &mut D, node: &'static str)
where
    D: TurtleDriver,
{
    if let Err(err) = driver.send_velocity(Twist::STOP) {
        tracing::debug!(action = node, error = %err, "stop command not delivered");
    }
}
