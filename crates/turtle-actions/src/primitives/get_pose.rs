use turtle_bt::{Behaviour, SetupError};
use turtle_core::{BbKey, Blackboard, Pose, Status, TickContext, TurtleDriver};

use super::require_alive;

/// What [`GetPose`] writes to the blackboard.
pub type PoseRecord = Pose;

pub const DEFAULT_POSE_KEY: &str = "current_pose";

/// Sensing leaf: copies the current pose onto the blackboard.
#[derive(Debug, Clone)]
pub struct GetPose {
    key: BbKey<PoseRecord>,
}

impl Default for GetPose {
    fn default() -> Self {
        Self::new(DEFAULT_POSE_KEY)
    }
}

impl GetPose {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: BbKey::named(key.into()),
        }
    }

    pub fn key(&self) -> &BbKey<PoseRecord> {
        &self.key
    }
}

impl<D> Behaviour<D> for GetPose
where
    D: TurtleDriver,
{
    fn setup(&mut self, driver: &mut D) -> Result<(), SetupError> {
        require_alive(driver)
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        driver: &mut D,
        blackboard: &mut Blackboard,
    ) -> Status {
        match driver.pose() {
            Ok(pose) => {
                tracing::debug!(key = self.key.name(), x = pose.x, y = pose.y, "pose stored");
                blackboard.set(&self.key, pose);
                Status::Success
            }
            Err(err) => {
                tracing::warn!(error = %err, "pose unavailable");
                Status::Failure
            }
        }
    }
}
