use turtle_bt::{Behaviour, SetupError};
use turtle_core::{Blackboard, Status, TickContext, TurtleDriver};

use super::require_alive;

/// Condition: the turtle lies inside the closed rectangle. Resolves on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for CheckBounds {
    fn default() -> Self {
        Self::new(1.0, 10.0, 1.0, 10.0)
    }
}

impl CheckBounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

impl<D> Behaviour<D> for CheckBounds
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
        _blackboard: &mut Blackboard,
    ) -> Status {
        let pose = match driver.pose() {
            Ok(pose) => pose,
            Err(err) => {
                tracing::warn!(error = %err, "pose unavailable");
                return Status::Failure;
            }
        };
        if self.contains(pose.x, pose.y) {
            tracing::info!(x = pose.x, y = pose.y, "Turtle in bounds");
            Status::Success
        } else {
            tracing::warn!(x = pose.x, y = pose.y, bounds = ?self, "Turtle out of bounds");
            Status::Failure
        }
    }
}
