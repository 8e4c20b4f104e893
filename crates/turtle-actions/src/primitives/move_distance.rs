use turtle_bt::{Behaviour, SetupError};
use turtle_core::{Blackboard, Status, TickContext, TurtleDriver, Twist};

use super::{require_alive, stop};

/// Drive straight for `distance` (negative moves backward), measured from the pose at entry.
#[derive(Debug, Clone)]
pub struct MoveDistance {
    distance: f64,
    speed: f64,
    start: Option<(f64, f64)>,
}

impl MoveDistance {
    pub fn new(distance: f64) -> Self {
        Self::with_speed(distance, 1.0)
    }

    pub fn with_speed(distance: f64, speed: f64) -> Self {
        Self {
            distance,
            speed: speed.abs(),
            start: None,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

impl<D> Behaviour<D> for MoveDistance
where
    D: TurtleDriver,
{
    fn setup(&mut self, driver: &mut D) -> Result<(), SetupError> {
        require_alive(driver)
    }

    fn initialise(&mut self, _ctx: &TickContext, driver: &mut D, _blackboard: &mut Blackboard) {
        self.start = match driver.pose() {
            Ok(pose) => Some((pose.x, pose.y)),
            Err(err) => {
                tracing::warn!(error = %err, "start pose unavailable");
                None
            }
        };
        if let Some((x, y)) = self.start {
            tracing::info!(distance = self.distance, speed = self.speed, x, y, "Starting to move");
        }
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        driver: &mut D,
        _blackboard: &mut Blackboard,
    ) -> Status {
        let Some((start_x, start_y)) = self.start else {
            tracing::error!("start position not recorded");
            return Status::Failure;
        };
        let pose = match driver.pose() {
            Ok(pose) => pose,
            Err(err) => {
                tracing::warn!(error = %err, "pose unavailable");
                return Status::Failure;
            }
        };

        let travelled = pose.distance_to(start_x, start_y);
        if travelled >= self.distance.abs() {
            tracing::info!(travelled, "Completed movement");
            return Status::Success;
        }

        let linear = self.speed.copysign(self.distance);
        match driver.send_velocity(Twist::new(linear, 0.0)) {
            Ok(()) => Status::Running,
            Err(err) => {
                tracing::warn!(error = %err, "velocity command failed");
                Status::Failure
            }
        }
    }

    fn terminate(
        &mut self,
        _ctx: &TickContext,
        driver: &mut D,
        _blackboard: &mut Blackboard,
        _new_status: Status,
    ) {
        stop(driver, "MoveDistance");
        self.start = None;
    }
}
