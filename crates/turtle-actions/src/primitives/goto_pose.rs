use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use turtle_bt::{Behaviour, SetupError};
use turtle_core::{
    normalize_angle, Blackboard, NavGoal, Pose, Status, TickContext, TurtleDriver, Twist,
};

use super::{require_alive, stop};

pub const DEFAULT_POS_TOLERANCE: f64 = 0.1;
pub const DEFAULT_ANGLE_TOLERANCE: f64 = 0.1;

/// How [`GoToPose`] moves the turtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Proportional velocity command every tick.
    #[default]
    Steer,
    /// One absolute goal on entry, then poll the pose.
    Goal,
}

/// Proportional controller gains and saturation limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub linear: f64,
    pub angular: f64,
    pub max_linear: f64,
    pub max_angular: f64,
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            linear: 1.0,
            angular: 2.0,
            max_linear: 2.0,
            max_angular: 2.0,
        }
    }
}

/// Navigate to `(x, y)` and, when `theta` is set, turn to face it.
#[derive(Debug, Clone)]
pub struct GoToPose {
    x: f64,
    y: f64,
    theta: Option<f64>,
    tolerance_pos: f64,
    tolerance_angle: f64,
    mode: NavigationMode,
    gains: Gains,
    goal_rejected: bool,
}

impl GoToPose {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            theta: None,
            tolerance_pos: DEFAULT_POS_TOLERANCE,
            tolerance_angle: DEFAULT_ANGLE_TOLERANCE,
            mode: NavigationMode::default(),
            gains: Gains::default(),
            goal_rejected: false,
        }
    }

    pub fn with_theta(mut self, theta: Option<f64>) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_tolerances(mut self, position: f64, angle: f64) -> Self {
        self.tolerance_pos = position;
        self.tolerance_angle = angle;
        self
    }

    pub fn with_mode(mut self, mode: NavigationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_gains(mut self, gains: Gains) -> Self {
        self.gains = gains;
        self
    }

    pub fn target(&self) -> (f64, f64, Option<f64>) {
        (self.x, self.y, self.theta)
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Target and tolerances must be finite; tolerances must also be positive.
    pub fn validate(&self) -> Result<(), String> {
        let target = [Some(self.x), Some(self.y), self.theta];
        if target.iter().flatten().any(|v| !v.is_finite()) {
            return Err(format!(
                "target ({}, {}, {:?}) must be finite",
                self.x, self.y, self.theta
            ));
        }
        for (name, value) in [
            ("tolerance_pos", self.tolerance_pos),
            ("tolerance_angle", self.tolerance_angle),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive number, got {value}"));
            }
        }
        Ok(())
    }

    fn reached(&self, pose: &Pose) -> Option<f64> {
        if pose.distance_to(self.x, self.y) >= self.tolerance_pos {
            return None;
        }
        Some(self.theta.map_or(0.0, |theta| {
            normalize_angle(normalize_angle(theta) - pose.theta)
        }))
    }

    /// Velocity command for the current pose. Turns in place while the target is behind the
    /// turtle or while only the final heading is left to correct.
    pub fn command(&self, pose: &Pose) -> Twist {
        let g = &self.gains;
        let turn = |error: f64| (g.angular * error).clamp(-g.max_angular, g.max_angular);

        if let Some(heading_error) = self.reached(pose) {
            return Twist::new(0.0, turn(heading_error));
        }

        let dx = self.x - pose.x;
        let dy = self.y - pose.y;
        let heading_error = normalize_angle(dy.atan2(dx) - pose.theta);
        if heading_error.abs() > FRAC_PI_2 {
            return Twist::new(0.0, turn(heading_error));
        }

        let distance = dx.hypot(dy);
        Twist::new((g.linear * distance).min(g.max_linear), turn(heading_error))
    }
}

impl<D> Behaviour<D> for GoToPose
where
    D: TurtleDriver,
{
    fn setup(&mut self, driver: &mut D) -> Result<(), SetupError> {
        require_alive(driver)?;
        self.validate().map_err(SetupError::Invalid)?;
        tracing::debug!(x = self.x, y = self.y, theta = ?self.theta, "GoToPose ready");
        Ok(())
    }

    fn initialise(&mut self, _ctx: &TickContext, driver: &mut D, _blackboard: &mut Blackboard) {
        tracing::info!(
            x = self.x,
            y = self.y,
            theta = ?self.theta,
            mode = ?self.mode,
            "Starting navigation"
        );
        self.goal_rejected = false;
        if self.mode == NavigationMode::Goal {
            let goal = NavGoal {
                x: self.x,
                y: self.y,
                theta: self.theta,
            };
            if let Err(err) = driver.send_goal(goal) {
                tracing::warn!(error = %err, "navigation goal not accepted");
                self.goal_rejected = true;
            }
        }
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        driver: &mut D,
        _blackboard: &mut Blackboard,
    ) -> Status {
        if self.goal_rejected {
            return Status::Failure;
        }
        let pose = match driver.pose() {
            Ok(pose) => pose,
            Err(err) => {
                tracing::warn!(error = %err, "pose unavailable");
                return Status::Failure;
            }
        };
        if ![pose.x, pose.y, pose.theta].iter().all(|v| v.is_finite()) {
            tracing::warn!(?pose, "driver reported a non-finite pose");
            return Status::Failure;
        }

        if let Some(heading_error) = self.reached(&pose) {
            if heading_error.abs() < self.tolerance_angle {
                tracing::info!(x = self.x, y = self.y, theta = ?self.theta, "Reached target pose");
                return Status::Success;
            }
        }

        if self.mode == NavigationMode::Steer {
            if let Err(err) = driver.send_velocity(self.command(&pose)) {
                tracing::warn!(error = %err, "velocity command failed");
                return Status::Failure;
            }
        }
        Status::Running
    }

    fn terminate(
        &mut self,
        _ctx: &TickContext,
        driver: &mut D,
        _blackboard: &mut Blackboard,
        _new_status: Status,
    ) {
        stop(driver, "GoToPose");
    }
}
