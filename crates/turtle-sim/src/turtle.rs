use turtle_core::{
    normalize_angle, DriverError, NavGoal, PenConfig, Pose, TickContext, TurtleDriver, Twist,
};

use crate::config::SimConfig;

const ARRIVAL_EPSILON: f64 = 1e-9;

/// One stroke left by the pen between two consecutive integration steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub rgb: (u8, u8, u8),
    pub width: u8,
}

/// Simulated turtle.
///
/// Velocity commands persist until replaced. An absolute goal drives the turtle straight at it
/// with `goal_speed` and is dropped on arrival; a velocity command cancels it.
/// Every driver call fails with [`DriverError::Disconnected`] while the turtle is disconnected.
#[derive(Debug, Clone)]
pub struct SimTurtle {
    config: SimConfig,
    pose: Pose,
    command: Twist,
    goal: Option<NavGoal>,
    pen: PenConfig,
    trail: Vec<TrailSegment>,
    connected: bool,
    commands_sent: u64,
}

impl Default for SimTurtle {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimTurtle {
    pub fn new(config: SimConfig) -> Self {
        let pose = Pose::at(config.spawn.x, config.spawn.y, config.spawn.theta);
        let pen = config.pen;
        Self {
            config,
            pose,
            command: Twist::STOP,
            goal: None,
            pen,
            trail: Vec::new(),
            connected: true,
            commands_sent: 0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current pose, readable even while disconnected.
    pub fn current_pose(&self) -> Pose {
        self.pose
    }

    pub fn last_command(&self) -> Twist {
        self.command
    }

    pub fn active_goal(&self) -> Option<NavGoal> {
        self.goal
    }

    pub fn pen(&self) -> PenConfig {
        self.pen
    }

    pub fn trail(&self) -> &[TrailSegment] {
        &self.trail
    }

    /// Number of velocity commands and goals accepted so far.
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    /// Move the turtle without drawing, and drop any motion in progress.
    pub fn teleport(&mut self, x: f64, y: f64, theta: f64) {
        let max = self.config.arena_size;
        self.pose = Pose::at(x.clamp(0.0, max), y.clamp(0.0, max), normalize_angle(theta));
        self.command = Twist::STOP;
        self.goal = None;
    }

    pub fn disconnect(&mut self) {
        tracing::warn!("simulated turtle disconnected");
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    fn ensure_connected(&self) -> Result<(), DriverError> {
        if self.connected {
            Ok(())
        } else {
            Err(DriverError::Disconnected)
        }
    }

    fn in_arena(&self, x: f64, y: f64) -> bool {
        let max = self.config.arena_size;
        (0.0..=max).contains(&x) && (0.0..=max).contains(&y)
    }

    fn step_towards_goal(&mut self, goal: NavGoal, dt: f64) -> (f64, f64) {
        let dx = goal.x - self.pose.x;
        let dy = goal.y - self.pose.y;
        let remaining = dx.hypot(dy);
        let step = (self.config.goal_speed.max(0.0) * dt).min(remaining);

        if remaining - step <= ARRIVAL_EPSILON {
            if let Some(theta) = goal.theta {
                self.pose.theta = normalize_angle(theta);
            }
            self.goal = None;
            return (goal.x, goal.y);
        }

        self.pose.theta = dy.atan2(dx);
        (
            self.pose.x + dx / remaining * step,
            self.pose.y + dy / remaining * step,
        )
    }
}

impl TurtleDriver for SimTurtle {
    fn is_alive(&self) -> bool {
        self.connected
    }

    fn pose(&self) -> Result<Pose, DriverError> {
        self.ensure_connected()?;
        Ok(self.pose)
    }

    fn send_velocity(&mut self, twist: Twist) -> Result<(), DriverError> {
        self.ensure_connected()?;
        if !twist.linear.is_finite() || !twist.angular.is_finite() {
            return Err(DriverError::Rejected {
                operation: "send_velocity",
                reason: format!("non-finite command {twist:?}"),
            });
        }
        self.command = twist;
        self.goal = None;
        self.commands_sent += 1;
        Ok(())
    }

    fn send_goal(&mut self, goal: NavGoal) -> Result<(), DriverError> {
        self.ensure_connected()?;
        if !self.in_arena(goal.x, goal.y) {
            return Err(DriverError::Rejected {
                operation: "send_goal",
                reason: format!("({}, {}) is outside the arena", goal.x, goal.y),
            });
        }
        self.goal = Some(goal);
        self.command = Twist::STOP;
        self.commands_sent += 1;
        Ok(())
    }

    fn set_pen(&mut self, pen: PenConfig) -> Result<(), DriverError> {
        self.ensure_connected()?;
        if pen.width == 0 {
            return Err(DriverError::Rejected {
                operation: "set_pen",
                reason: "width must be at least 1".to_string(),
            });
        }
        self.pen = pen;
        Ok(())
    }

    fn advance(&mut self, ctx: &TickContext) {
        if !self.connected {
            return;
        }
        let dt = ctx.dt_seconds.max(0.0);
        let from = (self.pose.x, self.pose.y);

        let (x, y) = match self.goal {
            Some(goal) => {
                let before = (self.pose.x, self.pose.y);
                let next = self.step_towards_goal(goal, dt);
                let travelled = (next.0 - before.0).hypot(next.1 - before.1);
                self.pose.linear_velocity = travelled / dt.max(f64::EPSILON);
                self.pose.angular_velocity = 0.0;
                next
            }
            None => {
                self.pose.theta = normalize_angle(self.pose.theta + self.command.angular * dt);
                self.pose.linear_velocity = self.command.linear;
                self.pose.angular_velocity = self.command.angular;
                (
                    self.pose.x + self.command.linear * self.pose.theta.cos() * dt,
                    self.pose.y + self.command.linear * self.pose.theta.sin() * dt,
                )
            }
        };

        let max = self.config.arena_size;
        let clamped = (x.clamp(0.0, max), y.clamp(0.0, max));
        if clamped != (x, y) {
            tracing::debug!(x, y, "turtle hit the arena wall");
        }
        self.pose.x = clamped.0;
        self.pose.y = clamped.1;

        if !self.pen.off && from != clamped {
            self.trail.push(TrailSegment {
                from,
                to: clamped,
                rgb: (self.pen.r, self.pen.g, self.pen.b),
                width: self.pen.width,
            });
        }
    }
}
