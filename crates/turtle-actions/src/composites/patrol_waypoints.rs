use serde::{Deserialize, Serialize};
use turtle_bt::{sequence, Node};
use turtle_core::TurtleDriver;

use crate::error::{DefinitionError, Result};
use crate::primitives::GoToPose;

/// Patrol stop. In YAML either `[x, y]`, `[x, y, theta]`, or `{ x, y, theta }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WaypointRepr")]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
}

impl Waypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, theta: None }
    }

    pub fn with_theta(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: Some(theta),
        }
    }

    fn goto(&self) -> GoToPose {
        GoToPose::new(self.x, self.y).with_theta(self.theta)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WaypointRepr {
    Xy(f64, f64),
    Xyt(f64, f64, f64),
    Map {
        x: f64,
        y: f64,
        #[serde(default)]
        theta: Option<f64>,
    },
}

impl From<WaypointRepr> for Waypoint {
    fn from(repr: WaypointRepr) -> Self {
        match repr {
            WaypointRepr::Xy(x, y) => Waypoint::new(x, y),
            WaypointRepr::Xyt(x, y, theta) => Waypoint::with_theta(x, y, theta),
            WaypointRepr::Map { x, y, theta } => Waypoint { x, y, theta },
        }
    }
}

/// Visits waypoints in order; with `loop_back` the first waypoint is visited again at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolWaypoints {
    pub waypoints: Vec<Waypoint>,
    pub loop_back: bool,
}

impl PatrolWaypoints {
    pub fn new(waypoints: Vec<Waypoint>, loop_back: bool) -> Result<Self> {
        if waypoints.is_empty() {
            return Err(DefinitionError::EmptyWaypoints);
        }
        Ok(Self {
            waypoints,
            loop_back,
        })
    }

    /// Every stop in visiting order, including the return to the start.
    pub fn stops(&self) -> Vec<Waypoint> {
        let mut stops = self.waypoints.clone();
        if self.loop_back {
            stops.extend(self.waypoints.first().copied());
        }
        stops
    }

    pub fn build<D>(&self, name: impl Into<String>) -> Node<D>
    where
        D: TurtleDriver,
    {
        let mut children: Vec<Node<D>> = self
            .waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| Node::new(format!("Waypoint_{i}"), wp.goto()))
            .collect();
        if self.loop_back {
            if let Some(first) = self.waypoints.first() {
                children.push(Node::new("Return_to_start", first.goto()));
            }
        }
        sequence(name, children)
    }
}
