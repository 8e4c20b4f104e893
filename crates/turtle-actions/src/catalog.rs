//! Declarative listing of the actions a tree may use, for generators and validators.
//!
//! The executor never reads the catalog; [`crate::validation`] does.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{DefinitionError, Result};

const CMD_VEL: &str = "/turtle1/cmd_vel";
const POSE: &str = "/turtle1/pose";
const SET_PEN: &str = "/turtle1/set_pen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Float,
    Int,
    Bool,
    String,
    Color,
    Waypoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ParamType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    fn new(name: &str, kind: ParamType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            default: None,
            min: None,
            max: None,
            description: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    fn describe(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Whether `value` lies inside the declared range. Unbounded sides always pass.
    pub fn in_range(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// External resources an action needs from the robot side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
}

impl Resources {
    fn topics(topics: &[&str]) -> Self {
        Self {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            services: Vec::new(),
        }
    }

    fn with_services(mut self, services: &[&str]) -> Self {
        self.services = services.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Union, keeping first-seen order.
    pub fn merge(&mut self, other: &Resources) {
        for topic in &other.topics {
            if !self.topics.contains(topic) {
                self.topics.push(topic.clone());
            }
        }
        for service in &other.services {
            if !self.services.contains(service) {
                self.services.push(service.clone());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub description: String,

    #[serde(default)]
    pub parameters: Vec<ParamSpec>,

    #[serde(default)]
    pub resources: Resources,
}

impl ActionEntry {
    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionCatalog {
    #[serde(default)]
    pub primitives: BTreeMap<String, ActionEntry>,

    #[serde(default)]
    pub composites: BTreeMap<String, ActionEntry>,
}

impl ActionCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&yaml).map_err(|source| DefinitionError::Yaml {
            origin: path.display().to_string(),
            source,
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|source| DefinitionError::Yaml {
            origin: "action catalog".to_string(),
            source,
        })
    }

    pub fn get(&self, action: &str) -> Option<&ActionEntry> {
        self.primitives
            .get(action)
            .or_else(|| self.composites.get(action))
    }

    pub fn contains(&self, action: &str) -> bool {
        self.get(action).is_some()
    }

    /// The actions implemented in this crate.
    pub fn builtin() -> Self {
        let coord = |name: &str| ParamSpec::new(name, ParamType::Float).range(0.0, 11.0);
        let channel = |name: &str| {
            ParamSpec::new(name, ParamType::Int)
                .range(0.0, 255.0)
                .default_value(255)
        };
        let width = || {
            ParamSpec::new("width", ParamType::Int)
                .range(1.0, 10.0)
                .default_value(3)
        };
        let motion = || Resources::topics(&[CMD_VEL, POSE]);

        let mut primitives = BTreeMap::new();
        primitives.insert(
            "GoToPose".to_string(),
            ActionEntry {
                description: "Navigate to an absolute pose with a proportional controller"
                    .to_string(),
                parameters: vec![
                    coord("x").required(),
                    coord("y").required(),
                    ParamSpec::new("theta", ParamType::Float)
                        .range(-std::f64::consts::PI, std::f64::consts::PI)
                        .describe("final heading in radians; position only when omitted"),
                    ParamSpec::new("tolerance_pos", ParamType::Float)
                        .range(0.01, 1.0)
                        .default_value(0.1),
                    ParamSpec::new("tolerance_angle", ParamType::Float)
                        .range(0.01, 1.0)
                        .default_value(0.1),
                    ParamSpec::new("mode", ParamType::String)
                        .default_value("steer")
                        .describe("steer or goal"),
                ],
                resources: motion(),
            },
        );
        primitives.insert(
            "MoveDistance".to_string(),
            ActionEntry {
                description: "Drive straight by a signed distance".to_string(),
                parameters: vec![
                    ParamSpec::new("distance", ParamType::Float)
                        .required()
                        .range(-11.0, 11.0)
                        .describe("negative moves backward"),
                    ParamSpec::new("speed", ParamType::Float)
                        .range(0.1, 2.0)
                        .default_value(1.0),
                ],
                resources: motion(),
            },
        );
        let pen_resources = || Resources::default().with_services(&[SET_PEN]);
        primitives.insert(
            "SetPen".to_string(),
            ActionEntry {
                description: "Configure pen color, width, and on/off state".to_string(),
                parameters: vec![
                    channel("r"),
                    channel("g"),
                    channel("b"),
                    width(),
                    ParamSpec::new("off", ParamType::Bool).default_value(false),
                ],
                resources: pen_resources(),
            },
        );
        primitives.insert(
            "PenUp".to_string(),
            ActionEntry {
                description: "Lift the pen".to_string(),
                parameters: Vec::new(),
                resources: pen_resources(),
            },
        );
        primitives.insert(
            "PenDown".to_string(),
            ActionEntry {
                description: "Lower the pen with the given color".to_string(),
                parameters: vec![channel("r"), channel("g"), channel("b"), width()],
                resources: pen_resources(),
            },
        );
        primitives.insert(
            "GetPose".to_string(),
            ActionEntry {
                description: "Store the current pose on the blackboard".to_string(),
                parameters: vec![ParamSpec::new("blackboard_key", ParamType::String)
                    .default_value(crate::primitives::DEFAULT_POSE_KEY)],
                resources: Resources::topics(&[POSE]),
            },
        );
        primitives.insert(
            "CheckBounds".to_string(),
            ActionEntry {
                description: "Succeed when the turtle is inside a rectangle".to_string(),
                parameters: vec![
                    coord("min_x").default_value(1.0),
                    coord("max_x").default_value(10.0),
                    coord("min_y").default_value(1.0),
                    coord("max_y").default_value(10.0),
                ],
                resources: Resources::topics(&[POSE]),
            },
        );

        let mut composites = BTreeMap::new();
        composites.insert(
            "DrawShape".to_string(),
            ActionEntry {
                description: "Draw a circle, square, or triangle".to_string(),
                parameters: vec![
                    ParamSpec::new("shape_type", ParamType::String)
                        .required()
                        .describe("circle, square, or triangle"),
                    ParamSpec::new("size", ParamType::Float)
                        .required()
                        .range(0.1, 5.5)
                        .describe("radius for circle, side length otherwise"),
                    coord("center_x").default_value(5.5),
                    coord("center_y").default_value(5.5),
                    ParamSpec::new("color", ParamType::Color).default_value(vec![255, 255, 255]),
                    width(),
                    ParamSpec::new("segments", ParamType::Int)
                        .range(3.0, 360.0)
                        .default_value(36),
                ],
                resources: Resources::topics(&[CMD_VEL, POSE]).with_services(&[SET_PEN]),
            },
        );
        composites.insert(
            "PatrolWaypoints".to_string(),
            ActionEntry {
                description: "Visit waypoints in order, optionally returning to the first"
                    .to_string(),
                parameters: vec![
                    ParamSpec::new("waypoints", ParamType::Waypoints).required(),
                    ParamSpec::new("loop", ParamType::Bool).default_value(false),
                ],
                resources: motion(),
            },
        );

        Self {
            primitives,
            composites,
        }
    }
}
