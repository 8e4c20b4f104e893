use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use turtle_bt::{sequence, Node};
use turtle_core::TurtleDriver;

use crate::error::{DefinitionError, Result};
use crate::primitives::{GoToPose, SetPen};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(Shape::Circle),
            "square" => Ok(Shape::Square),
            "triangle" => Ok(Shape::Triangle),
            _ => Err(DefinitionError::UnknownShape(s.to_string())),
        }
    }
}

/// Upper bound on circle sampling; each sample becomes one navigation node.
pub const MAX_SEGMENTS: u32 = 360;

/// Draws a shape with the pen down: `SetPen` followed by one `GoToPose` per path point.
///
/// `size` is the radius of a circle and the side length of a square or triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawShape {
    pub shape: Shape,
    pub size: f64,
    pub center: (f64, f64),
    pub color: (u8, u8, u8),
    pub width: u8,
    pub segments: u32,
}

impl DrawShape {
    pub fn new(shape: Shape, size: f64) -> Self {
        Self {
            shape,
            size,
            center: (5.5, 5.5),
            color: (255, 255, 255),
            width: 3,
            segments: 36,
        }
    }

    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.center = (x, y);
        self
    }

    pub fn with_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = (r, g, b);
        self
    }

    pub fn with_width(mut self, width: u8) -> Self {
        self.width = width;
        self
    }

    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(DefinitionError::InvalidShape(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        if self.shape == Shape::Circle && !(1..=MAX_SEGMENTS).contains(&self.segments) {
            return Err(DefinitionError::InvalidShape(format!(
                "circle needs between 1 and {MAX_SEGMENTS} segments, got {}",
                self.segments
            )));
        }
        Ok(())
    }

    /// Closed outline: the last point equals the first.
    pub fn path(&self) -> Vec<(f64, f64)> {
        let (cx, cy) = self.center;
        match self.shape {
            Shape::Circle => {
                let mut path: Vec<(f64, f64)> = (0..self.segments)
                    .map(|i| {
                        let angle = 2.0 * PI * f64::from(i) / f64::from(self.segments);
                        (cx + self.size * angle.cos(), cy + self.size * angle.sin())
                    })
                    .collect();
                if let Some(&first) = path.first() {
                    path.push(first);
                }
                path
            }
            Shape::Square => {
                let half = self.size / 2.0;
                vec![
                    (cx - half, cy - half),
                    (cx + half, cy - half),
                    (cx + half, cy + half),
                    (cx - half, cy + half),
                    (cx - half, cy - half),
                ]
            }
            Shape::Triangle => {
                let height = self.size * 3f64.sqrt() / 2.0;
                let top = (cx, cy + 2.0 * height / 3.0);
                vec![
                    top,
                    (cx - self.size / 2.0, cy - height / 3.0),
                    (cx + self.size / 2.0, cy - height / 3.0),
                    top,
                ]
            }
        }
    }

    pub fn build<D>(&self, name: impl Into<String>) -> Result<Node<D>>
    where
        D: TurtleDriver,
    {
        self.validate()?;
        let shape = self.shape.as_str();
        let (r, g, b) = self.color;

        let mut children = vec![Node::new(
            format!("SetPen_{shape}"),
            SetPen::pen_down(r, g, b, self.width),
        )];
        children.extend(
            self.path()
                .into_iter()
                .enumerate()
                .map(|(i, (x, y))| Node::new(format!("{shape}_point_{i}"), GoToPose::new(x, y))),
        );
        Ok(sequence(name, children))
    }
}
