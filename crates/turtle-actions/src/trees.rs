//! Tree definitions: the zero-argument factory contract and the trees that ship with the crate.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use turtle_bt::{sequence, Node};
use turtle_core::TurtleDriver;

use crate::catalog::ActionCatalog;
use crate::composites::{PatrolWaypoints, Waypoint};
use crate::definition::TreeSpec;
use crate::error::{DefinitionError, Result};
use crate::primitives::{CheckBounds, GetPose, GoToPose, SetPen};
use crate::registry::ActionRegistry;
use crate::validation::{check_definition, check_tree, CheckReport};

pub const BUILTIN_PREFIX: &str = "builtin:";

/// A loadable tree: builds a fresh, unstarted root on every call.
pub trait TreeDefinition<D>
where
    D: TurtleDriver,
{
    fn name(&self) -> &str;

    fn create_root(&self) -> Result<Node<D>>;

    /// Check the tree against `catalog`.
    ///
    /// The default only runs the structural checks on a freshly built root: a tree built in Rust
    /// has no declarative parameters to hold against the catalog, so its report lists no
    /// parameter warnings and no resources. Definitions that carry parameters override this.
    fn check(&self, _catalog: &ActionCatalog) -> CheckReport {
        match self.create_root() {
            Ok(root) => check_tree(self.name(), &root),
            Err(err) => CheckReport::failed(self.name(), err.to_string()),
        }
    }
}

/// A tree written in Rust.
pub struct BuiltinTree<D>
where
    D: TurtleDriver,
{
    pub name: &'static str,
    pub description: &'static str,
    factory: fn() -> Result<Node<D>>,
}

impl<D> BuiltinTree<D>
where
    D: TurtleDriver,
{
    pub fn all() -> Vec<Self> {
        vec![
            Self {
                name: "draw_square",
                description: "Draw a red 2x2 square starting at (3, 3)",
                factory: draw_square::<D>,
            },
            Self {
                name: "patrol_waypoints",
                description: "Check bounds, then patrol a rectangle and return to start",
                factory: patrol_waypoints::<D>,
            },
        ]
    }

    pub fn find(name: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|tree| tree.name == name)
            .ok_or_else(|| DefinitionError::UnknownTree(name.to_string()))
    }
}

impl<D> TreeDefinition<D> for BuiltinTree<D>
where
    D: TurtleDriver,
{
    fn name(&self) -> &str {
        self.name
    }

    fn create_root(&self) -> Result<Node<D>> {
        (self.factory)()
    }
}

/// A YAML definition resolved through an action registry.
pub struct RegistryTree<D>
where
    D: TurtleDriver,
{
    spec: TreeSpec,
    registry: ActionRegistry<D>,
}

impl<D> RegistryTree<D>
where
    D: TurtleDriver,
{
    pub fn new(spec: TreeSpec, registry: ActionRegistry<D>) -> Self {
        Self { spec, registry }
    }

    pub fn spec(&self) -> &TreeSpec {
        &self.spec
    }
}

impl<D> TreeDefinition<D> for RegistryTree<D>
where
    D: TurtleDriver,
{
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn create_root(&self) -> Result<Node<D>> {
        self.registry.build_tree(&self.spec)
    }

    fn check(&self, catalog: &ActionCatalog) -> CheckReport {
        check_definition(&self.spec, catalog, &self.registry)
    }
}

/// Where a tree comes from: `builtin:<name>` or a YAML file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    Builtin(String),
    File(PathBuf),
}

impl FromStr for TreeSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.strip_prefix(BUILTIN_PREFIX) {
            Some(name) => TreeSource::Builtin(name.to_string()),
            None => TreeSource::File(PathBuf::from(s)),
        })
    }
}

impl fmt::Display for TreeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSource::Builtin(name) => write!(f, "{BUILTIN_PREFIX}{name}"),
            TreeSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl TreeSource {
    pub fn load<D>(&self) -> Result<Box<dyn TreeDefinition<D>>>
    where
        D: TurtleDriver,
    {
        match self {
            TreeSource::Builtin(name) => Ok(Box::new(BuiltinTree::<D>::find(name)?)),
            TreeSource::File(path) => {
                let spec = TreeSpec::load(path)?;
                Ok(Box::new(RegistryTree::new(
                    spec,
                    ActionRegistry::with_builtin_actions(),
                )))
            }
        }
    }
}

/// Red 2x2 square with its lower-left corner at (3, 3), facing east at every corner.
pub fn draw_square<D>() -> Result<Node<D>>
where
    D: TurtleDriver,
{
    let corner = |name: &str, x: f64, y: f64| {
        Node::new(name, GoToPose::new(x, y).with_theta(Some(0.0)))
    };
    Ok(sequence(
        "DrawSquare",
        vec![
            Node::new("SetPenRed", SetPen::pen_down(255, 0, 0, 3)),
            corner("Corner1", 3.0, 3.0),
            corner("Corner2_Right", 5.0, 3.0),
            corner("Corner3_Up", 5.0, 5.0),
            corner("Corner4_Left", 3.0, 5.0),
            corner("Corner5_Close", 3.0, 3.0),
        ],
    ))
}

/// Read the start pose, require the turtle inside the safe area, then patrol a rectangle.
pub fn patrol_waypoints<D>() -> Result<Node<D>>
where
    D: TurtleDriver,
{
    let patrol = PatrolWaypoints::new(
        vec![
            Waypoint::new(3.0, 3.0),
            Waypoint::new(8.0, 3.0),
            Waypoint::new(8.0, 8.0),
            Waypoint::new(3.0, 8.0),
        ],
        true,
    )?;
    Ok(sequence(
        "PatrolMission",
        vec![
            Node::new("ReadStartPosition", GetPose::new("start_pose")),
            Node::new("SafetyBoundsCheck", CheckBounds::new(1.0, 10.0, 1.0, 10.0)),
            patrol.build("PatrolRectangle"),
        ],
    ))
}
