//! Turtle actions and the tree definitions built from them.
//!
//! Leaves bridge one [`turtle_core::TurtleDriver`] capability each; composites are subtree builders
//! over those leaves. Trees come either from Rust factories ([`trees`]) or from YAML definitions
//! resolved through an [`ActionRegistry`].

#![forbid(unsafe_code)]

pub mod catalog;
pub mod composites;
pub mod definition;
pub mod error;
pub mod primitives;
pub mod registry;
pub mod trees;
pub mod validation;

pub use catalog::{ActionCatalog, ActionEntry, ParamSpec, ParamType, Resources};
pub use composites::{DrawShape, PatrolWaypoints, Shape, Waypoint};
pub use definition::{NodeSpec, TreeSpec};
pub use error::{DefinitionError, Result};
pub use primitives::{
    CheckBounds, GetPose, GoToPose, MoveDistance, NavigationMode, PoseRecord, SetPen,
};
pub use registry::{ActionRegistry, Constructor};
pub use trees::{BuiltinTree, RegistryTree, TreeDefinition, TreeSource};
pub use validation::{check_definition, check_tree, CheckReport};
