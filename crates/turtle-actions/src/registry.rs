use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use turtle_bt::{Node, Parallel, ParallelPolicy, Selector, Sequence};
use turtle_core::TurtleDriver;

use crate::composites::{DrawShape, PatrolWaypoints, Shape, Waypoint};
use crate::definition::{NodeSpec, TreeSpec};
use crate::error::{DefinitionError, Result};
use crate::primitives::{
    CheckBounds, GetPose, GoToPose, MoveDistance, NavigationMode, SetPen, DEFAULT_ANGLE_TOLERANCE,
    DEFAULT_POSE_KEY, DEFAULT_POS_TOLERANCE,
};

/// Builds a node from its spec. Control nodes recurse into the registry for their children.
pub type Constructor<D> = fn(&NodeSpec, &ActionRegistry<D>) -> Result<Node<D>>;

/// Control-flow node types; every other registered type is an action.
pub const CONTROL_NODES: [&str; 3] = ["Sequence", "Selector", "Parallel"];

pub fn is_control_node(kind: &str) -> bool {
    CONTROL_NODES.contains(&kind)
}

/// Action-name lookup for trees defined in data.
pub struct ActionRegistry<D>
where
    D: TurtleDriver,
{
    constructors: BTreeMap<String, Constructor<D>>,
}

impl<D> Default for ActionRegistry<D>
where
    D: TurtleDriver,
{
    fn default() -> Self {
        Self::with_builtin_actions()
    }
}

impl<D> fmt::Debug for ActionRegistry<D>
where
    D: TurtleDriver,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<D> ActionRegistry<D>
where
    D: TurtleDriver,
{
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Control nodes plus every primitive and composite action in this crate.
    pub fn with_builtin_actions() -> Self {
        let mut registry = Self::empty();
        registry.register("Sequence", build_sequence::<D>);
        registry.register("Selector", build_selector::<D>);
        registry.register("Parallel", build_parallel::<D>);
        registry.register("GoToPose", build_goto_pose::<D>);
        registry.register("MoveDistance", build_move_distance::<D>);
        registry.register("SetPen", build_set_pen::<D>);
        registry.register("PenUp", build_pen_up::<D>);
        registry.register("PenDown", build_pen_down::<D>);
        registry.register("GetPose", build_get_pose::<D>);
        registry.register("CheckBounds", build_check_bounds::<D>);
        registry.register("DrawShape", build_draw_shape::<D>);
        registry.register("PatrolWaypoints", build_patrol_waypoints::<D>);
        registry
    }

    /// Register or replace a constructor.
    pub fn register(&mut self, name: impl Into<String>, constructor: Constructor<D>) {
        self.constructors.insert(name.into(), constructor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.constructors.keys().map(String::as_str)
    }

    pub fn build(&self, spec: &NodeSpec) -> Result<Node<D>> {
        let constructor = self
            .constructors
            .get(&spec.kind)
            .ok_or_else(|| DefinitionError::UnknownAction(spec.kind.clone()))?;
        constructor(spec, self)
    }

    pub fn build_tree(&self, tree: &TreeSpec) -> Result<Node<D>> {
        tracing::debug!(tree = %tree.name, "building tree from definition");
        self.build(&tree.root)
    }

    fn build_children(&self, spec: &NodeSpec) -> Result<Vec<Node<D>>> {
        spec.children.iter().map(|child| self.build(child)).collect()
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ComposeParams {
    #[serde(default = "default_true")]
    memory: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ParallelParams {
    #[serde(default)]
    policy: ParallelPolicy,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

fn default_pos_tolerance() -> f64 {
    DEFAULT_POS_TOLERANCE
}

fn default_angle_tolerance() -> f64 {
    DEFAULT_ANGLE_TOLERANCE
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GoToPoseParams {
    x: f64,
    y: f64,
    #[serde(default)]
    theta: Option<f64>,
    #[serde(default = "default_pos_tolerance")]
    tolerance_pos: f64,
    #[serde(default = "default_angle_tolerance")]
    tolerance_angle: f64,
    #[serde(default)]
    mode: NavigationMode,
}

fn default_speed() -> f64 {
    1.0
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MoveDistanceParams {
    distance: f64,
    #[serde(default = "default_speed")]
    speed: f64,
}

fn channel_max() -> u8 {
    255
}

fn default_width() -> u8 {
    3
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PenParams {
    #[serde(default = "channel_max")]
    r: u8,
    #[serde(default = "channel_max")]
    g: u8,
    #[serde(default = "channel_max")]
    b: u8,
    #[serde(default = "default_width")]
    width: u8,
    #[serde(default)]
    off: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PenDownParams {
    #[serde(default = "channel_max")]
    r: u8,
    #[serde(default = "channel_max")]
    g: u8,
    #[serde(default = "channel_max")]
    b: u8,
    #[serde(default = "default_width")]
    width: u8,
}

fn default_pose_key() -> String {
    DEFAULT_POSE_KEY.to_string()
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GetPoseParams {
    #[serde(default = "default_pose_key")]
    blackboard_key: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckBoundsParams {
    #[serde(default = "bound_min")]
    min_x: f64,
    #[serde(default = "bound_max")]
    max_x: f64,
    #[serde(default = "bound_min")]
    min_y: f64,
    #[serde(default = "bound_max")]
    max_y: f64,
}

fn bound_min() -> f64 {
    1.0
}

fn bound_max() -> f64 {
    10.0
}

fn default_center() -> f64 {
    5.5
}

fn default_color() -> [u8; 3] {
    [255, 255, 255]
}

fn default_segments() -> u32 {
    36
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DrawShapeParams {
    shape_type: String,
    size: f64,
    #[serde(default = "default_center")]
    center_x: f64,
    #[serde(default = "default_center")]
    center_y: f64,
    #[serde(default = "default_color")]
    color: [u8; 3],
    #[serde(default = "default_width")]
    width: u8,
    #[serde(default = "default_segments")]
    segments: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PatrolParams {
    waypoints: Vec<Waypoint>,
    #[serde(default, rename = "loop")]
    loop_back: bool,
}

/// Parameters of an action node, which must not have children.
fn leaf<P>(spec: &NodeSpec) -> Result<P>
where
    P: DeserializeOwned,
{
    if !spec.children.is_empty() {
        return Err(DefinitionError::UnexpectedChildren {
            action: spec.kind.clone(),
            node: spec.display_name().to_string(),
        });
    }
    spec.params()
}

fn build_sequence<D: TurtleDriver>(
    spec: &NodeSpec,
    registry: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let params: ComposeParams = spec.params()?;
    let children = registry.build_children(spec)?;
    Ok(Node::new(
        spec.display_name(),
        Sequence::with_memory(children, params.memory),
    ))
}

fn build_selector<D: TurtleDriver>(
    spec: &NodeSpec,
    registry: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let params: ComposeParams = spec.params()?;
    let children = registry.build_children(spec)?;
    Ok(Node::new(
        spec.display_name(),
        Selector::with_memory(children, params.memory),
    ))
}

fn build_parallel<D: TurtleDriver>(
    spec: &NodeSpec,
    registry: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let params: ParallelParams = spec.params()?;
    let children = registry.build_children(spec)?;
    Ok(Node::new(
        spec.display_name(),
        Parallel::new(params.policy, children),
    ))
}

fn build_goto_pose<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: GoToPoseParams = leaf(spec)?;
    let action = GoToPose::new(p.x, p.y)
        .with_theta(p.theta)
        .with_tolerances(p.tolerance_pos, p.tolerance_angle)
        .with_mode(p.mode);
    action
        .validate()
        .map_err(|message| DefinitionError::InvalidParams {
            action: spec.kind.clone(),
            node: spec.display_name().to_string(),
            message,
        })?;
    Ok(Node::new(spec.display_name(), action))
}

fn build_move_distance<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: MoveDistanceParams = leaf(spec)?;
    Ok(Node::new(
        spec.display_name(),
        MoveDistance::with_speed(p.distance, p.speed),
    ))
}

fn build_set_pen<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: PenParams = leaf(spec)?;
    Ok(Node::new(
        spec.display_name(),
        SetPen::new(p.r, p.g, p.b, p.width, p.off),
    ))
}

fn build_pen_up<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let NoParams {} = leaf(spec)?;
    Ok(Node::new(spec.display_name(), SetPen::pen_up()))
}

fn build_pen_down<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: PenDownParams = leaf(spec)?;
    Ok(Node::new(
        spec.display_name(),
        SetPen::pen_down(p.r, p.g, p.b, p.width),
    ))
}

fn build_get_pose<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: GetPoseParams = leaf(spec)?;
    Ok(Node::new(spec.display_name(), GetPose::new(p.blackboard_key)))
}

fn build_check_bounds<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: CheckBoundsParams = leaf(spec)?;
    Ok(Node::new(
        spec.display_name(),
        CheckBounds::new(p.min_x, p.max_x, p.min_y, p.max_y),
    ))
}

fn build_draw_shape<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: DrawShapeParams = leaf(spec)?;
    let shape: Shape = p.shape_type.parse()?;
    let [r, g, b] = p.color;
    DrawShape::new(shape, p.size)
        .with_center(p.center_x, p.center_y)
        .with_color(r, g, b)
        .with_width(p.width)
        .with_segments(p.segments)
        .build(spec.display_name())
}

fn build_patrol_waypoints<D: TurtleDriver>(
    spec: &NodeSpec,
    _: &ActionRegistry<D>,
) -> Result<Node<D>> {
    let p: PatrolParams = leaf(spec)?;
    Ok(PatrolWaypoints::new(p.waypoints, p.loop_back)?.build(spec.display_name()))
}
