use turtle_core::{Blackboard, Status, TickContext, TurtleDriver};

use crate::error::{BtError, SetupError};
use crate::trace;

/// Shape of a node, used for rendering and definition checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Sequence,
    Selector,
    Parallel,
    Leaf,
}

impl NodeKind {
    pub fn is_composite(self) -> bool {
        !matches!(self, NodeKind::Leaf)
    }
}

/// Lifecycle hooks of a behavior tree node.
///
/// Implementors provide `update`; [`Node`] drives the hooks:
/// - `setup` once before the first tick, top-down from the root;
/// - `initialise` whenever the node enters execution from a non-RUNNING status;
/// - `update` on every tick; it must not block, and long work spans ticks by returning
///   `Running`;
/// - `terminate` when execution ends, with the terminal status, or with `Invalid` when a parent
///   pre-empts the node.
pub trait Behaviour<D>: 'static
where
    D: TurtleDriver,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn setup(&mut self, _driver: &mut D) -> Result<(), SetupError> {
        Ok(())
    }

    fn initialise(&mut self, _ctx: &TickContext, _driver: &mut D, _blackboard: &mut Blackboard) {}

    fn update(&mut self, ctx: &TickContext, driver: &mut D, blackboard: &mut Blackboard)
        -> Status;

    fn terminate(
        &mut self,
        _ctx: &TickContext,
        _driver: &mut D,
        _blackboard: &mut Blackboard,
        _new_status: Status,
    ) {
    }

    fn children(&self) -> &[Node<D>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Node<D>] {
        &mut []
    }
}

/// A named behaviour together with the status it reported last.
pub struct Node<D>
where
    D: TurtleDriver,
{
    name: String,
    status: Status,
    behaviour: Box<dyn Behaviour<D>>,
}

impl<D> Node<D>
where
    D: TurtleDriver,
{
    pub fn new(name: impl Into<String>, behaviour: impl Behaviour<D>) -> Self {
        Self::boxed(name, Box::new(behaviour))
    }

    pub fn boxed(name: impl Into<String>, behaviour: Box<dyn Behaviour<D>>) -> Self {
        Self {
            name: name.into(),
            status: Status::Invalid,
            behaviour,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn kind(&self) -> NodeKind {
        self.behaviour.kind()
    }

    pub fn children(&self) -> &[Node<D>] {
        self.behaviour.children()
    }

    /// Visit this node and all descendants, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node<D>, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut dyn FnMut(&'a Node<D>, usize)) {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }

    pub fn setup(&mut self, driver: &mut D) -> Result<(), BtError> {
        self.behaviour
            .setup(driver)
            .map_err(|source| BtError::Setup {
                node: self.name.clone(),
                source,
            })?;
        for child in self.behaviour.children_mut() {
            child.setup(driver)?;
        }
        Ok(())
    }

    pub fn tick(&mut self, ctx: &TickContext, driver: &mut D, blackboard: &mut Blackboard) -> Status {
        let slot = trace::enter(blackboard, ctx.tick, &self.name);

        if self.status != Status::Running {
            self.behaviour.initialise(ctx, driver, blackboard);
        }

        let mut status = self.behaviour.update(ctx, driver, blackboard);
        if status == Status::Invalid {
            tracing::warn!(node = %self.name, "update returned INVALID, treating as FAILURE");
            status = Status::Failure;
        }
        self.status = status;
        trace::exit(blackboard, slot, status);
        tracing::trace!(node = %self.name, tick = ctx.tick, %status, "ticked");

        if status != Status::Running {
            self.behaviour.terminate(ctx, driver, blackboard, status);
        }
        status
    }

    /// Pre-empt a RUNNING node: `terminate(Invalid)` down the active chain. No-op otherwise.
    pub fn halt(&mut self, ctx: &TickContext, driver: &mut D, blackboard: &mut Blackboard) {
        if self.status != Status::Running {
            return;
        }
        tracing::debug!(node = %self.name, tick = ctx.tick, "pre-empted");
        self.behaviour
            .terminate(ctx, driver, blackboard, Status::Invalid);
        self.status = Status::Invalid;
    }
}

impl<D> std::fmt::Debug for Node<D>
where
    D: TurtleDriver,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("status", &self.status)
            .field("children", &self.children().len())
            .finish()
    }
}
