use serde::{Deserialize, Serialize};
use turtle_core::{Blackboard, Status, TickContext, TurtleDriver};

use crate::bt::{Behaviour, Node, NodeKind};
use crate::error::SetupError;

fn halt_running_except<D>(
    children: &mut [Node<D>],
    keep: Option<usize>,
    ctx: &TickContext,
    driver: &mut D,
    blackboard: &mut Blackboard,
) where
    D: TurtleDriver,
{
    for (i, child) in children.iter_mut().enumerate() {
        if Some(i) != keep {
            child.halt(ctx, driver, blackboard);
        }
    }
}

/// AND composite.
///
/// With `memory` (the default) the sequence resumes at the child that was RUNNING on the previous
/// tick and never re-ticks children that already succeeded in the current attempt. Without
/// memory every tick restarts at the first child, so side effects of succeeded children repeat.
pub struct Sequence<D>
where
    D: TurtleDriver,
{
    children: Vec<Node<D>>,
    memory: bool,
    index: usize,
}

impl<D> Sequence<D>
where
    D: TurtleDriver,
{
    pub fn new(children: Vec<Node<D>>) -> Self {
        Self::with_memory(children, true)
    }

    pub fn with_memory(children: Vec<Node<D>>, memory: bool) -> Self {
        Self {
            children,
            memory,
            index: 0,
        }
    }

    pub fn memory(&self) -> bool {
        self.memory
    }
}

impl<D> Behaviour<D> for Sequence<D>
where
    D: TurtleDriver,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn setup(&mut self, _driver: &mut D) -> Result<(), SetupError> {
        if self.children.is_empty() {
            return Err(SetupError::NoChildren);
        }
        Ok(())
    }

    fn initialise(&mut self, _ctx: &TickContext, _driver: &mut D, _blackboard: &mut Blackboard) {
        self.index = 0;
    }

    fn update(&mut self, ctx: &TickContext, driver: &mut D, blackboard: &mut Blackboard) -> Status {
        let start = if self.memory { self.index } else { 0 };

        for i in start..self.children.len() {
            match self.children[i].tick(ctx, driver, blackboard) {
                Status::Success => continue,
                Status::Running => {
                    halt_running_except(&mut self.children, Some(i), ctx, driver, blackboard);
                    self.index = i;
                    return Status::Running;
                }
                Status::Failure | Status::Invalid => {
                    self.index = i;
                    return Status::Failure;
                }
            }
        }

        self.index = self.children.len();
        Status::Success
    }

    fn terminate(
        &mut self,
        ctx: &TickContext,
        driver: &mut D,
        blackboard: &mut Blackboard,
        _new_status: Status,
    ) {
        halt_running_except(&mut self.children, None, ctx, driver, blackboard);
        self.index = 0;
    }

    fn children(&self) -> &[Node<D>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Node<D>] {
        &mut self.children
    }
}

/// OR composite; [`Sequence`] with the roles of `Success` and `Failure` swapped.
pub struct Selector<D>
where
    D: TurtleDriver,
{
    children: Vec<Node<D>>,
    memory: bool,
    index: usize,
}

impl<D> Selector<D>
where
    D: TurtleDriver,
{
    pub fn new(children: Vec<Node<D>>) -> Self {
        Self::with_memory(children, true)
    }

    pub fn with_memory(children: Vec<Node<D>>, memory: bool) -> Self {
        Self {
            children,
            memory,
            index: 0,
        }
    }

    pub fn memory(&self) -> bool {
        self.memory
    }
}

impl<D> Behaviour<D> for Selector<D>
where
    D: TurtleDriver,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Selector
    }

    fn setup(&mut self, _driver: &mut D) -> Result<(), SetupError> {
        if self.children.is_empty() {
            return Err(SetupError::NoChildren);
        }
        Ok(())
    }

    fn initialise(&mut self, _ctx: &TickContext, _driver: &mut D, _blackboard: &mut Blackboard) {
        self.index = 0;
    }

    fn update(&mut self, ctx: &TickContext, driver: &mut D, blackboard: &mut Blackboard) -> Status {
        let start = if self.memory { self.index } else { 0 };

        for i in start..self.children.len() {
            match self.children[i].tick(ctx, driver, blackboard) {
                Status::Failure | Status::Invalid => continue,
                Status::Running => {
                    halt_running_except(&mut self.children, Some(i), ctx, driver, blackboard);
                    self.index = i;
                    return Status::Running;
                }
                Status::Success => {
                    self.index = i;
                    return Status::Success;
                }
            }
        }

        self.index = self.children.len();
        Status::Failure
    }

    fn terminate(
        &mut self,
        ctx: &TickContext,
        driver: &mut D,
        blackboard: &mut Blackboard,
        _new_status: Status,
    ) {
        halt_running_except(&mut self.children, None, ctx, driver, blackboard);
        self.index = 0;
    }

    fn children(&self) -> &[Node<D>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Node<D>] {
        &mut self.children
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParallelPolicy {
    /// Succeed once every child has succeeded; fail as soon as one fails.
    #[default]
    SuccessOnAll,
    /// Succeed as soon as one child succeeds; fail once every child has failed.
    SuccessOnOne,
}

/// Ticks every unresolved child on each tick, left to right, then aggregates per
/// [`ParallelPolicy`].
///
/// Children that already resolved in the policy's "keep going" direction (succeeded under
/// `SuccessOnAll`, failed under `SuccessOnOne`) are remembered and not ticked again until the
/// parallel is re-initialised.
pub struct Parallel<D>
where
    D: TurtleDriver,
{
    children: Vec<Node<D>>,
    policy: ParallelPolicy,
    resolved: Vec<Option<Status>>,
}

impl<D> Parallel<D>
where
    D: TurtleDriver,
{
    pub fn new(policy: ParallelPolicy, children: Vec<Node<D>>) -> Self {
        let resolved = vec![None; children.len()];
        Self {
            children,
            policy,
            resolved,
        }
    }

    pub fn policy(&self) -> ParallelPolicy {
        self.policy
    }
}

impl<D> Behaviour<D> for Parallel<D>
where
    D: TurtleDriver,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Parallel
    }

    fn setup(&mut self, _driver: &mut D) -> Result<(), SetupError> {
        if self.children.is_empty() {
            return Err(SetupError::NoChildren);
        }
        Ok(())
    }

    fn initialise(&mut self, _ctx: &TickContext, _driver: &mut D, _blackboard: &mut Blackboard) {
        self.resolved.clear();
        self.resolved.resize(self.children.len(), None);
    }

    fn update(&mut self, ctx: &TickContext, driver: &mut D, blackboard: &mut Blackboard) -> Status {
        for (child, resolved) in self.children.iter_mut().zip(self.resolved.iter_mut()) {
            if resolved.is_some() {
                continue;
            }
            let status = child.tick(ctx, driver, blackboard);
            if status.is_terminal() {
                *resolved = Some(status);
            }
        }

        let all = |s: Status| self.resolved.iter().all(|r| *r == Some(s));
        let any = |s: Status| self.resolved.iter().any(|r| *r == Some(s));

        match self.policy {
            ParallelPolicy::SuccessOnAll if any(Status::Failure) => Status::Failure,
            ParallelPolicy::SuccessOnAll if all(Status::Success) => Status::Success,
            ParallelPolicy::SuccessOnOne if any(Status::Success) => Status::Success,
            ParallelPolicy::SuccessOnOne if all(Status::Failure) => Status::Failure,
            _ => Status::Running,
        }
    }

    fn terminate(
        &mut self,
        ctx: &TickContext,
        driver: &mut D,
        blackboard: &mut Blackboard,
        _new_status: Status,
    ) {
        halt_running_except(&mut self.children, None, ctx, driver, blackboard);
        self.resolved.iter_mut().for_each(|r| *r = None);
    }

    fn children(&self) -> &[Node<D>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Node<D>] {
        &mut self.children
    }
}

/// Memory sequence node.
pub fn sequence<D: TurtleDriver>(name: impl Into<String>, children: Vec<Node<D>>) -> Node<D> {
    Node::new(name, Sequence::new(children))
}

/// Sequence that restarts from its first child on every tick.
pub fn reactive_sequence<D: TurtleDriver>(
    name: impl Into<String>,
    children: Vec<Node<D>>,
) -> Node<D> {
    Node::new(name, Sequence::with_memory(children, false))
}

/// Memory selector node.
pub fn selector<D: TurtleDriver>(name: impl Into<String>, children: Vec<Node<D>>) -> Node<D> {
    Node::new(name, Selector::new(children))
}

/// Selector that restarts from its first child on every tick.
pub fn reactive_selector<D: TurtleDriver>(
    name: impl Into<String>,
    children: Vec<Node<D>>,
) -> Node<D> {
    Node::new(name, Selector::with_memory(children, false))
}

pub fn parallel<D: TurtleDriver>(
    name: impl Into<String>,
    policy: ParallelPolicy,
    children: Vec<Node<D>>,
) -> Node<D> {
    Node::new(name, Parallel::new(policy, children))
}
