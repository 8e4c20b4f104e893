use turtle_core::{Blackboard, Status, TickContext, TurtleDriver};

use crate::bt::Node;
use crate::error::BtError;
use crate::render::{unicode_tree, RenderOptions};
use crate::trace::{TraceLog, TRACE_LOG};

/// What one tick of the tree did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSnapshot {
    pub tick: u64,
    pub root_status: Status,
    /// Nodes visited this tick in evaluation order, with the status each returned.
    pub visited: Vec<(String, Status)>,
    pub rendered: String,
}

impl TickSnapshot {
    pub fn tick_path(&self) -> Vec<&str> {
        self.visited.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn running(&self) -> Vec<&str> {
        self.visited
            .iter()
            .filter(|(_, status)| status.is_running())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// A root node bound to its driver and to the blackboard of one execution.
pub struct BehaviourTree<D>
where
    D: TurtleDriver,
{
    root: Node<D>,
    driver: D,
    blackboard: Blackboard,
    tick: u64,
    dt_seconds: f64,
}

impl<D> BehaviourTree<D>
where
    D: TurtleDriver,
{
    pub fn new(root: Node<D>, driver: D) -> Self {
        let mut blackboard = Blackboard::new();
        blackboard.set(&TRACE_LOG, TraceLog::default());
        Self {
            root,
            driver,
            blackboard,
            tick: 0,
            dt_seconds: 0.1,
        }
    }

    pub fn with_dt(mut self, dt_seconds: f64) -> Self {
        self.dt_seconds = dt_seconds;
        self
    }

    pub fn set_dt(&mut self, dt_seconds: f64) {
        self.dt_seconds = dt_seconds;
    }

    pub fn root(&self) -> &Node<D> {
        &self.root
    }

    pub fn status(&self) -> Status {
        self.root.status()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    /// One-time setup of every node, top-down. Fails on the first node that refuses.
    pub fn setup(&mut self) -> Result<(), BtError> {
        tracing::info!(root = %self.root.name(), "Setting up behavior tree nodes");
        self.root.setup(&mut self.driver)?;
        tracing::info!("Behavior tree setup complete");
        Ok(())
    }

    pub fn tick(&mut self) -> Status {
        self.tick += 1;
        if let Some(log) = self.blackboard.get_mut(&TRACE_LOG) {
            log.clear();
        }

        let ctx = TickContext::new(self.tick, self.dt_seconds);
        let status = self.root.tick(&ctx, &mut self.driver, &mut self.blackboard);
        self.driver.advance(&ctx);
        status
    }

    /// Terminate whatever is still RUNNING so in-flight commands are stopped.
    pub fn halt(&mut self) {
        let ctx = TickContext::new(self.tick, self.dt_seconds);
        self.root.halt(&ctx, &mut self.driver, &mut self.blackboard);
    }

    pub fn render(&self) -> String {
        unicode_tree(&self.root, RenderOptions::default())
    }

    pub fn snapshot(&self) -> TickSnapshot {
        let visited = self
            .blackboard
            .get(&TRACE_LOG)
            .map(|log| {
                log.for_tick(self.tick)
                    .map(|e| (e.node.clone(), e.status))
                    .collect()
            })
            .unwrap_or_default();

        TickSnapshot {
            tick: self.tick,
            root_status: self.root.status(),
            visited,
            rendered: self.render(),
        }
    }
}
