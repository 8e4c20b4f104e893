#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use turtle_bt::{Behaviour, Node};
use turtle_core::{
    Blackboard, DriverError, NavGoal, PenConfig, Pose, Status, TickContext, TurtleDriver, Twist,
};

#[derive(Debug, Default)]
pub struct NullDriver {
    pub alive: bool,
    pub advanced: u64,
}

impl NullDriver {
    pub fn alive() -> Self {
        Self {
            alive: true,
            advanced: 0,
        }
    }
}

impl TurtleDriver for NullDriver {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn pose(&self) -> Result<Pose, DriverError> {
        Ok(Pose::default())
    }

    fn send_velocity(&mut self, _twist: Twist) -> Result<(), DriverError> {
        Ok(())
    }

    fn send_goal(&mut self, _goal: NavGoal) -> Result<(), DriverError> {
        Ok(())
    }

    fn set_pen(&mut self, _pen: PenConfig) -> Result<(), DriverError> {
        Ok(())
    }

    fn advance(&mut self, _ctx: &TickContext) {
        self.advanced += 1;
    }
}

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn count(log: &EventLog, event: &str) -> usize {
    log.borrow().iter().filter(|e| e.as_str() == event).count()
}

/// Leaf that replays `script` one entry per update, repeating the last entry.
pub struct Scripted {
    name: &'static str,
    script: Vec<Status>,
    calls: usize,
    log: EventLog,
    requires_driver: bool,
}

impl Scripted {
    pub fn node(name: &'static str, script: &[Status], log: &EventLog) -> Node<NullDriver> {
        Node::new(
            name,
            Self {
                name,
                script: script.to_vec(),
                calls: 0,
                log: log.clone(),
                requires_driver: false,
            },
        )
    }

    pub fn needing_driver(name: &'static str, log: &EventLog) -> Node<NullDriver> {
        Node::new(
            name,
            Self {
                name,
                script: vec![Status::Success],
                calls: 0,
                log: log.clone(),
                requires_driver: true,
            },
        )
    }
}

impl Behaviour<NullDriver> for Scripted {
    fn setup(&mut self, driver: &mut NullDriver) -> Result<(), turtle_bt::SetupError> {
        self.log.borrow_mut().push(format!("setup:{}", self.name));
        if self.requires_driver && !driver.is_alive() {
            return Err(DriverError::Disconnected.into());
        }
        Ok(())
    }

    fn initialise(&mut self, _ctx: &TickContext, _driver: &mut NullDriver, _bb: &mut Blackboard) {
        self.log.borrow_mut().push(format!("init:{}", self.name));
    }

    fn update(&mut self, _ctx: &TickContext, _driver: &mut NullDriver, _bb: &mut Blackboard) -> Status {
        self.log.borrow_mut().push(format!("update:{}", self.name));
        let status = self
            .script
            .get(self.calls)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(Status::Success);
        self.calls += 1;
        status
    }

    fn terminate(
        &mut self,
        _ctx: &TickContext,
        _driver: &mut NullDriver,
        _bb: &mut Blackboard,
        new_status: Status,
    ) {
        self.log
            .borrow_mut()
            .push(format!("terminate:{}:{}", self.name, new_status));
    }
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1)
}
