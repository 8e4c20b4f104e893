//! Per-tick record of which nodes were visited and what they returned.

use turtle_core::{BbKey, Blackboard, Status};

/// One node visit. Events are stored in visit order: a parent precedes its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub tick: u64,
    pub node: String,
    pub status: Status,
}

impl TraceEvent {
    pub fn new(tick: u64, node: impl Into<String>) -> Self {
        Self {
            tick,
            node: node.into(),
            status: Status::Invalid,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) -> usize {
        self.events.push(event);
        self.events.len() - 1
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn for_tick(&self, tick: u64) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.tick == tick)
    }
}

/// Blackboard key for collecting node visits in-memory.
pub const TRACE_LOG: BbKey<TraceLog> = BbKey::new("bt.trace_log");

/// Record entry into a node. Returns the slot to complete with [`exit`], or `None` when no log is
/// installed.
pub fn enter(blackboard: &mut Blackboard, tick: u64, node: &str) -> Option<usize> {
    let log = blackboard.get_mut(&TRACE_LOG)?;
    Some(log.push(TraceEvent::new(tick, node)))
}

pub fn exit(blackboard: &mut Blackboard, slot: Option<usize>, status: Status) {
    let Some(slot) = slot else {
        return;
    };
    if let Some(event) = blackboard
        .get_mut(&TRACE_LOG)
        .and_then(|log| log.events.get_mut(slot))
    {
        event.status = status;
    }
}
