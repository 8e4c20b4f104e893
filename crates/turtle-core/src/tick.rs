/// Per-tick information handed to every node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// 1-based index of the current tick.
    pub tick: u64,
    pub dt_seconds: f64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f64) -> Self {
        Self { tick, dt_seconds }
    }
}
