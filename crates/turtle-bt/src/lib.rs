//! Tick-driven behavior tree runtime built on `turtle-core`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod error;
pub mod executor;
pub mod nodes;
pub mod render;
pub mod trace;
pub mod tree;

pub use bt::{Behaviour, Node, NodeKind};
pub use error::{BtError, SetupError};
pub use executor::{Executor, ExecutorConfig, LogObserver, Outcome, RunReport, TickObserver};
// Memory composites are the default: a RUNNING child is resumed without re-ticking the
// children that already succeeded. Reactive variants re-evaluate from the first child on every
// tick and re-trigger side effects of earlier children.
pub use nodes::{
    parallel, reactive_selector, reactive_sequence, selector, sequence, Parallel, ParallelPolicy,
    Selector, Sequence,
};
pub use render::{unicode_tree, RenderOptions};
pub use trace::{TraceEvent, TraceLog, TRACE_LOG};
pub use tree::{BehaviourTree, TickSnapshot};

pub use turtle_core::{Blackboard, Status, TickContext, TurtleDriver};
