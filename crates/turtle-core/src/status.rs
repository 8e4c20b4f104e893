#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of ticking a node.
///
/// `Invalid` is only observed before a node has been ticked for the first time, or after it was
/// pre-empted by its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Status {
    Success,
    Failure,
    Running,
    #[default]
    Invalid,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// `Success` or `Failure`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::Running => "RUNNING",
            Status::Invalid => "INVALID",
        };
        f.write_str(s)
    }
}
