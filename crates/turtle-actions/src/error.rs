use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a definition into a tree. All of them surface before the first tick.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("unknown action type `{0}`")]
    UnknownAction(String),

    #[error("invalid parameters for {action} `{node}`: {message}")]
    InvalidParams {
        action: String,
        node: String,
        message: String,
    },

    #[error("{action} `{node}` does not take children")]
    UnexpectedChildren { action: String, node: String },

    #[error("unknown shape `{0}` (expected circle, square, or triangle)")]
    UnknownShape(String),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("waypoint list cannot be empty")]
    EmptyWaypoints,

    #[error("unknown built-in tree `{0}`")]
    UnknownTree(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, DefinitionError>;
