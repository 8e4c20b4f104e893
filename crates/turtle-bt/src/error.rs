use thiserror::Error;
use turtle_core::DriverError;

/// Why a single node refused to set up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("driver unreachable: {0}")]
    Driver(#[from] DriverError),

    #[error("composite has no children")]
    NoChildren,

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum BtError {
    #[error("setup of `{node}` failed: {source}")]
    Setup {
        node: String,
        #[source]
        source: SetupError,
    },

    #[error("invalid executor config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BtError>;
