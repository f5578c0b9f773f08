use std::fmt;
use std::time::Duration;

use thiserror::Error;

use super::{RequestStatus, ShaderCompileError};

/// Which asynchronous GPU call a request wraps.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operation {
    RequestAdapter,
    RequestDevice,
    CompilationInfo,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::RequestAdapter => "adapter request",
            Operation::RequestDevice => "device request",
            Operation::CompilationInfo => "shader compilation info request",
        };
        f.write_str(name)
    }
}

/// Failure of a blocking GPU request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The GPU API completed the request with a non-success status.
    #[error("{operation} failed with status {status:?}{}", describe_message(.message))]
    Failed {
        operation: Operation,
        status: RequestStatus,
        message: Option<String>,
    },

    /// The shader compiled with one or more error diagnostics.
    #[error(transparent)]
    Compilation(#[from] ShaderCompileError),

    /// The completion was dropped without ever firing.
    #[error("{operation} was abandoned before completing")]
    Abandoned { operation: Operation },

    /// The caller's timeout elapsed first. The request itself is not cancelled.
    #[error("{operation} did not complete within {after:?}")]
    TimedOut {
        operation: Operation,
        after: Duration,
    },
}

fn describe_message(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {m}"),
        _ => String::new(),
    }
}
