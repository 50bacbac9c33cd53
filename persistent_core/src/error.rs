use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status used for every fatal condition. Causes are told apart by the
/// diagnostic text, never by the status.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Every way the persistent loop can stop.
///
/// The driver never recovers from any of these: each one is a terminal state
/// for the process, and the caller is expected to report it and exit with
/// [`DriverError::exit_code`].
#[derive(Error, Debug)]
pub enum DriverError {
    /// The scratch buffer could not be allocated at startup.
    #[error("failed to allocate a {capacity} byte scratch buffer")]
    BufferAllocation { capacity: usize },

    /// The configuration cannot produce a working driver.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A required target entry point is not present in the process image.
    #[error("target entry point '{0}' could not be resolved")]
    MissingEntryPoint(&'static str),

    /// The control channel delivered fewer bytes than a full path message.
    #[error("incomplete path message: received {received} of {expected} bytes{}", describe_cause(.cause))]
    IncompletePathMessage {
        received: usize,
        expected: usize,
        cause: Option<io::Error>,
    },

    /// The received path could not be opened.
    #[error("open {path:?}: {source}")]
    OpenInput { path: PathBuf, source: io::Error },

    /// The received path was opened but reading it failed.
    #[error("read {path:?}: {source}")]
    ReadInput { path: PathBuf, source: io::Error },

    /// The target's test entry point returned a non-zero value.
    #[error("LLVMFuzzerTestOneInput returned '{code}' for {len} byte input (md5 {digest})")]
    CallbackFailed {
        code: i32,
        len: usize,
        digest: String,
    },

    /// The completion marker could not be written back to the parent.
    #[error("failed to acknowledge completion on the control channel: {0}")]
    Acknowledge(#[source] io::Error),

    /// The continue-type self signal could not be raised.
    #[error("failed to notify parent with {signal}: {source}")]
    Notify {
        signal: nix::sys::signal::Signal,
        source: nix::Error,
    },
}

fn describe_cause(cause: &Option<io::Error>) -> String {
    match cause {
        Some(e) => format!(" ({e})"),
        None => " (channel closed)".to_string(),
    }
}

impl DriverError {
    /// The process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }
}
