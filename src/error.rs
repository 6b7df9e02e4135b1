//! Process-level error type.
//!
//! Every fallible operation in the crate returns `AppError`; `main` prints the
//! message to stderr and exits with the carried code. There is no recovery
//! path anywhere: a failed fetch, load, or render is fatal to the invocation.

/// Exit code for usage, configuration, and local file errors.
pub const EXIT_IO: u8 = 2;
/// Exit code for data-shape errors (no snapshots, missing columns, bad rows).
pub const EXIT_DATA: u8 = 3;
/// Exit code for network and remote-host errors.
pub const EXIT_NETWORK: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Usage, configuration, or local filesystem problem.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
    }

    /// The store or the dataset does not have the shape the operation needs.
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(EXIT_DATA, message)
    }

    /// Transport failure or a non-success response from the dataset host.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(EXIT_NETWORK, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
