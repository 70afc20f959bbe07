use thiserror::Error;

/// Errors raised by generators and the algorithms built on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The bit source kept producing an all-zero state.
    #[error("seeding failed: source produced an all-zero state {attempts} times")]
    Seeding { attempts: u32 },

    /// A saved state could not be restored.
    #[error("invalid generator state: {0}")]
    InvalidState(String),

    /// A cheaply detectable precondition was violated.
    #[error("invalid argument: {0}")]
    Argument(String),
}

impl Error {
    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
