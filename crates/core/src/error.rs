use thiserror::Error;

/// Errors surfaced by the move-selection engine.
#[derive(Error, Debug)]
pub enum NimError {
    #[error("no stacks provided")]
    EmptyState,

    #[error("no move possible: every stack is empty")]
    TerminalState,

    #[error("invalid move: take {items} from stack {stack} of size {size}")]
    InvalidMove {
        stack: usize,
        items: u32,
        size: u32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience Result type for engine operations
pub type Result<T> = std::result::Result<T, NimError>;
