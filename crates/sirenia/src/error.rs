#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node at position {position} has index {index}; indices must match slice positions")]
    IndexMismatch { position: usize, index: usize },

    #[error("force was initialized with {expected} nodes but applied to {actual}")]
    NodeCountMismatch { expected: usize, actual: usize },

    #[error("bounded box force applied before bounds were configured")]
    MissingBounds,

    #[error("invalid force configuration: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
