use thiserror::Error;

/// All the ways a curation request or startup can go wrong
///
/// The first group are everyday conditions the shell turns into a message or
/// a silent no-op. The rest only happen while loading the catalog or config.
#[derive(Error, Debug)]
pub enum Error {
    #[error("You already have your top {limit} for category {category_id}. Remove one to add another")]
    LimitReached { category_id: String, limit: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid category order: {0}")]
    InvalidOrder(String),

    #[error("Stores per category must be at least 1, got {0}")]
    InvalidLimit(usize),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller can shrug this off and keep the session going
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::LimitReached { .. }
                | Error::NotFound(_)
                | Error::InvalidOrder(_)
                | Error::InvalidLimit(_)
                | Error::InvalidSetting(_)
                | Error::NotLoggedIn
        )
    }
}
