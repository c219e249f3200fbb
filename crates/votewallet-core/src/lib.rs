// Curation core: catalog, store, and the views computed from them
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod profile;
pub mod score;
pub mod store;
pub mod views;

pub use catalog::Catalog;
pub use config::Config;
pub use error::Error;
pub use profile::{
    CurationProfile, Notification, Trend, UserAccount, UserSpending, WhiteLabelSettings,
};
pub use score::ScoreBand;
pub use store::{AddOutcome, CurationStore};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
