//! Common error types for WhyHere

use crate::feature::FeatureKey;
use thiserror::Error;

/// Common result type for WhyHere operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the WhyHere crates
#[derive(Error, Debug)]
pub enum Error {
    /// Feature is not part of the priority list, or the name is not a known feature
    #[error("Invalid feature key: {0}")]
    InvalidFeatureKey(String),

    /// Priority list has duplicates or omissions
    #[error("Invalid priority list: {0}")]
    InvalidPriorityList(String),

    /// Per-feature score outside 0..=100
    #[error("Score out of range for {feature}: {score}")]
    ScoreOutOfRange { feature: FeatureKey, score: i64 },

    /// Ranks start at 1
    #[error("Invalid rank: {0}")]
    InvalidRank(usize),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn missing_feature(feature: FeatureKey) -> Self {
        Error::InvalidFeatureKey(format!("{} is not in the priority list", feature.wire_name()))
    }
}
