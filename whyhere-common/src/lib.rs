//! # WhyHere Common Library
//!
//! Pure fit-score pipeline shared by the WhyHere service and tools:
//! - Feature keys, priority lists and positional weights
//! - Fit score calculation and cluster classification
//! - Normalization of `/data/pois` backend records
//! - Rank explanations and performance insights
//! - CSV export, user profile and configuration loading

pub mod cluster;
pub mod config;
pub mod entity;
pub mod error;
pub mod explain;
pub mod export;
pub mod feature;
pub mod fixtures;
pub mod normalize;
pub mod priority;
pub mod profile;
pub mod scores;
pub mod scoring;
pub mod selection;

pub use cluster::Cluster;
pub use entity::{Entity, FitScore};
pub use error::{Error, Result};
pub use feature::FeatureKey;
pub use priority::PriorityList;
pub use scores::FeatureScores;
