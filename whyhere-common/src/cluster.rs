//! Qualitative fit buckets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Five-bucket label derived from a fit score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl Cluster {
    /// Inclusive lower bounds, checked top-down; first match wins
    const THRESHOLDS: [(f64, Cluster); 4] = [
        (8.5, Cluster::Excellent),
        (7.5, Cluster::VeryGood),
        (6.0, Cluster::Good),
        (4.5, Cluster::Fair),
    ];

    /// Bucket for a 0-10 fit score
    pub fn classify(fit_score: f64) -> Cluster {
        Self::THRESHOLDS
            .iter()
            .find(|(lower, _)| fit_score >= *lower)
            .map(|&(_, cluster)| cluster)
            .unwrap_or(Cluster::Poor)
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Cluster::Excellent => "excellent",
            Cluster::VeryGood => "very-good",
            Cluster::Good => "good",
            Cluster::Fair => "fair",
            Cluster::Poor => "poor",
        }
    }

    /// Legend label
    pub const fn label(self) -> &'static str {
        match self {
            Cluster::Excellent => "Excellent Fit",
            Cluster::VeryGood => "Very Good Fit",
            Cluster::Good => "Good Fit",
            Cluster::Fair => "Fair Fit",
            Cluster::Poor => "Poor Fit",
        }
    }

    /// Legend range caption
    pub const fn range(self) -> &'static str {
        match self {
            Cluster::Excellent => "8.5-10",
            Cluster::VeryGood => "7.5-8.5",
            Cluster::Good => "6-7.5",
            Cluster::Fair => "4.5-6",
            Cluster::Poor => "<4.5",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
