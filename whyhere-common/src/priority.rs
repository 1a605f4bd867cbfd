//! Priority ordering and positional weighting
//!
//! A priority list is a total ordering of all eight features; index 0 is
//! the user's top priority. The weight of the feature at index `i` in an
//! `n`-long ordering is `n - i`, so weights run `n, n-1, ..., 1`.

use crate::error::{Error, Result};
use crate::feature::FeatureKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Weight of `feature` within an ordering of features
///
/// Accepts any ordering (including partial ones) so that scoring stays
/// usable with fewer than eight features. Fails when the feature is absent.
pub fn weight_of(priorities: &[FeatureKey], feature: FeatureKey) -> Result<u32> {
    priorities
        .iter()
        .position(|&f| f == feature)
        .map(|index| (priorities.len() - index) as u32)
        .ok_or_else(|| Error::missing_feature(feature))
}

/// Validated total ordering of all eight features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FeatureKey>", into = "Vec<FeatureKey>")]
pub struct PriorityList {
    order: [FeatureKey; FeatureKey::COUNT],
    /// 0-based position of each feature, indexed by `FeatureKey::index`
    positions: [usize; FeatureKey::COUNT],
}

impl PriorityList {
    /// Build from an ordering, rejecting duplicates and omissions
    pub fn new(order: Vec<FeatureKey>) -> Result<Self> {
        if order.len() != FeatureKey::COUNT {
            return Err(Error::InvalidPriorityList(format!(
                "expected {} features, got {}",
                FeatureKey::COUNT,
                order.len()
            )));
        }

        let mut seen = [false; FeatureKey::COUNT];
        for feature in &order {
            if std::mem::replace(&mut seen[feature.index()], true) {
                return Err(Error::InvalidPriorityList(format!(
                    "{} appears more than once",
                    feature
                )));
            }
        }

        let mut list = FeatureKey::ALL;
        list.copy_from_slice(&order);
        Ok(Self::from_order(list))
    }

    /// `order` must hold every feature exactly once
    fn from_order(order: [FeatureKey; FeatureKey::COUNT]) -> Self {
        let mut positions = [0; FeatureKey::COUNT];
        for (position, feature) in order.iter().enumerate() {
            positions[feature.index()] = position;
        }
        Self { order, positions }
    }

    /// Ordering as a slice (index 0 = highest priority)
    pub fn as_slice(&self) -> &[FeatureKey] {
        &self.order
    }

    /// Weight of `feature` in this list (8 for the top priority, 1 for the last)
    pub fn weight_of(&self, feature: FeatureKey) -> u32 {
        (FeatureKey::COUNT - self.position(feature)) as u32
    }

    /// 0-based position of `feature`
    pub fn position(&self, feature: FeatureKey) -> usize {
        self.positions[feature.index()]
    }

    /// `(feature, weight)` pairs in priority order
    pub fn weighted(&self) -> impl Iterator<Item = (FeatureKey, u32)> + '_ {
        self.order
            .iter()
            .enumerate()
            .map(|(index, &f)| (f, (FeatureKey::COUNT - index) as u32))
    }

    /// The `n` highest priorities
    pub fn top(&self, n: usize) -> &[FeatureKey] {
        &self.order[..n.min(FeatureKey::COUNT)]
    }

    /// Move the feature at `from` to position `to`, shifting the others
    pub fn move_feature(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= FeatureKey::COUNT || to >= FeatureKey::COUNT {
            return Err(Error::InvalidPriorityList(format!(
                "move {} -> {} out of bounds",
                from, to
            )));
        }
        let mut order = self.order;
        if from < to {
            order[from..=to].rotate_left(1);
        } else {
            order[to..=from].rotate_right(1);
        }
        *self = Self::from_order(order);
        Ok(())
    }
}

impl Default for PriorityList {
    /// Onboarding order shown before the user reorders anything
    fn default() -> Self {
        Self::from_order([
            FeatureKey::PoliceStations,
            FeatureKey::Hospitals,
            FeatureKey::Grocery,
            FeatureKey::Parks,
            FeatureKey::Restaurants,
            FeatureKey::Schools,
            FeatureKey::MartaStops,
            FeatureKey::Crime,
        ])
    }
}

impl Deref for PriorityList {
    type Target = [FeatureKey];

    fn deref(&self) -> &[FeatureKey] {
        &self.order
    }
}

impl TryFrom<Vec<FeatureKey>> for PriorityList {
    type Error = Error;

    fn try_from(order: Vec<FeatureKey>) -> Result<Self> {
        Self::new(order)
    }
}

impl From<PriorityList> for Vec<FeatureKey> {
    fn from(list: PriorityList) -> Self {
        list.order.to_vec()
    }
}

impl FromStr for PriorityList {
    type Err = Error;

    /// Parse a comma-separated list of wire names, e.g. `crime,schools,...`
    fn from_str(s: &str) -> Result<Self> {
        let order = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<FeatureKey>>>()?;
        Self::new(order)
    }
}

impl fmt::Display for PriorityList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.order.iter().map(|k| k.wire_name()).collect();
        f.write_str(&names.join(","))
    }
}
