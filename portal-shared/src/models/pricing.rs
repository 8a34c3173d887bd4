use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Partner program tiers, in order of growing benefits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PartnerTier {
    Level1,
    Level2,
    Level3,
}

impl PartnerTier {
    pub const ALL: [PartnerTier; 3] = [
        PartnerTier::Level1,
        PartnerTier::Level2,
        PartnerTier::Level3,
    ];

    /// Program name shown to partners
    pub fn label(&self) -> &'static str {
        match self {
            PartnerTier::Level1 => "Professional",
            PartnerTier::Level2 => "Expert",
            PartnerTier::Level3 => "Master",
        }
    }
}

impl fmt::Display for PartnerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discount percentage per partner tier.
///
/// Fields missing from persisted JSON deserialize to 0, which reads as
/// "no discount" for that tier rather than "no table".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscountTable {
    #[serde(default)]
    pub level1: f64,
    #[serde(default)]
    pub level2: f64,
    #[serde(default)]
    pub level3: f64,
}

impl DiscountTable {
    pub fn new(level1: f64, level2: f64, level3: f64) -> Self {
        Self {
            level1,
            level2,
            level3,
        }
    }

    /// Same percentage for every tier
    pub fn flat(percentage: f64) -> Self {
        Self::new(percentage, percentage, percentage)
    }

    pub fn get(&self, tier: PartnerTier) -> f64 {
        match tier {
            PartnerTier::Level1 => self.level1,
            PartnerTier::Level2 => self.level2,
            PartnerTier::Level3 => self.level3,
        }
    }
}

/// Snapshot of the admin-editable pricing configuration, as written to and
/// read back from exported JSON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    pub default_discounts: DiscountTable,
    #[serde(default)]
    pub brand_overrides: HashMap<String, DiscountTable>,
    pub export_date: DateTime<Utc>,
}
