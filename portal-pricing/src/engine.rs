use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use portal_shared::{DiscountTable, PartnerTier, PricingSnapshot};
use portal_store::{keys, FileStore, MemoryStore, SettingsStore};

use crate::app_config::Config;

/// Flat bonus added on top of the resolved discount while the campaign
/// toggle is on, in percentage points.
pub const EXTRA_DISCOUNT_POINTS: f64 = 5.0;

/// Which table wins when a brand has both factory program terms and an
/// admin-entered override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverridePrecedence {
    /// Factory terms shadow admin overrides
    #[default]
    BuiltinFirst,
    /// Admin overrides shadow factory terms
    OverrideFirst,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct EngineOptions {
    #[serde(default)]
    pub precedence: OverridePrecedence,

    /// Clamp the resolved percentage into 0..=100 after the campaign bonus.
    /// Off by default: misconfigured discounts pass through unvalidated and
    /// can price below zero.
    #[serde(default)]
    pub clamp_percentage: bool,
}

/// Factory program terms negotiated per brand. Shipped with the portal;
/// brand names match exactly, case-sensitive.
pub fn builtin_brand_table(brand: &str) -> Option<DiscountTable> {
    match brand {
        "Milesight" => Some(DiscountTable::new(35.0, 40.0, 50.0)),
        "Yealink" => Some(DiscountTable::new(10.0, 15.0, 20.0)),
        "Humly" => Some(DiscountTable::new(5.0, 8.0, 10.0)),
        "Jabra" => Some(DiscountTable::flat(0.0)),
        _ => None,
    }
}

/// Resolves partner discounts and net prices from the persisted pricing
/// configuration.
///
/// The engine itself is stateless: every call reads the configuration
/// fresh through the injected [`SettingsStore`], so a write lands for the
/// next read with no caching in between. Pricing calls never fail: when
/// configuration or arithmetic breaks down they degrade to "no discount"
/// and leave a `tracing` warning behind.
pub struct PricingEngine {
    store: Arc<dyn SettingsStore>,
    options: EngineOptions,
}

impl PricingEngine {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_options(store, EngineOptions::default())
    }

    pub fn with_options(store: Arc<dyn SettingsStore>, options: EngineOptions) -> Self {
        Self { store, options }
    }

    /// Engine wired from application configuration: file-backed settings
    /// when a path is configured, in-memory otherwise.
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn SettingsStore> = match &config.store.path {
            Some(path) => Arc::new(FileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };

        Self::with_options(store, config.pricing)
    }

    /// Resolve the discount percentage for a tier, optionally scoped to a
    /// brand.
    ///
    /// Lookup order under the default precedence: factory brand terms,
    /// then admin brand override, then the default table. The campaign
    /// bonus is added last. No validation is applied; the result can
    /// exceed 100 or be negative unless clamping is enabled.
    pub fn resolve_discount(&self, tier: PartnerTier, brand: Option<&str>) -> f64 {
        let table = self.resolve_table(brand);

        let mut percentage = table.get(tier);
        if self.extra_discount_enabled() {
            percentage += EXTRA_DISCOUNT_POINTS;
        }
        if self.options.clamp_percentage {
            percentage = percentage.clamp(0.0, 100.0);
        }

        percentage
    }

    /// Net price for an MSRP after the resolved discount, rounded half-up
    /// at the cent boundary.
    ///
    /// Never fails: when the computation cannot produce a finite number
    /// the original `msrp` comes back unchanged, so callers always have a
    /// price to show.
    pub fn net_price(&self, msrp: f64, tier: PartnerTier, brand: Option<&str>) -> f64 {
        if !msrp.is_finite() {
            warn!(msrp, "non-numeric msrp, returning it unchanged");
            return msrp;
        }

        let percentage = self.resolve_discount(tier, brand);
        let net = msrp * (1.0 - percentage / 100.0);
        if !net.is_finite() {
            warn!(msrp, percentage, "discount produced a non-finite price, returning msrp");
            return msrp;
        }

        round_cents(net)
    }

    /// Default discount table, applied when a brand has no terms of its own
    pub fn default_discounts(&self) -> DiscountTable {
        self.read_json(keys::DEFAULT_DISCOUNTS).unwrap_or_default()
    }

    /// Overwrites the default table wholesale
    pub fn set_default_discounts(&self, table: DiscountTable) {
        self.write_json(keys::DEFAULT_DISCOUNTS, &table);
    }

    /// Admin-entered override for a brand. `None` means no override
    /// exists, which is distinct from an all-zero table.
    pub fn brand_discounts(&self, brand: &str) -> Option<DiscountTable> {
        self.stored_overrides().get(brand).copied()
    }

    /// Upsert by exact brand name, one override per brand
    pub fn update_brand_discounts(&self, brand: &str, table: DiscountTable) {
        let mut overrides = self.stored_overrides();
        overrides.insert(brand.to_string(), table);
        self.write_json(keys::BRAND_OVERRIDES, &overrides);
    }

    /// Deletes one brand's override; other brands are untouched
    pub fn remove_brand_discounts(&self, brand: &str) {
        let mut overrides = self.stored_overrides();
        if overrides.remove(brand).is_some() {
            self.write_json(keys::BRAND_OVERRIDES, &overrides);
        }
    }

    /// Drops every brand override. The default table and the campaign
    /// toggle keep their values.
    pub fn reset_brand_overrides(&self) {
        if let Err(err) = self.store.remove(keys::BRAND_OVERRIDES) {
            warn!(key = keys::BRAND_OVERRIDES, %err, "settings write failed, overrides kept");
        }
    }

    pub fn extra_discount_enabled(&self) -> bool {
        self.read_json(keys::EXTRA_DISCOUNT_FLAG).unwrap_or(false)
    }

    pub fn set_extra_discount(&self, enabled: bool) {
        self.write_json(keys::EXTRA_DISCOUNT_FLAG, &enabled);
    }

    /// Serializable snapshot of the admin-editable configuration. The
    /// campaign toggle is not part of the snapshot.
    pub fn export_config(&self) -> PricingSnapshot {
        PricingSnapshot {
            default_discounts: self.default_discounts(),
            brand_overrides: self.stored_overrides(),
            export_date: Utc::now(),
        }
    }

    /// Applies a previously exported snapshot. Sections missing from the
    /// payload are skipped; unknown fields are ignored. Returns whether
    /// the payload was usable at all.
    pub fn import_config(&self, payload: &str) -> bool {
        let snapshot: SnapshotPayload = match serde_json::from_str(payload) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%err, "pricing snapshot rejected");
                return false;
            }
        };

        if let Some(table) = snapshot.default_discounts {
            self.write_json(keys::DEFAULT_DISCOUNTS, &table);
        }
        if let Some(overrides) = snapshot.brand_overrides {
            self.write_json(keys::BRAND_OVERRIDES, &overrides);
        }

        true
    }

    fn resolve_table(&self, brand: Option<&str>) -> DiscountTable {
        let (first, second) = match brand {
            Some(name) => match self.options.precedence {
                OverridePrecedence::BuiltinFirst => {
                    (builtin_brand_table(name), self.brand_discounts(name))
                }
                OverridePrecedence::OverrideFirst => {
                    (self.brand_discounts(name), builtin_brand_table(name))
                }
            },
            None => (None, None),
        };

        first.or(second).unwrap_or_else(|| self.default_discounts())
    }

    fn stored_overrides(&self) -> HashMap<String, DiscountTable> {
        self.read_json(keys::BRAND_OVERRIDES).unwrap_or_default()
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key, %err, "settings read failed, falling back to defaults");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "corrupt settings entry, falling back to defaults");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, %err, "settings value not serializable, write skipped");
                return;
            }
        };

        if let Err(err) = self.store.set(key, &raw) {
            warn!(key, %err, "settings write failed, change lost");
        }
    }
}

/// Incoming snapshot with every section optional, so exports from older
/// portal versions still apply cleanly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotPayload {
    #[serde(default)]
    default_discounts: Option<DiscountTable>,
    #[serde(default)]
    brand_overrides: Option<HashMap<String, DiscountTable>>,
}

/// Round half-up at the cent boundary
fn round_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
