use thiserror::Error;

/// Fixed keys under which the pricing configuration is persisted
pub mod keys {
    pub const DEFAULT_DISCOUNTS: &str = "default-discounts";
    pub const BRAND_OVERRIDES: &str = "brand-overrides";
    pub const EXTRA_DISCOUNT_FLAG: &str = "extra-discount-flag";
}

/// Settings storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("settings lock poisoned")]
    Poisoned,
}

/// Synchronous key-value storage for portal settings.
///
/// Values are opaque strings; callers own the encoding. Reads and writes
/// are independent per key, so a reader racing a writer sees either the
/// old or the new value, never a partial one.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
