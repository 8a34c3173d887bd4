pub mod models;

pub use models::pricing::{DiscountTable, PartnerTier, PricingSnapshot};
