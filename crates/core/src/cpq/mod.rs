pub mod catalog;
pub mod constraints;
pub mod pricing;
pub mod summary;

pub use catalog::Catalog;
pub use pricing::{compute_quote, DeterministicPricingEngine, PricingEngine};
pub use summary::{AdjustmentRow, SummaryBreakdown};
