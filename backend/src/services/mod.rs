//! Service layer: property analytics.
//!
//! The submodules are pure computations over slices of records;
//! [`analytics::PropertyAnalytics`] wires them to a repository.

pub mod analytics;
pub mod filter;
pub mod history;
pub mod outliers;
pub mod statistics;


pub use analytics::PropertyAnalytics;
pub use filter::apply_filter;
pub use history::historical_insights;
pub use outliers::{detect_outliers, percentile, IqrBounds, DEFAULT_IQR_FACTOR};
pub use statistics::compute_statistics;
