//! LtvForge: A Rust CLI application for SaaS unit-economics analysis
//!
//! This library computes Customer Acquisition Cost (CAC), Lifetime Value (LTV),
//! LTV:CAC ratios, ARPU by region, and simulated cohort retention curves from
//! a customer CSV export, and renders the results as chart images.

pub mod cli;
pub mod cohort;
pub mod data;
pub mod metrics;
pub mod report;

// Re-export public items for easier access
pub use cli::Args;
pub use cohort::{cohort_groups, simulate_retention, CohortGroup, CohortRetentionPoint};
pub use data::{load_customers, CustomerRecord, CHURN_RATE_FLOOR};
pub use metrics::{arpu_by_region, average_ltv, channel_metrics, ChannelMetrics, RegionArpu};
pub use report::generate_report;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
