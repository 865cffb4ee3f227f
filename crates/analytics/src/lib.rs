//! # Storefront Analytics Engine
//!
//! This crate turns the order tables into the derived tables behind the sales
//! dashboard: top product categories, distinct customers per city, orders per
//! year, and RFM (recency, frequency, monetary) segmentation.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no hidden state. Callers pass the immutable
//!   order tables and a date window in, and get a `DashboardReport` back.
//! - **One filter, four branches:** the date window is applied once and the
//!   filtered rows are shared by all four aggregations, none of which depends
//!   on another's output.
//! - **Fail closed:** when the two order tables disagree (a purchase newer than
//!   the newest raw order) the report is not produced at all.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: filters the rows and runs every aggregation.
//! - `DashboardReport` and its row types: the derived tables.
//! - The individual aggregation functions, for callers that need only one table.
//! - `AnalyticsError`: the consistency faults this crate can report.

pub mod aggregations;
pub mod engine;
pub mod error;
pub mod report;
pub mod rfm;

#[cfg(test)]
mod test_support;

pub use aggregations::{customers_per_city, filter_by_date_range, sales_per_year, top_categories};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    CategoryCount, CityCustomerCount, DashboardReport, RankedCustomers, RfmRecord, RfmSummary,
    YearlySales,
};
pub use rfm::{best_customers, rfm_table, summarize};
