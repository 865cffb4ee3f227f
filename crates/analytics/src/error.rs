use chrono::NaiveDate;
use thiserror::Error;

/// Faults that abort a derived-table computation.
///
/// Both variants mean the all-orders and raw orders tables disagree; the
/// computation is abandoned rather than returning a clamped or partial table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error(
        "Customer {customer_unique_id} last purchased on {last_purchase}, after the most recent raw order ({reference}); the order tables are out of sync"
    )]
    NegativeRecency {
        customer_unique_id: String,
        last_purchase: NaiveDate,
        reference: NaiveDate,
    },

    #[error("The raw orders table is empty, so recency has no reference date")]
    MissingRecencyReference,
}
