use crate::error::DatasetError;
use crate::loader::{load_all_orders_file, load_raw_orders_file};
use chrono::NaiveDate;
use configuration::DataSources;
use core_types::{DateRange, OrderRow, RawOrder};

/// The two order tables, loaded once and read-only afterwards.
///
/// Every aggregation borrows from a `Dataset`; nothing mutates it, so one
/// instance can be shared across requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    all_orders: Vec<OrderRow>,
    raw_orders: Vec<RawOrder>,
}

impl Dataset {
    /// Builds a dataset from already-parsed rows. The all-orders table is put
    /// in purchase order (stable, so same-instant rows keep their file order).
    pub fn new(mut all_orders: Vec<OrderRow>, raw_orders: Vec<RawOrder>) -> Self {
        all_orders.sort_by_key(|row| row.order_purchase_timestamp);
        Self {
            all_orders,
            raw_orders,
        }
    }

    /// Reads both CSV exports named in the configuration.
    pub fn load(sources: &DataSources) -> Result<Self, DatasetError> {
        let all_orders = load_all_orders_file(&sources.all_orders_path)?;
        let raw_orders = load_raw_orders_file(&sources.orders_path)?;
        tracing::info!(
            all_orders = all_orders.len(),
            raw_orders = raw_orders.len(),
            "Order tables loaded."
        );
        Ok(Self::new(all_orders, raw_orders))
    }

    pub fn all_orders(&self) -> &[OrderRow] {
        &self.all_orders
    }

    pub fn raw_orders(&self) -> &[RawOrder] {
        &self.raw_orders
    }

    /// The first and last purchase day of the all-orders table.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let first = self.all_orders.first()?.purchase_date();
        let last = self.all_orders.last()?.purchase_date();
        DateRange::new(first, last).ok()
    }

    /// Rejects a window that reaches outside the observed purchase days.
    pub fn validate_range(&self, range: &DateRange) -> Result<(), DatasetError> {
        let bounds = self.date_bounds().ok_or(DatasetError::Empty)?;
        if !bounds.encloses(range) {
            return Err(DatasetError::RangeOutOfBounds {
                start: range.start(),
                end: range.end(),
                min: bounds.start(),
                max: bounds.end(),
            });
        }
        Ok(())
    }

    /// Turns optional user-supplied bounds into a validated window; a missing
    /// bound defaults to the corresponding end of the data.
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateRange, DatasetError> {
        let bounds = self.date_bounds().ok_or(DatasetError::Empty)?;
        let range = DateRange::new(
            start.unwrap_or(bounds.start()),
            end.unwrap_or(bounds.end()),
        )?;
        self.validate_range(&range)?;
        Ok(range)
    }
}
