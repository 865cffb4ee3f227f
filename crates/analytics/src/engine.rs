use crate::aggregations::{customers_per_city, filter_by_date_range, sales_per_year, top_categories};
use crate::error::AnalyticsError;
use crate::report::DashboardReport;
use crate::rfm::{best_customers, rfm_table, summarize};
use configuration::DashboardSettings;
use core_types::{DateRange, OrderRow, RawOrder, RfmDimension};

/// A stateless calculator for deriving the dashboard tables from the order tables.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: DashboardSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: DashboardSettings) -> Self {
        Self { settings }
    }

    /// The main entry point for computing the dashboard.
    ///
    /// # Arguments
    ///
    /// * `all_orders` - The full denormalized order table.
    /// * `raw_orders` - The full raw orders table, used only as the recency reference.
    /// * `range` - The inclusive window to report on. It is assumed to have been
    ///   validated against the data by the caller.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `DashboardReport` or an `AnalyticsError`. An
    /// empty window is not an error; it produces empty tables.
    pub fn calculate(
        &self,
        all_orders: &[OrderRow],
        raw_orders: &[RawOrder],
        range: DateRange,
    ) -> Result<DashboardReport, AnalyticsError> {
        let filtered = filter_by_date_range(all_orders, &range);
        tracing::debug!(
            start = %range.start(),
            end = %range.end(),
            rows = filtered.len(),
            "Order table filtered."
        );

        let top_categories = top_categories(&filtered, self.settings.top_categories);
        let city_customer_counts = customers_per_city(&filtered);
        let yearly_sales = sales_per_year(&filtered);
        let rfm = rfm_table(&filtered, raw_orders)?;

        let rfm_summary = summarize(&rfm);
        let best_customers = RfmDimension::ALL
            .iter()
            .map(|dimension| best_customers(&rfm, *dimension, self.settings.top_customers))
            .collect();

        tracing::info!(
            start = %range.start(),
            end = %range.end(),
            rows = filtered.len(),
            customers = rfm.len(),
            cities = city_customer_counts.len(),
            "Dashboard report calculated."
        );

        Ok(DashboardReport {
            range,
            filtered_rows: filtered.len(),
            top_categories,
            city_customer_counts,
            yearly_sales,
            rfm,
            rfm_summary,
            best_customers,
        })
    }
}
