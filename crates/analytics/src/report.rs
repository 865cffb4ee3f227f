use core_types::{DateRange, RfmDimension};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of rows carrying one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Number of distinct customers who ordered from one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCustomerCount {
    pub city: String,
    pub customer_count: usize,
}

/// Number of order rows placed in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySales {
    pub year: i32,
    pub order_count: usize,
}

/// Recency, frequency and monetary value of one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmRecord {
    pub customer_unique_id: String,
    /// Days between the newest raw order and this customer's last purchase in the window.
    pub recency: i64,
    /// Distinct orders placed in the window.
    pub frequency: usize,
    /// Total spend in the window.
    pub monetary: Decimal,
}

/// Averages over an RFM table. `None` when the table is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmSummary {
    /// Mean days since last purchase, rounded to 1 decimal place.
    pub average_recency: Option<Decimal>,
    /// Mean order rows per customer, rounded to 2 decimal places.
    pub average_frequency: Option<Decimal>,
    /// Mean total spend per customer, rounded to 2 decimal places.
    pub average_monetary: Option<Decimal>,
}

/// The best customers along one RFM dimension, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCustomers {
    pub dimension: RfmDimension,
    pub customers: Vec<RfmRecord>,
}

/// Every derived table of the dashboard for one date window.
///
/// This is plain data: formatting, truncation for display and charting are left
/// to whoever consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub range: DateRange,
    /// Rows of the all-orders table that fell inside `range`.
    pub filtered_rows: usize,
    /// Ascending by count; the most sold category is last.
    pub top_categories: Vec<CategoryCount>,
    /// Descending by customer count, then city name. Not truncated.
    pub city_customer_counts: Vec<CityCustomerCount>,
    /// Ascending by year.
    pub yearly_sales: Vec<YearlySales>,
    pub rfm: Vec<RfmRecord>,
    pub rfm_summary: RfmSummary,
    pub best_customers: Vec<RankedCustomers>,
}

impl DashboardReport {
    /// The first `n` cities, which is what the dashboard plots.
    pub fn top_cities(&self, n: usize) -> &[CityCustomerCount] {
        &self.city_customer_counts[..n.min(self.city_customer_counts.len())]
    }

    pub fn best_customers_by(&self, dimension: RfmDimension) -> &[RfmRecord] {
        self.best_customers
            .iter()
            .find(|ranked| ranked.dimension == dimension)
            .map(|ranked| ranked.customers.as_slice())
            .unwrap_or(&[])
    }
}
