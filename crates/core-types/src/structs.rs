use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line item of the denormalized "all orders" table.
///
/// An order with several products appears once per product, so `order_id`
/// is not unique across rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_id: String,
    pub customer_unique_id: String,
    pub customer_city: String,
    pub product_category_name: Option<String>,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub total_price: Decimal,
}

impl OrderRow {
    /// The calendar day the order was placed on.
    pub fn purchase_date(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }
}

/// One row of the raw orders table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String,
    pub order_purchase_timestamp: NaiveDateTime,
}

/// An inclusive window of calendar days: `start <= day <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct UncheckedDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<UncheckedDateRange> for DateRange {
    type Error = CoreError;

    fn try_from(value: UncheckedDateRange) -> Result<Self, Self::Error> {
        DateRange::new(value.start, value.end)
    }
}

impl DateRange {
    /// Creates a window, rejecting one whose start lies after its end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidInput(
                "date range".to_string(),
                format!("start date {} is after end date {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    /// A window covering exactly one day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both bounds are inclusive; only the date portion of a timestamp is compared.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let day = timestamp.date();
        self.start <= day && day <= self.end
    }

    /// True when `other` lies entirely inside this window.
    pub fn encloses(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}
