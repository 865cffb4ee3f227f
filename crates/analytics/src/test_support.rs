use chrono::{NaiveDate, NaiveDateTime};
use core_types::{OrderRow, RawOrder};
use rust_decimal::Decimal;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

/// A line item; `category` of `None` models a product without a category.
pub fn order(
    order_id: &str,
    customer: &str,
    city: &str,
    category: Option<&str>,
    purchased: NaiveDateTime,
    price: Decimal,
) -> OrderRow {
    OrderRow {
        order_id: order_id.to_string(),
        customer_unique_id: customer.to_string(),
        customer_city: city.to_string(),
        product_category_name: category.map(str::to_string),
        order_purchase_timestamp: purchased,
        order_delivered_customer_date: None,
        total_price: price,
    }
}

pub fn raw(order_id: &str, purchased: NaiveDateTime) -> RawOrder {
    RawOrder {
        order_id: order_id.to_string(),
        customer_id: format!("customer-of-{order_id}"),
        order_status: "delivered".to_string(),
        order_purchase_timestamp: purchased,
    }
}
