//! The date-range filter and the three counting aggregations.
//!
//! The aggregations take the already-filtered rows by reference and return a
//! fresh table; none of them looks at another's output.

use crate::report::{CategoryCount, CityCustomerCount, YearlySales};
use chrono::Datelike;
use core_types::{DateRange, OrderRow};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Keeps the rows purchased on a day inside `range`, bounds included.
pub fn filter_by_date_range<'a>(rows: &'a [OrderRow], range: &DateRange) -> Vec<&'a OrderRow> {
    rows.iter()
        .filter(|row| range.contains(row.order_purchase_timestamp))
        .collect()
}

/// The `limit` most frequent product categories, ascending by count.
///
/// Rows without a category are not counted. Equal counts keep the order in
/// which the categories were first seen, both when selecting and in the output.
pub fn top_categories(rows: &[&OrderRow], limit: usize) -> Vec<CategoryCount> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for category in rows.iter().filter_map(|row| row.product_category_name.as_deref()) {
        let index = *positions.entry(category).or_insert_with(|| {
            counts.push((category, 0));
            counts.len() - 1
        });
        counts[index].1 += 1;
    }

    // Both sorts are stable: ties stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts.sort_by_key(|&(_, count)| count);

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Distinct customers per city, most populous city first, ties by city name.
///
/// A customer who ordered from two cities is counted in both.
pub fn customers_per_city(rows: &[&OrderRow]) -> Vec<CityCustomerCount> {
    let mut customers: HashMap<&str, HashSet<&str>> = HashMap::new();
    for row in rows {
        customers
            .entry(row.customer_city.as_str())
            .or_default()
            .insert(row.customer_unique_id.as_str());
    }

    let mut counts: Vec<CityCustomerCount> = customers
        .into_iter()
        .map(|(city, ids)| CityCustomerCount {
            city: city.to_string(),
            customer_count: ids.len(),
        })
        .collect();
    counts.sort_by(|a, b| {
        b.customer_count
            .cmp(&a.customer_count)
            .then_with(|| a.city.cmp(&b.city))
    });
    counts
}

/// Order rows per calendar year of purchase, oldest year first. Years without rows are absent.
pub fn sales_per_year(rows: &[&OrderRow]) -> Vec<YearlySales> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for row in rows {
        *years.entry(row.order_purchase_timestamp.year()).or_insert(0) += 1;
    }

    years
        .into_iter()
        .map(|(year, order_count)| YearlySales { year, order_count })
        .collect()
}
