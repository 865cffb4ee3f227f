//! Recency, frequency and monetary scoring of customers.

use crate::error::AnalyticsError;
use crate::report::{RankedCustomers, RfmRecord, RfmSummary};
use chrono::NaiveDate;
use core_types::{OrderRow, RawOrder, RfmDimension};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Per-customer accumulator while scanning the filtered rows.
struct CustomerActivity<'a> {
    customer_unique_id: &'a str,
    last_purchase: NaiveDate,
    orders: HashSet<&'a str>,
    monetary: Decimal,
}

/// Builds one RFM record per customer present in `rows`.
///
/// Frequency and monetary come from the filtered rows, but recency is measured
/// against the newest purchase in the *whole* raw orders table, so a customer's
/// recency does not shift when the window changes.
///
/// Records come out in the order customers are first seen.
pub fn rfm_table(
    rows: &[&OrderRow],
    raw_orders: &[RawOrder],
) -> Result<Vec<RfmRecord>, AnalyticsError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let reference = raw_orders
        .iter()
        .map(|order| order.order_purchase_timestamp.date())
        .max()
        .ok_or(AnalyticsError::MissingRecencyReference)?;

    let mut activity: Vec<CustomerActivity<'_>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let index = *positions
            .entry(row.customer_unique_id.as_str())
            .or_insert_with(|| {
                activity.push(CustomerActivity {
                    customer_unique_id: row.customer_unique_id.as_str(),
                    last_purchase: row.purchase_date(),
                    orders: HashSet::new(),
                    monetary: Decimal::ZERO,
                });
                activity.len() - 1
            });

        let customer = &mut activity[index];
        customer.last_purchase = customer.last_purchase.max(row.purchase_date());
        customer.orders.insert(row.order_id.as_str());
        customer.monetary += row.total_price;
    }

    activity
        .into_iter()
        .map(|customer| {
            let recency = (reference - customer.last_purchase).num_days();
            if recency < 0 {
                tracing::error!(
                    customer = customer.customer_unique_id,
                    last_purchase = %customer.last_purchase,
                    reference = %reference,
                    "Filtered purchase is newer than every raw order."
                );
                return Err(AnalyticsError::NegativeRecency {
                    customer_unique_id: customer.customer_unique_id.to_string(),
                    last_purchase: customer.last_purchase,
                    reference,
                });
            }
            Ok(RfmRecord {
                customer_unique_id: customer.customer_unique_id.to_string(),
                recency,
                frequency: customer.orders.len(),
                monetary: customer.monetary,
            })
        })
        .collect()
}

/// Averages of the three RFM columns, rounded for display:
/// recency to 1 decimal place, frequency and monetary to 2.
pub fn summarize(records: &[RfmRecord]) -> RfmSummary {
    if records.is_empty() {
        return RfmSummary::default();
    }

    let count = Decimal::from(records.len());
    let recency: i64 = records.iter().map(|r| r.recency).sum();
    let frequency: usize = records.iter().map(|r| r.frequency).sum();
    let monetary: Decimal = records.iter().map(|r| r.monetary).sum();

    RfmSummary {
        average_recency: Some((Decimal::from(recency) / count).round_dp(1)),
        average_frequency: Some((Decimal::from(frequency) / count).round_dp(2)),
        average_monetary: Some((monetary / count).round_dp(2)),
    }
}

/// The `n` best customers along `dimension`: lowest recency, or highest
/// frequency / monetary. Equal values are ordered by customer id.
pub fn best_customers(records: &[RfmRecord], dimension: RfmDimension, n: usize) -> RankedCustomers {
    let mut ranked: Vec<RfmRecord> = records.to_vec();
    ranked.sort_by(|a, b| {
        compare(a, b, dimension).then_with(|| a.customer_unique_id.cmp(&b.customer_unique_id))
    });
    ranked.truncate(n);
    RankedCustomers {
        dimension,
        customers: ranked,
    }
}

fn compare(a: &RfmRecord, b: &RfmRecord, dimension: RfmDimension) -> Ordering {
    let ascending = match dimension {
        RfmDimension::Recency => a.recency.cmp(&b.recency),
        RfmDimension::Frequency => a.frequency.cmp(&b.frequency),
        RfmDimension::Monetary => a.monetary.cmp(&b.monetary),
    };
    if dimension.higher_is_better() {
        ascending.reverse()
    } else {
        ascending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregations::filter_by_date_range;
    use crate::test_support::{at, day, order, raw};
    use core_types::DateRange;
    use rust_decimal_macros::dec;

    fn record(id: &str, recency: i64, frequency: usize, monetary: Decimal) -> RfmRecord {
        RfmRecord {
            customer_unique_id: id.to_string(),
            recency,
            frequency,
            monetary,
        }
    }

    #[test]
    fn recency_is_measured_against_the_raw_table() {
        let rows = vec![order("o1", "ana", "x", None, at(2018, 8, 20, 14), dec!(120.00))];
        let raws = vec![raw("o1", at(2018, 8, 20, 14)), raw("o9", at(2018, 8, 29, 15))];
        let refs: Vec<&OrderRow> = rows.iter().collect();

        let table = rfm_table(&refs, &raws).unwrap();
        assert_eq!(table, vec![record("ana", 9, 1, dec!(120.00))]);
    }

    #[test]
    fn frequency_counts_distinct_orders_and_monetary_sums_lines() {
        let rows = vec![
            order("o1", "ana", "x", Some("a"), at(2018, 1, 1, 9), dec!(10.50)),
            order("o1", "ana", "x", Some("b"), at(2018, 1, 1, 9), dec!(4.50)),
            order("o2", "ana", "x", Some("a"), at(2018, 3, 1, 9), dec!(20)),
            order("o3", "bia", "y", None, at(2018, 2, 1, 23), dec!(0)),
        ];
        let raws = vec![raw("o2", at(2018, 3, 10, 1))];
        let refs: Vec<&OrderRow> = rows.iter().collect();

        let table = rfm_table(&refs, &raws).unwrap();
        assert_eq!(
            table,
            vec![
                record("ana", 9, 2, dec!(35.00)),
                record("bia", 37, 1, dec!(0)),
            ]
        );
        assert!(table.iter().all(|r| r.frequency >= 1 && r.monetary >= Decimal::ZERO && r.recency >= 0));
    }

    #[test]
    fn single_day_window_with_one_order_yields_one_record() {
        let rows = vec![
            order("o1", "ana", "x", None, at(2018, 5, 1, 9), dec!(15)),
            order("o2", "bia", "x", None, at(2018, 5, 2, 18), dec!(89.90)),
            order("o3", "ana", "x", None, at(2018, 5, 3, 9), dec!(7)),
        ];
        let raws = vec![raw("o3", at(2018, 5, 3, 9))];
        let filtered = filter_by_date_range(&rows, &DateRange::single_day(day(2018, 5, 2)));

        let table = rfm_table(&filtered, &raws).unwrap();
        assert_eq!(table, vec![record("bia", 1, 1, dec!(89.90))]);
    }

    #[test]
    fn purchase_newer_than_raw_table_is_a_fault() {
        let rows = vec![order("o1", "ana", "x", None, at(2018, 9, 3, 9), dec!(1))];
        let raws = vec![raw("o0", at(2018, 8, 29, 9))];
        let refs: Vec<&OrderRow> = rows.iter().collect();

        let err = rfm_table(&refs, &raws).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NegativeRecency {
                customer_unique_id: "ana".to_string(),
                last_purchase: day(2018, 9, 3),
                reference: day(2018, 8, 29),
            }
        );
    }

    #[test]
    fn empty_raw_table_is_a_fault_only_when_there_are_rows() {
        let rows = vec![order("o1", "ana", "x", None, at(2018, 9, 3, 9), dec!(1))];
        let refs: Vec<&OrderRow> = rows.iter().collect();
        assert_eq!(rfm_table(&refs, &[]), Err(AnalyticsError::MissingRecencyReference));
        assert_eq!(rfm_table(&[], &[]), Ok(Vec::new()));
    }

    #[test]
    fn summary_rounds_each_average() {
        let records = vec![
            record("a", 10, 1, dec!(10.00)),
            record("b", 11, 2, dec!(20.00)),
            record("c", 11, 2, dec!(30.01)),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.average_recency, Some(dec!(10.7)));
        assert_eq!(summary.average_frequency, Some(dec!(1.67)));
        assert_eq!(summary.average_monetary, Some(dec!(20.00)));
    }

    #[test]
    fn summary_of_nothing_is_undefined() {
        let summary = summarize(&[]);
        assert_eq!(summary, RfmSummary::default());
        assert!(summary.average_recency.is_none());
    }

    #[test]
    fn best_customers_rank_per_dimension() {
        let records = vec![
            record("a", 30, 1, dec!(500)),
            record("b", 2, 3, dec!(50)),
            record("c", 2, 1, dec!(75)),
            record("d", 90, 5, dec!(10)),
        ];
        let ids = |ranked: RankedCustomers| -> Vec<String> {
            ranked.customers.into_iter().map(|r| r.customer_unique_id).collect()
        };

        assert_eq!(ids(best_customers(&records, RfmDimension::Recency, 3)), ["b", "c", "a"]);
        assert_eq!(ids(best_customers(&records, RfmDimension::Frequency, 2)), ["d", "b"]);
        assert_eq!(ids(best_customers(&records, RfmDimension::Monetary, 10)), ["a", "c", "b", "d"]);
    }
}
