use crate::error::DatasetError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::{OrderRow, RawOrder};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const ALL_ORDERS: &str = "all-orders";
const RAW_ORDERS: &str = "raw orders";

/// Columns the all-orders export must carry. Extra columns are ignored.
pub const ALL_ORDERS_COLUMNS: [&str; 7] = [
    "order_id",
    "customer_unique_id",
    "customer_city",
    "product_category_name",
    "order_purchase_timestamp",
    "order_delivered_customer_date",
    "total_price",
];

/// Columns the raw orders export must carry. Extra columns are ignored.
pub const RAW_ORDERS_COLUMNS: [&str; 4] = [
    "order_id",
    "customer_id",
    "order_status",
    "order_purchase_timestamp",
];

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
struct AllOrdersRecord {
    order_id: String,
    customer_unique_id: String,
    customer_city: String,
    product_category_name: Option<String>,
    order_purchase_timestamp: String,
    order_delivered_customer_date: Option<String>,
    total_price: String,
}

#[derive(Debug, Deserialize)]
struct RawOrdersRecord {
    order_id: String,
    customer_id: String,
    order_status: String,
    order_purchase_timestamp: String,
}

/// Reads the denormalized all-orders table.
///
/// Fails on the first missing column or malformed value rather than skipping
/// the row, so aggregates are never computed over a silently shrunk table.
pub fn load_all_orders<R: Read>(reader: R) -> Result<Vec<OrderRow>, DatasetError> {
    read_table(reader, ALL_ORDERS, &ALL_ORDERS_COLUMNS, |record: AllOrdersRecord, line| {
        let cell = |column: &'static str, value: &str, reason: String| DatasetError::InvalidValue {
            table: ALL_ORDERS,
            column,
            line,
            value: value.to_string(),
            reason,
        };

        let order_purchase_timestamp = parse_timestamp(&record.order_purchase_timestamp)
            .ok_or_else(|| {
                cell(
                    "order_purchase_timestamp",
                    &record.order_purchase_timestamp,
                    "not a recognised date-time".to_string(),
                )
            })?;

        let order_delivered_customer_date = match non_empty(record.order_delivered_customer_date) {
            Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| {
                cell(
                    "order_delivered_customer_date",
                    &raw,
                    "not a recognised date-time".to_string(),
                )
            })?),
            None => None,
        };

        let total_price = parse_price(&record.total_price)
            .map_err(|reason| cell("total_price", &record.total_price, reason))?;

        Ok(OrderRow {
            order_id: record.order_id,
            customer_unique_id: record.customer_unique_id,
            customer_city: record.customer_city,
            product_category_name: non_empty(record.product_category_name),
            order_purchase_timestamp,
            order_delivered_customer_date,
            total_price,
        })
    })
}

/// Reads the raw orders table.
pub fn load_raw_orders<R: Read>(reader: R) -> Result<Vec<RawOrder>, DatasetError> {
    read_table(reader, RAW_ORDERS, &RAW_ORDERS_COLUMNS, |record: RawOrdersRecord, line| {
        let order_purchase_timestamp = parse_timestamp(&record.order_purchase_timestamp)
            .ok_or_else(|| DatasetError::InvalidValue {
                table: RAW_ORDERS,
                column: "order_purchase_timestamp",
                line,
                value: record.order_purchase_timestamp.clone(),
                reason: "not a recognised date-time".to_string(),
            })?;

        Ok(RawOrder {
            order_id: record.order_id,
            customer_id: record.customer_id,
            order_status: record.order_status,
            order_purchase_timestamp,
        })
    })
}

pub fn load_all_orders_file(path: &Path) -> Result<Vec<OrderRow>, DatasetError> {
    load_all_orders(open(path)?)
}

pub fn load_raw_orders_file(path: &Path) -> Result<Vec<RawOrder>, DatasetError> {
    load_raw_orders(open(path)?)
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks the header row for every required column, then converts each record in order.
fn read_table<R, T, U, F>(
    reader: R,
    table: &'static str,
    required: &[&'static str],
    mut convert: F,
) -> Result<Vec<U>, DatasetError>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T, u64) -> Result<U, DatasetError>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if let Some(column) = required
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(DatasetError::MissingColumn { table, column });
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());
        let typed: T = record.deserialize(Some(&headers))?;
        rows.push(convert(typed, line)?);
    }

    tracing::debug!(table, rows = rows.len(), "CSV table parsed.");
    Ok(rows)
}

/// Accepts the export's `YYYY-MM-DD HH:MM:SS` form, its ISO `T` variant, and a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        })
}

fn parse_price(raw: &str) -> Result<Decimal, String> {
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| e.to_string())?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err("price must not be negative".to_string());
    }
    Ok(price)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ALL_DATA_CSV: &str = "\
order_id,customer_id,customer_unique_id,customer_city,product_category_name,order_purchase_timestamp,order_delivered_customer_date,total_price
o1,c1,u1,sao paulo,beleza_saude,2017-10-02 10:56:33,2017-10-10 21:25:13,38.71
o2,c2,u2,rio de janeiro,,2018-07-24 20:41:37,,141.46
o3,c3,u1,sao paulo,esporte_lazer,2018-08-08T08:38:49,2018-08-17 18:06:29,179.12
";

    const ORDERS_CSV: &str = "\
order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at
o1,c1,delivered,2017-10-02 10:56:33,2017-10-02 11:07:15
o2,c2,delivered,2018-07-24 20:41:37,2018-07-26 03:24:27
";

    #[test]
    fn loads_all_orders_with_nullable_columns() {
        let rows = load_all_orders(ALL_DATA_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].customer_unique_id, "u1");
        assert_eq!(rows[0].product_category_name.as_deref(), Some("beleza_saude"));
        assert_eq!(rows[0].total_price, dec!(38.71));
        assert!(rows[0].order_delivered_customer_date.is_some());
        assert_eq!(rows[1].product_category_name, None);
        assert_eq!(rows[1].order_delivered_customer_date, None);
        assert_eq!(
            rows[2].order_purchase_timestamp,
            NaiveDate::from_ymd_opt(2018, 8, 8).unwrap().and_hms_opt(8, 38, 49).unwrap()
        );
    }

    #[test]
    fn loads_raw_orders_and_ignores_extra_columns() {
        let rows = load_raw_orders(ORDERS_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].order_status, "delivered");
        assert_eq!(rows[1].customer_id, "c2");
    }

    #[test]
    fn missing_column_is_reported_before_rows() {
        let csv_data = "order_id,customer_id,order_status\no1,c1,delivered\n";
        let err = load_raw_orders(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { column: "order_purchase_timestamp", .. }
        ));
    }

    #[test]
    fn unparseable_timestamp_fails_with_line_number() {
        let csv_data = "\
order_id,customer_id,order_status,order_purchase_timestamp
o1,c1,delivered,2017-10-02 10:56:33
o2,c2,delivered,yesterday
";
        let err = load_raw_orders(csv_data.as_bytes()).unwrap_err();
        match err {
            DatasetError::InvalidValue { column, line, value, .. } => {
                assert_eq!(column, "order_purchase_timestamp");
                assert_eq!(line, 3);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn all_orders_header_must_carry_every_required_column() {
        let csv_data = "\
order_id,customer_unique_id,product_category_name,order_purchase_timestamp,order_delivered_customer_date,total_price
o1,u1,beleza_saude,2017-10-02 10:56:33,,38.71
";
        let err = load_all_orders(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { column: "customer_city", .. }
        ));
    }

    #[test]
    fn all_orders_with_bad_purchase_timestamp_fail_to_load() {
        let csv_data = "\
order_id,customer_unique_id,customer_city,product_category_name,order_purchase_timestamp,order_delivered_customer_date,total_price
o1,u1,sao paulo,beleza_saude,2017-10-02 10:56:33,,38.71
o2,u2,campinas,esporte_lazer,not a date,,12.00
";
        let err = load_all_orders(csv_data.as_bytes()).unwrap_err();
        match err {
            DatasetError::InvalidValue { column, line, value, .. } => {
                assert_eq!(column, "order_purchase_timestamp");
                assert_eq!(line, 3);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let csv_data = "\
order_id,customer_unique_id,customer_city,product_category_name,order_purchase_timestamp,order_delivered_customer_date,total_price
o1,u1,sao paulo,beleza_saude,2017-10-02 10:56:33,,-3.50
";
        let err = load_all_orders(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidValue { column: "total_price", .. }));
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2018-08-29 15:00:37").is_some());
        assert!(parse_timestamp("2018-08-29T15:00:37").is_some());
        assert_eq!(
            parse_timestamp("2018-08-29"),
            NaiveDate::from_ymd_opt(2018, 8, 29).unwrap().and_hms_opt(0, 0, 0)
        );
        assert!(parse_timestamp("29/08/2018").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
