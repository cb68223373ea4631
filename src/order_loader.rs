// order_loader.rs
use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// Column names every dataset must carry, spelled exactly as the export spells them.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "order_id",
    "payment_value",
    "order_approved_at",
    "order_delivered_customer_date",
    "product_category_name_english",
    "product_id",
    "price",
    "review_score",
    "time_delivery",
];

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("could not load dataset from {source}: {detail}")]
    DataLoad { r#source: String, detail: String },
    #[error("dataset is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("no orders were approved between {start} and {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Deserialize)]
struct RawOrderRow {
    order_id: String,
    product_id: String,
    product_category_name_english: Option<String>,
    price: String,
    payment_value: String,
    order_approved_at: String,
    order_delivered_customer_date: Option<String>,
    time_delivery: Option<String>,
    review_score: Option<String>,
}

/// One product line of one order. Multi-item orders show up as several records
/// sharing an order_id, which is why order counts dedupe on that field.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub product_id: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub payment_value: Decimal,
    pub approved_at: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,
    pub delivery_days: Option<f64>,
    pub review_score: Option<Decimal>,
}

impl OrderRecord {
    pub fn approved_date(&self) -> NaiveDate {
        self.approved_at.date()
    }
}

/// A full dataset, sorted ascending by approval timestamp.
#[derive(Debug, Clone)]
pub struct OrderBook {
    pub source: String,
    pub records: Vec<OrderRecord>,
}

impl OrderBook {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_approval_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|record| record.approved_date())
    }

    pub fn max_approval_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|record| record.approved_date())
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl RawOrderRow {
    fn into_record(self, source: &str, line: usize) -> Result<OrderRecord, DashboardError> {
        let bad = |column: &str, value: &str| DashboardError::DataLoad {
            source: source.to_string(),
            detail: format!("row {}: unparseable {} value {:?}", line, column, value),
        };

        let approved_raw = self.order_approved_at.trim();
        let approved_at =
            parse_timestamp(approved_raw).ok_or_else(|| bad("order_approved_at", approved_raw))?;

        let delivered_at = match non_empty(self.order_delivered_customer_date) {
            Some(text) => Some(
                parse_timestamp(&text)
                    .ok_or_else(|| bad("order_delivered_customer_date", &text))?,
            ),
            None => None,
        };

        let price_raw = self.price.trim();
        let price = Decimal::from_str(price_raw).map_err(|_| bad("price", price_raw))?;

        let payment_raw = self.payment_value.trim();
        let payment_value =
            Decimal::from_str(payment_raw).map_err(|_| bad("payment_value", payment_raw))?;

        let delivery_days = match non_empty(self.time_delivery) {
            Some(text) => Some(
                text.parse::<f64>()
                    .map_err(|_| bad("time_delivery", &text))?,
            ),
            None => None,
        };

        let review_score = match non_empty(self.review_score) {
            Some(text) => {
                Some(Decimal::from_str(&text).map_err(|_| bad("review_score", &text))?)
            }
            None => None,
        };

        Ok(OrderRecord {
            order_id: self.order_id.trim().to_string(),
            product_id: self.product_id.trim().to_string(),
            category: non_empty(self.product_category_name_english),
            price,
            payment_value,
            approved_at,
            delivered_at,
            delivery_days,
            review_score,
        })
    }
}

pub async fn fetch_csv_text(url: &str) -> Result<String, DashboardError> {
    let data_load = |detail: String| DashboardError::DataLoad {
        source: url.to_string(),
        detail,
    };
    let fetch_started = Instant::now();
    let response = reqwest::get(url).await.map_err(|error| data_load(error.to_string()))?;
    let response = response
        .error_for_status()
        .map_err(|error| data_load(error.to_string()))?;
    let body = response.text().await.map_err(|error| data_load(error.to_string()))?;
    info!(
        "fetched {} bytes from {} in {:.2}s",
        body.len(),
        url,
        fetch_started.elapsed().as_secs_f64()
    );
    Ok(body)
}

pub async fn load_from_url(url: &str) -> Result<OrderBook, DashboardError> {
    let body = fetch_csv_text(url).await?;
    load_from_reader(body.as_bytes(), url)
}

pub fn load_from_path(path: &Path) -> Result<OrderBook, DashboardError> {
    let source = path.display().to_string();
    let file = File::open(path).map_err(|error| DashboardError::DataLoad {
        source: source.clone(),
        detail: error.to_string(),
    })?;
    load_from_reader(BufReader::new(file), &source)
}

pub fn load_from_reader<R: Read>(reader: R, source: &str) -> Result<OrderBook, DashboardError> {
    let parse_started = Instant::now();
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers().map_err(|error| DashboardError::DataLoad {
        source: source.to_string(),
        detail: format!("could not read the header row: {}", error),
    })?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::Schema { missing });
    }

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<RawOrderRow>().enumerate() {
        // Row 1 is the header, so the first data row reports as row 2.
        let line = index + 2;
        let raw = row.map_err(|error| DashboardError::DataLoad {
            source: source.to_string(),
            detail: format!("row {}: {}", line, error),
        })?;
        records.push(raw.into_record(source, line)?);
    }

    records.sort_by(|a, b| a.approved_at.cmp(&b.approved_at));
    info!(
        "loaded {} order lines from {} in {:.2}s",
        records.len(),
        source,
        parse_started.elapsed().as_secs_f64()
    );
    Ok(OrderBook {
        source: source.to_string(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FIXTURE: &str = "\
index,order_id,payment_value,order_approved_at,order_delivered_customer_date,product_category_name_english,product_id,price,review_score,time_delivery
0,ord-2,20.00,2018-02-10 09:15:00,2018-02-14 18:00:00,toys,prod-b,19.99,4.0,4.0
1,ord-1,10.50,2018-01-05 11:00:00,,health_beauty,prod-a,9.99,5.0,
2,ord-3,30.00,2017-12-31T23:59:59,2018-01-08 10:00:00,,prod-c,29.90,,8.0
3,ord-4,15.25,2018-03-01,2018-03-06 12:00:00,toys,prod-d,14.50,1.0,5.0
";

    fn fixture_book() -> OrderBook {
        load_from_reader(FIXTURE.as_bytes(), "fixture").unwrap()
    }

    #[test]
    fn loads_and_sorts_by_approval_timestamp() {
        let book = fixture_book();
        assert_eq!(book.len(), 4);
        let order_ids: Vec<&str> = book.records.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(order_ids, vec!["ord-3", "ord-1", "ord-2", "ord-4"]);
        assert_eq!(
            book.min_approval_date(),
            NaiveDate::from_ymd_opt(2017, 12, 31)
        );
        assert_eq!(book.max_approval_date(), NaiveDate::from_ymd_opt(2018, 3, 1));
    }

    #[test]
    fn parses_money_as_decimal_and_optionals_as_none() {
        let book = fixture_book();
        let ord_1 = book
            .records
            .iter()
            .find(|r| r.order_id == "ord-1")
            .unwrap();
        assert_eq!(ord_1.payment_value, dec!(10.50));
        assert_eq!(ord_1.price, dec!(9.99));
        assert_eq!(ord_1.review_score, Some(dec!(5.0)));
        assert_eq!(ord_1.delivered_at, None);
        assert_eq!(ord_1.delivery_days, None);
        assert_eq!(ord_1.category.as_deref(), Some("health_beauty"));

        let ord_3 = book
            .records
            .iter()
            .find(|r| r.order_id == "ord-3")
            .unwrap();
        assert_eq!(ord_3.category, None);
        assert_eq!(ord_3.review_score, None);
        assert_eq!(ord_3.delivery_days, Some(8.0));
    }

    #[test]
    fn accepts_all_three_timestamp_shapes() {
        let book = fixture_book();
        let ord_4 = book
            .records
            .iter()
            .find(|r| r.order_id == "ord-4")
            .unwrap();
        assert_eq!(
            ord_4.approved_at,
            NaiveDate::from_ymd_opt(2018, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        let ord_3 = book
            .records
            .iter()
            .find(|r| r.order_id == "ord-3")
            .unwrap();
        assert_eq!(ord_3.approved_at.to_string(), "2017-12-31 23:59:59");
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let headerless = "\
order_id,order_approved_at,product_id,price,review_score,time_delivery
ord-1,2018-01-05 11:00:00,prod-a,9.99,5.0,2.0
";
        let error = load_from_reader(headerless.as_bytes(), "fixture").unwrap_err();
        match error {
            DashboardError::Schema { missing } => {
                assert_eq!(
                    missing,
                    vec![
                        "payment_value".to_string(),
                        "order_delivered_customer_date".to_string(),
                        "product_category_name_english".to_string(),
                    ]
                );
            }
            other => panic!("expected a schema error, got {:?}", other),
        }
        let message = load_from_reader(headerless.as_bytes(), "fixture")
            .unwrap_err()
            .to_string();
        assert!(message.contains("payment_value, order_delivered_customer_date"));
    }

    #[test]
    fn malformed_approval_timestamp_names_the_row() {
        let broken = "\
index,order_id,payment_value,order_approved_at,order_delivered_customer_date,product_category_name_english,product_id,price,review_score,time_delivery
0,ord-1,10.50,2018-01-05 11:00:00,,toys,prod-a,9.99,5.0,2.0
1,ord-2,20.00,not-a-date,,toys,prod-b,19.99,4.0,3.0
";
        let message = load_from_reader(broken.as_bytes(), "fixture")
            .unwrap_err()
            .to_string();
        assert!(message.contains("row 3"), "got: {}", message);
        assert!(message.contains("order_approved_at"), "got: {}", message);
    }

    #[test]
    fn empty_approval_timestamp_is_fatal_too() {
        let broken = "\
index,order_id,payment_value,order_approved_at,order_delivered_customer_date,product_category_name_english,product_id,price,review_score,time_delivery
0,ord-1,10.50,,,toys,prod-a,9.99,5.0,2.0
";
        let message = load_from_reader(broken.as_bytes(), "fixture")
            .unwrap_err()
            .to_string();
        assert!(message.contains("row 2"), "got: {}", message);
    }

    #[test]
    fn unparseable_money_is_fatal() {
        let broken = "\
index,order_id,payment_value,order_approved_at,order_delivered_customer_date,product_category_name_english,product_id,price,review_score,time_delivery
0,ord-1,ten bucks,2018-01-05 11:00:00,,toys,prod-a,9.99,5.0,2.0
";
        let message = load_from_reader(broken.as_bytes(), "fixture")
            .unwrap_err()
            .to_string();
        assert!(message.contains("payment_value"), "got: {}", message);
    }

    #[test]
    fn empty_dataset_loads_with_no_coverage() {
        let empty = "\
order_id,payment_value,order_approved_at,order_delivered_customer_date,product_category_name_english,product_id,price,review_score,time_delivery
";
        let book = load_from_reader(empty.as_bytes(), "fixture").unwrap();
        assert!(book.is_empty());
        assert_eq!(book.min_approval_date(), None);
        assert_eq!(book.max_approval_date(), None);
    }
}
