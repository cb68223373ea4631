// order_filter.rs
use crate::order_loader::OrderRecord;
use chrono::NaiveDate;

/// Keeps the order lines whose approval date falls inside the inclusive range.
/// Comparison happens on parsed dates, never on timestamp strings.
pub fn filter_by_approval_date<'a>(
    records: &'a [OrderRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a OrderRecord> {
    records
        .iter()
        .filter(|record| {
            let date = record.approved_date();
            date >= start && date <= end
        })
        .collect()
}

pub fn clamp_to_coverage(date: NaiveDate, min_date: NaiveDate, max_date: NaiveDate) -> NaiveDate {
    date.max(min_date).min(max_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn approved(timestamp: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn record(order_id: &str, timestamp: &str) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            product_id: format!("prod-{}", order_id),
            category: Some("toys".to_string()),
            price: dec!(10.00),
            payment_value: dec!(10.00),
            approved_at: approved(timestamp),
            delivered_at: None,
            delivery_days: None,
            review_score: None,
        }
    }

    fn sample() -> Vec<OrderRecord> {
        vec![
            record("a", "2018-01-05 00:00:01"),
            record("b", "2018-01-31 23:59:59"),
            record("c", "2018-02-01 00:00:00"),
            record("d", "2018-03-15 12:00:00"),
        ]
    }

    #[test]
    fn both_endpoints_are_inclusive() {
        let records = sample();
        let kept = filter_by_approval_date(&records, day(2018, 1, 5), day(2018, 2, 1));
        let ids: Vec<&str> = kept.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn single_day_range_keeps_the_whole_day() {
        let records = sample();
        let kept = filter_by_approval_date(&records, day(2018, 1, 31), day(2018, 1, 31));
        let ids: Vec<&str> = kept.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn range_outside_the_data_matches_nothing() {
        let records = sample();
        let kept = filter_by_approval_date(&records, day(2019, 1, 1), day(2019, 12, 31));
        assert!(kept.is_empty());
    }

    #[test]
    fn clamp_pins_out_of_coverage_dates() {
        let min_date = day(2017, 1, 1);
        let max_date = day(2018, 8, 31);
        assert_eq!(
            clamp_to_coverage(day(2016, 5, 5), min_date, max_date),
            min_date
        );
        assert_eq!(
            clamp_to_coverage(day(2020, 1, 1), min_date, max_date),
            max_date
        );
        assert_eq!(
            clamp_to_coverage(day(2018, 2, 2), min_date, max_date),
            day(2018, 2, 2)
        );
    }
}
