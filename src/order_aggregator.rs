// order_aggregator.rs
use crate::order_loader::OrderRecord;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct DailyOrdersRow {
    pub date: NaiveDate,
    pub order_count: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySalesRow {
    pub category: String,
    pub items_sold: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPriceRow {
    pub category: String,
    pub max_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySpendingRow {
    pub month: String,
    pub spending: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryScoreRow {
    pub review_score: Decimal,
    pub avg_delivery_days: f64,
    pub rated_lines: u64,
}

/// Every table the dashboard draws, derived in one pass over the visible rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummaries {
    pub daily_orders: Vec<DailyOrdersRow>,
    pub category_sales: Vec<CategorySalesRow>,
    pub category_prices: Vec<CategoryPriceRow>,
    pub monthly_spending: Vec<MonthlySpendingRow>,
    pub delivery_scores: Vec<DeliveryScoreRow>,
}

impl DashboardSummaries {
    pub fn derive(records: &[&OrderRecord]) -> Self {
        DashboardSummaries {
            daily_orders: create_daily_orders(records),
            category_sales: create_category_sales(records),
            category_prices: create_category_prices(records),
            monthly_spending: create_monthly_spending(records),
            delivery_scores: create_delivery_scores(records),
        }
    }

    /// Sum of the per-day distinct order counts. An order approved across two
    /// calendar days counts once per day it appears on.
    pub fn total_orders(&self) -> u64 {
        self.daily_orders.iter().map(|row| row.order_count).sum()
    }

    pub fn total_revenue(&self) -> Decimal {
        self.daily_orders
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc + row.revenue)
    }
}

/// Distinct orders and summed payment value per approval day, chronological.
/// Days without a single order do not get a zero row.
pub fn create_daily_orders(records: &[&OrderRecord]) -> Vec<DailyOrdersRow> {
    let mut buckets: BTreeMap<NaiveDate, (HashSet<&str>, Decimal)> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(record.approved_date()).or_default();
        bucket.0.insert(record.order_id.as_str());
        bucket.1 += record.payment_value;
    }
    buckets
        .into_iter()
        .map(|(date, (order_ids, revenue))| DailyOrdersRow {
            date,
            order_count: order_ids.len() as u64,
            revenue,
        })
        .collect()
}

/// Order lines per category, best sellers first. Uncategorized lines are left out.
pub fn create_category_sales(records: &[&OrderRecord]) -> Vec<CategorySalesRow> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in records {
        if let Some(category) = record.category.as_deref() {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    let mut rows: Vec<CategorySalesRow> = counts
        .into_iter()
        .map(|(category, items_sold)| CategorySalesRow {
            category: category.to_string(),
            items_sold,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.items_sold
            .cmp(&a.items_sold)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Highest single line price per category, priciest first.
pub fn create_category_prices(records: &[&OrderRecord]) -> Vec<CategoryPriceRow> {
    let mut maxima: HashMap<&str, Decimal> = HashMap::new();
    for record in records {
        if let Some(category) = record.category.as_deref() {
            let entry = maxima.entry(category).or_insert(record.price);
            if record.price > *entry {
                *entry = record.price;
            }
        }
    }
    let mut rows: Vec<CategoryPriceRow> = maxima
        .into_iter()
        .map(|(category, max_price)| CategoryPriceRow {
            category: category.to_string(),
            max_price,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.max_price
            .cmp(&a.max_price)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Payment value summed per calendar month, keyed by month NAME, January
/// through December. When the range spans the same month in several years,
/// only the highest-spending year survives for that name. Ties keep the
/// later year. Months without a single order do not get a zero row, same
/// as the daily series.
pub fn create_monthly_spending(records: &[&OrderRecord]) -> Vec<MonthlySpendingRow> {
    let mut buckets: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for record in records {
        let approved = record.approved_date();
        *buckets
            .entry((approved.year(), approved.month()))
            .or_insert(Decimal::ZERO) += record.payment_value;
    }

    let mut chronological: Vec<(u32, Decimal)> = buckets
        .into_iter()
        .map(|((_, month), spending)| (month, spending))
        .collect();
    // Stable sort, so equal totals stay in year order and the later year wins
    // the overwrite below.
    chronological.sort_by(|a, b| a.1.cmp(&b.1));

    let mut keep_highest: HashMap<u32, Decimal> = HashMap::new();
    for (month, spending) in chronological {
        keep_highest.insert(month, spending);
    }

    let mut rows: Vec<(u32, Decimal)> = keep_highest.into_iter().collect();
    rows.sort_by_key(|(month, _)| *month);
    rows.into_iter()
        .map(|(month, spending)| MonthlySpendingRow {
            month: month_name(month).to_string(),
            spending,
        })
        .collect()
}

/// Mean delivery time per review score, slowest first. A line joins a bucket
/// only when it carries both a score and a delivery time.
pub fn create_delivery_scores(records: &[&OrderRecord]) -> Vec<DeliveryScoreRow> {
    let mut buckets: BTreeMap<Decimal, (f64, u64)> = BTreeMap::new();
    for record in records {
        if let (Some(score), Some(days)) = (record.review_score, record.delivery_days) {
            let bucket = buckets.entry(score.normalize()).or_insert((0.0, 0));
            bucket.0 += days;
            bucket.1 += 1;
        }
    }
    let mut rows: Vec<DeliveryScoreRow> = buckets
        .into_iter()
        .map(|(review_score, (total_days, rated_lines))| DeliveryScoreRow {
            review_score,
            avg_delivery_days: total_days / rated_lines as f64,
            rated_lines,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.avg_delivery_days
            .total_cmp(&a.avg_delivery_days)
            .then_with(|| b.review_score.cmp(&a.review_score))
    });
    rows
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
