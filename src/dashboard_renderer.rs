// dashboard_renderer.rs
use crate::config::Analyst;
use crate::order_aggregator::{
    CategoryPriceRow, CategorySalesRow, DailyOrdersRow, DashboardSummaries, DeliveryScoreRow,
    MonthlySpendingRow,
};
use chrono::{Datelike, Local, NaiveDate};
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::*;

pub const PANEL_WIDTH: usize = 72;
const CHART_WIDTH: usize = 64;
const CHART_HEIGHT: usize = 10;
const BAR_WIDTH: usize = 30;
const TOP_CATEGORIES: usize = 10;

const HIGHLIGHT: &str = "\x1b[1;38;5;208m";
const RESET: &str = "\x1b[0m";

pub fn format_usd(amount: Decimal) -> String {
    let cents_total = (amount.round_dp(2) * Decimal::from(100)).to_i64().unwrap_or(0);
    let sign = if cents_total < 0 { "-" } else { "" };
    let whole = (cents_total / 100).abs();
    let cents = (cents_total % 100).abs();
    format!("{}${}.{:02}", sign, whole.to_formatted_string(&Locale::en), cents)
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let length = ((value / max) * width as f64).round() as usize;
    "#".repeat(length.clamp(1, width))
}

fn section_title(title: &str) -> String {
    format!("{}\n{}\n", title, "-".repeat(PANEL_WIDTH))
}

fn shortened(source: &str, max_len: usize) -> String {
    if source.chars().count() <= max_len {
        return source.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = source
        .chars()
        .skip(source.chars().count() - keep)
        .collect();
    format!("...{}", tail)
}

fn describe_analyst(analyst: &Analyst) -> String {
    let name = analyst.name.trim();
    let details: Vec<&str> = [analyst.username.trim(), analyst.email.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    match (name.is_empty(), details.is_empty()) {
        (true, true) => "not set, run @config to claim this dashboard".to_string(),
        (true, false) => details.join(", "),
        (false, true) => name.to_string(),
        (false, false) => format!("{} ({})", name, details.join(", ")),
    }
}

pub fn render_masthead(
    analyst: &Analyst,
    source: &str,
    line_count: usize,
    coverage: (NaiveDate, NaiveDate),
    showing: (NaiveDate, NaiveDate),
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "=".repeat(PANEL_WIDTH)));
    out.push_str("E-COMMERCE PUBLIC DASHBOARD\n");
    out.push_str(&format!("{}\n", "=".repeat(PANEL_WIDTH)));
    out.push_str(&format!("ANALYST    {}\n", describe_analyst(analyst)));
    out.push_str(&format!(
        "DATASET    {} ({} order lines)\n",
        shortened(source, 50),
        line_count.to_formatted_string(&Locale::en)
    ));
    out.push_str(&format!("COVERAGE   {} to {}\n", coverage.0, coverage.1));
    out.push_str(&format!("SHOWING    {} to {}\n", showing.0, showing.1));
    out
}

pub fn render_metrics(total_orders: u64, total_revenue: Decimal) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total orders  : {}\n",
        total_orders.to_formatted_string(&Locale::en)
    ));
    out.push_str(&format!("Total revenue : {}\n", format_usd(total_revenue)));
    out
}

/// One column per day up to the chart width. Wider ranges fold several days
/// into a column and draw the busiest day of the slice, so spikes survive.
fn downsample_counts(rows: &[DailyOrdersRow], width: usize) -> Vec<f64> {
    if rows.len() <= width {
        return rows.iter().map(|row| row.order_count as f64).collect();
    }
    let mut columns = Vec::with_capacity(width);
    for index in 0..width {
        let from = index * rows.len() / width;
        let to = ((index + 1) * rows.len() / width).max(from + 1);
        let peak = rows[from..to]
            .iter()
            .map(|row| row.order_count)
            .max()
            .unwrap_or(0);
        columns.push(peak as f64);
    }
    columns
}

pub fn render_daily_orders_chart(
    rows: &[DailyOrdersRow],
    showing: (NaiveDate, NaiveDate),
) -> String {
    let mut out = String::new();
    out.push_str(&section_title("DAILY ORDERS"));
    if rows.is_empty() {
        out.push_str("  (no orders in the selected range)\n");
        return out;
    }

    let columns = downsample_counts(rows, CHART_WIDTH);
    let max = columns.iter().fold(0.0_f64, |acc, value| acc.max(*value));
    let peak_label = format!("{:.0}", max);
    let gutter = peak_label.chars().count().max(1);
    let heights: Vec<usize> = columns
        .iter()
        .map(|value| {
            if *value <= 0.0 || max <= 0.0 {
                0
            } else {
                (((value / max) * CHART_HEIGHT as f64).ceil() as usize).min(CHART_HEIGHT)
            }
        })
        .collect();

    for level in (1..=CHART_HEIGHT).rev() {
        let label = if level == CHART_HEIGHT {
            peak_label.as_str()
        } else {
            ""
        };
        let cells: String = heights
            .iter()
            .map(|height| if *height >= level { '#' } else { ' ' })
            .collect();
        out.push_str(&format!("{:>gutter$} |{}\n", label, cells));
    }
    out.push_str(&format!("{:>gutter$} +{}\n", "0", "-".repeat(columns.len())));
    // The x axis covers the active range, not just the days that had orders.
    out.push_str(&format!(
        "{:gutter$}  {} to {}, {} active days, peak {} orders/day\n",
        "",
        showing.0,
        showing.1,
        rows.len(),
        peak_label
    ));
    out
}

fn ranked_rows(rows: &[(&str, String, f64)]) -> String {
    let name_width = rows
        .iter()
        .map(|(name, _, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, value, _)| value.chars().count())
        .max()
        .unwrap_or(0);
    let max_value = rows.iter().map(|(_, _, value)| *value).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for (position, (name, value, numeric)) in rows.iter().enumerate() {
        let line = format!(
            "  {:<name_width$}  {:>value_width$}  {}",
            name,
            value,
            bar(*numeric, max_value, BAR_WIDTH)
        );
        if position == 0 {
            out.push_str(&format!("{}{}{}\n", HIGHLIGHT, line, RESET));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }
    out
}

pub fn render_category_panels(
    sales: &[CategorySalesRow],
    prices: &[CategoryPriceRow],
) -> String {
    let mut out = String::new();
    out.push_str(&section_title("TOP CATEGORIES"));

    out.push_str("Best sellers (order lines)\n");
    if sales.is_empty() {
        out.push_str("  (no categorized orders in the selected range)\n");
    } else {
        let rows: Vec<(&str, String, f64)> = sales
            .iter()
            .take(TOP_CATEGORIES)
            .map(|row| {
                (
                    row.category.as_str(),
                    row.items_sold.to_formatted_string(&Locale::en),
                    row.items_sold as f64,
                )
            })
            .collect();
        out.push_str(&ranked_rows(&rows));
    }

    out.push('\n');
    out.push_str("Most expensive (highest line price)\n");
    if prices.is_empty() {
        out.push_str("  (no categorized orders in the selected range)\n");
    } else {
        let rows: Vec<(&str, String, f64)> = prices
            .iter()
            .take(TOP_CATEGORIES)
            .map(|row| {
                (
                    row.category.as_str(),
                    format_usd(row.max_price),
                    row.max_price.to_f64().unwrap_or(0.0),
                )
            })
            .collect();
        out.push_str(&ranked_rows(&rows));
    }
    out
}

pub fn render_delivery_scores(rows: &[DeliveryScoreRow]) -> String {
    let mut out = String::new();
    out.push_str(&section_title("DELIVERY TIME BY REVIEW SCORE"));
    if rows.is_empty() {
        out.push_str("  (no rated deliveries in the selected range)\n");
        return out;
    }
    let max_days = rows
        .iter()
        .map(|row| row.avg_delivery_days)
        .fold(0.0_f64, f64::max);
    for row in rows {
        let score = row.review_score.to_string();
        out.push_str(&format!(
            "  score {:<3} {:>7.1} days  {}\n",
            score,
            row.avg_delivery_days,
            bar(row.avg_delivery_days, max_days, BAR_WIDTH)
        ));
    }
    out
}

pub fn render_monthly_spending(rows: &[MonthlySpendingRow]) -> String {
    let mut out = String::new();
    out.push_str(&section_title("MONTHLY CUSTOMER SPENDING"));
    if rows.is_empty() {
        out.push_str("  (no orders in the selected range)\n");
        return out;
    }
    let amounts: Vec<String> = rows.iter().map(|row| format_usd(row.spending)).collect();
    let amount_width = amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0);
    let max_spending = rows
        .iter()
        .map(|row| row.spending.to_f64().unwrap_or(0.0))
        .fold(0.0_f64, f64::max);
    for (row, amount) in rows.iter().zip(&amounts) {
        out.push_str(&format!(
            "  {:<9}  {:>amount_width$}  {}\n",
            row.month,
            amount,
            bar(row.spending.to_f64().unwrap_or(0.0), max_spending, BAR_WIDTH)
        ));
    }
    out
}

pub fn render_caption(analyst: &Analyst) -> String {
    let year = Local::now().year();
    let name = analyst.name.trim();
    let email = analyst.email.trim();
    if name.is_empty() {
        format!("Copyright (C) dashbro {}", year)
    } else if email.is_empty() {
        format!("Copyright (C) {} {}", name, year)
    } else {
        format!("Copyright (C) {} - {} {}", name, email, year)
    }
}

fn table_block(title: &str, lines: Vec<String>) -> String {
    let mut out = String::new();
    out.push_str(&section_title(title));
    let total = lines.len();
    if total == 0 {
        out.push_str("  (empty)\n");
    } else if total > 12 {
        for line in &lines[..5] {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("  ... {} more rows ...\n", total - 10));
        for line in &lines[total - 5..] {
            out.push_str(line);
            out.push('\n');
        }
    } else {
        for line in &lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(&format!("Total rows: {}\n\n", total));
    out
}

/// The raw numbers behind every panel, as plain tables. Long tables show the
/// first and last five rows.
pub fn render_summary_tables(summaries: &DashboardSummaries) -> String {
    let mut out = String::new();

    let daily: Vec<String> = summaries
        .daily_orders
        .iter()
        .map(|row| {
            format!(
                "  {}  {:>7}  {:>14}",
                row.date,
                row.order_count.to_formatted_string(&Locale::en),
                format_usd(row.revenue)
            )
        })
        .collect();
    out.push_str(&table_block("DAILY ORDERS (date, orders, revenue)", daily));

    let sales_width = summaries
        .category_sales
        .iter()
        .map(|row| row.category.chars().count())
        .max()
        .unwrap_or(0);
    let sales: Vec<String> = summaries
        .category_sales
        .iter()
        .map(|row| {
            format!(
                "  {:<sales_width$}  {:>7}",
                row.category,
                row.items_sold.to_formatted_string(&Locale::en)
            )
        })
        .collect();
    out.push_str(&table_block("CATEGORY SALES (category, order lines)", sales));

    let price_width = summaries
        .category_prices
        .iter()
        .map(|row| row.category.chars().count())
        .max()
        .unwrap_or(0);
    let prices: Vec<String> = summaries
        .category_prices
        .iter()
        .map(|row| {
            format!(
                "  {:<price_width$}  {:>14}",
                row.category,
                format_usd(row.max_price)
            )
        })
        .collect();
    out.push_str(&table_block(
        "CATEGORY PRICES (category, highest line price)",
        prices,
    ));

    let monthly: Vec<String> = summaries
        .monthly_spending
        .iter()
        .map(|row| format!("  {:<9}  {:>14}", row.month, format_usd(row.spending)))
        .collect();
    out.push_str(&table_block("MONTHLY SPENDING (month, payment value)", monthly));

    let scores: Vec<String> = summaries
        .delivery_scores
        .iter()
        .map(|row| {
            format!(
                "  score {:<3} {:>7.1} days  {:>7} rated lines",
                row.review_score.to_string(),
                row.avg_delivery_days,
                row.rated_lines.to_formatted_string(&Locale::en)
            )
        })
        .collect();
    out.push_str(&table_block(
        "DELIVERY TIMES (score, avg days, rated lines)",
        scores,
    ));

    out
}
