// dashboard_manager.rs
use crate::config::{load_config, Analyst};
use crate::dashboard_renderer::{
    render_caption, render_category_panels, render_daily_orders_chart, render_delivery_scores,
    render_masthead, render_metrics, render_monthly_spending, render_summary_tables,
};
use crate::order_aggregator::DashboardSummaries;
use crate::order_filter::{clamp_to_coverage, filter_by_approval_date};
use crate::order_loader::{DashboardError, OrderBook, OrderRecord};
use crate::user_experience::{
    handle_back_flag, handle_cancel_flag, handle_quit_flag, handle_special_flag_without_dataset,
};
use crate::user_interaction::{
    determine_action_as_text, get_user_input, get_user_input_level_2, print_insight,
    print_insight_level_2, print_list,
};
use chrono::NaiveDate;
use log::info;
use regex::Regex;
use std::env;
use std::path::Path;
use std::time::Instant;

/// One open dataset plus the active date range. Summaries are recomputed on
/// demand, never cached, so a redraw always reflects the current range.
#[derive(Debug)]
pub struct DashboardSession {
    book: OrderBook,
    min_date: NaiveDate,
    max_date: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
}

impl DashboardSession {
    pub fn new(book: OrderBook) -> Result<Self, DashboardError> {
        let (Some(min_date), Some(max_date)) =
            (book.min_approval_date(), book.max_approval_date())
        else {
            return Err(DashboardError::DataLoad {
                source: book.source.clone(),
                detail: "dataset has no order lines to chart".to_string(),
            });
        };
        Ok(DashboardSession {
            min_date,
            max_date,
            start: min_date,
            end: max_date,
            book,
        })
    }

    pub fn coverage(&self) -> (NaiveDate, NaiveDate) {
        (self.min_date, self.max_date)
    }

    pub fn active_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn source(&self) -> &str {
        &self.book.source
    }

    pub fn record_count(&self) -> usize {
        self.book.len()
    }

    pub fn reset_range(&mut self) -> usize {
        self.start = self.min_date;
        self.end = self.max_date;
        self.visible_records().len()
    }

    /// Applies a new inclusive range, clamping both ends to the dataset
    /// coverage first. Returns how many order lines the range matches; a
    /// range that matches nothing is still applied.
    pub fn set_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, DashboardError> {
        let start = clamp_to_coverage(start, self.min_date, self.max_date);
        let end = clamp_to_coverage(end, self.min_date, self.max_date);
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        self.start = start;
        self.end = end;
        Ok(self.visible_records().len())
    }

    pub fn visible_records(&self) -> Vec<&OrderRecord> {
        filter_by_approval_date(&self.book.records, self.start, self.end)
    }

    pub fn summaries(&self) -> DashboardSummaries {
        DashboardSummaries::derive(&self.visible_records())
    }
}

/// Accepts 2018-01-05, 2018/01/05 and 2018.1.5 style dates.
pub fn parse_user_date(text: &str) -> Option<NaiveDate> {
    let pattern = Regex::new(r"^\s*(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\s*$").ok()?;
    let captures = pattern.captures(text)?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn compose_dashboard(session: &DashboardSession, analyst: &Analyst) -> String {
    let derive_started = Instant::now();
    let summaries = session.summaries();
    info!(
        "derived dashboard tables for {} visible lines in {:.3}s",
        session.visible_records().len(),
        derive_started.elapsed().as_secs_f64()
    );

    let mut out = String::new();
    out.push_str(&render_masthead(
        analyst,
        session.source(),
        session.record_count(),
        session.coverage(),
        session.active_range(),
    ));
    out.push('\n');
    out.push_str(&render_metrics(
        summaries.total_orders(),
        summaries.total_revenue(),
    ));
    out.push('\n');
    out.push_str(&render_daily_orders_chart(
        &summaries.daily_orders,
        session.active_range(),
    ));
    out.push('\n');
    out.push_str(&render_category_panels(
        &summaries.category_sales,
        &summaries.category_prices,
    ));
    out.push('\n');
    out.push_str(&render_delivery_scores(&summaries.delivery_scores));
    out.push('\n');
    out.push_str(&render_monthly_spending(&summaries.monthly_spending));
    out.push('\n');
    out.push_str(&render_caption(analyst));
    out.push('\n');
    out
}

fn load_analyst() -> Analyst {
    let home_dir = match env::var("HOME") {
        Ok(dir) => dir,
        Err(_) => match env::var("USERPROFILE") {
            Ok(dir) => dir,
            Err(_) => return Analyst::default(),
        },
    };
    let dash_db_path = Path::new(&home_dir).join("Desktop").join("dash_db");
    load_config(&dash_db_path)
        .map(|config| config.analyst)
        .unwrap_or_default()
}

fn set_range_dialog(session: &mut DashboardSession) {
    let (min_date, max_date) = session.coverage();
    print_insight_level_2(&format!(
        "Dataset coverage runs {} to {}. Both ends are inclusive.",
        min_date, max_date
    ));

    let start_input = get_user_input_level_2("Start date (YYYY-MM-DD): ");
    if handle_cancel_flag(&start_input) {
        return;
    }
    let Some(start) = parse_user_date(&start_input) else {
        print_insight_level_2(&format!(
            "That date didn't parse, bro: {:?}. Try YYYY-MM-DD.",
            start_input.trim()
        ));
        return;
    };

    let end_input = get_user_input_level_2("End date (YYYY-MM-DD): ");
    if handle_cancel_flag(&end_input) {
        return;
    }
    let Some(end) = parse_user_date(&end_input) else {
        print_insight_level_2(&format!(
            "That date didn't parse, bro: {:?}. Try YYYY-MM-DD.",
            end_input.trim()
        ));
        return;
    };

    match session.set_range(start, end) {
        Ok(0) => {
            let (start, end) = session.active_range();
            print_insight_level_2(
                &DashboardError::EmptyRange { start, end }.to_string(),
            );
        }
        Ok(matched) => {
            let (start, end) = session.active_range();
            info!("range set to {}..{}, {} lines visible", start, end, matched);
            print_insight_level_2(&format!("Range applied. {} order lines in view.", matched));
        }
        Err(error) => {
            print_insight_level_2(&error.to_string());
        }
    }
}

pub async fn launch_dashboard(book: OrderBook) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = DashboardSession::new(book)?;

    println!("{}", compose_dashboard(&session, &load_analyst()));

    loop {
        let menu_options = vec![
            "SET DATE RANGE",
            "RESET DATE RANGE",
            "REDRAW DASHBOARD",
            "SUMMARY TABLES",
            "BACK",
        ];
        print_list(&menu_options);
        let choice = get_user_input("What's it gonna be?: ").to_lowercase();

        if handle_special_flag_without_dataset(&choice) {
            continue;
        }
        if handle_back_flag(&choice) {
            break;
        }
        let _ = handle_quit_flag(&choice);

        let selected_option = determine_action_as_text(&menu_options, &choice);

        match selected_option {
            Some(ref action) if action == "SET DATE RANGE" => {
                set_range_dialog(&mut session);
                println!("{}", compose_dashboard(&session, &load_analyst()));
            }
            Some(ref action) if action == "RESET DATE RANGE" => {
                let matched = session.reset_range();
                print_insight_level_2(&format!(
                    "Back to full coverage. {} order lines in view.",
                    matched
                ));
                println!("{}", compose_dashboard(&session, &load_analyst()));
            }
            Some(ref action) if action == "REDRAW DASHBOARD" => {
                println!("{}", compose_dashboard(&session, &load_analyst()));
            }
            Some(ref action) if action == "SUMMARY TABLES" => {
                println!("{}", render_summary_tables(&session.summaries()));
            }
            Some(ref action) if action == "BACK" => {
                break;
            }
            _ => {
                print_insight("Dude, that action's a no-go. Give it another whirl, alright?");
            }
        }
    }

    Ok(())
}
