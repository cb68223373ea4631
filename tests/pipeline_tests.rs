use chrono::NaiveDate;
use dashbro::config::Analyst;
use dashbro::dashboard_manager::{compose_dashboard, parse_user_date, DashboardSession};
use dashbro::order_loader::{
    load_from_path, load_from_reader, load_from_url, DashboardError, OrderBook,
};
use rust_decimal_macros::dec;
use std::io::Cursor;

// Header order is shuffled against the loader's required-column list on
// purpose, and the leading "index" column is one the loader never asked for.
const FIXTURE: &str = "\
index,order_id,product_id,product_category_name_english,price,payment_value,order_approved_at,order_delivered_customer_date,time_delivery,review_score
0,order_a,prod_1,toys,20.00,25.00,2018-03-10 14:00:00,2018-03-15 10:00:00,4.5,5
1,order_b,prod_2,garden,50.00,60.00,2017-12-30 08:15:00,,,
2,order_b,prod_3,,10.00,12.50,2017-12-30 08:15:00,,,
3,order_c,prod_4,beauty,100.00,110.00,2018-03-10 09:30:00,2018-03-20 00:00:00,9.5,3.0
4,order_d,prod_5,toys,15.00,18.00,2018-01-05,,2.4,
5,order_e,prod_6,beauty,30.00,35.00,2018-03-11T10:00:00,2018-03-13 12:00:00,2.5,5
";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn load_fixture() -> OrderBook {
    load_from_reader(Cursor::new(FIXTURE), "fixture.csv").unwrap()
}

#[test]
fn loads_sorts_and_derives_every_panel() {
    let book = load_fixture();
    assert_eq!(book.len(), 6);
    assert_eq!(book.min_approval_date(), Some(ymd(2017, 12, 30)));
    assert_eq!(book.max_approval_date(), Some(ymd(2018, 3, 11)));

    let session = DashboardSession::new(book).unwrap();
    let summaries = session.summaries();

    let daily: Vec<(NaiveDate, u64)> = summaries
        .daily_orders
        .iter()
        .map(|row| (row.date, row.order_count))
        .collect();
    assert_eq!(
        daily,
        vec![
            (ymd(2017, 12, 30), 1),
            (ymd(2018, 1, 5), 1),
            (ymd(2018, 3, 10), 2),
            (ymd(2018, 3, 11), 1),
        ]
    );
    assert_eq!(summaries.total_orders(), 5);
    assert_eq!(summaries.total_revenue(), dec!(260.50));

    let sales: Vec<(&str, u64)> = summaries
        .category_sales
        .iter()
        .map(|row| (row.category.as_str(), row.items_sold))
        .collect();
    assert_eq!(sales, vec![("beauty", 2), ("toys", 2), ("garden", 1)]);

    let prices: Vec<(&str, rust_decimal::Decimal)> = summaries
        .category_prices
        .iter()
        .map(|row| (row.category.as_str(), row.max_price))
        .collect();
    assert_eq!(
        prices,
        vec![("beauty", dec!(100.00)), ("garden", dec!(50.00)), ("toys", dec!(20.00))]
    );

    let monthly: Vec<(&str, rust_decimal::Decimal)> = summaries
        .monthly_spending
        .iter()
        .map(|row| (row.month.as_str(), row.spending))
        .collect();
    assert_eq!(
        monthly,
        vec![
            ("January", dec!(18.00)),
            ("March", dec!(170.00)),
            ("December", dec!(72.50)),
        ]
    );

    // order_d has a delivery time but no score, so only two score buckets exist.
    let scores: Vec<(rust_decimal::Decimal, f64, u64)> = summaries
        .delivery_scores
        .iter()
        .map(|row| (row.review_score, row.avg_delivery_days, row.rated_lines))
        .collect();
    assert_eq!(scores, vec![(dec!(3), 9.5, 1), (dec!(5), 3.5, 2)]);
}

#[test]
fn range_changes_recompute_from_the_same_records() {
    let mut session = DashboardSession::new(load_fixture()).unwrap();

    let visible = session
        .set_range(ymd(2018, 3, 1), ymd(2018, 12, 31))
        .unwrap();
    assert_eq!(visible, 3);
    // The far end clamps back to the last covered day.
    assert_eq!(session.active_range(), (ymd(2018, 3, 1), ymd(2018, 3, 11)));

    let summaries = session.summaries();
    assert_eq!(summaries.total_orders(), 3);
    assert_eq!(summaries.total_revenue(), dec!(170.00));
    assert_eq!(summaries.daily_orders.len(), 2);

    assert_eq!(session.reset_range(), 6);
    assert_eq!(session.summaries().total_orders(), 5);
}

#[test]
fn single_day_range_keeps_both_lines_of_that_day() {
    let mut session = DashboardSession::new(load_fixture()).unwrap();
    let visible = session.set_range(ymd(2018, 3, 10), ymd(2018, 3, 10)).unwrap();
    assert_eq!(visible, 2);

    let summaries = session.summaries();
    assert_eq!(summaries.daily_orders.len(), 1);
    assert_eq!(summaries.daily_orders[0].order_count, 2);
    assert_eq!(summaries.daily_orders[0].revenue, dec!(135.00));
}

#[test]
fn inverted_range_is_rejected_and_nothing_moves() {
    let mut session = DashboardSession::new(load_fixture()).unwrap();
    let before = session.active_range();

    let result = session.set_range(ymd(2018, 3, 11), ymd(2018, 1, 5));
    assert!(matches!(result, Err(DashboardError::InvalidRange { .. })));
    assert_eq!(session.active_range(), before);
    assert_eq!(session.summaries().total_orders(), 5);
}

#[test]
fn empty_range_is_applied_and_panels_fall_back_to_placeholders() {
    let mut session = DashboardSession::new(load_fixture()).unwrap();
    let visible = session.set_range(ymd(2018, 2, 1), ymd(2018, 2, 28)).unwrap();
    assert_eq!(visible, 0);
    assert_eq!(session.active_range(), (ymd(2018, 2, 1), ymd(2018, 2, 28)));

    let dashboard = compose_dashboard(&session, &Analyst::default());
    assert!(dashboard.contains("(no orders in the selected range)"));
    assert!(dashboard.contains("(no categorized orders in the selected range)"));
}

#[test]
fn missing_columns_are_reported_together() {
    let csv = "\
order_id,product_id,product_category_name_english,price,order_approved_at,order_delivered_customer_date,time_delivery
order_a,prod_1,toys,20.00,2018-03-10 14:00:00,,";
    let err = load_from_reader(Cursor::new(csv), "broken.csv").unwrap_err();
    match err {
        DashboardError::Schema { ref missing } => {
            assert_eq!(*missing, vec!["payment_value", "review_score"]);
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
    assert!(err
        .to_string()
        .contains("missing required columns: payment_value, review_score"));
}

#[test]
fn composed_dashboard_reads_like_a_dashboard() {
    let session = DashboardSession::new(load_fixture()).unwrap();
    let dashboard = compose_dashboard(&session, &Analyst::default());

    assert!(dashboard.contains("E-COMMERCE PUBLIC DASHBOARD"));
    assert!(dashboard.contains("Total orders  : 5"));
    assert!(dashboard.contains("$260.50"));
    assert!(dashboard.contains("DAILY ORDERS"));
    assert!(dashboard.contains("TOP CATEGORIES"));
    assert!(dashboard.contains("DELIVERY TIME BY REVIEW SCORE"));
    assert!(dashboard.contains("MONTHLY CUSTOMER SPENDING"));
    assert!(dashboard.contains("Copyright (C)"));

    // Same session, same text. Nothing in the render path mutates state.
    assert_eq!(dashboard, compose_dashboard(&session, &Analyst::default()));
}

#[test]
fn user_dates_parse_in_the_common_spellings() {
    assert_eq!(parse_user_date("2018-03-10"), Some(ymd(2018, 3, 10)));
    assert_eq!(parse_user_date(" 2018/3/5 "), Some(ymd(2018, 3, 5)));
    assert_eq!(parse_user_date("10-03-2018"), None);
    assert_eq!(parse_user_date("soon"), None);
}

#[test]
fn datasets_round_trip_through_dash_db_files() {
    let scratch = std::env::temp_dir().join(format!("dashbro_pipeline_{}", std::process::id()));
    std::fs::create_dir_all(&scratch).unwrap();
    let file_path = scratch.join("orders.csv");
    std::fs::write(&file_path, FIXTURE).unwrap();

    let book = load_from_path(&file_path).unwrap();
    assert_eq!(book.len(), 6);
    assert_eq!(book.source, file_path.to_string_lossy());

    std::fs::remove_dir_all(&scratch).unwrap();
}

#[tokio::test]
async fn fetching_over_http_loads_the_same_book() {
    use std::io::{Read, Write};

    // One-shot server: take the first connection, send a canned 200, hang up.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    let server = std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            FIXTURE.len(),
            FIXTURE
        );
        socket.write_all(response.as_bytes()).unwrap();
    });

    let url = format!("http://{}/orders.csv", address);
    let fetched = load_from_url(&url).await.unwrap();
    server.join().unwrap();

    assert_eq!(fetched.source, url);
    assert_eq!(fetched.records, load_fixture().records);
}
