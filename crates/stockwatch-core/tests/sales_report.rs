use std::fs;

use stockwatch::analysis::monthly_revenue;
use stockwatch::chart::render_monthly_chart;
use stockwatch::source::{load_transactions, LoadError};

#[test]
fn transactions_to_chart() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("transactions.csv");
    fs::write(
        &csv_path,
        "transaction_id,timestamp,product,quantity,unit_price\n\
         1,2024-01-03 09:15:00,Milk,2,4.50\n\
         2,2024-01-20 17:40:00,Bread,1,6.00\n\
         3,2024-02-11 08:05:00,Milk,3,4.50\n\
         4,not a timestamp,Eggs,1,9.00\n",
    )
    .unwrap();

    let transactions = load_transactions(&csv_path).unwrap();
    let series = monthly_revenue(&transactions);

    assert_eq!(series.len(), 2);
    assert!((series["2024-01"] - 15.0).abs() < 1e-9);
    assert!((series["2024-02"] - 13.5).abs() < 1e-9);

    let out = dir.path().join("images");
    let chart = render_monthly_chart(&series, &out, "monthly_sales.svg")
        .unwrap()
        .unwrap();
    assert_eq!(chart, out.join("monthly_sales.svg"));
    assert!(chart.is_file());
}

#[test]
fn transactions_missing_columns_yield_no_chart() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("transactions.csv");
    fs::write(&csv_path, "product,quantity\nMilk,1\n").unwrap();

    let err = load_transactions(&csv_path).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumns { .. }));

    let series = monthly_revenue(&[]);
    let out = dir.path().join("images");
    assert!(render_monthly_chart(&series, &out, "monthly_sales.svg").unwrap().is_none());
    assert!(!out.exists());
}
