use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use hist_multiple::*;
use tempfile::tempdir;

fn write_history(dir: &Path, symbol: &str, days: usize) {
    let start = NaiveDate::from_ymd_opt(2019, 3, 1).unwrap();
    let mut text = String::new();
    for i in 0..days {
        let date = start + Duration::days(i as i64);
        let close = 12.0 + 2.0 * ((i as f64) / 15.0).cos() + i as f64 * 0.002;
        text.push_str(&format!(
            "{} {:.4} {:.4}\n",
            date.format("%Y%m%d"),
            close,
            close * 0.95
        ));
    }
    fs::write(dir.join(format!("{symbol}.TXT")), text).unwrap();
}

#[tokio::test]
async fn test_file_history_and_profile() {
    let dir = tempdir().unwrap();
    write_history(dir.path(), "BBAS3.SA", 400);
    fs::write(
        dir.path().join("BBAS3.SA.toml"),
        "name = \"Banco do Brasil\"\ncurrency = \"BRL\"\n",
    )
    .unwrap();

    let provider = FileProvider::new(dir.path());
    let result = analyze(&provider, "BBAS3", &[180, 360]).await.unwrap();

    assert_eq!(result.resolved_symbol, "BBAS3.SA");
    assert_eq!(result.company_name, "Banco do Brasil");
    assert_eq!(result.currency, "BRL");
    assert_eq!(result.points, 400);
    assert_eq!(result.first_date, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());
    assert_eq!(result.sweep.len(), N_THRESHOLDS);
    // 360-day returns stop at index 39, before the first multiple at 49
    assert!(result.per_horizon[0].best().is_some());
    assert!(result.per_horizon[1].best().is_none());
    assert!(result.sweep.iter().all(|row| row.counts[1] == 0));
}

#[tokio::test]
async fn test_missing_profile_uses_defaults() {
    let dir = tempdir().unwrap();
    write_history(dir.path(), "KO", 120);

    let provider = FileProvider::new(dir.path());
    let result = analyze(&provider, "KO", &[180]).await.unwrap();

    assert_eq!(result.company_name, "Company name not available");
    assert_eq!(result.currency, "USD");
}

#[tokio::test]
async fn test_missing_files_read_as_not_found() {
    let dir = tempdir().unwrap();
    let provider = FileProvider::new(dir.path());

    let err = analyze(&provider, "ZZZZ", &[180]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_corrupt_file_is_a_provider_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("BAD.TXT"), "20240102 1.0 1.0\nnot a price line\n").unwrap();

    let provider = FileProvider::new(dir.path());
    let err = analyze(&provider, "BAD", &[180]).await.unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::Provider { source: ProviderError::Parse(_), .. }
    ));
}

#[tokio::test]
async fn test_unsorted_file_is_ordered_by_date() {
    let dir = tempdir().unwrap();
    let mut lines: Vec<String> = (0..60)
        .map(|i| {
            let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(i);
            format!("{},{},{}", date.format("%Y%m%d"), 10.0 + i as f64, 10.0 + i as f64)
        })
        .collect();
    lines.reverse();
    fs::write(dir.path().join("REV.TXT"), lines.join("\n")).unwrap();

    let provider = FileProvider::new(dir.path());
    let result = analyze(&provider, "REV", &[180]).await.unwrap();

    assert_eq!(result.first_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    assert_eq!(result.last_close, 69.0);
}
