use chrono::{Datelike, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenario_forecast::{
    baseline_series, sample_history, ForecastError, HistoricalSeries, TimeSeriesPoint,
};

#[test]
fn test_series_validation() {
    assert!(matches!(
        HistoricalSeries::new(vec![]),
        Err(ForecastError::ValidationError(_))
    ));

    let gap = vec![TimeSeriesPoint::new(0, 1.0), TimeSeriesPoint::new(2, 2.0)];
    assert!(matches!(
        HistoricalSeries::new(gap),
        Err(ForecastError::ValidationError(_))
    ));

    assert!(HistoricalSeries::from_values(&[1.0, -2.0]).is_err());
    assert!(HistoricalSeries::from_values(&[1.0, f64::INFINITY]).is_err());
    assert!(HistoricalSeries::from_values(&[0.0, 0.0]).is_ok());
}

#[test]
fn test_index_at_usize_max_is_rejected() {
    let points = vec![TimeSeriesPoint::new(usize::MAX, 1.0), TimeSeriesPoint::new(0, 2.0)];
    assert!(matches!(
        HistoricalSeries::new(points),
        Err(ForecastError::ValidationError(_))
    ));

    let json = format!(r#"[{{"index":{},"value":1.0}},{{"index":0,"value":2.0}}]"#, usize::MAX);
    assert!(serde_json::from_str::<HistoricalSeries>(&json).is_err());

    // A lone point at the top of the range is still a valid series
    assert!(HistoricalSeries::new(vec![TimeSeriesPoint::new(usize::MAX, 1.0)]).is_ok());
}

#[test]
fn test_series_may_start_at_any_index() {
    let points = vec![TimeSeriesPoint::new(5, 1.0), TimeSeriesPoint::new(6, 2.0)];
    let series = HistoricalSeries::new(points).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.first_value(), 1.0);
    assert_eq!(series.last_value(), 2.0);
}

#[test]
fn test_with_values_checks_length() {
    let series = HistoricalSeries::from_values(&[1.0, 2.0, 3.0]).unwrap();
    assert!(series.with_values(&[1.0, 2.0]).is_err());
    assert_eq!(series.with_values(&[3.0, 2.0, 1.0]).unwrap().values(), vec![3.0, 2.0, 1.0]);
}

#[test]
fn test_json_round_trip_validates() {
    let series = HistoricalSeries::from_values(&[4.0, 5.0]).unwrap();
    let json = serde_json::to_string(&series).unwrap();
    let parsed: HistoricalSeries = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, series);

    let bad = r#"[{"index":0,"value":1.0},{"index":3,"value":2.0}]"#;
    assert!(serde_json::from_str::<HistoricalSeries>(bad).is_err());
}

#[test]
fn test_baseline_series() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let baseline = baseline_series(start, 12).unwrap();

    assert_eq!(baseline.values()[0], 1000.0);
    assert_eq!(baseline.values()[11], 1000.0 + 11.0 * 120.0);
    assert_eq!(baseline.last_timestamp().unwrap().month(), 12);
}

#[test]
fn test_sample_history_is_seeded() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let a = sample_history(&mut StdRng::seed_from_u64(4), start, 24).unwrap();
    let b = sample_history(&mut StdRng::seed_from_u64(4), start, 24).unwrap();

    assert_eq!(a, b);
    // Base plus seasonal swing stays inside [5000, 16000]
    assert!(a.values().iter().all(|v| (5000.0..16000.0).contains(v)));
}
