//! Loading from disk, memoisation and the session built on top of them.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::{write_csv, HEADER, SALES};
use sales_dashboard::data::cache::TableCache;
use sales_dashboard::data::loader::load_csv;
use sales_dashboard::{CategoricalField, CriteriaOverrides, DashboardSession, DataLoadError};

#[test]
fn loads_sample_file() {
    let file = write_csv(SALES);
    let table = load_csv(file.path()).unwrap();

    assert_eq!(table.len(), SALES.len());
    assert_eq!(
        table.options(CategoricalField::City),
        ["Yangon", "Naypyitaw", "Mandalay"]
    );
    assert_eq!(
        table.options(CategoricalField::Payment),
        ["Ewallet", "Cash", "Credit card"]
    );
    assert_eq!(table.records[1].invoice_id, "226-31-3081");
}

#[test]
fn memoised_loads_are_value_equal() {
    let file = write_csv(SALES);
    let mut cache = TableCache::new();

    let first = cache.get_or_load(file.path()).unwrap();
    let second = cache.get_or_load(file.path()).unwrap();
    let fresh = load_csv(file.path()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, fresh);
}

#[test]
fn round_trip_holds_with_blank_cells() {
    let rows = [
        SALES[0],
        "101-17-6199,A,Yangon,Normal,Male,Food and beverages,45.79,7,16.0265,336.5565,3/13/2019,19:44,Credit card,320.53,,7",
    ];
    let file = write_csv(&rows);
    let mut cache = TableCache::new();

    let cached = cache.get_or_load(file.path()).unwrap();
    let fresh = load_csv(file.path()).unwrap();

    assert!(cached.records[1].gross_income.is_nan());
    assert_eq!(*cached, fresh);
}

#[test]
fn missing_required_column_names_the_field() {
    let header_without_rating = HEADER.trim_end_matches(",Rating");
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, format!("{header_without_rating}\n").as_bytes()).unwrap();

    let err = load_csv(file.path()).unwrap_err();

    assert!(matches!(err, DataLoadError::MissingColumn { .. }));
    assert_eq!(err.field(), Some("Rating"));
    assert!(err.to_string().contains("Rating"));
}

#[test]
fn header_only_file_is_an_empty_table() {
    let file = write_csv(&[]);
    let table = load_csv(file.path()).unwrap();
    assert!(table.is_empty());
    assert!(table.date_span.is_none());
}

#[test]
fn session_applies_overrides_from_json() {
    let file = write_csv(SALES);
    let mut session = DashboardSession::new();
    session.open(file.path()).unwrap();

    let overrides: CriteriaOverrides =
        serde_json::from_str(r#"{"cities": ["Naypyitaw"], "date_start": "2019-03-01"}"#).unwrap();
    session.apply_overrides(&overrides);

    let result = session.result().unwrap();
    assert_eq!(result.row_count, 2);

    let cleared: CriteriaOverrides = serde_json::from_str(r#"{"payments": []}"#).unwrap();
    session.apply_overrides(&cleared);
    assert!(session.result().unwrap().is_empty());
}

#[test]
fn unknown_criteria_keys_are_rejected() {
    let parsed = serde_json::from_str::<CriteriaOverrides>(r#"{"city": ["Yangon"]}"#);
    assert!(parsed.is_err());
}
