//! Tests for CSV import validation.

use assetra_shared::types::UnitId;
use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;
use crate::asset::AssetStatus;
use crate::error::{EngineError, ErrorKind};

const HEADER: &str = "name,category,unit_id,value,purchaseDate,usefulLife,status";

fn csv(rows: &[&str]) -> String {
    let mut text = HEADER.to_string();
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text
}

fn single_error(row: &str) -> crate::error::RowError {
    let batch = parse(&csv(&[row])).unwrap();
    assert_eq!(batch.errors.len(), 1, "{:?}", batch.errors);
    batch.errors.into_iter().next().unwrap()
}

#[test]
fn test_valid_row() {
    let batch = parse(&csv(&["Laptop,IT,1,15000000,2023-01-15,4,InUse"])).unwrap();
    assert!(batch.is_valid());
    assert_eq!(batch.rows.len(), 1);

    let row = &batch.rows[0];
    assert_eq!(row.row, 2);
    assert_eq!(row.asset.name, "Laptop");
    assert_eq!(row.asset.unit_id, Some(UnitId(1)));
    assert_eq!(row.asset.value, dec!(15000000));
    assert_eq!(
        row.asset.purchase_date,
        NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
    );
    assert_eq!(row.asset.useful_life_years, 4);
    assert_eq!(row.asset.status, AssetStatus::InUse);
}

#[test]
fn test_header_is_case_insensitive_and_trimmed() {
    let text = " NAME , Category,UNIT_ID,value, PurchaseDate ,usefullife,Status\n\
                Chair,Furniture,,750000,2022-06-30,10,idle";
    let batch = parse(text).unwrap();
    assert!(batch.is_valid());
    assert_eq!(batch.rows[0].asset.unit_id, None);
    assert_eq!(batch.rows[0].asset.status, AssetStatus::Idle);
}

#[rstest]
#[case("name,category,unit,value,purchaseDate,usefulLife,status")]
#[case("name,category,unit_id,value,purchaseDate,usefulLife")]
#[case("category,name,unit_id,value,purchaseDate,usefulLife,status")]
#[case("Laptop,IT,1,15000000,2023-01-15,4,InUse")]
fn test_bad_header_is_format_error(#[case] header: &str) {
    let text = format!("{header}\nLaptop,IT,1,15000000,2023-01-15,4,InUse");
    let err = parse(&text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_empty_file_is_format_error() {
    assert!(matches!(parse(""), Err(EngineError::Format(_))));
    assert!(matches!(parse("\n  \n"), Err(EngineError::Format(_))));
}

#[test]
fn test_header_only_is_empty_batch() {
    let batch = parse(HEADER).unwrap();
    assert!(batch.is_valid());
    assert!(batch.rows.is_empty());
}

#[test]
fn test_row_numbers_count_blank_lines() {
    let text = format!(
        "\n{HEADER}\nDesk,Furniture,1,100,2023-01-01,5,InUse\n\nChair,Furniture,1,-5,2023-01-01,5,InUse\r\n"
    );
    let batch = parse(&text).unwrap();
    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].row, 2);
    assert_eq!(batch.failed_rows(), vec![4]);
}

#[test]
fn test_negative_value_reports_only_that_row() {
    let batch = parse(&csv(&[
        "Laptop,IT,1,15000000,2023-01-15,4,InUse",
        "Monitor,IT,1,-1,2023-01-15,4,InUse",
        "Printer,IT,1,3000000,2023-01-15,4,Idle",
    ]))
    .unwrap();
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].row, 3);
    assert_eq!(batch.errors[0].field, Some("value"));

    let err = batch.into_candidates().unwrap_err();
    assert_eq!(err.row_errors().len(), 1);
    assert_eq!(err.error_code(), "IMPORT_ROWS_INVALID");
}

#[test]
fn test_wrong_field_count_is_single_error() {
    let err = single_error("Laptop,IT,1,15000000,2023-01-15,4");
    assert_eq!(err.row, 2);
    assert_eq!(err.field, None);

    let err = single_error("Laptop,\"IT, hardware\",1,15000000,2023-01-15,4,InUse");
    assert_eq!(err.field, None);
}

#[test]
fn test_every_failing_field_is_reported() {
    let batch = parse(&csv(&[",,0,abc,2023-02-30,-1,Sold"])).unwrap();
    let fields: Vec<_> = batch.errors.iter().filter_map(|e| e.field).collect();
    assert_eq!(
        fields,
        vec![
            "name",
            "category",
            "unit_id",
            "value",
            "purchase_date",
            "useful_life",
            "status"
        ]
    );
    assert!(batch.rows.is_empty());
}

#[rstest]
#[case("2023-1-15")]
#[case("15-01-2023")]
#[case("2023/01/15")]
#[case("2023-02-29")]
#[case("2023-13-01")]
#[case("")]
fn test_bad_dates(#[case] date: &str) {
    let err = single_error(&format!("Laptop,IT,1,100,{date},4,InUse"));
    assert_eq!(err.field, Some("purchase_date"));
}

#[test]
fn test_leap_day_is_accepted() {
    let batch = parse(&csv(&["Laptop,IT,1,100,2024-02-29,4,InUse"])).unwrap();
    assert!(batch.is_valid());
}

#[rstest]
#[case("1500.99", dec!(1500))]
#[case("0", dec!(0))]
#[case("0.5", dec!(0))]
#[case("42", dec!(42))]
fn test_fractional_value_is_truncated(#[case] raw: &str, #[case] expected: rust_decimal::Decimal) {
    let batch = parse(&csv(&[&format!("Laptop,IT,1,{raw},2023-01-15,4,InUse")])).unwrap();
    assert_eq!(batch.rows[0].asset.value, expected);
}

#[rstest]
#[case("OnLoan")]
#[case("lost")]
#[case("SOLD")]
fn test_non_creatable_status_rejected(#[case] status: &str) {
    let err = single_error(&format!("Laptop,IT,1,100,2023-01-15,4,{status}"));
    assert_eq!(err.field, Some("status"));
}

#[rstest]
#[case("inrepair", AssetStatus::InRepair)]
#[case("IDLE", AssetStatus::Idle)]
#[case("InUse", AssetStatus::InUse)]
fn test_creatable_status_case_insensitive(#[case] raw: &str, #[case] expected: AssetStatus) {
    let batch = parse(&csv(&[&format!("Laptop,IT,1,100,2023-01-15,4,{raw}")])).unwrap();
    assert_eq!(batch.rows[0].asset.status, expected);
}

#[test]
fn test_zero_useful_life_is_accepted() {
    let batch = parse(&csv(&["Land,Property,1,100,2023-01-15,0,Idle"])).unwrap();
    assert_eq!(batch.rows[0].asset.useful_life_years, 0);
}

#[test]
fn test_errors_accumulate_across_rows() {
    let batch = parse(&csv(&[
        "A,IT,1,100,2023-01-15,4,InUse",
        "B,IT,-3,100,2023-01-15,4,InUse",
        "C,IT,1,100,2023-01-15,four,InUse",
        "D,IT,1,100,2023-01-15,4,Broken",
    ]))
    .unwrap();
    assert_eq!(batch.failed_rows(), vec![3, 4, 5]);
    assert_eq!(batch.rows.len(), 1);
}
