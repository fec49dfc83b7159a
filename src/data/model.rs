use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single sale transaction.
///
/// Numeric cells that were empty in the source hold `f64::NAN`; every
/// aggregation skips them. Equality treats two missing values as equal.
#[derive(Debug, Clone)]
pub struct Record {
    pub invoice_id: String,
    pub branch: String,
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_line: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub tax: f64,
    pub total: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub payment: String,
    pub cogs: f64,
    pub gross_income: f64,
    pub rating: f64,
}

impl Record {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

fn same_number(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.invoice_id == other.invoice_id
            && self.branch == other.branch
            && self.city == other.city
            && self.customer_type == other.customer_type
            && self.gender == other.gender
            && self.product_line == other.product_line
            && self.date == other.date
            && self.time == other.time
            && self.payment == other.payment
            && NumericField::ALL
                .iter()
                .all(|f| same_number(f.value(self), f.value(other)))
    }
}

// ---------------------------------------------------------------------------
// Column descriptors
// ---------------------------------------------------------------------------

/// Categorical columns the sidebar filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CategoricalField {
    #[serde(rename = "City")]
    City,
    #[serde(rename = "Gender")]
    Gender,
    #[serde(rename = "Customer type")]
    CustomerType,
    #[serde(rename = "Payment")]
    Payment,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::City,
        CategoricalField::Gender,
        CategoricalField::CustomerType,
        CategoricalField::Payment,
    ];

    /// Header name in the source CSV.
    pub fn column(self) -> &'static str {
        match self {
            CategoricalField::City => "City",
            CategoricalField::Gender => "Gender",
            CategoricalField::CustomerType => "Customer type",
            CategoricalField::Payment => "Payment",
        }
    }

    pub fn value(self, record: &Record) -> &str {
        match self {
            CategoricalField::City => &record.city,
            CategoricalField::Gender => &record.gender,
            CategoricalField::CustomerType => &record.customer_type,
            CategoricalField::Payment => &record.payment,
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Numeric columns that take part in the correlation matrix, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NumericField {
    #[serde(rename = "Unit price")]
    UnitPrice,
    #[serde(rename = "Quantity")]
    Quantity,
    #[serde(rename = "Tax 5%")]
    Tax,
    #[serde(rename = "Total")]
    Total,
    #[serde(rename = "cogs")]
    Cogs,
    #[serde(rename = "gross income")]
    GrossIncome,
    #[serde(rename = "Rating")]
    Rating,
}

impl NumericField {
    pub const ALL: [NumericField; 7] = [
        NumericField::UnitPrice,
        NumericField::Quantity,
        NumericField::Tax,
        NumericField::Total,
        NumericField::Cogs,
        NumericField::GrossIncome,
        NumericField::Rating,
    ];

    pub fn column(self) -> &'static str {
        match self {
            NumericField::UnitPrice => "Unit price",
            NumericField::Quantity => "Quantity",
            NumericField::Tax => "Tax 5%",
            NumericField::Total => "Total",
            NumericField::Cogs => "cogs",
            NumericField::GrossIncome => "gross income",
            NumericField::Rating => "Rating",
        }
    }

    pub fn value(self, record: &Record) -> f64 {
        match self {
            NumericField::UnitPrice => record.unit_price,
            NumericField::Quantity => record.quantity,
            NumericField::Tax => record.tax,
            NumericField::Total => record.total,
            NumericField::Cogs => record.cogs,
            NumericField::GrossIncome => record.gross_income,
            NumericField::Rating => record.rating,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// MonthKey – calendar month bucket
// ---------------------------------------------------------------------------

/// Year + month, ordered chronologically. Serialises as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// SalesTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed dataset with pre-computed filter options.
///
/// Immutable once built; sessions share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Distinct values per categorical column, in order of first appearance.
    pub options: BTreeMap<CategoricalField, Vec<String>>,
    /// Earliest and latest date; `None` for an empty table.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl SalesTable {
    /// Build option lists and the date span from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut options: BTreeMap<CategoricalField, Vec<String>> = CategoricalField::ALL
            .iter()
            .map(|&field| (field, Vec::new()))
            .collect();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;

        for record in &records {
            for (field, seen) in options.iter_mut() {
                let value = field.value(record);
                if !seen.iter().any(|v| v == value) {
                    seen.push(value.to_string());
                }
            }
            date_span = Some(match date_span {
                None => (record.date, record.date),
                Some((lo, hi)) => (lo.min(record.date), hi.max(record.date)),
            });
        }

        SalesTable {
            records,
            options,
            date_span,
        }
    }

    /// Distinct observed values of a categorical column.
    pub fn options(&self, field: CategoricalField) -> &[String] {
        self.options.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
