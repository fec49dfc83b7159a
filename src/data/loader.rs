use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};

use super::model::{Record, SalesTable};
use crate::error::DataLoadError;

/// Formats accepted for the `Date` column; the first one is what the source ships.
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];
const TIME_FORMAT: &str = "%H:%M";
/// Cell contents read as a missing numeric value, besides the empty cell.
const MISSING_MARKERS: [&str; 8] = ["NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "#N/A"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a sales table from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<SalesTable, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_reader(file)?;
    log::info!(
        "Loaded {} records from {} (dates {:?})",
        table.len(),
        path.display(),
        table.date_span
    );
    Ok(table)
}

/// Parse CSV text from any reader.
///
/// The header row must name every required column; extra columns are
/// ignored. The first bad cell aborts the whole load.
pub fn load_reader<R: Read>(reader: R) -> Result<SalesTable, DataLoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let columns = Columns::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        records.push(columns.parse(&row, i + 1)?);
    }

    Ok(SalesTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Positions of the required columns in the header row.
struct Columns {
    invoice_id: usize,
    branch: usize,
    city: usize,
    customer_type: usize,
    gender: usize,
    product_line: usize,
    unit_price: usize,
    quantity: usize,
    tax: usize,
    total: usize,
    date: usize,
    time: usize,
    payment: usize,
    cogs: usize,
    gross_income: usize,
    rating: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataLoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Columns {
            invoice_id: find("Invoice ID")?,
            branch: find("Branch")?,
            city: find("City")?,
            customer_type: find("Customer type")?,
            gender: find("Gender")?,
            product_line: find("Product line")?,
            unit_price: find("Unit price")?,
            quantity: find("Quantity")?,
            tax: find("Tax 5%")?,
            total: find("Total")?,
            date: find("Date")?,
            time: find("Time")?,
            payment: find("Payment")?,
            cogs: find("cogs")?,
            gross_income: find("gross income")?,
            rating: find("Rating")?,
        })
    }

    fn parse(&self, row: &csv::StringRecord, row_no: usize) -> Result<Record, DataLoadError> {
        let cell = Cell { row, row_no };
        Ok(Record {
            invoice_id: cell.text(self.invoice_id),
            branch: cell.text(self.branch),
            city: cell.text(self.city),
            customer_type: cell.text(self.customer_type),
            gender: cell.text(self.gender),
            product_line: cell.text(self.product_line),
            unit_price: cell.number(self.unit_price, "Unit price")?,
            quantity: cell.number(self.quantity, "Quantity")?,
            tax: cell.number(self.tax, "Tax 5%")?,
            total: cell.number(self.total, "Total")?,
            date: cell.date(self.date)?,
            time: cell.time(self.time)?,
            payment: cell.text(self.payment),
            cogs: cell.number(self.cogs, "cogs")?,
            gross_income: cell.number(self.gross_income, "gross income")?,
            rating: cell.number(self.rating, "Rating")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

struct Cell<'a> {
    row: &'a csv::StringRecord,
    row_no: usize,
}

impl Cell<'_> {
    fn raw(&self, idx: usize) -> &str {
        self.row.get(idx).unwrap_or("")
    }

    fn text(&self, idx: usize) -> String {
        self.raw(idx).to_string()
    }

    fn invalid(&self, column: &str, value: &str, reason: &str) -> DataLoadError {
        DataLoadError::InvalidValue {
            column: column.to_string(),
            row: self.row_no,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Empty cells and the usual missing markers come back as `NaN`.
    fn number(&self, idx: usize, column: &str) -> Result<f64, DataLoadError> {
        let value = self.raw(idx).trim();
        if value.is_empty() || MISSING_MARKERS.contains(&value) {
            return Ok(f64::NAN);
        }
        value
            .parse::<f64>()
            .map_err(|_| self.invalid(column, value, "is not a number"))
    }

    fn date(&self, idx: usize) -> Result<NaiveDate, DataLoadError> {
        let value = self.raw(idx).trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .ok_or_else(|| self.invalid("Date", value, "is not a MM/DD/YYYY or YYYY-MM-DD date"))
    }

    fn time(&self, idx: usize) -> Result<NaiveTime, DataLoadError> {
        let value = self.raw(idx).trim();
        NaiveTime::parse_from_str(value, TIME_FORMAT)
            .map_err(|_| self.invalid("Time", value, "is not an HH:MM time"))
    }
}
