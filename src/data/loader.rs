use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimeUnit, TimestampMillisecondType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{CellValue, SalesDataset, Transaction};

/// Columns every sales file must carry, in the order they are displayed.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Invoice_ID",
    "Date",
    "City",
    "Item",
    "Quantity",
    "Total_Price",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least [`REQUIRED_COLUMNS`] (recommended)
/// * `.json`    – `[{ "Invoice_ID": ..., "Date": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<SalesDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::debug!(
        "Parsed {} rows from {} ({} extra columns)",
        dataset.len(),
        path.display(),
        dataset.extra_columns.len()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Cell parsing shared by every format
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Month-first for slashed dates, matching what spreadsheet exports emit.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date or date-time cell. Date-only values land at midnight.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn date_cell(row: usize, raw: &str) -> Result<NaiveDateTime, LoadError> {
    parse_date(raw).ok_or_else(|| LoadError::InvalidDate {
        row,
        value: raw.to_string(),
    })
}

fn quantity_cell(row: usize, raw: &str) -> Result<u64, LoadError> {
    raw.trim().parse::<u64>().map_err(|_| LoadError::InvalidValue {
        row,
        column: "Quantity",
        value: raw.to_string(),
        reason: "expected a non-negative integer",
    })
}

fn price_cell(row: usize, raw: &str) -> Result<f64, LoadError> {
    match raw.trim().parse::<f64>() {
        Ok(v) => price_value(row, Some(v)),
        Err(_) => Err(invalid_price(row, raw.to_string())),
    }
}

fn price_value(row: usize, value: Option<f64>) -> Result<f64, LoadError> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        other => Err(invalid_price(
            row,
            other.map(|v| v.to_string()).unwrap_or_default(),
        )),
    }
}

fn invalid_price(row: usize, value: String) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: "Total_Price",
        value,
        reason: "expected a non-negative amount",
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Positions of the required columns inside a header row.
struct ColumnLayout {
    required: [usize; 6],
    extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &[String]) -> Result<Self, LoadError> {
        let mut required = [0usize; 6];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))?;
        }
        let extras = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !required.contains(i))
            .map(|(i, h)| (i, h.clone()))
            .collect();
        Ok(ColumnLayout { required, extras })
    }
}

/// CSV layout: header row with column names; cells are trimmed.
/// Columns other than [`REQUIRED_COLUMNS`] are kept as typed extras.
fn load_csv(path: &Path) -> Result<SalesDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_no + 1;
        let cell = |i: usize| record.get(layout.required[i]).unwrap_or("");

        rows.push(Transaction {
            invoice_id: cell(0).to_string(),
            date: date_cell(row, cell(1))?,
            city: cell(2).to_string(),
            item: cell(3).to_string(),
            quantity: quantity_cell(row, cell(4))?,
            total_price: price_cell(row, cell(5))?,
            extra: layout
                .extras
                .iter()
                .map(|(i, _)| CellValue::guess(record.get(*i).unwrap_or("")))
                .collect(),
        });
    }

    let extra_columns = layout.extras.into_iter().map(|(_, name)| name).collect();
    Ok(SalesDataset::from_rows(rows, extra_columns))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Invoice_ID": "INV-0001",
///     "Date": "2024-01-01",
///     "City": "Dhaka",
///     "Item": "Shirt",
///     "Quantity": 2,
///     "Total_Price": 500.0
///   },
///   ...
/// ]
/// ```
///
/// `Date` may also be epoch milliseconds, which is what pandas writes.
fn load_json(path: &Path) -> Result<SalesDataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Map<String, JsonValue>> = serde_json::from_str(&text)?;

    // Extra columns in order of first appearance.
    let mut extra_columns: Vec<String> = Vec::new();
    for rec in &records {
        for key in rec.keys() {
            if !REQUIRED_COLUMNS.contains(&key.as_str()) && !extra_columns.contains(key) {
                extra_columns.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let row = i + 1;
        let field = |name: &'static str| rec.get(name).ok_or(LoadError::MissingColumn(name));

        let date = match field("Date")? {
            JsonValue::Number(n) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| LoadError::InvalidDate {
                    row,
                    value: n.to_string(),
                })?,
            other => date_cell(row, &json_text(other))?,
        };

        let quantity = match field("Quantity")? {
            JsonValue::Number(n) => match n.as_u64() {
                Some(q) => q,
                None => quantity_cell(row, &n.to_string())?,
            },
            other => quantity_cell(row, &json_text(other))?,
        };

        rows.push(Transaction {
            invoice_id: json_text(field("Invoice_ID")?),
            date,
            city: json_text(field("City")?),
            item: json_text(field("Item")?),
            quantity,
            total_price: price_cell(row, &json_text(field("Total_Price")?))?,
            extra: extra_columns
                .iter()
                .map(|col| rec.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect(),
        });
    }

    Ok(SalesDataset::from_rows(rows, extra_columns))
}

/// Render a JSON scalar as plain text (strings without quotes).
fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet layout: one flat column per field. Required columns are cast to
/// the types the dashboard works with, so integer invoice ids, `Int32`
/// quantities and `Date32` dates are all accepted.
fn load_parquet(path: &Path) -> Result<SalesDataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    let mut extra_columns: Option<Vec<String>> = None;
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut required: Vec<usize> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))?;
            required.push(idx);
        }
        let extras: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| !required.contains(i))
            .map(|(i, f)| (i, f.name().clone()))
            .collect();
        extra_columns.get_or_insert_with(|| extras.iter().map(|(_, n)| n.clone()).collect());

        let invoice = cast(batch.column(required[0]), &DataType::Utf8)?;
        let city = cast(batch.column(required[2]), &DataType::Utf8)?;
        let item = cast(batch.column(required[3]), &DataType::Utf8)?;
        let quantity = cast(batch.column(required[4]), &DataType::Int64)?;
        let price = cast(batch.column(required[5]), &DataType::Float64)?;
        let dates = DateColumn::new(batch.column(required[1]))?;
        let extra_cells: Vec<Vec<CellValue>> = extras
            .iter()
            .map(|(col_idx, _)| column_cells(batch.column(*col_idx)))
            .collect();

        let invoice = invoice.as_string::<i32>();
        let city = city.as_string::<i32>();
        let item = item.as_string::<i32>();
        let quantity = quantity.as_primitive::<Int64Type>();
        let price = price.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let row = row_offset + i + 1;
            let text = |arr: &StringArray| {
                if arr.is_null(i) {
                    String::new()
                } else {
                    arr.value(i).to_string()
                }
            };

            let qty = quantity.is_valid(i).then(|| quantity.value(i));
            let qty = match qty {
                Some(q) if q >= 0 => q as u64,
                other => {
                    return Err(LoadError::InvalidValue {
                        row,
                        column: "Quantity",
                        value: other.map(|q| q.to_string()).unwrap_or_default(),
                        reason: "expected a non-negative integer",
                    })
                }
            };
            let amount = price_value(row, price.is_valid(i).then(|| price.value(i)))?;

            rows.push(Transaction {
                invoice_id: text(invoice),
                date: dates.value(row, i)?,
                city: text(city),
                item: text(item),
                quantity: qty,
                total_price: amount,
                extra: extra_cells.iter().map(|cells| cells[i].clone()).collect(),
            });
        }
        row_offset += batch.num_rows();
    }

    Ok(SalesDataset::from_rows(rows, extra_columns.unwrap_or_default()))
}

/// The `Date` column either holds text (parsed like CSV cells) or an Arrow
/// temporal type (normalised to millisecond timestamps).
enum DateColumn {
    Text(ArrayRef),
    Millis(ArrayRef),
}

impl DateColumn {
    fn new(col: &ArrayRef) -> Result<Self, LoadError> {
        match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 => Ok(DateColumn::Text(cast(col, &DataType::Utf8)?)),
            _ => Ok(DateColumn::Millis(cast(
                col,
                &DataType::Timestamp(TimeUnit::Millisecond, None),
            )?)),
        }
    }

    fn value(&self, row: usize, i: usize) -> Result<NaiveDateTime, LoadError> {
        match self {
            DateColumn::Text(arr) => {
                let arr = arr.as_string::<i32>();
                let raw = if arr.is_null(i) { "" } else { arr.value(i) };
                date_cell(row, raw)
            }
            DateColumn::Millis(arr) => {
                let arr = arr.as_primitive::<TimestampMillisecondType>();
                arr.is_valid(i)
                    .then(|| arr.value(i))
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .map(|dt| dt.naive_utc())
                    .ok_or_else(|| LoadError::InvalidDate {
                        row,
                        value: if arr.is_null(i) {
                            String::new()
                        } else {
                            arr.value(i).to_string()
                        },
                    })
            }
        }
    }
}

/// Convert a whole pass-through column into cells in one pass.
fn column_cells(col: &ArrayRef) -> Vec<CellValue> {
    fn collect<T>(values: impl Iterator<Item = Option<T>>, wrap: fn(T) -> CellValue) -> Vec<CellValue> {
        values.map(|v| v.map(wrap).unwrap_or(CellValue::Null)).collect()
    }

    match col.data_type() {
        DataType::Boolean => collect(col.as_boolean().iter(), CellValue::Bool),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => match cast(col, &DataType::Int64) {
            Ok(arr) => collect(arr.as_primitive::<Int64Type>().iter(), CellValue::Integer),
            Err(_) => vec![CellValue::Null; col.len()],
        },
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            match cast(col, &DataType::Float64) {
                Ok(arr) => collect(arr.as_primitive::<Float64Type>().iter(), CellValue::Float),
                Err(_) => vec![CellValue::Null; col.len()],
            }
        }
        other => match cast(col, &DataType::Utf8) {
            Ok(arr) => arr
                .as_string::<i32>()
                .iter()
                .map(|v| v.map(|s| CellValue::String(s.to_string())).unwrap_or(CellValue::Null))
                .collect(),
            Err(_) => vec![CellValue::String(format!("{other:?}")); col.len()],
        },
    }
}
