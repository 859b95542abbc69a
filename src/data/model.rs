use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// CellValue – a single cell in a pass-through column
// ---------------------------------------------------------------------------

/// A dynamically-typed value for columns beyond the six the dashboard
/// understands. Kept so the data table can show the file as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Infer the narrowest type for a raw text cell.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s.to_ascii_lowercase().as_str() {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction – one row of the sales file
// ---------------------------------------------------------------------------

/// A single sales line item.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Order identifier; several rows may share one invoice.
    pub invoice_id: String,
    /// Timestamp of the sale. Date-only inputs are stored at midnight.
    pub date: NaiveDateTime,
    pub city: String,
    pub item: String,
    pub quantity: u64,
    /// Line total in the shop's currency.
    pub total_price: f64,
    /// Extra columns, aligned with [`SalesDataset::extra_columns`].
    pub extra: Vec<CellValue>,
}

impl Transaction {
    /// Calendar day of the sale, used for range filtering.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices for the filter widgets.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    /// All rows, in file order.
    pub rows: Vec<Transaction>,
    /// Names of pass-through columns, in header order.
    pub extra_columns: Vec<String>,
    /// Distinct city names, sorted ascending.
    pub cities: BTreeSet<String>,
    /// Distinct item names, sorted ascending.
    pub items: BTreeSet<String>,
    /// Earliest and latest calendar day present (`None` when empty).
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build the dataset and its indices from parsed rows.
    pub fn from_rows(rows: Vec<Transaction>, extra_columns: Vec<String>) -> Self {
        let mut cities = BTreeSet::new();
        let mut items = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for row in &rows {
            cities.insert(row.city.clone());
            items.insert(row.item.clone());
            let day = row.day();
            date_bounds = Some(match date_bounds {
                None => (day, day),
                Some((lo, hi)) => (lo.min(day), hi.max(day)),
            });
        }

        SalesDataset {
            rows,
            extra_columns,
            cities,
            items,
            date_bounds,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn tx(
        invoice: &str,
        date: &str,
        city: &str,
        item: &str,
        quantity: u64,
        total_price: f64,
    ) -> Transaction {
        Transaction {
            invoice_id: invoice.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            city: city.to_string(),
            item: item.to_string(),
            quantity,
            total_price,
            extra: Vec::new(),
        }
    }

    /// The three-row dataset used across the data-layer tests.
    pub(crate) fn sample_dataset() -> SalesDataset {
        SalesDataset::from_rows(
            vec![
                tx("1", "2024-01-01", "Dhaka", "Shirt", 2, 500.0),
                tx("2", "2024-01-05", "Dhaka", "Pant", 1, 800.0),
                tx("3", "2024-02-01", "Khulna", "Shirt", 3, 300.0),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn indices_are_built_from_rows() {
        let ds = sample_dataset();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.cities.iter().collect::<Vec<_>>(),
            vec!["Dhaka", "Khulna"]
        );
        assert_eq!(ds.items.len(), 2);
        assert_eq!(
            ds.date_bounds,
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
            ))
        );
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = SalesDataset::from_rows(Vec::new(), Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.date_bounds, None);
        assert!(ds.cities.is_empty());
    }

    #[test]
    fn guess_infers_cell_types() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("42"), CellValue::Integer(42));
        assert_eq!(CellValue::guess("4.5"), CellValue::Float(4.5));
        assert_eq!(CellValue::guess("TRUE"), CellValue::Bool(true));
        assert_eq!(
            CellValue::guess("Cash"),
            CellValue::String("Cash".to_string())
        );
    }
}
