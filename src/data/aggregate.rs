use std::collections::{BTreeMap, HashSet};

use super::filter::FilteredView;
use super::model::Transaction;

// ---------------------------------------------------------------------------
// Summary – KPIs and grouped sales for one filtered view
// ---------------------------------------------------------------------------

/// Everything the dashboard shows above the data table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Sum of `Total_Price`.
    pub total_sales: f64,
    /// Number of distinct invoices.
    pub total_orders: usize,
    /// Sum of `Quantity`.
    pub total_quantity: u64,
    /// `total_sales / total_orders`, or 0 when there are no orders.
    pub avg_order_value: f64,
    /// Sales per city, largest first.
    pub sales_by_city: Vec<(String, f64)>,
    /// Sales per item, largest first.
    pub sales_by_item: Vec<(String, f64)>,
}

/// Derive the KPIs and both groupings from a view.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let mut total_sales = 0.0;
    let mut total_quantity = 0;
    let mut invoices: HashSet<&str> = HashSet::new();

    for row in view.iter() {
        total_sales += row.total_price;
        total_quantity += row.quantity;
        invoices.insert(row.invoice_id.as_str());
    }

    let total_orders = invoices.len();
    let avg_order_value = if total_orders > 0 {
        total_sales / total_orders as f64
    } else {
        0.0
    };

    Summary {
        total_sales,
        total_orders,
        total_quantity,
        avg_order_value,
        sales_by_city: group_sales(view, |r| r.city.as_str()),
        sales_by_item: group_sales(view, |r| r.item.as_str()),
    }
}

/// Sum `Total_Price` per key and rank the groups by descending total.
/// Equal totals are ordered by key so the ranking is stable across frames.
pub fn group_sales<'a, F>(view: &FilteredView<'a>, key: F) -> Vec<(String, f64)>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for row in view.iter() {
        *sums.entry(key(row)).or_default() += row.total_price;
    }

    let mut ranked: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    // BTreeMap already yields keys ascending; a stable sort keeps that for ties.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::filter::{filter, FilterCriteria};
    use crate::data::model::tests::{sample_dataset, tx};
    use crate::data::model::SalesDataset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pairs(v: &[(&str, f64)]) -> Vec<(String, f64)> {
        v.iter().map(|(k, s)| (k.to_string(), *s)).collect()
    }

    #[test]
    fn january_summary() {
        let ds = sample_dataset();
        let c = FilterCriteria {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            cities: Default::default(),
        };
        let s = summarize(&filter(&ds, &c));

        assert_eq!(s.total_sales, 1300.0);
        assert_eq!(s.total_orders, 2);
        assert_eq!(s.total_quantity, 3);
        assert_eq!(s.avg_order_value, 650.0);
        assert_eq!(s.sales_by_city, pairs(&[("Dhaka", 1300.0)]));
        assert_eq!(s.sales_by_item, pairs(&[("Pant", 800.0), ("Shirt", 500.0)]));
    }

    #[test]
    fn khulna_summary() {
        let ds = sample_dataset();
        let mut c = FilterCriteria::for_dataset(&ds);
        c.cities.insert("Khulna".to_string());
        let s = summarize(&filter(&ds, &c));

        assert_eq!(s.total_sales, 300.0);
        assert_eq!(s.total_orders, 1);
        assert_eq!(s.avg_order_value, 300.0);
    }

    #[test]
    fn empty_view_is_all_zero() {
        let ds = sample_dataset();
        let c = FilterCriteria {
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            cities: Default::default(),
        };
        let s = summarize(&filter(&ds, &c));

        assert_eq!(s, Summary::default());
        assert_eq!(s.avg_order_value, 0.0);
        assert!(s.sales_by_city.is_empty());
        assert!(s.sales_by_item.is_empty());
    }

    #[test]
    fn invoices_are_counted_once() {
        let ds = SalesDataset::from_rows(
            vec![
                tx("A", "2024-01-01", "Dhaka", "Shirt", 1, 100.0),
                tx("A", "2024-01-01", "Dhaka", "Pant", 2, 300.0),
                tx("B", "2024-01-02", "Sylhet", "Shirt", 1, 200.0),
            ],
            Vec::new(),
        );
        let s = summarize(&FilteredView::all(&ds));

        assert_eq!(s.total_orders, 2);
        assert_eq!(s.total_quantity, 4);
        assert_eq!(s.avg_order_value, 300.0);
    }

    #[test]
    fn group_sums_add_up_to_total_sales() {
        let ds = sample_dataset();
        let s = summarize(&FilteredView::all(&ds));

        let by_city: f64 = s.sales_by_city.iter().map(|(_, v)| v).sum();
        let by_item: f64 = s.sales_by_item.iter().map(|(_, v)| v).sum();
        assert_eq!(by_city, s.total_sales);
        assert_eq!(by_item, s.total_sales);
        assert_eq!(s.sales_by_city, pairs(&[("Dhaka", 1300.0), ("Khulna", 300.0)]));
    }

    #[test]
    fn ties_rank_by_name() {
        let ds = SalesDataset::from_rows(
            vec![
                tx("1", "2024-01-01", "Rajshahi", "Shirt", 1, 50.0),
                tx("2", "2024-01-01", "Barishal", "Shirt", 1, 50.0),
                tx("3", "2024-01-01", "Comilla", "Shirt", 1, 70.0),
            ],
            Vec::new(),
        );
        let s = summarize(&FilteredView::all(&ds));
        assert_eq!(
            s.sales_by_city,
            pairs(&[("Comilla", 70.0), ("Barishal", 50.0), ("Rajshahi", 50.0)])
        );
    }
}
