use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{SalesDataset, Transaction};

// ---------------------------------------------------------------------------
// Filter criteria: date window and city selection
// ---------------------------------------------------------------------------

/// User-selected filters.
///
/// Both date bounds are inclusive calendar days. An empty `cities` set means
/// "no city restriction". `start > end` is allowed and simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cities: BTreeSet<String>,
}

impl FilterCriteria {
    /// The unrestricted filter for a dataset: its full date range, every city.
    ///
    /// An empty dataset has no range; today's date is used for both bounds so
    /// the date pickers still have something to show.
    pub fn for_dataset(dataset: &SalesDataset) -> Self {
        let (start_date, end_date) = dataset.date_bounds.unwrap_or_else(|| {
            let today = chrono::Local::now().date_naive();
            (today, today)
        });
        FilterCriteria {
            start_date,
            end_date,
            cities: BTreeSet::new(),
        }
    }

    /// Whether the date window is upside down (and will therefore match nothing).
    pub fn is_inverted(&self) -> bool {
        self.start_date > self.end_date
    }

    /// Whether a single row passes both predicates.
    pub fn matches(&self, row: &Transaction) -> bool {
        let day = row.day();
        self.start_date <= day
            && day <= self.end_date
            && (self.cities.is_empty() || self.cities.contains(&row.city))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – a borrowed subset of the dataset
// ---------------------------------------------------------------------------

/// Rows of a dataset that passed a filter, in their original order.
///
/// The view only stores indices; it never copies or mutates rows.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalesDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row.
    pub fn all(dataset: &'a SalesDataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices computed earlier against the same dataset.
    /// Indices out of range are dropped.
    pub fn from_indices(dataset: &'a SalesDataset, indices: &[usize]) -> Self {
        FilteredView {
            dataset,
            indices: indices
                .iter()
                .copied()
                .filter(|&i| i < dataset.len())
                .collect(),
        }
    }

    /// Narrow this view further. Equivalent to filtering the dataset
    /// directly when `criteria` is at least as strict as what produced `self`.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        FilteredView {
            dataset: self.dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| criteria.matches(&self.dataset.rows[i]))
                .collect(),
        }
    }

    /// Positions of the selected rows in the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The dataset this view borrows from.
    pub fn dataset(&self) -> &'a SalesDataset {
        self.dataset
    }

    /// Iterate the selected rows in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        let dataset: &'a SalesDataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.rows[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the rows of `dataset` that satisfy `criteria`.
pub fn filter<'a>(dataset: &'a SalesDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    FilteredView::all(dataset).refine(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{sample_dataset, tx};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn criteria(start: NaiveDate, end: NaiveDate, cities: &[&str]) -> FilterCriteria {
        FilterCriteria {
            start_date: start,
            end_date: end,
            cities: cities.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn invoices(view: &FilteredView<'_>) -> Vec<String> {
        view.iter().map(|r| r.invoice_id.clone()).collect()
    }

    #[test]
    fn january_without_city_filter() {
        let ds = sample_dataset();
        let view = filter(&ds, &criteria(date(2024, 1, 1), date(2024, 1, 31), &[]));
        assert_eq!(invoices(&view), vec!["1", "2"]);
        assert_eq!(view.indices(), &[0, 1]);
    }

    #[test]
    fn city_filter_over_full_range() {
        let ds = sample_dataset();
        let mut c = FilterCriteria::for_dataset(&ds);
        c.cities.insert("Khulna".to_string());
        let view = filter(&ds, &c);
        assert_eq!(invoices(&view), vec!["3"]);
    }

    #[test]
    fn default_criteria_keep_everything() {
        let ds = sample_dataset();
        let c = FilterCriteria::for_dataset(&ds);
        assert_eq!(c.start_date, date(2024, 1, 1));
        assert_eq!(c.end_date, date(2024, 2, 1));
        assert_eq!(filter(&ds, &c).len(), ds.len());
    }

    #[test]
    fn range_outside_data_is_empty_not_an_error() {
        let ds = sample_dataset();
        let view = filter(&ds, &criteria(date(2023, 1, 1), date(2023, 12, 31), &[]));
        assert!(view.is_empty());
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let ds = sample_dataset();
        let c = criteria(date(2024, 2, 1), date(2024, 1, 1), &[]);
        assert!(c.is_inverted());
        assert!(filter(&ds, &c).is_empty());
    }

    #[test]
    fn bounds_are_inclusive_whole_days() {
        let mut late = tx("9", "2024-01-31", "Dhaka", "Shirt", 1, 10.0);
        late.date = late.day().and_hms_opt(23, 59, 0).unwrap();
        let ds = SalesDataset::from_rows(vec![late], Vec::new());

        let view = filter(&ds, &criteria(date(2024, 1, 31), date(2024, 1, 31), &[]));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn unknown_city_matches_nothing() {
        let ds = sample_dataset();
        let c = criteria(date(2024, 1, 1), date(2024, 12, 31), &["Sylhet"]);
        assert!(filter(&ds, &c).is_empty());
    }

    #[test]
    fn sound_and_complete_over_a_grid_of_criteria() {
        let ds = sample_dataset();
        let days = [date(2023, 12, 31), date(2024, 1, 1), date(2024, 1, 5), date(2024, 2, 1)];
        let city_sets: [&[&str]; 4] = [&[], &["Dhaka"], &["Khulna"], &["Dhaka", "Khulna"]];

        for &start in &days {
            for &end in &days {
                for cities in city_sets {
                    let c = criteria(start, end, cities);
                    let view = filter(&ds, &c);
                    let expected: Vec<usize> = (0..ds.len())
                        .filter(|&i| c.matches(&ds.rows[i]))
                        .collect();
                    assert_eq!(view.indices(), expected.as_slice());
                    assert!(view.iter().all(|r| c.matches(r)));
                }
            }
        }
    }

    #[test]
    fn refining_equals_filtering_directly() {
        let ds = sample_dataset();
        let wide = criteria(date(2024, 1, 1), date(2024, 2, 1), &["Dhaka", "Khulna"]);
        let narrow = criteria(date(2024, 1, 2), date(2024, 2, 1), &["Dhaka"]);

        let refined = filter(&ds, &wide).refine(&narrow);
        let direct = filter(&ds, &narrow);
        assert_eq!(refined.indices(), direct.indices());
        assert_eq!(invoices(&refined), vec!["2"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ds = sample_dataset();
        let c = FilterCriteria::for_dataset(&ds);
        let a = filter(&ds, &c);
        let b = filter(&ds, &c);
        assert_eq!(a.indices(), b.indices());
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn from_indices_drops_stale_positions() {
        let ds = sample_dataset();
        let view = FilteredView::from_indices(&ds, &[0, 2, 7]);
        assert_eq!(view.indices(), &[0, 2]);
    }
}
