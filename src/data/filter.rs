use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{CategoricalField, Record, SalesTable};

// ---------------------------------------------------------------------------
// FilterCriteria – what the sidebar currently selects
// ---------------------------------------------------------------------------

/// Selected values per categorical column plus an inclusive date interval.
///
/// A record passes when every categorical value is in its column's
/// selected set and its date lies within `[date_start, date_end]`.
/// An empty set selects nothing; it is not a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub selections: BTreeMap<CategoricalField, BTreeSet<String>>,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
}

impl FilterCriteria {
    /// The default state: every observed value selected, full observed date span.
    pub fn all(table: &SalesTable) -> Self {
        let selections = CategoricalField::ALL
            .iter()
            .map(|&field| (field, table.options(field).iter().cloned().collect()))
            .collect();
        let (date_start, date_end) = table.date_span.unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        FilterCriteria {
            selections,
            date_start,
            date_end,
        }
    }

    /// Start from [`FilterCriteria::all`] and replace whatever the overrides specify.
    pub fn from_overrides(table: &SalesTable, overrides: &CriteriaOverrides) -> Self {
        let mut criteria = Self::all(table);
        for field in CategoricalField::ALL {
            if let Some(values) = overrides.values(field) {
                criteria
                    .selections
                    .insert(field, values.iter().cloned().collect());
            }
        }
        if let Some(start) = overrides.date_start {
            criteria.date_start = start;
        }
        if let Some(end) = overrides.date_end {
            criteria.date_end = end;
        }
        criteria
    }

    pub fn selected(&self, field: CategoricalField) -> Option<&BTreeSet<String>> {
        self.selections.get(&field)
    }

    /// Replace the selection for one column.
    pub fn set_selected<I, S>(&mut self, field: CategoricalField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .insert(field, values.into_iter().map(Into::into).collect());
    }

    /// Flip one value in or out of a column's selection.
    pub fn toggle(&mut self, field: CategoricalField, value: &str) {
        let selected = self.selections.entry(field).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.date_start = start;
        self.date_end = end;
    }

    pub fn matches(&self, record: &Record) -> bool {
        let categorical = CategoricalField::ALL.iter().all(|&field| {
            self.selections
                .get(&field)
                .is_some_and(|selected| selected.contains(field.value(record)))
        });
        categorical && self.date_start <= record.date && record.date <= self.date_end
    }
}

// ---------------------------------------------------------------------------
// CriteriaOverrides – criteria as supplied from config / command line
// ---------------------------------------------------------------------------

/// Partially specified criteria.
///
/// `None` keeps the default ("all observed values" / full span);
/// `Some(vec![])` is a deliberate empty selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CriteriaOverrides {
    pub cities: Option<Vec<String>>,
    pub genders: Option<Vec<String>>,
    pub customer_types: Option<Vec<String>>,
    pub payments: Option<Vec<String>>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
}

impl CriteriaOverrides {
    pub fn values(&self, field: CategoricalField) -> Option<&Vec<String>> {
        match field {
            CategoricalField::City => self.cities.as_ref(),
            CategoricalField::Gender => self.genders.as_ref(),
            CategoricalField::CustomerType => self.customer_types.as_ref(),
            CategoricalField::Payment => self.payments.as_ref(),
        }
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn merge(self, other: CriteriaOverrides) -> CriteriaOverrides {
        CriteriaOverrides {
            cities: other.cities.or(self.cities),
            genders: other.genders.or(self.genders),
            customer_types: other.customer_types.or(self.customer_types),
            payments: other.payments.or(self.payments),
            date_start: other.date_start.or(self.date_start),
            date_end: other.date_end.or(self.date_end),
        }
    }
}

// ---------------------------------------------------------------------------
// Row filter
// ---------------------------------------------------------------------------

/// Indices of records passing `criteria`, in source order.
pub fn filtered_indices(table: &SalesTable, criteria: &FilterCriteria) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn table() -> SalesTable {
        let mut b = record("2", (2019, 2, 14));
        b.city = "Mandalay".to_string();
        b.gender = "Male".to_string();
        let mut c = record("3", (2019, 3, 30));
        c.payment = "Credit card".to_string();
        SalesTable::from_records(vec![record("1", (2019, 1, 5)), b, c])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_criteria_keep_everything() {
        let table = table();
        let criteria = FilterCriteria::all(&table);
        assert_eq!(filtered_indices(&table, &criteria), vec![0, 1, 2]);
    }

    #[test]
    fn categorical_selection_narrows_rows() {
        let table = table();
        let mut criteria = FilterCriteria::all(&table);
        criteria.set_selected(CategoricalField::City, ["Mandalay"]);
        assert_eq!(filtered_indices(&table, &criteria), vec![1]);
    }

    #[test]
    fn empty_selection_is_not_a_wildcard() {
        let table = table();
        let mut criteria = FilterCriteria::all(&table);
        criteria.set_selected(CategoricalField::Gender, Vec::<String>::new());
        assert!(filtered_indices(&table, &criteria).is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let table = table();
        let mut criteria = FilterCriteria::all(&table);
        criteria.set_date_range(date(2019, 2, 14), date(2019, 3, 30));
        assert_eq!(filtered_indices(&table, &criteria), vec![1, 2]);
    }

    #[test]
    fn inverted_interval_matches_nothing() {
        let table = table();
        let mut criteria = FilterCriteria::all(&table);
        criteria.set_date_range(date(2019, 3, 1), date(2019, 1, 1));
        assert!(filtered_indices(&table, &criteria).is_empty());
    }

    #[test]
    fn toggle_removes_then_restores() {
        let table = table();
        let mut criteria = FilterCriteria::all(&table);
        criteria.toggle(CategoricalField::Payment, "Cash");
        assert_eq!(filtered_indices(&table, &criteria), vec![2]);
        criteria.toggle(CategoricalField::Payment, "Cash");
        assert_eq!(filtered_indices(&table, &criteria), vec![0, 1, 2]);
    }

    #[test]
    fn overrides_distinguish_absent_from_empty() {
        let table = table();
        let absent: CriteriaOverrides = serde_json::from_str("{}").unwrap();
        let empty: CriteriaOverrides = serde_json::from_str(r#"{"cities": []}"#).unwrap();

        assert_eq!(
            FilterCriteria::from_overrides(&table, &absent),
            FilterCriteria::all(&table)
        );
        let none_selected = FilterCriteria::from_overrides(&table, &empty);
        assert!(filtered_indices(&table, &none_selected).is_empty());
    }

    #[test]
    fn later_overrides_win() {
        let file = CriteriaOverrides {
            cities: Some(vec!["Yangon".into()]),
            date_start: Some(date(2019, 1, 1)),
            ..Default::default()
        };
        let flags = CriteriaOverrides {
            cities: Some(vec!["Mandalay".into()]),
            ..Default::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.cities, Some(vec!["Mandalay".to_string()]));
        assert_eq!(merged.date_start, Some(date(2019, 1, 1)));
    }
}
