use serde::Serialize;

use super::aggregate::{
    correlation_matrix, gross_income_composition, monthly_sales, scatter_projection,
    spend_by_customer_type, CompositionTable, CorrelationMatrix, MonthlySales, ScatterProjection,
    SpendDistribution,
};
use super::filter::{filtered_indices, FilterCriteria};
use super::model::{Record, SalesTable};

/// Everything the dashboard draws for one set of criteria.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredResult {
    /// Indices into the source table of the rows that passed the filter.
    #[serde(skip)]
    pub matched: Vec<usize>,
    pub row_count: usize,
    pub monthly_sales: MonthlySales,
    pub correlation: CorrelationMatrix,
    pub gross_income_composition: CompositionTable,
    pub spend_by_customer_type: SpendDistribution,
    pub scatter: ScatterProjection,
}

impl FilteredResult {
    /// No row survived the filter. A valid state; every view is in its empty form.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// The matched rows, borrowed from the table they were computed from.
    pub fn records<'a>(&'a self, table: &'a SalesTable) -> impl Iterator<Item = &'a Record> + 'a {
        self.matched.iter().filter_map(|&i| table.records.get(i))
    }
}

/// Filter `table` by `criteria` and derive every view from the surviving rows.
///
/// Pure: the same inputs always produce the same result.
pub fn apply_filters(table: &SalesTable, criteria: &FilterCriteria) -> FilteredResult {
    let matched = filtered_indices(table, criteria);
    let rows: Vec<&Record> = matched.iter().map(|&i| &table.records[i]).collect();

    log::debug!(
        "Recomputing views: {} of {} rows match",
        rows.len(),
        table.len()
    );

    FilteredResult {
        row_count: rows.len(),
        monthly_sales: monthly_sales(&rows),
        correlation: correlation_matrix(&rows),
        gross_income_composition: gross_income_composition(&rows),
        spend_by_customer_type: spend_by_customer_type(&rows),
        scatter: scatter_projection(&rows),
        matched,
    }
}
