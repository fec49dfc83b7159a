use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::aggregate::BoxSummary;
use crate::data::filter::FilterCriteria;
use crate::data::model::{CategoricalField, SalesTable};
use crate::data::pipeline::FilteredResult;

// ---------------------------------------------------------------------------
// Report – what the command line front end prints
// ---------------------------------------------------------------------------

/// Loaded source, the criteria that were applied, and the resulting views.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: SourceSummary,
    pub criteria: &'a FilterCriteria,
    pub views: &'a FilteredResult,
    /// Box statistics per customer type, in the same order as the spend groups.
    pub spend_summaries: Vec<SpendSummary>,
}

#[derive(Debug, Serialize)]
pub struct SourceSummary {
    pub path: String,
    pub rows: usize,
    pub options: BTreeMap<CategoricalField, Vec<String>>,
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Serialize)]
pub struct SpendSummary {
    pub customer_type: String,
    pub summary: Option<BoxSummary>,
}

impl<'a> Report<'a> {
    pub fn new(
        path: &Path,
        table: &SalesTable,
        criteria: &'a FilterCriteria,
        views: &'a FilteredResult,
    ) -> Self {
        let spend_summaries = views
            .spend_by_customer_type
            .groups
            .iter()
            .map(|group| SpendSummary {
                customer_type: group.customer_type.clone(),
                summary: group.summary(),
            })
            .collect();

        Report {
            source: SourceSummary {
                path: path.display().to_string(),
                rows: table.len(),
                options: table.options.clone(),
                date_span: table.date_span,
            },
            criteria,
            views,
            spend_summaries,
        }
    }
}
