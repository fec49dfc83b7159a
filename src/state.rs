use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::data::cache::TableCache;
use crate::data::filter::{CriteriaOverrides, FilterCriteria};
use crate::data::model::{CategoricalField, SalesTable};
use crate::data::pipeline::{apply_filters, FilteredResult};

// ---------------------------------------------------------------------------
// Dashboard session
// ---------------------------------------------------------------------------

/// Everything one dashboard session holds, independent of rendering.
///
/// Every criteria change recomputes `result` synchronously.
#[derive(Default)]
pub struct DashboardSession {
    /// Parsed sources, reused across `open` calls.
    cache: TableCache,

    /// Path of the currently open source.
    source: Option<PathBuf>,

    /// Loaded table (None until a source is opened).
    table: Option<Arc<SalesTable>>,

    /// Current sidebar selections.
    criteria: Option<FilterCriteria>,

    /// Views for the current criteria.
    result: Option<FilteredResult>,

    /// Last load error, for display.
    pub status_message: Option<String>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or fetch from cache) `path` and reset the criteria to "everything".
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let table = match self.cache.get_or_load(path) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                return Err(e).with_context(|| format!("opening {}", path.display()));
            }
        };

        log::info!(
            "Session opened {} ({} records)",
            path.display(),
            table.len()
        );
        self.criteria = Some(FilterCriteria::all(&table));
        self.table = Some(table);
        self.source = Some(path.to_path_buf());
        self.status_message = None;
        self.refilter();
        Ok(())
    }

    /// Drop the cached parse of the current source and load it again.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.source.clone().context("no source is open")?;
        self.cache.invalidate(&path);
        let previous = self.criteria.clone();
        self.open(&path)?;
        if let Some(previous) = previous {
            self.set_criteria(previous);
        }
        Ok(())
    }

    pub fn table(&self) -> Option<&SalesTable> {
        self.table.as_deref()
    }

    pub fn criteria(&self) -> Option<&FilterCriteria> {
        self.criteria.as_ref()
    }

    pub fn result(&self) -> Option<&FilteredResult> {
        self.result.as_ref()
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = Some(criteria);
        self.refilter();
    }

    /// Reset to defaults, then apply `overrides` on top.
    pub fn apply_overrides(&mut self, overrides: &CriteriaOverrides) {
        if let Some(table) = &self.table {
            self.criteria = Some(FilterCriteria::from_overrides(table, overrides));
            self.refilter();
        }
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_value(&mut self, field: CategoricalField, value: &str) {
        if let Some(criteria) = &mut self.criteria {
            criteria.toggle(field, value);
            self.refilter();
        }
    }

    /// Select every observed value of a column.
    pub fn select_all(&mut self, field: CategoricalField) {
        let Some(table) = &self.table else {
            return;
        };
        let options = table.options(field).to_vec();
        if let Some(criteria) = &mut self.criteria {
            criteria.set_selected(field, options);
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, field: CategoricalField) {
        if let Some(criteria) = &mut self.criteria {
            criteria.set_selected(field, Vec::<String>::new());
            self.refilter();
        }
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        if let Some(criteria) = &mut self.criteria {
            criteria.set_date_range(start, end);
            self.refilter();
        }
    }

    /// Recompute `result` after a criteria change.
    fn refilter(&mut self) {
        if let (Some(table), Some(criteria)) = (&self.table, &self.criteria) {
            self.result = Some(apply_filters(table, criteria));
        }
    }
}
