//! Filter and aggregation pipeline behind a sales-analytics dashboard.
//!
//! Load a transactions CSV into a [`SalesTable`], pick [`FilterCriteria`],
//! and [`apply_filters`] derives the five chart views from the rows that
//! pass.

pub mod data;
pub mod error;
pub mod report;
pub mod state;

pub use data::filter::{CriteriaOverrides, FilterCriteria};
pub use data::model::{CategoricalField, NumericField, Record, SalesTable};
pub use data::pipeline::{apply_filters, FilteredResult};
pub use error::DataLoadError;
pub use state::DashboardSession;
