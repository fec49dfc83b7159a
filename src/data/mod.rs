//! Data layer: core types, loading, caching, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  sales .csv
//!        │
//!        ▼
//!   ┌──────────┐     ┌─────────┐
//!   │  loader  │◄────│  cache  │  keyed by path + mtime + size
//!   └──────────┘     └─────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ SalesTable │  Vec<Record>, filter options, date span
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  FilterCriteria → matching row indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate │  monthly series, correlation, composition,
//!   └───────────┘  spend distribution, 3D projection
//! ```
//!
//! `pipeline::apply_filters` ties the last two stages together.

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
