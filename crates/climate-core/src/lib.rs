//! Core domain types for the Indonesia climate report.
//!
//! Defines the record and summary-table models, the month-code mapping,
//! the error taxonomy, statistical primitives (grouped means, Pearson
//! correlation), the catalog of selectable variable-pair comparisons,
//! the chart-request types handed to the display layer, CLI settings,
//! and number/table formatting.

pub mod calculations;
pub mod charts;
pub mod comparisons;
pub mod error;
pub mod formatting;
pub mod models;
pub mod month;
pub mod settings;
