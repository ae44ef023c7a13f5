use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::models::AnnualIndicatorRow;

// ── NumericColumn ─────────────────────────────────────────────────────────────

/// The numeric columns of the annual indicator join, in the order the
/// correlation matrix uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Year,
    MeanTemp,
    MaxTemp,
    MinTemp,
    Precipitation,
    Electricity,
    ForestArea,
    Co2Emission,
    Internet,
    Population,
}

impl NumericColumn {
    /// All ten columns, in matrix order.
    pub const ALL: [NumericColumn; 10] = [
        NumericColumn::Year,
        NumericColumn::MeanTemp,
        NumericColumn::MaxTemp,
        NumericColumn::MinTemp,
        NumericColumn::Precipitation,
        NumericColumn::Electricity,
        NumericColumn::ForestArea,
        NumericColumn::Co2Emission,
        NumericColumn::Internet,
        NumericColumn::Population,
    ];

    /// The canonical snake_case column identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericColumn::Year => "year",
            NumericColumn::MeanTemp => "mean_temp",
            NumericColumn::MaxTemp => "max_temp",
            NumericColumn::MinTemp => "min_temp",
            NumericColumn::Precipitation => "precipitation",
            NumericColumn::Electricity => "electricity",
            NumericColumn::ForestArea => "forest_area",
            NumericColumn::Co2Emission => "co2_emission",
            NumericColumn::Internet => "internet",
            NumericColumn::Population => "population",
        }
    }

    /// Human-readable name for chart axes and selection labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            NumericColumn::Year => "Year",
            NumericColumn::MeanTemp => "Mean Temperature",
            NumericColumn::MaxTemp => "Max Temperature",
            NumericColumn::MinTemp => "Min Temperature",
            NumericColumn::Precipitation => "Precipitation",
            NumericColumn::Electricity => "Electricity",
            NumericColumn::ForestArea => "Forest Area",
            NumericColumn::Co2Emission => "CO2 Emission",
            NumericColumn::Internet => "Internet",
            NumericColumn::Population => "Population",
        }
    }

    /// Pull this column's value out of a joined annual row.
    pub fn extract(&self, row: &AnnualIndicatorRow) -> f64 {
        match self {
            NumericColumn::Year => f64::from(row.year),
            NumericColumn::MeanTemp => row.mean_temp,
            NumericColumn::MaxTemp => row.max_temp,
            NumericColumn::MinTemp => row.min_temp,
            NumericColumn::Precipitation => row.precipitation,
            NumericColumn::Electricity => row.electricity,
            NumericColumn::ForestArea => row.forest_area,
            NumericColumn::Co2Emission => row.co2_emission,
            NumericColumn::Internet => row.internet,
            NumericColumn::Population => row.population,
        }
    }
}

// ── Comparison catalog ────────────────────────────────────────────────────────

/// One selectable variable-pair comparison: the scatter chart plots `x`
/// against `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonPair {
    /// Exact selection label shown to the user.
    pub label: &'static str,
    pub x: NumericColumn,
    pub y: NumericColumn,
}

/// The nine recognised comparison options, in selection order.
pub const COMPARISONS: [ComparisonPair; 9] = [
    ComparisonPair {
        label: "Electricity vs Mean Temperature",
        x: NumericColumn::Electricity,
        y: NumericColumn::MeanTemp,
    },
    ComparisonPair {
        label: "Forest area vs Mean Temperature",
        x: NumericColumn::ForestArea,
        y: NumericColumn::MeanTemp,
    },
    ComparisonPair {
        label: "CO2 Emission vs Mean Temperature",
        x: NumericColumn::Co2Emission,
        y: NumericColumn::MeanTemp,
    },
    ComparisonPair {
        label: "Internet vs Mean Temperature",
        x: NumericColumn::Internet,
        y: NumericColumn::MeanTemp,
    },
    ComparisonPair {
        label: "Population vs Mean Temperature",
        x: NumericColumn::Population,
        y: NumericColumn::MeanTemp,
    },
    ComparisonPair {
        label: "Electricity vs Forest Area",
        x: NumericColumn::Electricity,
        y: NumericColumn::ForestArea,
    },
    ComparisonPair {
        label: "Electricity vs CO2 Emission",
        x: NumericColumn::Electricity,
        y: NumericColumn::Co2Emission,
    },
    ComparisonPair {
        label: "Electricity vs Internet",
        x: NumericColumn::Electricity,
        y: NumericColumn::Internet,
    },
    ComparisonPair {
        label: "Electricity vs Population",
        x: NumericColumn::Electricity,
        y: NumericColumn::Population,
    },
];

/// Look up a comparison by its exact label.
///
/// A lookup table rather than a branch chain: unknown labels fail with
/// [`ReportError::UnknownComparison`].
pub fn comparison_from_label(label: &str) -> Result<&'static ComparisonPair> {
    COMPARISONS
        .iter()
        .find(|c| c.label == label)
        .ok_or_else(|| ReportError::UnknownComparison(label.to_string()))
}

/// The (x, y) observation pairs a comparison's scatter chart plots.
pub fn scatter_points(pair: &ComparisonPair, rows: &[AnnualIndicatorRow]) -> Vec<(f64, f64)> {
    rows.iter()
        .map(|row| (pair.x.extract(row), pair.y.extract(row)))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
