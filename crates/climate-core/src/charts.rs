//! Chart-request types consumed by the external rendering collaborator.
//!
//! The core hands the renderer a summary table plus one of these specs; the
//! renderer produces the in-memory image. No file is written here.

use serde::Serialize;

use crate::comparisons::ComparisonPair;

// ── Spec types ────────────────────────────────────────────────────────────────

/// The chart shapes the rendering collaborator knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Bars on the primary axis, lines on a twin secondary axis.
    DualAxisBarLine,
    /// Vertical bars, optionally grouped by a hue column.
    GroupedBar,
    /// Annotated matrix heatmap.
    Heatmap,
    /// Scatter plot with a fitted regression line.
    ScatterRegression,
}

/// Colour palettes used by the dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Rocket,
    Viridis,
}

/// Fixed bounds for one value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

/// Everything the display layer needs to draw one figure, minus the table
/// itself.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub palette: Palette,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_bounds: Option<AxisBounds>,
    /// Label of the twin axis, for dual-axis figures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_y_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_y_bounds: Option<AxisBounds>,
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The report's standard figures, in page order. Each entry pairs with the
/// summary table of the same position in the rendered page.
pub fn chart_catalog() -> Vec<ChartSpec> {
    vec![
        ChartSpec {
            kind: ChartKind::DualAxisBarLine,
            title: "Temperature and Rainfall (1901-2021)",
            x_label: "month",
            y_label: "precipitation (mm)",
            palette: Palette::Rocket,
            y_bounds: Some(AxisBounds {
                min: 150.0,
                max: 300.0,
            }),
            secondary_y_label: Some("temperature (celsius)"),
            secondary_y_bounds: Some(AxisBounds {
                min: 20.0,
                max: 33.0,
            }),
        },
        ChartSpec {
            kind: ChartKind::GroupedBar,
            title: "Average Temperature for Each Region in Indonesia (1901-2021)",
            x_label: "province",
            y_label: "mean temperature (celsius)",
            palette: Palette::Rocket,
            y_bounds: Some(AxisBounds {
                min: 23.0,
                max: 28.0,
            }),
            secondary_y_label: None,
            secondary_y_bounds: None,
        },
        ChartSpec {
            kind: ChartKind::GroupedBar,
            title: "Average Precipitation for Each Region in Indonesia (1901-2021)",
            x_label: "province",
            y_label: "precipitation (mm)",
            palette: Palette::Rocket,
            y_bounds: Some(AxisBounds {
                min: 140.0,
                max: 285.0,
            }),
            secondary_y_label: None,
            secondary_y_bounds: None,
        },
        ChartSpec {
            kind: ChartKind::GroupedBar,
            title: "Rainfall Comparison Between 1901-1910 and 2012-2021",
            x_label: "month",
            y_label: "precipitation (mm)",
            palette: Palette::Rocket,
            y_bounds: Some(AxisBounds {
                min: 150.0,
                max: 310.0,
            }),
            secondary_y_label: None,
            secondary_y_bounds: None,
        },
        ChartSpec {
            kind: ChartKind::GroupedBar,
            title: "Seasonal Precipitation Gap by Decade",
            x_label: "decade",
            y_label: "precipitation gap (mm)",
            palette: Palette::Rocket,
            y_bounds: Some(AxisBounds {
                min: 100.0,
                max: 140.0,
            }),
            secondary_y_label: None,
            secondary_y_bounds: None,
        },
        ChartSpec {
            kind: ChartKind::DualAxisBarLine,
            title: "Average Temperature from 1901-2021",
            x_label: "year",
            y_label: "mean temperature (celsius)",
            palette: Palette::Viridis,
            y_bounds: None,
            secondary_y_label: None,
            secondary_y_bounds: None,
        },
        ChartSpec {
            kind: ChartKind::Heatmap,
            title: "Correlation With Other Factors",
            x_label: "",
            y_label: "",
            palette: Palette::Viridis,
            y_bounds: None,
            secondary_y_label: None,
            secondary_y_bounds: None,
        },
    ]
}

/// Spec for one comparison's scatter-with-regression figure.
pub fn scatter_spec(pair: &ComparisonPair) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::ScatterRegression,
        title: pair.label,
        x_label: pair.x.as_str(),
        y_label: pair.y.as_str(),
        palette: Palette::Viridis,
        y_bounds: None,
        secondary_y_label: None,
        secondary_y_bounds: None,
    }
}
