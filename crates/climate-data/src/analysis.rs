//! Top-level report pipeline.
//!
//! Orchestrates loading, normalization, the grouped reductions and the
//! correlation matrix, returning a [`ClimateReport`] ready for the display
//! layer. Everything runs once, synchronously, on the calling thread.

use std::path::Path;

use chrono::Utc;
use climate_core::calculations::{correlation_matrix, CorrelationMatrix};
use climate_core::error::Result;
use climate_core::models::{
    AnnualIndicatorRow, AnnualMeans, DecadeMonthRow, IndicatorRecord, MonthlyClimatology,
    MonthlyRecord, RegionalProfile, RegionalRecord, SeasonalGap,
};
use tracing::info;

use crate::aggregator::ClimateAggregator;
use crate::reader;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Number of national monthly records loaded.
    pub national_rows: usize,
    /// Number of joined regional records loaded.
    pub regional_rows: usize,
    /// Number of distinct provinces in the regional table.
    pub provinces: usize,
    /// Number of indicator years loaded.
    pub indicator_rows: usize,
    /// Wall-clock seconds spent reading and joining the source files.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent on the grouped reductions.
    pub aggregate_time_seconds: f64,
}

/// Every summary table the dashboard figures consume.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClimateReport {
    /// Long-run monthly averages, 12 rows ordered by month code.
    pub climatology: Vec<MonthlyClimatology>,
    /// Per-province averages, ordered by province name.
    pub regional_profile: Vec<RegionalProfile>,
    /// Monthly means per decade window, 12 rows per window.
    pub decade_months: Vec<DecadeMonthRow>,
    /// Wet/dry spread per decade window.
    pub seasonal_gaps: Vec<SeasonalGap>,
    /// Yearly national means, the annual temperature trend.
    pub annual_means: Vec<AnnualMeans>,
    /// Yearly means joined with indicators, year 2000 onward.
    pub annual_indicators: Vec<AnnualIndicatorRow>,
    /// Pairwise Pearson correlations over the joined table.
    pub correlation: CorrelationMatrix,
    /// Metadata about this report run.
    pub metadata: ReportMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full report pipeline against the dataset root.
///
/// 1. Load and normalize the national series.
/// 2. Load and key-join the four per-variable regional tables.
/// 3. Load the indicator spreadsheet.
/// 4. Derive every summary table via [`ClimateAggregator`].
///
/// Any load failure aborts the run; no partial tables are produced.
pub fn build_report(data_root: &Path) -> Result<ClimateReport> {
    let load_start = std::time::Instant::now();
    let national = reader::load_national(data_root)?;
    let regional = reader::load_regional(data_root)?;
    let indicators = reader::load_indicators(data_root)?;
    let load_time = load_start.elapsed().as_secs_f64();

    info!(
        "Loaded {} national, {} regional, {} indicator rows",
        national.len(),
        regional.len(),
        indicators.len()
    );

    Ok(build_report_from_tables(
        &national,
        &regional,
        &indicators,
        load_time,
    ))
}

/// Pure aggregation over already-loaded canonical tables.
///
/// Deterministic: the same tables always produce the same summary tables.
pub fn build_report_from_tables(
    national: &[MonthlyRecord],
    regional: &[RegionalRecord],
    indicators: &[IndicatorRecord],
    load_time_seconds: f64,
) -> ClimateReport {
    let aggregate_start = std::time::Instant::now();

    let climatology = ClimateAggregator::monthly_climatology(national);
    let regional_profile = ClimateAggregator::regional_profile(regional);
    let decade_months = ClimateAggregator::decade_comparison(national);
    let seasonal_gaps = ClimateAggregator::seasonal_gaps(&decade_months);
    let annual_means = ClimateAggregator::annual_means(national);
    let annual_indicators = ClimateAggregator::join_indicators(&annual_means, indicators);
    let correlation = correlation_matrix(&annual_indicators);

    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339(),
        national_rows: national.len(),
        regional_rows: regional.len(),
        provinces: regional_profile.len(),
        indicator_rows: indicators.len(),
        load_time_seconds,
        aggregate_time_seconds: aggregate_time,
    };

    ClimateReport {
        climatology,
        regional_profile,
        decade_months,
        seasonal_gaps,
        annual_means,
        annual_indicators,
        correlation,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
