use serde::{Deserialize, Serialize};

/// One national observation for a single calendar month of a single year.
///
/// There is exactly one record per (year, month) pair; `month` is always a
/// two-digit code produced by [`crate::month::month_code`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Observation year.
    pub year: i32,
    /// Two-digit month code, `"01".."12"`.
    pub month: String,
    /// Monthly mean temperature in degrees Celsius.
    pub mean_temp: Option<f64>,
    /// Monthly maximum temperature in degrees Celsius.
    pub max_temp: Option<f64>,
    /// Monthly minimum temperature in degrees Celsius.
    pub min_temp: Option<f64>,
    /// Monthly precipitation in millimetres.
    pub precipitation: Option<f64>,
}

/// One per-province observation, same shape as [`MonthlyRecord`] with an
/// additional region key. One record per (province_name, year, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalRecord {
    /// Province the observation belongs to.
    pub province_name: String,
    /// Observation year.
    pub year: i32,
    /// Two-digit month code, `"01".."12"`.
    pub month: String,
    /// Monthly mean temperature in degrees Celsius.
    pub mean_temp: Option<f64>,
    /// Monthly maximum temperature in degrees Celsius.
    pub max_temp: Option<f64>,
    /// Monthly minimum temperature in degrees Celsius.
    pub min_temp: Option<f64>,
    /// Monthly precipitation in millimetres.
    pub precipitation: Option<f64>,
}

/// Yearly national socioeconomic/environmental indicators, sparse across
/// years (not every year has a row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    /// Indicator year.
    pub year: i32,
    /// Access to electricity, % of population.
    pub electricity: f64,
    /// Forest area, % of land area.
    pub forest_area: f64,
    /// CO2 emissions, metric tons per capita.
    pub co2_emission: f64,
    /// Individuals using the internet, % of population.
    pub internet: f64,
    /// Total population.
    pub population: f64,
}

// ── Observation seam ──────────────────────────────────────────────────────────

/// Access to the four measurement fields shared by national and regional
/// records, so the aggregation engine can fold either kind.
pub trait Observation {
    fn mean_temp(&self) -> Option<f64>;
    fn max_temp(&self) -> Option<f64>;
    fn min_temp(&self) -> Option<f64>;
    fn precipitation(&self) -> Option<f64>;
}

impl Observation for MonthlyRecord {
    fn mean_temp(&self) -> Option<f64> {
        self.mean_temp
    }

    fn max_temp(&self) -> Option<f64> {
        self.max_temp
    }

    fn min_temp(&self) -> Option<f64> {
        self.min_temp
    }

    fn precipitation(&self) -> Option<f64> {
        self.precipitation
    }
}

impl Observation for RegionalRecord {
    fn mean_temp(&self) -> Option<f64> {
        self.mean_temp
    }

    fn max_temp(&self) -> Option<f64> {
        self.max_temp
    }

    fn min_temp(&self) -> Option<f64> {
        self.min_temp
    }

    fn precipitation(&self) -> Option<f64> {
        self.precipitation
    }
}

// ── Derived tables ────────────────────────────────────────────────────────────
//
// All derived measurement fields are plain `f64`; a group whose samples were
// all missing carries `f64::NAN` rather than a substituted zero.

/// Long-run average of each measurement per calendar month across all years.
/// The year column does not survive the grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyClimatology {
    /// Two-digit month code, `"01".."12"`.
    pub month: String,
    pub mean_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation: f64,
    /// Number of source rows folded into this group.
    pub samples: u32,
}

/// Average of each measurement per province across all years and months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalProfile {
    pub province_name: String,
    pub mean_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation: f64,
    /// Number of source rows folded into this group.
    pub samples: u32,
}

/// Monthly means within one decade window, tagged with the window label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecadeMonthRow {
    /// Window label, `"1901-1910"` or `"2012-2021"`.
    pub window: String,
    /// Two-digit month code, `"01".."12"`.
    pub month: String,
    pub mean_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation: f64,
    /// Number of source rows folded into this group.
    pub samples: u32,
}

/// Spread between the wettest and driest monthly precipitation mean within
/// one decade window. One row per window, derived from that window's twelve
/// [`DecadeMonthRow`]s only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalGap {
    /// Window label, `"1901-1910"` or `"2012-2021"`.
    pub window: String,
    pub mean_precipitation: f64,
    pub max_precipitation: f64,
    pub min_precipitation: f64,
    /// `max_precipitation - min_precipitation`.
    pub gap: f64,
}

/// Average of each measurement per year, collapsing all months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualMeans {
    pub year: i32,
    pub mean_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation: f64,
    /// Number of source rows folded into this group.
    pub samples: u32,
}

/// One year's climate means joined with that year's indicators. Years
/// before 2000 or without an indicator row never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualIndicatorRow {
    pub year: i32,
    pub mean_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation: f64,
    pub electricity: f64,
    pub forest_area: f64,
    pub co2_emission: f64,
    pub internet: f64,
    pub population: f64,
}
