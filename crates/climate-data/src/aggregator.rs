//! Grouped reductions over the canonical climate tables.
//!
//! Every summary table a dashboard figure consumes is derived here as a
//! pure function over the loader's output; nothing is cached or persisted.

use std::collections::{BTreeMap, HashMap};

use climate_core::calculations::MeanAccumulator;
use climate_core::models::{
    AnnualIndicatorRow, AnnualMeans, DecadeMonthRow, IndicatorRecord, MonthlyClimatology,
    MonthlyRecord, Observation, RegionalProfile, RegionalRecord, SeasonalGap,
};

// ── Fixed windows ─────────────────────────────────────────────────────────────

/// Inclusive year window compared by the decade figures.
#[derive(Debug, Clone, Copy)]
pub struct DecadeWindow {
    pub start: i32,
    pub end: i32,
    /// Tag attached to every row derived from this window.
    pub label: &'static str,
}

impl DecadeWindow {
    fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// The first and most recent full decades of the record.
pub const DECADE_WINDOWS: [DecadeWindow; 2] = [
    DecadeWindow {
        start: 1901,
        end: 1910,
        label: "1901-1910",
    },
    DecadeWindow {
        start: 2012,
        end: 2021,
        label: "2012-2021",
    },
];

/// First year with indicator coverage; earlier years are dropped by the
/// annual join.
pub const INDICATOR_COVERAGE_START: i32 = 2000;

// ── MeasurementStats ──────────────────────────────────────────────────────────

/// Per-field running means over one group of records.
#[derive(Debug, Clone, Copy, Default)]
struct MeasurementStats {
    mean_temp: MeanAccumulator,
    max_temp: MeanAccumulator,
    min_temp: MeanAccumulator,
    precipitation: MeanAccumulator,
    rows: u32,
}

impl MeasurementStats {
    /// Fold one record's measurements into the running totals.
    fn add(&mut self, obs: &impl Observation) {
        self.mean_temp.add(obs.mean_temp());
        self.max_temp.add(obs.max_temp());
        self.min_temp.add(obs.min_temp());
        self.precipitation.add(obs.precipitation());
        self.rows += 1;
    }
}

// ── ClimateAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that derives every summary table from the canonical ones.
pub struct ClimateAggregator;

impl ClimateAggregator {
    /// Monthly climatology: mean of every measurement per calendar month
    /// across all years. The year column does not survive the grouping.
    ///
    /// Returns one row per month code present, ordered by code ascending.
    pub fn monthly_climatology(records: &[MonthlyRecord]) -> Vec<MonthlyClimatology> {
        let mut groups: BTreeMap<&str, MeasurementStats> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.month.as_str())
                .or_default()
                .add(record);
        }

        groups
            .into_iter()
            .map(|(month, stats)| MonthlyClimatology {
                month: month.to_string(),
                mean_temp: stats.mean_temp.mean_or_nan(),
                max_temp: stats.max_temp.mean_or_nan(),
                min_temp: stats.min_temp.mean_or_nan(),
                precipitation: stats.precipitation.mean_or_nan(),
                samples: stats.rows,
            })
            .collect()
    }

    /// Regional profile: mean of every measurement per province across all
    /// years and months. One row per distinct province, ordered by name.
    pub fn regional_profile(records: &[RegionalRecord]) -> Vec<RegionalProfile> {
        let mut groups: BTreeMap<&str, MeasurementStats> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.province_name.as_str())
                .or_default()
                .add(record);
        }

        groups
            .into_iter()
            .map(|(province, stats)| RegionalProfile {
                province_name: province.to_string(),
                mean_temp: stats.mean_temp.mean_or_nan(),
                max_temp: stats.max_temp.mean_or_nan(),
                min_temp: stats.min_temp.mean_or_nan(),
                precipitation: stats.precipitation.mean_or_nan(),
                samples: stats.rows,
            })
            .collect()
    }

    /// Provinces ordered coldest-first, for the temperature ranking chart.
    pub fn ranked_by_temperature(profiles: &[RegionalProfile]) -> Vec<RegionalProfile> {
        let mut ranked = profiles.to_vec();
        ranked.sort_by(|a, b| a.mean_temp.total_cmp(&b.mean_temp));
        ranked
    }

    /// Provinces ordered driest-first, for the precipitation ranking chart.
    pub fn ranked_by_precipitation(profiles: &[RegionalProfile]) -> Vec<RegionalProfile> {
        let mut ranked = profiles.to_vec();
        ranked.sort_by(|a, b| a.precipitation.total_cmp(&b.precipitation));
        ranked
    }

    /// Decade comparison: restrict the national series to the two fixed
    /// windows, group each window by month, and concatenate the tagged
    /// results into one table keyed by (window, month).
    pub fn decade_comparison(records: &[MonthlyRecord]) -> Vec<DecadeMonthRow> {
        let mut rows = Vec::new();
        for window in &DECADE_WINDOWS {
            let mut groups: BTreeMap<&str, MeasurementStats> = BTreeMap::new();
            for record in records.iter().filter(|r| window.contains(r.year)) {
                groups
                    .entry(record.month.as_str())
                    .or_default()
                    .add(record);
            }

            rows.extend(groups.into_iter().map(|(month, stats)| DecadeMonthRow {
                window: window.label.to_string(),
                month: month.to_string(),
                mean_temp: stats.mean_temp.mean_or_nan(),
                max_temp: stats.max_temp.mean_or_nan(),
                min_temp: stats.min_temp.mean_or_nan(),
                precipitation: stats.precipitation.mean_or_nan(),
                samples: stats.rows,
            }));
        }
        rows
    }

    /// Seasonal gap per window: the spread between the wettest and driest
    /// monthly precipitation mean, computed only from that window's rows of
    /// the decade-comparison table.
    pub fn seasonal_gaps(rows: &[DecadeMonthRow]) -> Vec<SeasonalGap> {
        #[derive(Default)]
        struct GapStats {
            mean: MeanAccumulator,
            max: Option<f64>,
            min: Option<f64>,
        }

        let mut groups: BTreeMap<&str, GapStats> = BTreeMap::new();
        for row in rows {
            let stats = groups.entry(row.window.as_str()).or_default();
            if row.precipitation.is_finite() {
                let p = row.precipitation;
                stats.mean.add(Some(p));
                stats.max = Some(stats.max.map_or(p, |m| m.max(p)));
                stats.min = Some(stats.min.map_or(p, |m| m.min(p)));
            }
        }

        groups
            .into_iter()
            .map(|(window, stats)| {
                let max = stats.max.unwrap_or(f64::NAN);
                let min = stats.min.unwrap_or(f64::NAN);
                SeasonalGap {
                    window: window.to_string(),
                    mean_precipitation: stats.mean.mean_or_nan(),
                    max_precipitation: max,
                    min_precipitation: min,
                    gap: max - min,
                }
            })
            .collect()
    }

    /// Annual means: group the national series by year, collapsing months.
    /// Returns one row per year, ordered by year ascending.
    pub fn annual_means(records: &[MonthlyRecord]) -> Vec<AnnualMeans> {
        let mut groups: BTreeMap<i32, MeasurementStats> = BTreeMap::new();
        for record in records {
            groups.entry(record.year).or_default().add(record);
        }

        groups
            .into_iter()
            .map(|(year, stats)| AnnualMeans {
                year,
                mean_temp: stats.mean_temp.mean_or_nan(),
                max_temp: stats.max_temp.mean_or_nan(),
                min_temp: stats.min_temp.mean_or_nan(),
                precipitation: stats.precipitation.mean_or_nan(),
                samples: stats.rows,
            })
            .collect()
    }

    /// Join annual climate means with the yearly indicators.
    ///
    /// Years before [`INDICATOR_COVERAGE_START`] and years without an
    /// indicator row are dropped, not null-filled.
    pub fn join_indicators(
        annual: &[AnnualMeans],
        indicators: &[IndicatorRecord],
    ) -> Vec<AnnualIndicatorRow> {
        let by_year: HashMap<i32, &IndicatorRecord> =
            indicators.iter().map(|i| (i.year, i)).collect();

        annual
            .iter()
            .filter(|a| a.year >= INDICATOR_COVERAGE_START)
            .filter_map(|a| {
                by_year.get(&a.year).map(|ind| AnnualIndicatorRow {
                    year: a.year,
                    mean_temp: a.mean_temp,
                    max_temp: a.max_temp,
                    min_temp: a.min_temp,
                    precipitation: a.precipitation,
                    electricity: ind.electricity,
                    forest_area: ind.forest_area,
                    co2_emission: ind.co2_emission,
                    internet: ind.internet,
                    population: ind.population,
                })
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use climate_core::month::{month_code, MONTH_ABBREVIATIONS};

    fn monthly(year: i32, month: &str, precipitation: f64) -> MonthlyRecord {
        MonthlyRecord {
            year,
            month: month_code(month).unwrap().to_string(),
            mean_temp: Some(25.0),
            max_temp: Some(30.0),
            min_temp: Some(21.0),
            precipitation: Some(precipitation),
        }
    }

    fn regional(province: &str, year: i32, month: &str, mean_temp: f64) -> RegionalRecord {
        RegionalRecord {
            province_name: province.to_string(),
            year,
            month: month_code(month).unwrap().to_string(),
            mean_temp: Some(mean_temp),
            max_temp: Some(mean_temp + 5.0),
            min_temp: Some(mean_temp - 4.0),
            precipitation: Some(200.0),
        }
    }

    fn indicator(year: i32) -> IndicatorRecord {
        IndicatorRecord {
            year,
            electricity: 86.0,
            forest_area: 54.0,
            co2_emission: 1.5,
            internet: 4.0,
            population: 2.2e8,
        }
    }

    /// Two full years of national records, precipitation varying by month.
    fn two_full_years(first_year: i32) -> Vec<MonthlyRecord> {
        let mut records = Vec::new();
        for year in [first_year, first_year + 1] {
            for (i, month) in MONTH_ABBREVIATIONS.iter().enumerate() {
                records.push(monthly(year, month, 160.0 + 10.0 * i as f64));
            }
        }
        records
    }

    // ── monthly_climatology ───────────────────────────────────────────────────

    #[test]
    fn test_climatology_one_row_per_month() {
        let records = two_full_years(1901);
        let table = ClimateAggregator::monthly_climatology(&records);

        assert_eq!(table.len(), 12);
        let codes: Vec<&str> = table.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(
            codes,
            vec!["01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12"]
        );

        // Every input row lands in exactly one group.
        let total: u32 = table.iter().map(|r| r.samples).sum();
        assert_eq!(total as usize, records.len());
    }

    #[test]
    fn test_climatology_means_across_years() {
        let records = vec![monthly(1901, "Jan", 200.0), monthly(1902, "Jan", 220.0)];
        let table = ClimateAggregator::monthly_climatology(&records);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].month, "01");
        assert_eq!(table[0].precipitation, 210.0);
        assert_eq!(table[0].samples, 2);
    }

    #[test]
    fn test_climatology_excludes_missing_from_mean() {
        let mut with_gap = monthly(1903, "Jan", 0.0);
        with_gap.precipitation = None;
        let records = vec![
            monthly(1901, "Jan", 200.0),
            monthly(1902, "Jan", 220.0),
            with_gap,
        ];
        let table = ClimateAggregator::monthly_climatology(&records);

        // The missing value must not drag the mean toward zero.
        assert_eq!(table[0].precipitation, 210.0);
        assert_eq!(table[0].samples, 3);
    }

    #[test]
    fn test_climatology_all_missing_group_is_nan() {
        let mut record = monthly(1901, "Feb", 0.0);
        record.precipitation = None;
        let table = ClimateAggregator::monthly_climatology(&[record]);

        assert!(table[0].precipitation.is_nan());
        assert_eq!(table[0].mean_temp, 25.0);
    }

    #[test]
    fn test_climatology_empty_input() {
        assert!(ClimateAggregator::monthly_climatology(&[]).is_empty());
    }

    // ── regional_profile ──────────────────────────────────────────────────────

    #[test]
    fn test_profile_one_row_per_province() {
        let records = vec![
            regional("Jakarta", 1901, "Jan", 27.0),
            regional("Jakarta", 1901, "Feb", 27.4),
            regional("Sulawesi Barat", 1901, "Jan", 23.9),
            regional("Papua", 1901, "Jan", 25.0),
        ];
        let table = ClimateAggregator::regional_profile(&records);

        let provinces: Vec<&str> = table.iter().map(|r| r.province_name.as_str()).collect();
        assert_eq!(provinces, vec!["Jakarta", "Papua", "Sulawesi Barat"]);
        assert_eq!(table[0].samples, 2);
        assert_eq!(table[0].mean_temp, 27.2);
    }

    #[test]
    fn test_rankings_sort_ascending() {
        let records = vec![
            regional("Jakarta", 1901, "Jan", 27.0),
            regional("Sulawesi Barat", 1901, "Jan", 23.9),
            regional("Papua", 1901, "Jan", 25.0),
        ];
        let profiles = ClimateAggregator::regional_profile(&records);

        let by_temp = ClimateAggregator::ranked_by_temperature(&profiles);
        let order: Vec<&str> = by_temp.iter().map(|r| r.province_name.as_str()).collect();
        assert_eq!(order, vec!["Sulawesi Barat", "Papua", "Jakarta"]);

        let by_precip = ClimateAggregator::ranked_by_precipitation(&profiles);
        assert_eq!(by_precip.len(), 3);
    }

    // ── decade_comparison / seasonal_gaps ─────────────────────────────────────

    #[test]
    fn test_decade_comparison_concatenates_windows() {
        let mut records = two_full_years(1901);
        records.extend(two_full_years(2012));
        // Years outside both windows must not contribute.
        records.push(monthly(1960, "Jan", 999.0));

        let rows = ClimateAggregator::decade_comparison(&records);
        assert_eq!(rows.len(), 24);

        let first_window: Vec<&DecadeMonthRow> =
            rows.iter().filter(|r| r.window == "1901-1910").collect();
        let last_window: Vec<&DecadeMonthRow> =
            rows.iter().filter(|r| r.window == "2012-2021").collect();
        assert_eq!(first_window.len(), 12);
        assert_eq!(last_window.len(), 12);

        // Two years contribute to every (window, month) group.
        assert!(rows.iter().all(|r| r.samples == 2));
        // The 1960 row is in neither window.
        assert!(rows.iter().all(|r| r.precipitation < 999.0));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let records = vec![
            monthly(1901, "Jan", 200.0),
            monthly(1910, "Jan", 220.0),
            monthly(1911, "Jan", 999.0),
            monthly(2011, "Jan", 999.0),
            monthly(2012, "Jan", 300.0),
            monthly(2021, "Jan", 320.0),
        ];
        let rows = ClimateAggregator::decade_comparison(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].window, "1901-1910");
        assert_eq!(rows[0].precipitation, 210.0);
        assert_eq!(rows[1].window, "2012-2021");
        assert_eq!(rows[1].precipitation, 310.0);
    }

    #[test]
    fn test_seasonal_gap_per_window() {
        let mut records = two_full_years(1901);
        records.extend(two_full_years(2012));
        let rows = ClimateAggregator::decade_comparison(&records);
        let gaps = ClimateAggregator::seasonal_gaps(&rows);

        assert_eq!(gaps.len(), 2);
        for gap in &gaps {
            // Monthly means run 160..=270 within each window.
            assert_eq!(gap.max_precipitation, 270.0);
            assert_eq!(gap.min_precipitation, 160.0);
            assert_eq!(gap.gap, 110.0);
        }
        assert_eq!(gaps[0].window, "1901-1910");
        assert_eq!(gaps[1].window, "2012-2021");
    }

    #[test]
    fn test_seasonal_gap_windows_are_independent() {
        // Window A spans 100..210, window B spans 300..355; a cross-window
        // gap would be much larger than either.
        let mut records: Vec<MonthlyRecord> = MONTH_ABBREVIATIONS
            .iter()
            .enumerate()
            .map(|(i, m)| monthly(1905, m, 100.0 + 10.0 * i as f64))
            .collect();
        records.extend(
            MONTH_ABBREVIATIONS
                .iter()
                .enumerate()
                .map(|(i, m)| monthly(2015, m, 300.0 + 5.0 * i as f64)),
        );

        let rows = ClimateAggregator::decade_comparison(&records);
        let gaps = ClimateAggregator::seasonal_gaps(&rows);

        assert_eq!(gaps[0].gap, 110.0);
        assert_eq!(gaps[1].gap, 55.0);
    }

    // ── annual_means / join_indicators ────────────────────────────────────────

    #[test]
    fn test_annual_means_collapse_months() {
        let records = vec![
            monthly(1999, "Jan", 200.0),
            monthly(1999, "Feb", 300.0),
            monthly(2000, "Jan", 100.0),
        ];
        let table = ClimateAggregator::annual_means(&records);

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].year, 1999);
        assert_eq!(table[0].precipitation, 250.0);
        assert_eq!(table[0].samples, 2);
        assert_eq!(table[1].year, 2000);
    }

    #[test]
    fn test_join_drops_years_before_coverage() {
        let annual = ClimateAggregator::annual_means(&[
            monthly(1999, "Jan", 200.0),
            monthly(2000, "Jan", 210.0),
        ]);
        // An indicator row exists for 1999 too, but pre-2000 years are out.
        let joined =
            ClimateAggregator::join_indicators(&annual, &[indicator(1999), indicator(2000)]);

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].year, 2000);
        assert_eq!(joined[0].electricity, 86.0);
    }

    #[test]
    fn test_join_drops_years_without_indicator_match() {
        let annual = ClimateAggregator::annual_means(&[
            monthly(2003, "Jan", 200.0),
            monthly(2004, "Jan", 210.0),
        ]);
        let joined = ClimateAggregator::join_indicators(&annual, &[indicator(2004)]);

        // 2003 has no indicator row: absent, not null-padded.
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].year, 2004);
    }

    #[test]
    fn test_join_empty_indicators() {
        let annual = ClimateAggregator::annual_means(&[monthly(2003, "Jan", 200.0)]);
        assert!(ClimateAggregator::join_indicators(&annual, &[]).is_empty());
    }
}
