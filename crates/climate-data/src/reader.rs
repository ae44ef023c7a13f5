//! Raw dataset loading and normalization.
//!
//! Reads the national CSV, the four per-variable regional CSVs, and the
//! indicator spreadsheet from a fixed layout under a configurable root,
//! rewriting month names to two-digit codes and combining the regional
//! tables into one wide table keyed by (province, year, month).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, DataType as _, Range, Reader as _, Xlsx};
use climate_core::error::{ReportError, Result};
use climate_core::models::{IndicatorRecord, MonthlyRecord, RegionalRecord};
use climate_core::month::month_code;
use serde::Deserialize;
use tracing::debug;

// ── Dataset layout ────────────────────────────────────────────────────────────

/// Fixed relative paths of the source tables under the dataset root.
pub const NATIONAL_CSV: &str = "ina/df_ina.csv";
pub const MEAN_TEMP_CSV: &str = "mean_temp/mean_temp.csv";
pub const MAX_TEMP_CSV: &str = "max_temp/max_temp.csv";
pub const MIN_TEMP_CSV: &str = "min_temp/min_temp.csv";
pub const PRECIPITATION_CSV: &str = "precipitation/precipitation.csv";
pub const INDICATOR_XLSX: &str = "additional/additional.xlsx";

/// Every source file the report needs, for layout validation.
pub const REQUIRED_FILES: [&str; 6] = [
    NATIONAL_CSV,
    MEAN_TEMP_CSV,
    MAX_TEMP_CSV,
    MIN_TEMP_CSV,
    PRECIPITATION_CSV,
    INDICATOR_XLSX,
];

/// Find all `.csv` and `.xlsx` files under `root`, sorted by path.
///
/// Used for diagnostics when the expected layout is missing.
pub fn find_dataset_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "csv" || ext == "xlsx")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── National table ────────────────────────────────────────────────────────────

/// Raw CSV row of `ina/df_ina.csv`, month still a three-letter name.
#[derive(Debug, Deserialize)]
struct RawNationalRow {
    year: i32,
    month: String,
    mean_temp: Option<f64>,
    max_temp: Option<f64>,
    min_temp: Option<f64>,
    precipitation: Option<f64>,
}

/// Load the national monthly time series, rewriting month names to codes.
///
/// A month value outside the twelve recognised abbreviations fails at the
/// row being processed.
pub fn load_national(root: &Path) -> Result<Vec<MonthlyRecord>> {
    let path = root.join(NATIONAL_CSV);
    let text = read_lossy(&path)?;

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let raw: RawNationalRow = row.map_err(|source| ReportError::CsvParse {
            path: path.clone(),
            source,
        })?;
        records.push(MonthlyRecord {
            year: raw.year,
            month: month_code(&raw.month)?.to_string(),
            mean_temp: raw.mean_temp,
            max_temp: raw.max_temp,
            min_temp: raw.min_temp,
            precipitation: raw.precipitation,
        });
    }

    debug!("Loaded {} national rows from {}", records.len(), path.display());
    Ok(records)
}

// ── Regional tables ───────────────────────────────────────────────────────────

/// One row of a per-variable regional CSV, month still a three-letter name.
struct MeasurementRow {
    province_name: String,
    year: i32,
    month: String,
    value: Option<f64>,
}

/// Natural key of a regional observation, pre-normalization.
type RegionKey = (String, i32, String);

/// Load the per-region monthly time series.
///
/// The four per-variable tables are combined by an explicit key join on
/// (province_name, year, month) rather than by row position, so a reordered
/// or truncated source surfaces as a shape or key mismatch instead of
/// silently misassigning measurements. Output preserves the mean-temp
/// table's row order.
pub fn load_regional(root: &Path) -> Result<Vec<RegionalRecord>> {
    let mean = load_measurement(&root.join(MEAN_TEMP_CSV), "mean_temp")?;
    let max = load_measurement(&root.join(MAX_TEMP_CSV), "max_temp")?;
    let min = load_measurement(&root.join(MIN_TEMP_CSV), "min_temp")?;
    let precip = load_measurement(&root.join(PRECIPITATION_CSV), "precipitation")?;

    for (name, table) in [
        ("max_temp", &max),
        ("min_temp", &min),
        ("precipitation", &precip),
    ] {
        if table.len() != mean.len() {
            return Err(ReportError::RegionalShapeMismatch {
                table: name.to_string(),
                expected: mean.len(),
                actual: table.len(),
            });
        }
    }

    let max_by_key = index_by_key(&max);
    let min_by_key = index_by_key(&min);
    let precip_by_key = index_by_key(&precip);

    let mut records = Vec::with_capacity(mean.len());
    for row in &mean {
        let key: RegionKey = (row.province_name.clone(), row.year, row.month.clone());
        records.push(RegionalRecord {
            province_name: row.province_name.clone(),
            year: row.year,
            month: month_code(&row.month)?.to_string(),
            mean_temp: row.value,
            max_temp: require_value(&max_by_key, "max_temp", &key)?,
            min_temp: require_value(&min_by_key, "min_temp", &key)?,
            precipitation: require_value(&precip_by_key, "precipitation", &key)?,
        });
    }

    debug!("Joined {} regional rows", records.len());
    Ok(records)
}

/// Load one per-variable regional CSV, resolving columns by header name.
fn load_measurement(path: &Path, column: &str) -> Result<Vec<MeasurementRow>> {
    let text = read_lossy(path)?;

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|source| ReportError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let index_of = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let province_idx = index_of("province_name")?;
    let year_idx = index_of("year")?;
    let month_idx = index_of("month")?;
    let value_idx = index_of(column)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ReportError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;

        let year_raw = record.get(year_idx).unwrap_or_default().trim();
        let year: i32 = year_raw.parse().map_err(|_| ReportError::InvalidCell {
            path: path.to_path_buf(),
            column: "year".to_string(),
            value: year_raw.to_string(),
        })?;

        let value_raw = record.get(value_idx).unwrap_or_default().trim();
        let value = if value_raw.is_empty() {
            None
        } else {
            Some(value_raw.parse::<f64>().map_err(|_| {
                ReportError::InvalidCell {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                    value: value_raw.to_string(),
                }
            })?)
        };

        rows.push(MeasurementRow {
            province_name: record.get(province_idx).unwrap_or_default().to_string(),
            year,
            month: record.get(month_idx).unwrap_or_default().to_string(),
            value,
        });
    }

    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn index_by_key(rows: &[MeasurementRow]) -> HashMap<RegionKey, Option<f64>> {
    rows.iter()
        .map(|r| {
            (
                (r.province_name.clone(), r.year, r.month.clone()),
                r.value,
            )
        })
        .collect()
}

fn require_value(
    table: &HashMap<RegionKey, Option<f64>>,
    name: &str,
    key: &RegionKey,
) -> Result<Option<f64>> {
    table
        .get(key)
        .copied()
        .ok_or_else(|| ReportError::RegionalKeyMismatch {
            table: name.to_string(),
            province: key.0.clone(),
            year: key.1,
            month: key.2.clone(),
        })
}

// ── Indicator spreadsheet ─────────────────────────────────────────────────────

/// Load the yearly indicator table from the first sheet of the spreadsheet.
pub fn load_indicators(root: &Path) -> Result<Vec<IndicatorRecord>> {
    let path = root.join(INDICATOR_XLSX);
    let mut workbook: Xlsx<_> =
        open_workbook(&path).map_err(|source| ReportError::Spreadsheet {
            path: path.clone(),
            source,
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Config(format!("no worksheet in {}", path.display())))?
        .map_err(|source| ReportError::Spreadsheet {
            path: path.clone(),
            source,
        })?;

    let records = parse_indicator_rows(&path, &range)?;
    debug!("Loaded {} indicator rows from {}", records.len(), path.display());
    Ok(records)
}

/// Parse indicator rows out of a worksheet range, resolving columns from the
/// header row. Split from the file I/O so tests can build ranges in memory.
fn parse_indicator_rows(path: &Path, range: &Range<Data>) -> Result<Vec<IndicatorRecord>> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| ReportError::MissingColumn {
        path: path.to_path_buf(),
        column: "year".to_string(),
    })?;

    let index_of = |name: &str| {
        header
            .iter()
            .position(|cell| cell.get_string() == Some(name))
            .ok_or_else(|| ReportError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let year_idx = index_of("year")?;
    let electricity_idx = index_of("electricity")?;
    let forest_area_idx = index_of("forest_area")?;
    let co2_idx = index_of("co2_emission")?;
    let internet_idx = index_of("internet")?;
    let population_idx = index_of("population")?;

    let mut records = Vec::new();
    for row in rows {
        // Trailing blank rows are common in hand-edited spreadsheets.
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let cell_f64 = |idx: usize, column: &str| {
            row.get(idx)
                .and_then(|cell| cell.as_f64())
                .ok_or_else(|| ReportError::InvalidCell {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                    value: row
                        .get(idx)
                        .map(|cell| cell.to_string())
                        .unwrap_or_default(),
                })
        };

        records.push(IndicatorRecord {
            year: cell_f64(year_idx, "year")? as i32,
            electricity: cell_f64(electricity_idx, "electricity")?,
            forest_area: cell_f64(forest_area_idx, "forest_area")?,
            co2_emission: cell_f64(co2_idx, "co2_emission")?,
            internet: cell_f64(internet_idx, "internet")?,
            population: cell_f64(population_idx, "population")?,
        });
    }

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read a file into a string, replacing invalid UTF-8 sequences.
///
/// The source CSVs carry mis-encoded bytes, so decoding is best-effort
/// rather than strict-fail. The handle is released as soon as the bytes are
/// in memory.
fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_file(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
    }

    fn write_national(root: &Path, rows: &[&str]) {
        let mut content = String::from(
            "year,month,mean_temp,max_temp,min_temp,precipitation\n",
        );
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        write_file(root, NATIONAL_CSV, content.as_bytes());
    }

    fn write_measurement(root: &Path, rel: &str, column: &str, rows: &[(&str, i32, &str, &str)]) {
        let mut content = format!("province_name,year,month,{}\n", column);
        for (province, year, month, value) in rows {
            content.push_str(&format!("{},{},{},{}\n", province, year, month, value));
        }
        write_file(root, rel, content.as_bytes());
    }

    fn write_aligned_regional(root: &Path, rows: &[(&str, i32, &str)]) {
        let values: Vec<(&str, i32, &str, String)> = rows
            .iter()
            .enumerate()
            .map(|(i, (p, y, m))| (*p, *y, *m, format!("{}.0", 20 + i)))
            .collect();
        for (rel, column) in [
            (MEAN_TEMP_CSV, "mean_temp"),
            (MAX_TEMP_CSV, "max_temp"),
            (MIN_TEMP_CSV, "min_temp"),
            (PRECIPITATION_CSV, "precipitation"),
        ] {
            let typed: Vec<(&str, i32, &str, &str)> = values
                .iter()
                .map(|(p, y, m, v)| (*p, *y, *m, v.as_str()))
                .collect();
            write_measurement(root, rel, column, &typed);
        }
    }

    // ── find_dataset_files ────────────────────────────────────────────────────

    #[test]
    fn test_find_dataset_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "b/data.csv", b"x");
        write_file(dir.path(), "a/data.xlsx", b"x");
        write_file(dir.path(), "notes.txt", b"x");

        let files = find_dataset_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a/data.xlsx"));
        assert!(files[1].ends_with("b/data.csv"));
    }

    #[test]
    fn test_find_dataset_files_missing_root() {
        let files = find_dataset_files(Path::new("/tmp/does-not-exist-climate-test"));
        assert!(files.is_empty());
    }

    // ── load_national ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_national_normalizes_months() {
        let dir = TempDir::new().unwrap();
        write_national(
            dir.path(),
            &[
                "1901,Jan,25.1,30.2,21.3,267.4",
                "1901,Feb,25.3,30.5,21.5,251.2",
            ],
        );

        let records = load_national(dir.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, "01");
        assert_eq!(records[1].month, "02");
        assert_eq!(records[0].precipitation, Some(267.4));
    }

    #[test]
    fn test_load_national_empty_cell_is_missing() {
        let dir = TempDir::new().unwrap();
        write_national(dir.path(), &["1901,Jan,25.1,30.2,,267.4"]);

        let records = load_national(dir.path()).unwrap();
        assert_eq!(records[0].min_temp, None);
        assert_eq!(records[0].mean_temp, Some(25.1));
    }

    #[test]
    fn test_load_national_unknown_month_fails() {
        let dir = TempDir::new().unwrap();
        write_national(dir.path(), &["1901,Jann,25.1,30.2,21.3,267.4"]);

        let err = load_national(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::UnknownMonth(ref m) if m == "Jann"));
    }

    #[test]
    fn test_load_regional_tolerates_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        // 0xE9 is a bare Latin-1 byte in the province name; the decoder must
        // not reject the file, only replace the byte.
        for (rel, column) in [
            (MEAN_TEMP_CSV, "mean_temp"),
            (MAX_TEMP_CSV, "max_temp"),
            (MIN_TEMP_CSV, "min_temp"),
            (PRECIPITATION_CSV, "precipitation"),
        ] {
            let mut content: Vec<u8> = format!("province_name,year,month,{}\n", column).into();
            content.extend_from_slice(b"Krat\xe9n,1901,Jan,26.0\n");
            write_file(dir.path(), rel, &content);
        }

        let records = load_regional(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].province_name.contains('\u{FFFD}'));
    }

    #[test]
    fn test_load_national_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_national(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::FileRead { .. }));
    }

    // ── load_regional ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_regional_joins_on_key() {
        let dir = TempDir::new().unwrap();
        write_measurement(
            dir.path(),
            MEAN_TEMP_CSV,
            "mean_temp",
            &[("Aceh", 1901, "Jan", "26.0"), ("Papua", 1901, "Jan", "24.0")],
        );
        // The other tables are deliberately in the opposite row order; the
        // key join must still line everything up.
        write_measurement(
            dir.path(),
            MAX_TEMP_CSV,
            "max_temp",
            &[("Papua", 1901, "Jan", "29.0"), ("Aceh", 1901, "Jan", "31.0")],
        );
        write_measurement(
            dir.path(),
            MIN_TEMP_CSV,
            "min_temp",
            &[("Papua", 1901, "Jan", "20.0"), ("Aceh", 1901, "Jan", "22.0")],
        );
        write_measurement(
            dir.path(),
            PRECIPITATION_CSV,
            "precipitation",
            &[("Papua", 1901, "Jan", "280.0"), ("Aceh", 1901, "Jan", "180.0")],
        );

        let records = load_regional(dir.path()).unwrap();
        assert_eq!(records.len(), 2);

        // Output keeps the mean-temp table's order.
        assert_eq!(records[0].province_name, "Aceh");
        assert_eq!(records[0].month, "01");
        assert_eq!(records[0].mean_temp, Some(26.0));
        assert_eq!(records[0].max_temp, Some(31.0));
        assert_eq!(records[0].min_temp, Some(22.0));
        assert_eq!(records[0].precipitation, Some(180.0));

        assert_eq!(records[1].province_name, "Papua");
        assert_eq!(records[1].precipitation, Some(280.0));
    }

    #[test]
    fn test_load_regional_shape_mismatch_fails() {
        let dir = TempDir::new().unwrap();
        write_aligned_regional(dir.path(), &[("Aceh", 1901, "Jan"), ("Papua", 1901, "Jan")]);
        // Drop one row from precipitation.
        write_measurement(
            dir.path(),
            PRECIPITATION_CSV,
            "precipitation",
            &[("Aceh", 1901, "Jan", "180.0")],
        );

        let err = load_regional(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::RegionalShapeMismatch {
                ref table,
                expected: 2,
                actual: 1,
            } if table == "precipitation"
        ));
    }

    #[test]
    fn test_load_regional_key_mismatch_fails() {
        let dir = TempDir::new().unwrap();
        write_aligned_regional(dir.path(), &[("Aceh", 1901, "Jan"), ("Papua", 1901, "Jan")]);
        // Same length but one key replaced: positional merge would silently
        // misassign this, the key join must refuse.
        write_measurement(
            dir.path(),
            MAX_TEMP_CSV,
            "max_temp",
            &[("Aceh", 1901, "Jan", "31.0"), ("Papua", 1901, "Feb", "29.0")],
        );

        let err = load_regional(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::RegionalKeyMismatch {
                ref table,
                ref province,
                year: 1901,
                ref month,
            } if table == "max_temp" && province == "Papua" && month == "Jan"
        ));
    }

    #[test]
    fn test_load_regional_missing_column_fails() {
        let dir = TempDir::new().unwrap();
        write_aligned_regional(dir.path(), &[("Aceh", 1901, "Jan")]);
        // Overwrite mean_temp with a wrong measurement header.
        write_measurement(
            dir.path(),
            MEAN_TEMP_CSV,
            "avg_temp",
            &[("Aceh", 1901, "Jan", "26.0")],
        );

        let err = load_regional(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingColumn { ref column, .. } if column == "mean_temp"
        ));
    }

    #[test]
    fn test_load_regional_empty_value_is_missing() {
        let dir = TempDir::new().unwrap();
        write_aligned_regional(dir.path(), &[("Aceh", 1901, "Jan")]);
        write_measurement(
            dir.path(),
            PRECIPITATION_CSV,
            "precipitation",
            &[("Aceh", 1901, "Jan", "")],
        );

        let records = load_regional(dir.path()).unwrap();
        assert_eq!(records[0].precipitation, None);
    }

    // ── parse_indicator_rows ──────────────────────────────────────────────────

    fn indicator_range(rows: &[[f64; 6]]) -> Range<Data> {
        let mut range = Range::new((0, 0), (rows.len() as u32, 5));
        for (col, name) in [
            "year",
            "electricity",
            "forest_area",
            "co2_emission",
            "internet",
            "population",
        ]
        .iter()
        .enumerate()
        {
            range.set_value((0, col as u32), Data::String(name.to_string()));
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((r as u32 + 1, c as u32), Data::Float(*value));
            }
        }
        range
    }

    #[test]
    fn test_parse_indicator_rows_basic() {
        let range = indicator_range(&[
            [2000.0, 86.3, 54.9, 1.2, 0.9, 2.11e8],
            [2001.0, 86.9, 54.6, 1.3, 2.0, 2.14e8],
        ]);
        let records = parse_indicator_rows(Path::new("additional.xlsx"), &range).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2000);
        assert_eq!(records[0].electricity, 86.3);
        assert_eq!(records[1].population, 2.14e8);
    }

    #[test]
    fn test_parse_indicator_rows_missing_column_fails() {
        let mut range = Range::new((0, 0), (1, 5));
        range.set_value((0, 0), Data::String("year".to_string()));
        // Remaining header cells left empty.

        let err = parse_indicator_rows(Path::new("additional.xlsx"), &range).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingColumn { ref column, .. } if column == "electricity"
        ));
    }

    #[test]
    fn test_parse_indicator_rows_bad_cell_fails() {
        let mut range = indicator_range(&[[2000.0, 86.3, 54.9, 1.2, 0.9, 2.11e8]]);
        range.set_value((1, 3), Data::String("n/a".to_string()));

        let err = parse_indicator_rows(Path::new("additional.xlsx"), &range).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidCell { ref column, ref value, .. }
                if column == "co2_emission" && value == "n/a"
        ));
    }

    #[test]
    fn test_parse_indicator_rows_skips_blank_rows() {
        let mut range = Range::new((0, 0), (2, 5));
        for (col, name) in [
            "year",
            "electricity",
            "forest_area",
            "co2_emission",
            "internet",
            "population",
        ]
        .iter()
        .enumerate()
        {
            range.set_value((0, col as u32), Data::String(name.to_string()));
        }
        for c in 0..6u32 {
            range.set_value((1, c), Data::Empty);
        }
        for (c, v) in [2005.0, 88.0, 54.0, 1.6, 3.6, 2.26e8].iter().enumerate() {
            range.set_value((2, c as u32), Data::Float(*v));
        }

        let records = parse_indicator_rows(Path::new("additional.xlsx"), &range).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2005);
    }

    #[test]
    fn test_load_indicators_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_indicators(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::Spreadsheet { .. }));
    }
}
