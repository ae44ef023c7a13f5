mod bootstrap;

use anyhow::Result;
use climate_core::calculations::pearson;
use climate_core::charts::{chart_catalog, scatter_spec};
use climate_core::comparisons::{comparison_from_label, scatter_points};
use climate_core::formatting::{format_measure, render_table};
use climate_core::month::month_name;
use climate_core::settings::Settings;
use climate_data::aggregator::ClimateAggregator;
use climate_data::analysis::{build_report, ClimateReport};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("climate-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data path: {}, Section: {}, Output: {}",
        settings.data_path.display(),
        settings.section,
        settings.output
    );

    let data_root = bootstrap::resolve_data_root(&settings.data_path)?;
    let report = build_report(&data_root)?;

    if let Some(label) = settings.comparison.as_deref() {
        print_comparison(label, &report)?;
        return Ok(());
    }

    match settings.output.as_str() {
        "json" => print_json(&report)?,
        _ => print_tables(&settings.section, &report),
    }

    Ok(())
}

// ── JSON output ───────────────────────────────────────────────────────────────

/// Emit the whole report plus the chart catalog as one JSON document for
/// the display layer.
fn print_json(report: &ClimateReport) -> Result<()> {
    let payload = serde_json::json!({
        "charts": chart_catalog(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

// ── Table output ──────────────────────────────────────────────────────────────

fn print_tables(section: &str, report: &ClimateReport) {
    if matches!(section, "all" | "climatology") {
        print_climatology(report);
    }
    if matches!(section, "all" | "regions") {
        print_regions(report);
    }
    if matches!(section, "all" | "decades") {
        print_decades(report);
    }
    if matches!(section, "all" | "indicators") {
        print_indicators(report);
    }
}

fn print_climatology(report: &ClimateReport) {
    println!("Temperature and Rainfall (1901-2021)");
    let rows: Vec<Vec<String>> = report
        .climatology
        .iter()
        .map(|r| {
            vec![
                month_name(&r.month).unwrap_or(&r.month).to_string(),
                format_measure(r.mean_temp),
                format_measure(r.max_temp),
                format_measure(r.min_temp),
                format_measure(r.precipitation),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(
            &["month", "mean_temp", "max_temp", "min_temp", "precipitation"],
            &rows,
        )
    );
}

fn print_regions(report: &ClimateReport) {
    println!("Average Temperature for Each Region in Indonesia (1901-2021)");
    let by_temp = ClimateAggregator::ranked_by_temperature(&report.regional_profile);
    let rows: Vec<Vec<String>> = by_temp
        .iter()
        .map(|r| {
            vec![
                r.province_name.clone(),
                format_measure(r.mean_temp),
            ]
        })
        .collect();
    println!("{}", render_table(&["province", "mean_temp"], &rows));

    println!("Average Precipitation for Each Region in Indonesia (1901-2021)");
    let by_precip = ClimateAggregator::ranked_by_precipitation(&report.regional_profile);
    let rows: Vec<Vec<String>> = by_precip
        .iter()
        .map(|r| {
            vec![
                r.province_name.clone(),
                format_measure(r.precipitation),
            ]
        })
        .collect();
    println!("{}", render_table(&["province", "precipitation"], &rows));
}

fn print_decades(report: &ClimateReport) {
    println!("Rainfall Comparison Between 1901-1910 and 2012-2021");
    let rows: Vec<Vec<String>> = report
        .decade_months
        .iter()
        .map(|r| {
            vec![
                r.window.clone(),
                month_name(&r.month).unwrap_or(&r.month).to_string(),
                format_measure(r.precipitation),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(&["window", "month", "precipitation"], &rows)
    );

    println!("Seasonal Precipitation Gap by Decade");
    let rows: Vec<Vec<String>> = report
        .seasonal_gaps
        .iter()
        .map(|r| {
            vec![
                r.window.clone(),
                format_measure(r.max_precipitation),
                format_measure(r.min_precipitation),
                format_measure(r.gap),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(&["window", "prp_max", "prp_min", "prp_gap"], &rows)
    );
}

fn print_indicators(report: &ClimateReport) {
    println!("Average Temperature from 1901-2021");
    let rows: Vec<Vec<String>> = report
        .annual_means
        .iter()
        .map(|r| vec![r.year.to_string(), format_measure(r.mean_temp)])
        .collect();
    println!("{}", render_table(&["year", "mean_temp"], &rows));

    println!("Correlation With Other Factors");
    let mut headers: Vec<&str> = vec![""];
    headers.extend(report.correlation.columns.iter());
    let rows: Vec<Vec<String>> = report
        .correlation
        .columns
        .iter()
        .zip(&report.correlation.values)
        .map(|(name, row)| {
            let mut cells = vec![name.to_string()];
            cells.extend(row.iter().map(|v| format_measure(*v)));
            cells
        })
        .collect();
    println!("{}", render_table(&headers, &rows));
}

// ── Comparison output ─────────────────────────────────────────────────────────

/// Print the selected scatter pair's observations and their correlation,
/// the data behind one scatter-with-regression figure.
fn print_comparison(label: &str, report: &ClimateReport) -> Result<()> {
    let pair = comparison_from_label(label)?;
    let spec = scatter_spec(pair);
    let points = scatter_points(pair, &report.annual_indicators);

    println!("{}", spec.title);
    let rows: Vec<Vec<String>> = points
        .iter()
        .map(|(x, y)| vec![format_measure(*x), format_measure(*y)])
        .collect();
    println!(
        "{}",
        render_table(&[pair.x.as_str(), pair.y.as_str()], &rows)
    );

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    match pearson(&xs, &ys) {
        Some(r) => println!("pearson r = {:.4}", r),
        None => println!("pearson r undefined for this selection"),
    }

    Ok(())
}
