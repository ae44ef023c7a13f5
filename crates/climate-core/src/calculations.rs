//! Statistical primitives behind the aggregation engine and the
//! correlation heatmap.

use serde::Serialize;

use crate::comparisons::NumericColumn;
use crate::models::AnnualIndicatorRow;

// ── MeanAccumulator ───────────────────────────────────────────────────────────

/// Running arithmetic mean that excludes missing observations from both the
/// sum and the count (never substituting zero).
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: u32,
}

impl MeanAccumulator {
    /// Fold one observation into the accumulator; `None` is ignored.
    pub fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    /// Number of non-missing observations folded in so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Arithmetic mean of the observed values; `None` when nothing was
    /// observed.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }

    /// Mean as an `f64`, with `NaN` standing in for an all-missing group.
    pub fn mean_or_nan(&self) -> f64 {
        self.mean().unwrap_or(f64::NAN)
    }
}

// ── Pearson correlation ───────────────────────────────────────────────────────

/// Sample Pearson correlation coefficient over paired observations.
///
/// Pairs with a non-finite member are skipped (complete-case, matching how
/// a data-frame `corr()` treats missing cells). Returns `None` when fewer
/// than two complete pairs remain or either series has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

// ── CorrelationMatrix ─────────────────────────────────────────────────────────

/// Pairwise Pearson correlations across a set of named columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    /// Column identifiers, in matrix order.
    pub columns: Vec<&'static str>,
    /// `values[i][j]` is the correlation between columns `i` and `j`;
    /// `NaN` where undefined.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        Some(self.values[i][j])
    }
}

/// Pairwise Pearson correlation across all ten numeric columns of the
/// annual indicator join, feeding the correlation heatmap.
pub fn correlation_matrix(rows: &[AnnualIndicatorRow]) -> CorrelationMatrix {
    let columns = NumericColumn::ALL;
    let series: Vec<Vec<f64>> = columns
        .iter()
        .map(|col| rows.iter().map(|row| col.extract(row)).collect())
        .collect();

    let mut values = vec![vec![f64::NAN; columns.len()]; columns.len()];
    for i in 0..columns.len() {
        values[i][i] = 1.0;
        for j in (i + 1)..columns.len() {
            let r = pearson(&series[i], &series[j]).unwrap_or(f64::NAN);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.as_str()).collect(),
        values,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
