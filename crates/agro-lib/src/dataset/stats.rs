//! Descriptive statistics and Pearson correlation over dataset columns

use super::Dataset;
use crate::models::Column;
use serde::Serialize;

/// Summary of one numeric column
///
/// `std` uses the sample (n - 1) denominator and quantiles interpolate
/// linearly between order statistics. Statistics that are undefined for
/// the column's size are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: Column,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarize every column of the dataset, in file order
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    Column::ALL
        .iter()
        .map(|&column| summarize(column, dataset.column(column)))
        .collect()
}

fn summarize(column: Column, mut values: Vec<f64>) -> ColumnSummary {
    values.sort_by(|a, b| a.total_cmp(b));
    let count = values.len();
    let avg = mean(&values);

    ColumnSummary {
        column,
        count,
        mean: avg,
        std: sample_std(&values, avg),
        min: values.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.50),
        q75: quantile(&values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile of already sorted values with linear interpolation
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Square matrix of pairwise Pearson correlations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Smallest and largest finite coefficient
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Pearson correlation between all numeric columns
///
/// Pairs involving a constant column are NaN; the diagonal of a
/// non-constant column is exactly 1.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let columns: Vec<Column> = Column::ALL.to_vec();
    let data: Vec<Vec<f64>> = columns.iter().map(|c| dataset.column(*c)).collect();

    let values = (0..columns.len())
        .map(|i| {
            (0..columns.len())
                .map(|j| {
                    if i == j {
                        let v = pearson(&data[i], &data[i]);
                        if v.is_nan() {
                            v
                        } else {
                            1.0
                        }
                    } else {
                        pearson(&data[i], &data[j])
                    }
                })
                .collect()
        })
        .collect();

    CorrelationMatrix { columns, values }
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 || x.len() != y.len() {
        return f64::NAN;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    fn cell(corr: &CorrelationMatrix, row: Column, col: Column) -> Option<f64> {
        let i = corr.columns.iter().position(|c| *c == row)?;
        let j = corr.columns.iter().position(|c| *c == col)?;
        Some(corr.values[i][j])
    }

    fn dataset(rows: &[[f64; 5]]) -> Dataset {
        Dataset::new(
            rows.iter()
                .map(|r| Sample {
                    humidity: r[0],
                    ph: r[1],
                    irrigation: r[2],
                    fertilizer: r[3],
                    crop_yield: r[4],
                })
                .collect(),
        )
    }

    #[test]
    fn test_describe_matches_reference_values() {
        let ds = dataset(&[
            [1.0, 6.0, 0.0, 10.0, 5.0],
            [2.0, 6.0, 1.0, 20.0, 4.0],
            [3.0, 6.0, 2.0, 30.0, 3.0],
            [4.0, 6.0, 3.0, 40.0, 2.0],
        ]);
        let summary = describe(&ds);
        assert_eq!(summary.len(), 5);

        let humidity = &summary[0];
        assert_eq!(humidity.column, Column::Humidity);
        assert_eq!(humidity.count, 4);
        assert!((humidity.mean - 2.5).abs() < 1e-12);
        // sqrt(5/3)
        assert!((humidity.std - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(humidity.min, 1.0);
        assert!((humidity.q25 - 1.75).abs() < 1e-12);
        assert!((humidity.median - 2.5).abs() < 1e-12);
        assert!((humidity.q75 - 3.25).abs() < 1e-12);
        assert_eq!(humidity.max, 4.0);

        let ph = &summary[1];
        assert_eq!(ph.std, 0.0);
    }

    #[test]
    fn test_describe_small_inputs() {
        let single = describe(&dataset(&[[1.0, 2.0, 3.0, 4.0, 5.0]]));
        assert_eq!(single[0].count, 1);
        assert_eq!(single[0].median, 1.0);
        assert!(single[0].std.is_nan());

        let empty = describe(&Dataset::default());
        assert_eq!(empty[0].count, 0);
        assert!(empty[0].mean.is_nan());
        assert!(empty[0].max.is_nan());
    }

    #[test]
    fn test_correlation_signs_and_diagonal() {
        let ds = dataset(&[
            [1.0, 6.0, 0.0, 10.0, 5.0],
            [2.0, 6.0, 1.0, 25.0, 4.0],
            [3.0, 6.0, 2.0, 20.0, 3.0],
            [4.0, 6.0, 3.0, 40.0, 2.0],
        ]);
        let corr = correlation_matrix(&ds);

        assert_eq!(cell(&corr, Column::Humidity, Column::Humidity), Some(1.0));
        let hi = cell(&corr, Column::Humidity, Column::Irrigation).unwrap();
        assert!((hi - 1.0).abs() < 1e-12);
        let hy = cell(&corr, Column::Humidity, Column::Yield).unwrap();
        assert!((hy + 1.0).abs() < 1e-12);

        // Constant pH column has no defined correlation
        assert!(cell(&corr, Column::Ph, Column::Yield).unwrap().is_nan());
        assert!(cell(&corr, Column::Ph, Column::Ph).unwrap().is_nan());

        let hf = cell(&corr, Column::Humidity, Column::Fertilizer).unwrap();
        assert_eq!(Some(hf), cell(&corr, Column::Fertilizer, Column::Humidity));

        let (lo, hi) = corr.range().unwrap();
        assert!((lo + 1.0).abs() < 1e-12);
        assert_eq!(hi, 1.0);
    }
}
