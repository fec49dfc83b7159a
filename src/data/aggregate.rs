//! The derived views behind each dashboard chart.
//!
//! Every function takes the filtered records and never fails: an empty
//! slice yields the empty (or all-zero / all-NaN) form of its view.
//! Missing numeric values (`NaN`) are skipped; each view counts the rows
//! it left out in its `excluded` field.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{MonthKey, NumericField, Record};

// ---------------------------------------------------------------------------
// Monthly sales series (line chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MonthlySales {
    /// Oldest month first.
    pub months: Vec<MonthlyTotal>,
    /// Rows whose `total` was missing.
    pub excluded: usize,
}

impl MonthlySales {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Sum of `total` per calendar month.
pub fn monthly_sales(records: &[&Record]) -> MonthlySales {
    let mut by_month: BTreeMap<MonthKey, f64> = BTreeMap::new();
    let mut excluded = 0;
    for record in records {
        let sum = by_month.entry(record.month()).or_insert(0.0);
        if record.total.is_nan() {
            excluded += 1;
        } else {
            *sum += record.total;
        }
    }
    warn_excluded("monthly sales", excluded);

    MonthlySales {
        months: by_month
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect(),
        excluded,
    }
}

fn warn_excluded(view: &str, excluded: usize) {
    if excluded > 0 {
        log::warn!("{view} view: skipped {excluded} rows with missing values");
    }
}

// ---------------------------------------------------------------------------
// Correlation matrix (heatmap)
// ---------------------------------------------------------------------------

/// Square, symmetric Pearson correlation matrix over [`NumericField::ALL`].
///
/// A cell is `NaN` when fewer than two rows have both values present or
/// when either side is constant over those rows. This includes the
/// diagonal, so `get(f, f)` is 1.0 only for a field that actually varies.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    fields: Vec<NumericField>,
    values: Vec<Vec<f64>>,
    /// Rows with at least one missing numeric value. They still count for
    /// the pairs where both values are present.
    excluded: usize,
}

impl CorrelationMatrix {
    pub fn fields(&self) -> &[NumericField] {
        &self.fields
    }

    pub fn get(&self, a: NumericField, b: NumericField) -> f64 {
        let i = self.fields.iter().position(|&f| f == a);
        let j = self.fields.iter().position(|&f| f == b);
        match (i, j) {
            (Some(i), Some(j)) => self.values[i][j],
            _ => f64::NAN,
        }
    }

    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// True when no cell is defined, e.g. for an empty selection.
    pub fn is_undefined(&self) -> bool {
        self.values.iter().flatten().all(|v| v.is_nan())
    }
}

pub fn correlation_matrix(records: &[&Record]) -> CorrelationMatrix {
    let fields = NumericField::ALL.to_vec();
    let columns: Vec<Vec<f64>> = fields
        .iter()
        .map(|&field| records.iter().map(|r| field.value(r)).collect())
        .collect();

    let n = fields.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let mut r = pearson(&columns[i], &columns[j]);
            if i == j && !r.is_nan() {
                r = 1.0;
            }
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let excluded = records
        .iter()
        .filter(|r| fields.iter().any(|f| f.value(r).is_nan()))
        .count();
    warn_excluded("correlation", excluded);

    CorrelationMatrix {
        fields,
        values,
        excluded,
    }
}

/// Pearson's r over the rows where both values are present.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pairs.len() < 2
        || is_constant(pairs.iter().map(|p| p.0))
        || is_constant(pairs.iter().map(|p| p.1))
    {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Gross-income composition (stacked bars)
// ---------------------------------------------------------------------------

/// Gross income summed per branch (rows) and product line (columns).
///
/// Combinations with no matching rows hold an explicit `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionTable {
    pub branches: Vec<String>,
    pub product_lines: Vec<String>,
    /// `cells[b][p]` is the sum for `branches[b]` and `product_lines[p]`.
    pub cells: Vec<Vec<f64>>,
    /// Rows whose gross income was missing.
    pub excluded: usize,
}

impl CompositionTable {
    pub fn cell(&self, branch: &str, product_line: &str) -> Option<f64> {
        let b = self.branches.iter().position(|x| x == branch)?;
        let p = self.product_lines.iter().position(|x| x == product_line)?;
        Some(self.cells[b][p])
    }

    /// Height of each stacked bar.
    pub fn branch_totals(&self) -> Vec<(String, f64)> {
        self.branches
            .iter()
            .zip(&self.cells)
            .map(|(branch, row)| (branch.clone(), row.iter().sum()))
            .collect()
    }

    pub fn grand_total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

pub fn gross_income_composition(records: &[&Record]) -> CompositionTable {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    let mut branches: Vec<String> = Vec::new();
    let mut product_lines: Vec<String> = Vec::new();
    let mut excluded = 0;

    for record in records {
        let sum = sums
            .entry((record.branch.as_str(), record.product_line.as_str()))
            .or_insert(0.0);
        if record.gross_income.is_nan() {
            excluded += 1;
        } else {
            *sum += record.gross_income;
        }
        branches.push(record.branch.clone());
        product_lines.push(record.product_line.clone());
    }
    branches.sort();
    branches.dedup();
    product_lines.sort();
    product_lines.dedup();
    warn_excluded("gross income composition", excluded);

    let cells = branches
        .iter()
        .map(|branch| {
            product_lines
                .iter()
                .map(|line| {
                    sums.get(&(branch.as_str(), line.as_str()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    CompositionTable {
        branches,
        product_lines,
        cells,
        excluded,
    }
}

// ---------------------------------------------------------------------------
// Spend distribution per customer type (boxplot)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendGroup {
    pub customer_type: String,
    /// Raw `total` values in source order.
    pub totals: Vec<f64>,
}

impl SpendGroup {
    pub fn summary(&self) -> Option<BoxSummary> {
        BoxSummary::from_values(&self.totals)
    }
}

/// Groups in order of first appearance among the filtered rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SpendDistribution {
    pub groups: Vec<SpendGroup>,
    /// Rows whose `total` was missing.
    pub excluded: usize,
}

impl SpendDistribution {
    pub fn group(&self, customer_type: &str) -> Option<&SpendGroup> {
        self.groups.iter().find(|g| g.customer_type == customer_type)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn spend_by_customer_type(records: &[&Record]) -> SpendDistribution {
    let mut groups: Vec<SpendGroup> = Vec::new();
    let mut excluded = 0;
    for record in records {
        let idx = match groups
            .iter()
            .position(|g| g.customer_type == record.customer_type)
        {
            Some(idx) => idx,
            None => {
                groups.push(SpendGroup {
                    customer_type: record.customer_type.clone(),
                    totals: Vec::new(),
                });
                groups.len() - 1
            }
        };
        if record.total.is_nan() {
            excluded += 1;
        } else {
            groups[idx].totals.push(record.total);
        }
    }
    warn_excluded("spend distribution", excluded);

    SpendDistribution { groups, excluded }
}

/// Five-number summary with Tukey whiskers (1.5 × IQR).
///
/// Quartiles use linear interpolation between closest ranks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let lower_whisker = sorted.iter().copied().find(|&v| v >= lo_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|&v| v <= hi_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lo_fence || v > hi_fence)
            .collect();

        Some(BoxSummary {
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// 3D projection (scatter)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub invoice_id: String,
    pub product_line: String,
    pub gross_income: f64,
    pub quantity: f64,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScatterProjection {
    pub points: Vec<ScatterPoint>,
    /// Rows left out because gross income, quantity, rating or product line was missing.
    pub excluded: usize,
}

pub fn scatter_projection(records: &[&Record]) -> ScatterProjection {
    let mut projection = ScatterProjection::default();
    for record in records {
        let complete = !record.gross_income.is_nan()
            && !record.quantity.is_nan()
            && !record.rating.is_nan()
            && !record.product_line.is_empty();
        if !complete {
            projection.excluded += 1;
            continue;
        }
        projection.points.push(ScatterPoint {
            invoice_id: record.invoice_id.clone(),
            product_line: record.product_line.clone(),
            gross_income: record.gross_income,
            quantity: record.quantity,
            rating: record.rating,
        });
    }
    warn_excluded("3D", projection.excluded);
    projection
}
