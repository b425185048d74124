//! Trend fitting for scatter plots
//!
//! Least-squares linear and quadratic fits over `[x, y]` points, together with
//! the equation labels drawn next to the fitted curve.

use crate::constants::numeric::{EPSILON, SINGULARITY_TOLERANCE};
use crate::error::{ReportError, Result};
use std::fmt;
use std::str::FromStr;

/// Kind of curve fitted through a scatter plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Linear,
    Quadratic,
}

impl CurveKind {
    /// Both kinds, in the order the point plots are rendered
    pub const ALL: [CurveKind; 2] = [CurveKind::Quadratic, CurveKind::Linear];

    /// File name suffix letter (`_q` / `_l`)
    pub fn suffix(self) -> &'static str {
        match self {
            CurveKind::Linear => "l",
            CurveKind::Quadratic => "q",
        }
    }

    /// Points needed to determine the curve
    pub fn min_points(self) -> usize {
        match self {
            CurveKind::Linear => 2,
            CurveKind::Quadratic => 3,
        }
    }
}

/// Curve selectors for library callers (`linear`/`l`, `quadratic`/`q`).
///
/// The built-in plot tables name their kinds directly and never go through
/// here, so `InvalidCurveType` only reaches callers that parse a selector.
impl FromStr for CurveKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "l" => Ok(CurveKind::Linear),
            "quadratic" | "q" => Ok(CurveKind::Quadratic),
            _ => Err(ReportError::InvalidCurveType {
                kind: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Linear => write!(f, "linear"),
            CurveKind::Quadratic => write!(f, "quadratic"),
        }
    }
}

/// A fitted curve and its on-chart label
#[derive(Debug, Clone, PartialEq)]
pub enum FitResult {
    Linear {
        slope: f64,
        intercept: f64,
        label: String,
    },
    Quadratic {
        a: f64,
        b: f64,
        c: f64,
        label: String,
    },
}

impl FitResult {
    pub fn label(&self) -> &str {
        match self {
            FitResult::Linear { label, .. } | FitResult::Quadratic { label, .. } => label,
        }
    }

    /// Evaluate the curve at `x`
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            FitResult::Linear {
                slope, intercept, ..
            } => slope * x + intercept,
            FitResult::Quadratic { a, b, c, .. } => a * x * x + b * x + c,
        }
    }
}

/// Result of fitting one x/y column pair
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFit {
    /// The requested curve
    pub curve: FitResult,
    /// Linear slope, computed for every kind
    pub slope: f64,
    /// Linear intercept, computed for every kind
    pub intercept: f64,
}

impl TrendFit {
    /// Auxiliary linear annotation, shown when the curve itself is not linear
    pub fn annotation(&self) -> Option<String> {
        match self.curve {
            FitResult::Linear { .. } => None,
            FitResult::Quadratic { .. } => Some(format!(
                "slope = {}, intercept = {}",
                format_coefficient(self.slope),
                format_coefficient(self.intercept)
            )),
        }
    }
}

/// Fit `kind` through `points`, always computing the linear slope/intercept too
pub fn fit_trend(points: &[[f64; 2]], kind: CurveKind) -> Result<TrendFit> {
    let insufficient = || ReportError::InsufficientData {
        operation: format!("{} fit", kind),
        required: kind.min_points(),
        actual: points.len(),
    };

    let (slope, intercept) = linear_regression(points).ok_or_else(insufficient)?;

    let curve = match kind {
        CurveKind::Linear => FitResult::Linear {
            slope,
            intercept,
            label: linear_label(slope, intercept),
        },
        CurveKind::Quadratic => {
            let (a, b, c) = quadratic_regression(points).ok_or_else(insufficient)?;
            FitResult::Quadratic {
                a,
                b,
                c,
                label: quadratic_label(a, b, c),
            }
        }
    };

    Ok(TrendFit {
        curve,
        slope,
        intercept,
    })
}

/// Ordinary least squares line: `(slope, intercept)`
pub fn linear_regression(points: &[[f64; 2]]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p[0]).sum();
    let sum_y: f64 = points.iter().map(|p| p[1]).sum();
    let sum_xy: f64 = points.iter().map(|p| p[0] * p[1]).sum();
    let sum_x2: f64 = points.iter().map(|p| p[0] * p[0]).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator.abs() < SINGULARITY_TOLERANCE {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    Some((slope, intercept))
}

/// Least-squares `y = a·x² + b·x + c`, fitted on standardized x for conditioning
pub fn quadratic_regression(points: &[[f64; 2]]) -> Option<(f64, f64, f64)> {
    if points.len() < 3 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let scale = (points.iter().map(|p| (p[0] - mean_x).powi(2)).sum::<f64>() / n).sqrt();
    if scale == 0.0 {
        return None;
    }

    let scaled: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [(p[0] - mean_x) / scale, p[1]])
        .collect();
    let coeffs = polynomial_regression(&scaled, 2)?;
    let (c0, c1, c2) = (coeffs[0], coeffs[1], coeffs[2]);

    // Expand c2·u² + c1·u + c0 with u = (x - m) / s
    let a = c2 / (scale * scale);
    let b = c1 / scale - 2.0 * c2 * mean_x / (scale * scale);
    let c = c2 * mean_x * mean_x / (scale * scale) - c1 * mean_x / scale + c0;
    Some((a, b, c))
}

/// Polynomial least squares via the normal equations, coefficients in
/// ascending power order
pub fn polynomial_regression(points: &[[f64; 2]], order: usize) -> Option<Vec<f64>> {
    if points.len() < order + 1 {
        return None;
    }

    let size = order + 1;

    // Build design matrix and response vector
    let mut matrix = vec![vec![0.0; size]; size];
    let mut vector = vec![0.0; size];

    for i in 0..size {
        for j in 0..size {
            matrix[i][j] = points.iter().map(|p| p[0].powi((i + j) as i32)).sum();
        }
        vector[i] = points.iter().map(|p| p[1] * p[0].powi(i as i32)).sum();
    }

    // Gaussian elimination
    for i in 0..size {
        let mut max_row = i;
        for k in (i + 1)..size {
            if matrix[k][i].abs() > matrix[max_row][i].abs() {
                max_row = k;
            }
        }
        matrix.swap(i, max_row);
        vector.swap(i, max_row);

        if matrix[i][i].abs() < SINGULARITY_TOLERANCE {
            return None;
        }

        for k in (i + 1)..size {
            let factor = matrix[k][i] / matrix[i][i];
            for j in i..size {
                matrix[k][j] -= factor * matrix[i][j];
            }
            vector[k] -= factor * vector[i];
        }
    }

    // Back substitution
    let mut coeffs = vec![0.0; size];
    for i in (0..size).rev() {
        coeffs[i] = vector[i];
        for j in (i + 1)..size {
            coeffs[i] -= matrix[i][j] * coeffs[j];
        }
        coeffs[i] /= matrix[i][i];
    }

    Some(coeffs)
}

/// Short human-readable coefficient: fixed point for ordinary magnitudes,
/// scientific otherwise
pub fn format_coefficient(value: f64) -> String {
    let abs = value.abs();
    if abs != 0.0 && !(1e-3..1e5).contains(&abs) {
        return format!("{:.3e}", value);
    }
    let fixed = format!("{:.4}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        t => t.to_string(),
    }
}

fn equation(terms: &[(f64, &str)]) -> String {
    let mut out = String::from("y = ");
    let mut first = true;
    for &(coef, var) in terms {
        let magnitude = format_coefficient(coef.abs());
        if first {
            if coef < 0.0 {
                out.push('-');
            }
            first = false;
        } else {
            out.push_str(if coef < 0.0 { " - " } else { " + " });
        }
        out.push_str(&magnitude);
        out.push_str(var);
    }
    if first {
        out.push('0');
    }
    out
}

pub fn linear_label(slope: f64, intercept: f64) -> String {
    equation(&[(slope, "x"), (intercept, "")])
}

/// Quadratic equation label; negligible terms are left out
pub fn quadratic_label(a: f64, b: f64, c: f64) -> String {
    let terms: Vec<(f64, &str)> = [(a, "x²"), (b, "x"), (c, "")]
        .into_iter()
        .filter(|(coef, _)| coef.abs() >= EPSILON)
        .collect();
    equation(&terms)
}
