//! Axis limits derived from the flat `bounds` list

use crate::constants::plot::MAX_BOUNDS;
use crate::error::{ReportError, Result};

/// Optional `(low, high)` limits for both chart axes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBounds {
    /// X axis range, `None` to auto-fit
    pub x: Option<(f64, f64)>,

    /// Y axis range, `None` to auto-fit
    pub y: Option<(f64, f64)>,
}

impl AxisBounds {
    /// Map the accumulated bound values onto axis ranges.
    ///
    /// One or two values only ever bound the y-axis; existing configuration
    /// files depend on that.
    pub fn resolve(values: &[f64]) -> Result<Self> {
        match *values {
            [] => Ok(Self::default()),
            [high] => Ok(Self {
                x: None,
                y: Some((0.0, high)),
            }),
            [low, high] => Ok(Self {
                x: None,
                y: Some((low, high)),
            }),
            [x_low, x_high, y_low, y_high] => Ok(Self {
                x: Some((x_low, x_high)),
                y: Some((y_low, y_high)),
            }),
            _ => Err(ReportError::TooManyBounds {
                count: values.len(),
            }),
        }
    }
}

/// Whether another bound value may still be appended
pub fn accepts_more(values: &[f64]) -> bool {
    values.len() < MAX_BOUNDS
}
