//! Per-feature standardization (z-score).

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{IrisError, Result};

/// Fitted mean and scale for each feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    /// Population standard deviation; zero-variance columns keep scale 1.
    pub scale: Array1<f64>,
}

impl StandardScaler {
    /// Learn column means and standard deviations from `records`.
    pub fn fit(records: &Array2<f64>) -> Result<Self> {
        let mean = records
            .mean_axis(Axis(0))
            .ok_or_else(|| IrisError::Training("cannot fit scaler on zero rows".to_string()))?;
        let scale = records
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s.is_finite() && s > f64::EPSILON { s } else { 1.0 });

        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(records.ncols())?;
        Ok((records - &self.mean) / &self.scale)
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok((&row - &self.mean) / &self.scale)
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.n_features() {
            return Err(IrisError::Validation(format!(
                "expected {} features, got {}",
                self.n_features(),
                width
            )));
        }
        Ok(())
    }
}
