//! Two-stage classification pipeline: standardize, then vote.
//!
//! The scaler is fit on the training partition only and the same fitted
//! instance is applied at inference time.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::dataset::LabeledData;
use super::forest::{argmax, ForestParams, RandomForest};
use super::scaler::StandardScaler;
use crate::error::{IrisError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub scaler: StandardScaler,
    pub forest: RandomForest,
}

impl Pipeline {
    pub fn fit(
        train: &LabeledData,
        n_classes: usize,
        params: &ForestParams,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let scaler = StandardScaler::fit(&train.records)?;
        let scaled = scaler.transform(&train.records)?;
        let forest = RandomForest::fit(&scaled, &train.targets, n_classes, params, rng)?;
        Ok(Self { scaler, forest })
    }

    pub fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    pub fn n_classes(&self) -> usize {
        self.forest.n_classes()
    }

    pub fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        let scaled = self.scaler.transform(records)?;
        self.forest.predict_proba(&scaled)
    }

    /// Class probabilities for a single feature vector.
    pub fn predict_proba_row(&self, features: &[f64]) -> Result<Array1<f64>> {
        let scaled = self.scaler.transform_row(ArrayView1::from(features))?;
        let proba = self.forest.predict_proba(&scaled.insert_axis(Axis(0)))?;
        Ok(proba.row(0).to_owned())
    }

    /// Predicted class index and the probability assigned to it.
    pub fn predict_row(&self, features: &[f64]) -> Result<(usize, f64)> {
        let proba = self.predict_proba_row(features)?;
        if proba.is_empty() {
            return Err(IrisError::Internal("pipeline has no classes".to_string()));
        }
        Ok(argmax(proba.iter().copied()))
    }

    pub fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>> {
        let scaled = self.scaler.transform(records)?;
        self.forest.predict(&scaled)
    }

    /// Fraction of rows whose predicted class matches the target.
    pub fn score(&self, data: &LabeledData) -> Result<f64> {
        if data.is_empty() {
            return Err(IrisError::Validation(
                "cannot score on an empty partition".to_string(),
            ));
        }
        let predicted = self.predict(&data.records)?;
        let correct = predicted
            .iter()
            .zip(data.targets.iter())
            .filter(|(p, t)| p == t)
            .count();
        Ok(correct as f64 / data.len() as f64)
    }
}
