//! Random forest classifier built from `linfa-trees` decision trees.
//!
//! Each member tree is fit on a bootstrap sample of the rows and a random
//! subset of the feature columns. Class probabilities are the share of member
//! votes per class.

use linfa::prelude::*;
use linfa::{Dataset, DatasetBase};
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis, Ix1};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{IrisError, Result};

/// Number of trees grown by default.
pub const DEFAULT_N_ESTIMATORS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// Feature columns per tree; `None` means `ceil(sqrt(n_features))`.
    #[serde(default)]
    pub max_features: Option<usize>,
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Sample rows with replacement for each tree.
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_features: None,
            max_depth: None,
            bootstrap: true,
        }
    }
}

impl ForestParams {
    fn features_per_tree(&self, n_features: usize) -> usize {
        let default = (n_features as f64).sqrt().ceil() as usize;
        self.max_features.unwrap_or(default).clamp(1, n_features)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestMember {
    /// Columns of the full feature vector this tree was fit on, ascending.
    features: Vec<usize>,
    tree: DecisionTree<f64, usize>,
}

/// Random-subspace bagging: the feature subset is drawn once per tree, not per
/// split, and probabilities are hard-vote shares rather than averaged leaf
/// distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    n_classes: usize,
    n_features: usize,
    members: Vec<ForestMember>,
}

fn training_error<E: std::fmt::Display>(err: E) -> IrisError {
    IrisError::Training(err.to_string())
}

fn fit_tree(
    dataset: &Dataset<f64, usize, Ix1>,
    max_depth: Option<usize>,
) -> Result<DecisionTree<f64, usize>> {
    DecisionTree::params()
        .split_quality(SplitQuality::Gini)
        .max_depth(max_depth)
        .fit(dataset)
        .map_err(training_error)
}

impl RandomForest {
    /// Grow `params.n_estimators` trees on `records` / `targets`.
    pub fn fit(
        records: &Array2<f64>,
        targets: &Array1<usize>,
        n_classes: usize,
        params: &ForestParams,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let n_rows = records.nrows();
        let n_features = records.ncols();

        if params.n_estimators == 0 {
            return Err(IrisError::Validation(
                "n_estimators must be > 0".to_string(),
            ));
        }
        if n_rows == 0 || n_features == 0 {
            return Err(IrisError::Training(
                "cannot fit a forest on an empty dataset".to_string(),
            ));
        }
        if n_rows != targets.len() {
            return Err(IrisError::Training(format!(
                "records have {} rows but targets have {} entries",
                n_rows,
                targets.len()
            )));
        }
        if let Some(bad) = targets.iter().find(|&&t| t >= n_classes) {
            return Err(IrisError::Training(format!(
                "target class {} out of range for {} classes",
                bad, n_classes
            )));
        }

        let per_tree = params.features_per_tree(n_features);
        let mut members = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let rows: Vec<usize> = if params.bootstrap {
                (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect()
            } else {
                (0..n_rows).collect()
            };
            let mut features = rand::seq::index::sample(rng, n_features, per_tree).into_vec();
            features.sort_unstable();

            let x = records.select(Axis(0), &rows).select(Axis(1), &features);
            let y = targets.select(Axis(0), &rows);
            let tree = fit_tree(&DatasetBase::new(x, y), params.max_depth)?;

            members.push(ForestMember { features, tree });
        }

        Ok(Self {
            n_classes,
            n_features,
            members,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_estimators(&self) -> usize {
        self.members.len()
    }

    /// Shape: [n_rows][n_classes]; every row sums to 1.
    pub fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        if records.ncols() != self.n_features {
            return Err(IrisError::Validation(format!(
                "expected {} features, got {}",
                self.n_features,
                records.ncols()
            )));
        }
        if self.members.is_empty() {
            return Err(IrisError::Internal("forest has no trees".to_string()));
        }

        let mut votes = Array2::<f64>::zeros((records.nrows(), self.n_classes));
        for member in &self.members {
            let x = records.select(Axis(1), &member.features);
            let predicted: Array1<usize> = member.tree.predict(&x);
            for (row, &class) in predicted.iter().enumerate() {
                if class < self.n_classes {
                    votes[[row, class]] += 1.0;
                }
            }
        }

        Ok(votes / self.members.len() as f64)
    }

    /// Most voted class per row, lowest index on ties.
    pub fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>> {
        let proba = self.predict_proba(records)?;
        Ok(proba.map_axis(Axis(1), |row| argmax(row.iter().copied()).0))
    }
}

/// Index and value of the largest element; first index wins ties.
pub(crate) fn argmax(values: impl Iterator<Item = f64>) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (idx, value) in values.enumerate() {
        if value > best.1 {
            best = (idx, value);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn toy() -> (Array2<f64>, Array1<usize>) {
        let x = array![
            [0.0, 0.0],
            [0.1, 0.2],
            [0.2, 0.1],
            [5.0, 5.0],
            [5.1, 4.9],
            [4.9, 5.2],
        ];
        let y = array![0, 0, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax([0.5, 0.5, 0.0].into_iter()), (0, 0.5));
        assert_eq!(argmax([0.1, 0.3, 0.6].into_iter()), (2, 0.6));
    }

    #[test]
    fn test_features_per_tree() {
        let params = ForestParams::default();
        assert_eq!(params.features_per_tree(4), 2);
        assert_eq!(params.features_per_tree(1), 1);

        let params = ForestParams {
            max_features: Some(10),
            ..ForestParams::default()
        };
        assert_eq!(params.features_per_tree(4), 4);
    }

    #[test]
    fn test_fit_separable_data() {
        let (x, y) = toy();
        let params = ForestParams {
            n_estimators: 15,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&x, &y, 2, &params, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(forest.n_estimators(), 15);
        let proba = forest.predict_proba(&x).unwrap();
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }

        let far = array![[-1.0, -1.0], [9.0, 9.0]];
        assert_eq!(forest.predict(&far).unwrap().to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let (x, y) = toy();
        let mut rng = StdRng::seed_from_u64(0);

        let zero = ForestParams {
            n_estimators: 0,
            ..ForestParams::default()
        };
        assert!(RandomForest::fit(&x, &y, 2, &zero, &mut rng).is_err());

        // Class index 1 does not fit in a one-class forest
        assert!(RandomForest::fit(&x, &y, 1, &ForestParams::default(), &mut rng).is_err());

        let forest = RandomForest::fit(&x, &y, 2, &ForestParams::default(), &mut rng).unwrap();
        assert!(forest.predict_proba(&array![[1.0, 2.0, 3.0]]).is_err());
    }

    #[test]
    fn test_forest_serializes_to_json() {
        let (x, y) = toy();
        let params = ForestParams {
            n_estimators: 5,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&x, &y, 2, &params, &mut StdRng::seed_from_u64(9)).unwrap();

        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForest = serde_json::from_str(&json).unwrap();
        assert_eq!(
            forest.predict_proba(&x).unwrap(),
            restored.predict_proba(&x).unwrap()
        );
    }
}
