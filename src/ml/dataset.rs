//! Reference dataset and stratified train/test splitting.
//!
//! The classifier is always trained on the 150-sample Iris dataset shipped with
//! `linfa-datasets`: four measurements per flower, three balanced classes.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{IrisError, Result};

/// Class labels in target-index order.
pub const TARGET_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Feature columns in record order.
pub const FEATURE_NAMES: [&str; 4] = [
    "sepal_length",
    "sepal_width",
    "petal_length",
    "petal_width",
];

/// Rows of measurements with one class index per row.
#[derive(Debug, Clone)]
pub struct LabeledData {
    /// Shape: [n_samples][n_features]
    pub records: Array2<f64>,
    /// Shape: [n_samples], values in `0..n_classes`
    pub targets: Array1<usize>,
}

impl LabeledData {
    pub fn new(records: Array2<f64>, targets: Array1<usize>) -> Result<Self> {
        if records.nrows() != targets.len() {
            return Err(IrisError::Internal(format!(
                "records have {} rows but targets have {} entries",
                records.nrows(),
                targets.len()
            )));
        }
        Ok(Self { records, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.records.ncols()
    }

    /// Count of rows per class index.
    pub fn class_counts(&self, n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; n_classes];
        for &class in self.targets.iter() {
            if class < n_classes {
                counts[class] += 1;
            }
        }
        counts
    }

    fn select(&self, rows: &[usize]) -> Self {
        Self {
            records: self.records.select(Axis(0), rows),
            targets: self.targets.select(Axis(0), rows),
        }
    }
}

/// The reference dataset together with its class names.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    pub data: LabeledData,
    pub target_names: Vec<String>,
}

/// Load the fixed Iris dataset.
pub fn load_reference() -> Result<ReferenceDataset> {
    let iris = linfa_datasets::iris();
    let data = LabeledData::new(iris.records, iris.targets)?;

    if data.n_features() != FEATURE_NAMES.len() {
        return Err(IrisError::Internal(format!(
            "reference dataset has {} features, expected {}",
            data.n_features(),
            FEATURE_NAMES.len()
        )));
    }
    if let Some(bad) = data.targets.iter().find(|&&t| t >= TARGET_NAMES.len()) {
        return Err(IrisError::Internal(format!(
            "reference dataset contains unknown class index {}",
            bad
        )));
    }

    Ok(ReferenceDataset {
        data,
        target_names: TARGET_NAMES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Train and test partitions produced by [`stratified_split`].
#[derive(Debug, Clone)]
pub struct Split {
    pub train: LabeledData,
    pub test: LabeledData,
}

/// Partition `data` so that each class keeps its share in both halves.
///
/// The test partition holds `ceil(test_size * n)` rows. Per-class test counts
/// are the floor of each class's proportional share, with leftover rows handed
/// to the classes with the largest fractional remainder (lowest index first on
/// ties). Rows are drawn from a per-class shuffle and both partitions are
/// shuffled again before returning.
pub fn stratified_split(
    data: &LabeledData,
    n_classes: usize,
    test_size: f64,
    rng: &mut StdRng,
) -> Result<Split> {
    let n = data.len();
    if n == 0 || n_classes == 0 {
        return Err(IrisError::Internal("cannot split an empty dataset".to_string()));
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test < n_classes || n_train < n_classes {
        return Err(IrisError::Validation(format!(
            "test_size {} gives {} train / {} test samples; both must be at least the number of classes ({})",
            test_size, n_train, n_test, n_classes
        )));
    }

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (row, &class) in data.targets.iter().enumerate() {
        let bucket = by_class.get_mut(class).ok_or_else(|| {
            IrisError::Internal(format!("class index {} out of range", class))
        })?;
        bucket.push(row);
    }

    let quotas: Vec<f64> = by_class
        .iter()
        .map(|rows| n_test as f64 * rows.len() as f64 / n as f64)
        .collect();
    let mut allocation: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();

    let mut order: Vec<usize> = (0..n_classes).collect();
    order.sort_by(|&a, &b| {
        let frac_a = quotas[a] - quotas[a].floor();
        let frac_b = quotas[b] - quotas[b].floor();
        frac_b
            .partial_cmp(&frac_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut remaining = n_test - allocation.iter().sum::<usize>();
    while remaining > 0 {
        let before = remaining;
        for &class in &order {
            if remaining == 0 {
                break;
            }
            if allocation[class] < by_class[class].len() {
                allocation[class] += 1;
                remaining -= 1;
            }
        }
        if remaining == before {
            return Err(IrisError::Internal(
                "stratified allocation could not place all test rows".to_string(),
            ));
        }
    }

    let mut train_rows = Vec::with_capacity(n_train);
    let mut test_rows = Vec::with_capacity(n_test);
    for (class, rows) in by_class.iter_mut().enumerate() {
        if !rows.is_empty() && (allocation[class] == 0 || allocation[class] == rows.len()) {
            return Err(IrisError::Validation(format!(
                "test_size {} leaves class {} absent from one partition",
                test_size, class
            )));
        }
        rows.shuffle(rng);
        let (test, train) = rows.split_at(allocation[class]);
        test_rows.extend_from_slice(test);
        train_rows.extend_from_slice(train);
    }

    train_rows.shuffle(rng);
    test_rows.shuffle(rng);

    Ok(Split {
        train: data.select(&train_rows),
        test: data.select(&test_rows),
    })
}
