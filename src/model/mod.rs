//! SFI regression model
//!
//! Relates nutrient levels to the computed SFI with a Random Forest:
//! features `[N, P, K, OC, ph]`, target `SFI`, seeded 80/20 split.
//!
//! Reports train/test R², test RMSE and feature importances sorted
//! descending by importance.

pub mod evaluation;
pub mod forest;
pub mod split;
pub mod tree;

pub use evaluation::{r2_score, rmse};
pub use forest::{ForestParams, RandomForest};
pub use split::{train_test_split, TrainTestSplit};
pub use tree::{RegressionTree, TreeNode, TreeParams};

use serde::{Deserialize, Serialize};

use crate::data::{SoilDataset, COL_K, COL_N, COL_OC, COL_P, COL_PH, COL_SFI};
use crate::error::{SfiError, SfiResult};

/// Model input columns, in feature-index order
pub const FEATURES: [&str; 5] = [COL_N, COL_P, COL_K, COL_OC, COL_PH];

/// Smallest dataset the trainer accepts
pub const MIN_TRAINING_SAMPLES: usize = 5;

/// Model training parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Skip training entirely
    pub enabled: bool,
    pub test_fraction: f64,
    pub seed: u64,
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            test_fraction: 0.2,
            seed: 42,
            n_estimators: 100,
            max_depth: 15,
            min_samples_split: 5,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> SfiResult<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(SfiError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.n_estimators == 0 {
            return Err(SfiError::InvalidConfig("n_estimators must be at least 1".to_string()));
        }
        if self.max_depth == 0 {
            return Err(SfiError::InvalidConfig("max_depth must be at least 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(SfiError::InvalidConfig(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        Ok(())
    }

    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
            },
            seed: self.seed,
        }
    }
}

/// Importance of one input feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Evaluation of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub features: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    pub n_estimators: usize,
    pub r2_train: f64,
    pub r2_test: f64,
    pub rmse_test: f64,
    /// Sorted descending by importance
    pub feature_importances: Vec<FeatureImportance>,
}

/// Fitted forest together with its evaluation
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub forest: RandomForest,
    pub report: ModelReport,
}

impl TrainedModel {
    /// Predict SFI for one `[N, P, K, OC, ph]` row
    pub fn predict(&self, features: &[f64; 5]) -> f64 {
        self.forest.predict(features)
    }
}

/// Pair feature names with importances, highest first
///
/// The sort is stable, so tied features keep their input order.
pub fn rank_importances(features: &[&str], importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = features
        .iter()
        .zip(importances)
        .map(|(feature, importance)| FeatureImportance {
            feature: feature.to_string(),
            importance: *importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

/// Fit the SFI model on a scored dataset
///
/// Requires the `SFI` column, so scoring must run first.
pub fn train_model(dataset: &SoilDataset, config: &ModelConfig) -> SfiResult<TrainedModel> {
    config.validate()?;

    let mut required: Vec<&str> = FEATURES.to_vec();
    required.push(COL_SFI);
    dataset.require(&required, "model training")?;

    if dataset.len() < MIN_TRAINING_SAMPLES {
        return Err(SfiError::InsufficientData {
            needed: MIN_TRAINING_SAMPLES,
            found: dataset.len(),
        });
    }

    let columns: Vec<Vec<f64>> = FEATURES
        .iter()
        .map(|name| dataset.values(name))
        .collect::<SfiResult<_>>()?;
    let target = dataset.values(COL_SFI)?;

    let rows: Vec<Vec<f64>> = (0..dataset.len())
        .map(|i| columns.iter().map(|column| column[i]).collect())
        .collect();

    let split = train_test_split(rows.len(), config.test_fraction, config.seed)?;
    let gather_rows = |idx: &[usize]| -> Vec<Vec<f64>> { idx.iter().map(|&i| rows[i].clone()).collect() };
    let gather_target = |idx: &[usize]| -> Vec<f64> { idx.iter().map(|&i| target[i]).collect() };

    let x_train = gather_rows(&split.train);
    let y_train = gather_target(&split.train);
    let x_test = gather_rows(&split.test);
    let y_test = gather_target(&split.test);

    tracing::info!(
        "Training random forest: {} trees, {} train / {} test samples",
        config.n_estimators,
        x_train.len(),
        x_test.len()
    );

    let forest = RandomForest::fit(&x_train, &y_train, &config.forest_params())?;

    let r2_train = r2_score(&y_train, &forest.predict_batch(&x_train));
    let y_pred = forest.predict_batch(&x_test);
    let r2_test = r2_score(&y_test, &y_pred);
    let rmse_test = rmse(&y_test, &y_pred);

    let feature_importances = rank_importances(&FEATURES, forest.feature_importances());

    tracing::info!(
        "Model fitted: R² train {:.4}, R² test {:.4}, RMSE {:.4}",
        r2_train,
        r2_test,
        rmse_test
    );
    if let Some(top) = feature_importances.first() {
        tracing::info!("Most important feature: {} ({:.3})", top.feature, top.importance);
    }

    let report = ModelReport {
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
        n_train: x_train.len(),
        n_test: x_test.len(),
        n_estimators: forest.n_trees(),
        r2_train,
        r2_test,
        rmse_test,
        feature_importances,
    };

    Ok(TrainedModel { forest, report })
}
