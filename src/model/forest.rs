//! Random Forest regressor.
//!
//! Ensemble of bootstrap-trained [`RegressionTree`]s whose predictions are
//! averaged. Trees are independent, so they are fitted in parallel with
//! Rayon; each tree draws its bootstrap sample from its own ChaCha stream
//! (`seed`, stream = tree index), which keeps the forest identical whatever
//! the thread schedule.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::tree::{RegressionTree, TreeParams};
use crate::error::{SfiError, SfiResult};

/// Forest hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub tree: TreeParams,
    pub seed: u64,
}

/// A fitted Random Forest regressor.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
    /// Mean decrease in impurity per feature, normalized to sum to 1
    feature_importances: Vec<f64>,
}

impl RandomForest {
    /// Fit a forest on `rows` (one `Vec` of `n_features` values per sample)
    ///
    /// # Errors
    ///
    /// Returns `Err` for an empty training set, ragged rows, or zero trees.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], params: &ForestParams) -> SfiResult<Self> {
        if rows.is_empty() || rows.len() != targets.len() {
            return Err(SfiError::InsufficientData {
                needed: 1,
                found: rows.len().min(targets.len()),
            });
        }
        if params.n_estimators == 0 {
            return Err(SfiError::InvalidConfig("n_estimators must be at least 1".to_string()));
        }
        let n_features = rows[0].len();
        if rows.iter().any(|r| r.len() != n_features) {
            return Err(SfiError::InvalidConfig("inconsistent feature count across rows".to_string()));
        }

        let n_samples = rows.len();
        let fitted: Vec<(RegressionTree, Vec<f64>)> = (0..params.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
                rng.set_stream(tree_idx as u64);
                let bootstrap: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                RegressionTree::fit(rows, targets, &bootstrap, n_features, &params.tree)
            })
            .collect();

        // Per-tree importances are normalized before averaging
        let mut feature_importances = vec![0.0; n_features];
        for (_, raw) in &fitted {
            let total: f64 = raw.iter().sum();
            if total > 0.0 {
                for (acc, value) in feature_importances.iter_mut().zip(raw) {
                    *acc += value / total;
                }
            }
        }
        let total: f64 = feature_importances.iter().sum();
        if total > 0.0 {
            feature_importances.iter_mut().for_each(|v| *v /= total);
        }

        let trees: Vec<RegressionTree> = fitted.into_iter().map(|(tree, _)| tree).collect();
        tracing::debug!(
            "Fitted {} trees (avg depth {:.1}, {} nodes)",
            trees.len(),
            trees.iter().map(RegressionTree::depth).sum::<usize>() as f64 / trees.len() as f64,
            trees.iter().map(RegressionTree::n_nodes).sum::<usize>()
        );

        Ok(Self {
            trees,
            n_features,
            feature_importances,
        })
    }

    /// Predict a single sample (mean over trees).
    pub fn predict(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        total / self.trees.len() as f64
    }

    /// Predict multiple samples.
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Vec<f64> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// Number of trees in the forest.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Expected number of features per sample.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Feature importances in input feature order.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Total number of nodes across all trees.
    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(RegressionTree::n_nodes).sum()
    }
}
