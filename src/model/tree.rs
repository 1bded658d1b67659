//! CART regression tree
//!
//! Array-based tree grown by exhaustive variance-reduction splits.
//!
//! # Design
//!
//! Nodes live in one `Vec`; a split node stores the indices of its children.
//! Samples with `feature <= threshold` go left. Growth stops at `max_depth`,
//! below `min_samples_split` samples, or when the node's targets are constant.
//!
//! While growing, each split credits its feature with the drop in summed
//! squared error (node SSE minus children SSE), which is the mean decrease in
//! impurity weighted by node size.

/// Below this the node's targets are treated as constant
const SSE_EPSILON: f64 = 1e-12;

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
}

/// A node in the regression tree
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

/// Best split found for a node
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    children_sse: f64,
}

impl RegressionTree {
    /// Grow a tree on the rows listed in `indices` (duplicates allowed, as in a
    /// bootstrap sample)
    ///
    /// Returns the tree and the per-feature impurity decrease it accumulated.
    pub fn fit(
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        n_features: usize,
        params: &TreeParams,
    ) -> (Self, Vec<f64>) {
        let mut tree = Self {
            nodes: Vec::new(),
            n_features,
        };
        let mut importances = vec![0.0; n_features];
        let mut working = indices.to_vec();

        if working.is_empty() {
            tree.nodes.push(TreeNode::Leaf { value: 0.0 });
        } else {
            tree.grow(rows, targets, &mut working, 0, params, &mut importances);
        }

        (tree, importances)
    }

    fn grow(
        &mut self,
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: &mut [usize],
        depth: usize,
        params: &TreeParams,
        importances: &mut [f64],
    ) -> usize {
        let (mean, sse) = mean_and_sse(targets, indices);
        let node_id = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { value: mean });

        if depth >= params.max_depth || indices.len() < params.min_samples_split || sse <= SSE_EPSILON {
            return node_id;
        }

        let Some(best) = self.best_split(rows, targets, indices) else {
            return node_id;
        };

        importances[best.feature] += (sse - best.children_sse).max(0.0);

        // Partition in place: left block first
        let mut boundary = 0;
        for i in 0..indices.len() {
            if rows[indices[i]][best.feature] <= best.threshold {
                indices.swap(i, boundary);
                boundary += 1;
            }
        }
        let (left_indices, right_indices) = indices.split_at_mut(boundary);

        let left = self.grow(rows, targets, left_indices, depth + 1, params, importances);
        let right = self.grow(rows, targets, right_indices, depth + 1, params, importances);

        self.nodes[node_id] = TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_id
    }

    fn best_split(&self, rows: &[Vec<f64>], targets: &[f64], indices: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();

        let mut best: Option<SplitCandidate> = None;
        let mut order = indices.to_vec();

        for feature in 0..self.n_features {
            order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for pos in 0..n - 1 {
                let y = targets[order[pos]];
                left_sum += y;
                left_sq += y * y;

                let here = rows[order[pos]][feature];
                let next = rows[order[pos + 1]][feature];
                if here == next {
                    continue;
                }

                let left_n = (pos + 1) as f64;
                let right_n = (n - pos - 1) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;

                let children_sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);

                if best.as_ref().map_or(true, |b| children_sse < b.children_sse) {
                    let mut threshold = here + (next - here) / 2.0;
                    // Midpoint can round up to `next` for adjacent floats
                    if threshold >= next {
                        threshold = here;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        children_sse,
                    });
                }
            }
        }

        best
    }

    /// Predict a single sample
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if features[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Number of nodes (splits and leaves)
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], node: usize) -> usize {
            match &nodes[node] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

fn mean_and_sse(targets: &[f64], indices: &[usize]) -> (f64, f64) {
    let n = indices.len() as f64;
    let sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let mean = sum / n;
    let sse = indices.iter().map(|&i| (targets[i] - mean).powi(2)).sum();
    (mean, sse)
}
