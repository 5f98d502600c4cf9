//! Regressors readable from artifact files

use serde::{Deserialize, Serialize};

use super::{check_shape, InferenceError, Regressor};

/// Ordinary linear model: `intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        LinearRegressor {
            coefficients,
            intercept,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("linear model parameters must be finite".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        check_shape(self.coefficients.len(), row)?;
        let value = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        Ok(value)
    }

    fn describe(&self) -> String {
        format!("linear ({} features)", self.coefficients.len())
    }
}

/// A node in a flattened decision tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// Rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Binary regression tree stored in pre-order, so children always sit after
/// their parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        DecisionTree { nodes }
    }

    /// Single-leaf tree
    pub fn constant(value: f64) -> Self {
        DecisionTree {
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", idx));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let mut idx = 0;
        loop {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| InferenceError::Invalid(format!("missing tree node {}", idx)))?;
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = row.get(*feature).ok_or(InferenceError::ShapeMismatch {
                        expected: feature + 1,
                        found: row.len(),
                    })?;
                    let next = if x <= threshold { *left } else { *right };
                    if next <= idx {
                        return Err(InferenceError::Invalid(format!(
                            "node {} points backwards to {}",
                            idx, next
                        )));
                    }
                    idx = next;
                }
            }
        }
    }
}

/// Random forest: the mean of its trees' predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestRegressor {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl ForestRegressor {
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Self {
        ForestRegressor { n_features, trees }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("forest has no features".to_string());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Regressor for ForestRegressor {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        check_shape(self.n_features, row)?;
        if self.trees.is_empty() {
            return Err(InferenceError::Invalid("forest has no trees".to_string()));
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn describe(&self) -> String {
        format!(
            "forest ({} trees, {} features)",
            self.trees.len(),
            self.n_features
        )
    }
}

/// Any regressor that can be read from an artifact file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorKind {
    Linear(LinearRegressor),
    Forest(ForestRegressor),
}

impl RegressorKind {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            RegressorKind::Linear(r) => r.validate(),
            RegressorKind::Forest(r) => r.validate(),
        }
    }
}

impl Regressor for RegressorKind {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        match self {
            RegressorKind::Linear(r) => r.predict(row),
            RegressorKind::Forest(r) => r.predict(row),
        }
    }

    fn describe(&self) -> String {
        match self {
            RegressorKind::Linear(r) => r.describe(),
            RegressorKind::Forest(r) => r.describe(),
        }
    }
}
