use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::super::encoding::{feature_names, FeatureVector, FEATURE_COUNT};
use super::{Label, LoanClassifier, ModelInfo, PredictionError};

/// Random forest exported from the training notebook as JSON.
///
/// Every tree is a flat node array rooted at index 0. Children always sit after their
/// parent, which the loader enforces so traversal is guaranteed to terminate.
#[derive(Debug, Clone)]
pub struct ForestModel {
    version: String,
    algorithm: String,
    classes: Vec<Label>,
    trees: Vec<Vec<Node>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ForestArtifact {
    version: String,
    #[serde(default = "default_algorithm")]
    algorithm: String,
    feature_names: Vec<String>,
    classes: Vec<String>,
    trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
struct TreeArtifact {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

fn default_algorithm() -> String {
    "random_forest".to_string()
}

impl ForestModel {
    /// Load and validate the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ArtifactError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let model = Self::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), trees = model.trees.len(), "model artifact loaded");
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: ForestArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ForestArtifact) -> Result<Self, ArtifactError> {
        check_feature_names(&artifact.feature_names)?;

        if artifact.classes.is_empty() {
            return Err(ArtifactError::Invalid("artifact declares no classes".to_string()));
        }
        if artifact.trees.is_empty() {
            return Err(ArtifactError::Invalid("artifact contains no trees".to_string()));
        }

        let class_count = artifact.classes.len();
        let mut trees = Vec::with_capacity(artifact.trees.len());
        for (tree_index, tree) in artifact.trees.into_iter().enumerate() {
            check_tree(tree_index, &tree.nodes, class_count)?;
            trees.push(tree.nodes);
        }

        Ok(Self {
            version: artifact.version,
            algorithm: artifact.algorithm,
            classes: artifact.classes.into_iter().map(Label).collect(),
            trees,
        })
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Mean of the per-tree class distributions, in `classes()` order.
    pub fn class_probabilities(
        &self,
        features: &FeatureVector,
    ) -> Result<Vec<f64>, PredictionError> {
        let mut totals = vec![0.0; self.classes.len()];
        for (tree_index, nodes) in self.trees.iter().enumerate() {
            let weights = walk(tree_index, nodes, features)?;
            let sum: f64 = weights.iter().sum();
            if sum <= 0.0 {
                return Err(PredictionError::EmptyLeaf { tree: tree_index });
            }
            for (total, weight) in totals.iter_mut().zip(weights) {
                *total += weight / sum;
            }
        }

        let tree_count = self.trees.len() as f64;
        Ok(totals.into_iter().map(|total| total / tree_count).collect())
    }
}

impl LoanClassifier for ForestModel {
    fn predict(&self, features: &FeatureVector) -> Result<Label, PredictionError> {
        let probabilities = self.class_probabilities(features)?;

        let mut best: Option<(usize, f64)> = None;
        for (index, probability) in probabilities.into_iter().enumerate() {
            match best {
                Some((_, current)) if probability <= current => {}
                _ => best = Some((index, probability)),
            }
        }

        best.and_then(|(index, _)| self.classes.get(index).cloned())
            .ok_or_else(|| PredictionError::Model("no class selected".to_string()))
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            version: self.version.clone(),
            algorithm: self.algorithm.clone(),
            estimators: self.trees.len(),
            classes: self.classes.iter().map(|label| label.0.clone()).collect(),
            feature_names: feature_names(),
        }
    }
}

fn walk<'a>(
    tree_index: usize,
    nodes: &'a [Node],
    features: &FeatureVector,
) -> Result<&'a [f64], PredictionError> {
    let mut cursor = 0;
    loop {
        let node = nodes.get(cursor).ok_or_else(|| {
            PredictionError::Model(format!("tree {tree_index} has no node {cursor}"))
        })?;
        match node {
            Node::Leaf { value } => return Ok(value.as_slice()),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let x = features.get(*feature).ok_or_else(|| {
                    PredictionError::Model(format!(
                        "tree {tree_index} splits on missing feature {feature}"
                    ))
                })?;
                cursor = if x <= *threshold { *left } else { *right };
            }
        }
    }
}

fn check_feature_names(declared: &[String]) -> Result<(), ArtifactError> {
    let expected = feature_names();
    if declared.len() != expected.len() {
        return Err(ArtifactError::FeatureCount {
            expected: expected.len(),
            found: declared.len(),
        });
    }

    for (position, (want, got)) in expected.iter().zip(declared).enumerate() {
        if want != got {
            return Err(ArtifactError::SchemaMismatch {
                position: position + 1,
                expected: want.clone(),
                found: got.clone(),
            });
        }
    }
    Ok(())
}

fn check_tree(tree_index: usize, nodes: &[Node], class_count: usize) -> Result<(), ArtifactError> {
    if nodes.is_empty() {
        return Err(ArtifactError::Invalid(format!("tree {tree_index} has no nodes")));
    }

    for (index, node) in nodes.iter().enumerate() {
        match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= FEATURE_COUNT {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {tree_index} node {index} splits on feature {feature}, model has {FEATURE_COUNT}"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {tree_index} node {index} has a non-finite threshold"
                    )));
                }
                for child in [*left, *right] {
                    if child <= index || child >= nodes.len() {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {tree_index} node {index} points to invalid child {child}"
                        )));
                    }
                }
            }
            Node::Leaf { value } => {
                if value.len() != class_count {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {tree_index} leaf {index} has {} weights for {class_count} classes",
                        value.len()
                    )));
                }
                if value.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {tree_index} leaf {index} has a negative or non-finite weight"
                    )));
                }
            }
        }
    }
    Ok(())
}

/// The model artifact could not be made available. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model file not found at {}", .path.display())]
    Missing { path: PathBuf },
    #[error("unable to read model file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model artifact declares {found} features, encoder produces {expected}")]
    FeatureCount { expected: usize, found: usize },
    #[error("model feature {position} is '{found}', encoder produces '{expected}'")]
    SchemaMismatch {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("model artifact is malformed: {0}")]
    Invalid(String),
}
