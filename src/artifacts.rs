use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{PredictError, Result};
use crate::models::{Feature, InputRecord, StressLevel};

/// Maps a record to a class index. The index only gains meaning through a
/// [`LabelDecoder`].
pub trait Classifier {
    fn predict(&self, record: &InputRecord) -> usize;
}

pub trait LabelDecoder {
    fn decode(&self, index: usize) -> Result<StressLevel>;
}

#[derive(Deserialize)]
struct EnsembleArtifact {
    feature_names: Vec<String>,
    n_classes: usize,
    trees: Vec<TreeArtifact>,
}

#[derive(Deserialize)]
struct TreeArtifact {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
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

/// Tree ensemble exported by the training pipeline. Each tree votes with
/// its leaf's class distribution and the averaged vote picks the class.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    features: Vec<Feature>,
    n_classes: usize,
    trees: Vec<Vec<Node>>,
}

impl TreeEnsemble {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| PredictError::unavailable(path, err))?;
        let ensemble = Self::parse(&text).map_err(|reason| PredictError::unavailable(path, reason))?;
        info!(
            path = %path.display(),
            trees = ensemble.trees.len(),
            classes = ensemble.n_classes,
            "loaded classifier"
        );
        Ok(ensemble)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::parse(text).map_err(|reason| PredictError::unavailable("<memory>", reason))
    }

    fn parse(text: &str) -> std::result::Result<Self, String> {
        let artifact: EnsembleArtifact =
            serde_json::from_str(text).map_err(|err| format!("invalid classifier json: {err}"))?;

        let features = artifact
            .feature_names
            .iter()
            .map(|name| Feature::from_name(name).ok_or_else(|| format!("unknown feature {name:?}")))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if artifact.n_classes == 0 {
            return Err("classifier declares no classes".to_string());
        }
        if artifact.trees.is_empty() {
            return Err("classifier has no trees".to_string());
        }

        let mut trees = Vec::with_capacity(artifact.trees.len());
        for (tree_index, tree) in artifact.trees.into_iter().enumerate() {
            let nodes = validate_tree(tree.nodes, features.len(), artifact.n_classes)
                .map_err(|reason| format!("tree {tree_index}: {reason}"))?;
            trees.push(nodes);
        }

        Ok(TreeEnsemble {
            features,
            n_classes: artifact.n_classes,
            trees,
        })
    }

    fn leaf<'a>(&self, nodes: &'a [Node], record: &InputRecord) -> &'a [f64] {
        let mut index = 0;
        loop {
            match &nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = record.feature(self.features[*feature]);
                    index = if value <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }
}

impl Classifier for TreeEnsemble {
    fn predict(&self, record: &InputRecord) -> usize {
        let mut totals = vec![0.0; self.n_classes];
        for nodes in &self.trees {
            for (total, probability) in totals.iter_mut().zip(self.leaf(nodes, record)) {
                *total += probability;
            }
        }

        // First maximum wins ties.
        let mut best = 0;
        for (index, total) in totals.iter().enumerate() {
            if *total > totals[best] {
                best = index;
            }
        }
        best
    }
}

// Children must sit after their parent, which rules out cycles. Leaf weights
// are normalized into probabilities here so prediction only sums them.
fn validate_tree(
    mut nodes: Vec<Node>,
    feature_count: usize,
    n_classes: usize,
) -> std::result::Result<Vec<Node>, String> {
    if nodes.is_empty() {
        return Err("tree has no nodes".to_string());
    }

    let node_count = nodes.len();
    for (index, node) in nodes.iter_mut().enumerate() {
        match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= feature_count {
                    return Err(format!("node {index} splits on missing feature {feature}"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {index} has a non-finite threshold"));
                }
                for child in [*left, *right] {
                    if child <= index || child >= node_count {
                        return Err(format!("node {index} points to invalid child {child}"));
                    }
                }
            }
            Node::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(format!(
                        "leaf {index} has {} weights, expected {n_classes}",
                        value.len()
                    ));
                }
                if value.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
                    return Err(format!("leaf {index} has a negative or non-finite weight"));
                }
                let sum: f64 = value.iter().sum();
                if sum <= 0.0 {
                    return Err(format!("leaf {index} has no weight"));
                }
                for weight in value.iter_mut() {
                    *weight /= sum;
                }
            }
        }
    }

    Ok(nodes)
}

#[derive(Deserialize)]
struct EncoderArtifact {
    classes: Vec<String>,
}

/// Index-to-label table, stored in the encoder's sorted class order.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<StressLevel>,
}

impl LabelEncoder {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| PredictError::unavailable(path, err))?;
        let encoder = Self::parse(&text).map_err(|reason| PredictError::unavailable(path, reason))?;
        info!(path = %path.display(), classes = encoder.classes.len(), "loaded label encoder");
        Ok(encoder)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::parse(text).map_err(|reason| PredictError::unavailable("<memory>", reason))
    }

    pub fn classes(&self) -> &[StressLevel] {
        &self.classes
    }

    fn parse(text: &str) -> std::result::Result<Self, String> {
        let artifact: EncoderArtifact =
            serde_json::from_str(text).map_err(|err| format!("invalid label encoder json: {err}"))?;

        if artifact.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }

        let mut seen = HashSet::new();
        let mut classes = Vec::with_capacity(artifact.classes.len());
        for name in &artifact.classes {
            let level: StressLevel = name.parse()?;
            if !seen.insert(level) {
                return Err(format!("duplicate class {name:?}"));
            }
            classes.push(level);
        }

        Ok(LabelEncoder { classes })
    }
}

impl LabelDecoder for LabelEncoder {
    fn decode(&self, index: usize) -> Result<StressLevel> {
        self.classes
            .get(index)
            .copied()
            .ok_or(PredictError::UnknownLabelIndex {
                index,
                known: self.classes.len(),
            })
    }
}
