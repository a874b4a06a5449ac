// * A single discrete variable of a Bayesian network: an ordered parent
// * list plus a trie-compressed conditional probability table.
// *
// * The serialized CPT nests one level per parent. Each internal level is a
// * mapping with two optional branches:
// *   deeper[v] -> subtree for a parent observed with value v
// *   skip      -> subtree used when the observed value is out of support
// * A leaf maps candidate values to non-negative weights. The trie is
// * ragged: a skip branch may short-circuit straight to a leaf while
// * parents remain.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;
use thiserror::Error;

use crate::data::DatasetError;

// * Sample-time failures. Structural problems are rejected at load time;
// * these cover what only a concrete parent assignment can reveal.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("node {node}: conditional probability tree does not match its parent list")]
    MalformedCpt { node: String },

    #[error("node {node}: resolved distribution has no positive weight")]
    EmptyDistribution { node: String },
}

/// One level of the normalized conditional-probability trie.
#[derive(Debug, Clone)]
pub enum CptNode {
    Branch {
        deeper: BTreeMap<String, CptNode>,
        skip: Option<Box<CptNode>>,
    },
    /// Sorted (value, weight) pairs. Sorting once at load keeps the
    /// cumulative scan reproducible under a fixed seed regardless of the
    /// serialization's key order.
    Leaf(Vec<(String, f64)>),
}

impl CptNode {
    // * Normalizes the raw JSON tree once at load time, so sampling never
    // * dispatches on dynamic value types.
    pub(crate) fn from_value(
        dataset: &'static str,
        node: &str,
        raw: &Value,
    ) -> Result<Self, DatasetError> {
        let map = raw
            .as_object()
            .ok_or_else(|| malformed(dataset, node, "probability level is not an object"))?;

        if map.contains_key("deeper") || map.contains_key("skip") {
            let mut deeper = BTreeMap::new();
            if let Some(raw_deeper) = map.get("deeper") {
                let entries = raw_deeper
                    .as_object()
                    .ok_or_else(|| malformed(dataset, node, "deeper branch is not an object"))?;
                for (value, subtree) in entries {
                    deeper.insert(value.clone(), Self::from_value(dataset, node, subtree)?);
                }
            }
            let skip = match map.get("skip") {
                Some(subtree) => Some(Box::new(Self::from_value(dataset, node, subtree)?)),
                None => None,
            };
            return Ok(Self::Branch { deeper, skip });
        }

        let mut weights = Vec::with_capacity(map.len());
        for (value, weight) in map {
            let weight = weight
                .as_f64()
                .ok_or_else(|| malformed(dataset, node, "leaf weight is not a number"))?;
            if weight < 0.0 {
                return Err(malformed(dataset, node, "leaf weight is negative"));
            }
            weights.push((value.clone(), weight));
        }
        weights.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self::Leaf(weights))
    }
}

fn malformed(dataset: &'static str, node: &str, reason: &str) -> DatasetError {
    DatasetError::Malformed {
        name: dataset,
        reason: format!("node {node}: {reason}"),
    }
}

/// One variable of the network, sampled against the running assignment.
#[derive(Debug, Clone)]
pub struct BayesianNode {
    name: String,
    parent_names: Vec<String>,
    cpt: CptNode,
}

impl BayesianNode {
    pub(crate) fn new(name: String, parent_names: Vec<String>, cpt: CptNode) -> Self {
        Self {
            name,
            parent_names,
            cpt,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_names(&self) -> &[String] {
        &self.parent_names
    }

    /// Draws a value for this node given the partial parent assignment.
    pub fn sample(
        &self,
        rng: &mut StdRng,
        assignment: &BTreeMap<String, String>,
    ) -> Result<String, SamplingError> {
        let leaf = self.locate_leaf(assignment)?;
        self.weighted_draw(rng, leaf)
    }

    // * Walks the trie one declared parent at a time. An assigned parent
    // * with an in-support value descends through deeper; anything else
    // * falls back to skip. When neither branch applies the walk stops and
    // * the current level must already be a leaf.
    fn locate_leaf(
        &self,
        assignment: &BTreeMap<String, String>,
    ) -> Result<&[(String, f64)], SamplingError> {
        let mut current = &self.cpt;
        for parent in &self.parent_names {
            let next = match current {
                CptNode::Leaf(_) => break,
                CptNode::Branch { deeper, skip } => {
                    match assignment.get(parent).and_then(|value| deeper.get(value)) {
                        Some(subtree) => subtree,
                        None => match skip {
                            Some(subtree) => subtree.as_ref(),
                            None => break,
                        },
                    }
                }
            };
            current = next;
        }
        match current {
            CptNode::Leaf(weights) => Ok(weights),
            CptNode::Branch { .. } => Err(SamplingError::MalformedCpt {
                node: self.name.clone(),
            }),
        }
    }

    fn weighted_draw(
        &self,
        rng: &mut StdRng,
        weights: &[(String, f64)],
    ) -> Result<String, SamplingError> {
        let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return Err(SamplingError::EmptyDistribution {
                node: self.name.clone(),
            });
        }
        let target = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for (value, weight) in weights {
            cumulative += weight;
            if target < cumulative {
                return Ok(value.clone());
            }
        }
        // Floating-point underrun: the scan ran past every bucket.
        Ok(weights[weights.len() - 1].0.clone())
    }
}
