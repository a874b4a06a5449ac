// * Topologically ordered node collection with constrained joint sampling.
// * Declaration order in the serialized file is the sampling order; the
// * file guarantees parents precede their children.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::Deserialize;
use serde_json::Value;

use super::node::{BayesianNode, CptNode, SamplingError};
use crate::data::{self, DatasetError};

#[derive(Deserialize)]
struct NetworkDefinition {
    nodes: Vec<NodeDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeDefinition {
    name: String,
    #[serde(default)]
    parent_names: Vec<String>,
    conditional_probabilities: Value,
}

/// An immutable network, shareable across threads once loaded.
#[derive(Debug, Clone)]
pub struct BayesianNetwork {
    nodes: Vec<BayesianNode>,
}

/// Loads the embedded input network (device / OS / browser / HTTP spec).
pub fn load_input_network() -> Result<BayesianNetwork, DatasetError> {
    BayesianNetwork::from_json("input-network.json", data::INPUT_NETWORK)
}

/// Loads the embedded header network.
pub fn load_header_network() -> Result<BayesianNetwork, DatasetError> {
    BayesianNetwork::from_json("header-network.json", data::HEADER_NETWORK)
}

/// Loads the embedded fingerprint network.
pub fn load_fingerprint_network() -> Result<BayesianNetwork, DatasetError> {
    BayesianNetwork::from_json("fingerprint-network.json", data::FINGERPRINT_NETWORK)
}

impl BayesianNetwork {
    /// Parses a serialized network definition, normalizing every CPT.
    pub fn from_json(name: &'static str, raw: &str) -> Result<Self, DatasetError> {
        let definition: NetworkDefinition =
            serde_json::from_str(raw).map_err(|source| DatasetError::Parse { name, source })?;
        let mut nodes = Vec::with_capacity(definition.nodes.len());
        for def in definition.nodes {
            let cpt = CptNode::from_value(name, &def.name, &def.conditional_probabilities)?;
            nodes.push(BayesianNode::new(def.name, def.parent_names, cpt));
        }
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[BayesianNode] {
        &self.nodes
    }

    /// Draws a full joint sample. Entries in `fixed` seed the assignment:
    /// keys matching a node pin that node's value, unmatched keys pass
    /// through verbatim and act as virtual parents readable by any node
    /// whose parent list names them.
    pub fn generate_sample(
        &self,
        rng: &mut StdRng,
        fixed: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, SamplingError> {
        let mut sample = fixed.clone();
        for node in &self.nodes {
            if !sample.contains_key(node.name()) {
                let value = node.sample(rng, &sample)?;
                sample.insert(node.name().to_string(), value);
            }
        }
        Ok(sample)
    }
}
