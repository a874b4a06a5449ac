// * Discrete Bayesian networks with trie-compressed conditional
// * probability tables, sampled under caller-fixed constraints.

pub mod network;
pub mod node;

pub use network::{
    load_fingerprint_network, load_header_network, load_input_network, BayesianNetwork,
};
pub use node::{BayesianNode, CptNode, SamplingError};
