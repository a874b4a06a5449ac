// * Two-stage header synthesis. The input network picks the high-level
// * identity (browser family, OS, device class, HTTP spec); its full
// * sample, plus any request-dependent overrides, conditions the header
// * network that produces the concrete header values. The identity
// * variables are the single source of truth: every header agrees with
// * the same browser on the same OS.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use crate::bayesian::{load_header_network, load_input_network, BayesianNetwork};
use crate::config::constants::{
    MISSING_VALUE_TOKEN, UPPERCASE_HEADER_NAMES, VERBATIM_HEADER_PREFIXES,
};
use crate::data::{self, DatasetError};
use crate::errors::GeneratorError;

/// Samples realistic, internally consistent HTTP header maps.
#[derive(Debug)]
pub struct HeaderGenerator {
    input_network: BayesianNetwork,
    header_network: BayesianNetwork,
    headers_order: BTreeMap<String, Vec<String>>,
    known_browsers: Vec<String>,
}

impl HeaderGenerator {
    /// Loads both networks and the auxiliary lookup tables.
    pub fn new() -> Result<Self, DatasetError> {
        Ok(Self {
            input_network: load_input_network()?,
            header_network: load_header_network()?,
            headers_order: data::load_headers_order()?,
            known_browsers: data::load_known_browsers()?,
        })
    }

    /// Unconstrained sampling.
    pub fn generate(&self, rng: &mut StdRng) -> Result<BTreeMap<String, String>, GeneratorError> {
        self.generate_with_constraints(rng, &BTreeMap::new(), &BTreeMap::new())
    }

    /// `input_constraints` seed the input network (`*BROWSER`,
    /// `*OPERATING_SYSTEM`, `*DEVICE`); `request_dependent` entries are
    /// written over the merged sample before the header network runs, so a
    /// caller-supplied User-Agent pins the corresponding header node.
    pub fn generate_with_constraints(
        &self,
        rng: &mut StdRng,
        input_constraints: &BTreeMap<String, String>,
        request_dependent: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, GeneratorError> {
        let mut merged = self.input_network.generate_sample(rng, input_constraints)?;
        for (key, value) in request_dependent {
            merged.insert(key.clone(), value.clone());
        }

        let sample = self.header_network.generate_sample(rng, &merged)?;

        let mut headers = BTreeMap::new();
        for (key, value) in sample {
            // * Internal conditioning variables never leave the pipeline.
            if key.starts_with('*') {
                continue;
            }
            if value == MISSING_VALUE_TOKEN {
                continue;
            }
            // * A "close" connection reads as a synthetic client; drop it.
            if key.eq_ignore_ascii_case("connection") && value == "close" {
                continue;
            }
            headers.insert(pascalize(&key), value);
        }
        tracing::debug!(count = headers.len(), "generated header set");
        Ok(headers)
    }

    /// Expected emission order of header names for `browser`, when known.
    /// The generator itself returns a map; callers that must write headers
    /// in browser order consult this table.
    pub fn header_order(&self, browser: &str) -> Option<&[String]> {
        self.headers_order.get(browser).map(Vec::as_slice)
    }

    /// Raw browser descriptor strings shipped with the datasets.
    pub fn known_browsers(&self) -> &[String] {
        &self.known_browsers
    }
}

// * Canonical HTTP casing. Not pure Title-Case: a short list of names is
// * fully uppercased and two prefixes pass through verbatim.
pub(crate) fn pascalize(name: &str) -> String {
    if VERBATIM_HEADER_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
    {
        return name.to_string();
    }
    let lower = name.to_ascii_lowercase();
    if UPPERCASE_HEADER_NAMES.contains(&lower.as_str()) {
        return lower.to_ascii_uppercase();
    }
    name.split('-')
        .map(title_case)
        .collect::<Vec<_>>()
        .join("-")
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}
