// * Embedded statistical datasets
// * Five JSON blobs compiled into the binary: three Bayesian network
// * definitions plus two auxiliary lookup tables. All immutable inputs.

use std::collections::BTreeMap;

use thiserror::Error;

/// Serialized input network: device class, OS, browser family, HTTP spec.
pub const INPUT_NETWORK: &str = include_str!("input-network.json");

/// Serialized header network: HTTP header values conditioned on the input
/// network's identity variables.
pub const HEADER_NETWORK: &str = include_str!("header-network.json");

/// Serialized fingerprint network: navigator/screen/codec values
/// conditioned on the generated User-Agent.
pub const FINGERPRINT_NETWORK: &str = include_str!("fingerprint-network.json");

/// Browser name to expected header emission order.
pub const HEADERS_ORDER: &str = include_str!("headers-order.json");

/// Raw browser descriptor strings shipped with the networks.
pub const BROWSER_HELPER_FILE: &str = include_str!("browser-helper-file.json");

// * Load failures are fatal: no generator is useful without its datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to parse embedded dataset {name}: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset {name} is structurally malformed: {reason}")]
    Malformed { name: &'static str, reason: String },
}

/// Parses the browser -> ordered header-name table.
pub fn load_headers_order() -> Result<BTreeMap<String, Vec<String>>, DatasetError> {
    serde_json::from_str(HEADERS_ORDER).map_err(|source| DatasetError::Parse {
        name: "headers-order.json",
        source,
    })
}

/// Parses the raw browser descriptor list.
pub fn load_known_browsers() -> Result<Vec<String>, DatasetError> {
    serde_json::from_str(BROWSER_HELPER_FILE).map_err(|source| DatasetError::Parse {
        name: "browser-helper-file.json",
        source,
    })
}
