// * Configuration Constants
// * Central location for sampling sentinels and header-casing rules

/// Sentinel emitted by the networks for a variable that carries no value in
/// this sample. Consumers must treat the variable as absent.
pub const MISSING_VALUE_TOKEN: &str = "*MISSING_VALUE*";

/// Prefix marking a sampled value whose remainder is a JSON literal.
pub const STRINGIFIED_PREFIX: &str = "*STRINGIFIED*";

// * Internal conditioning variables understood by the input network.
// * Names starting with '*' never appear in emitted output.
pub const BROWSER_NODE: &str = "*BROWSER";
pub const OPERATING_SYSTEM_NODE: &str = "*OPERATING_SYSTEM";
pub const DEVICE_NODE: &str = "*DEVICE";

/// Canonical casing of the user-agent header, used across the pipeline.
pub const USER_AGENT_HEADER: &str = "User-Agent";

// * Header names that are fully uppercased instead of Title-Cased.
pub const UPPERCASE_HEADER_NAMES: [&str; 3] = ["dnt", "rtt", "ect"];

// * Header-name prefixes preserved verbatim by canonicalization.
pub const VERBATIM_HEADER_PREFIXES: [&str; 2] = [":", "sec-ch-ua"];

// * Desktop operating systems eligible for the Camoufox preset.
pub const CAMOUFOX_OPERATING_SYSTEMS: [&str; 3] = ["linux", "macos", "windows"];
