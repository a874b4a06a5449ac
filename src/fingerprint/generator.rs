// * Composes the three-network pipeline into the rich fingerprint record:
// * options -> input network -> header network -> fingerprint network ->
// * decode -> shaping. One pass is strictly sequential; a fresh PRNG is
// * built per call so seeded output is reproducible and a generator can be
// * shared behind a plain reference.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use super::options::GeneratorOption;
use super::shaper::{self, ShapeConfig};
use super::types::{
    Fingerprint, NavigatorFingerprint, ScreenConstraints, ScreenFingerprint, VideoCard,
    WindowSize, DEFAULT_WHITELIST,
};
use crate::bayesian::{load_fingerprint_network, BayesianNetwork};
use crate::config::constants::{
    BROWSER_NODE, DEVICE_NODE, MISSING_VALUE_TOKEN, OPERATING_SYSTEM_NODE, STRINGIFIED_PREFIX,
    USER_AGENT_HEADER,
};
use crate::errors::GeneratorError;
use crate::headers::HeaderGenerator;

/// Draws internally consistent browser fingerprints. The loaded networks
/// are immutable; one generator may produce any number of independent
/// fingerprints.
#[derive(Debug)]
pub struct Generator {
    fingerprint_network: BayesianNetwork,
    headers: HeaderGenerator,
    pub(crate) custom_user_agent: Option<String>,
    pub(crate) seed: Option<u64>,
    pub(crate) browser: Option<String>,
    pub(crate) operating_system: Option<String>,
    pub(crate) device: Option<String>,
    pub(crate) enable_whitelist: bool,
    pub(crate) screen_constraints: Option<ScreenConstraints>,
    pub(crate) window_size: Option<WindowSize>,
    pub(crate) firefox_version: Option<String>,
    pub(crate) mock_webrtc: bool,
    pub(crate) slim: bool,
}

impl Generator {
    /// Loads the embedded networks and returns a default generator.
    pub fn new() -> Result<Self, GeneratorError> {
        Ok(Self {
            fingerprint_network: load_fingerprint_network()?,
            headers: HeaderGenerator::new()?,
            custom_user_agent: None,
            seed: None,
            browser: None,
            operating_system: None,
            device: None,
            enable_whitelist: false,
            screen_constraints: None,
            window_size: None,
            firefox_version: None,
            mock_webrtc: false,
            slim: false,
        })
    }

    /// Default generator with `options` applied in order.
    pub fn with_options(
        options: impl IntoIterator<Item = GeneratorOption>,
    ) -> Result<Self, GeneratorError> {
        let mut generator = Self::new()?;
        for option in options {
            option.apply(&mut generator)?;
        }
        Ok(generator)
    }

    /// Real Firefox version substituted over placeholder versions during
    /// shaping.
    pub fn set_firefox_version(&mut self, version: impl Into<String>) {
        self.firefox_version = Some(version.into());
    }

    /// The header generator backing this generator, for callers that need
    /// the auxiliary order/browser tables.
    pub fn header_generator(&self) -> &HeaderGenerator {
        &self.headers
    }

    // * Every call re-derives the PRNG: the configured seed keeps repeated
    // * calls byte-identical, otherwise OS entropy.
    fn build_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn input_constraints(&self) -> BTreeMap<String, String> {
        let mut constraints = BTreeMap::new();
        if let Some(browser) = &self.browser {
            constraints.insert(BROWSER_NODE.to_string(), browser.clone());
        }
        if let Some(os) = &self.operating_system {
            constraints.insert(OPERATING_SYSTEM_NODE.to_string(), os.clone());
        }
        if let Some(device) = &self.device {
            constraints.insert(DEVICE_NODE.to_string(), device.clone());
        }
        constraints
    }

    fn request_dependent(&self) -> BTreeMap<String, String> {
        let mut overrides = BTreeMap::new();
        if let Some(user_agent) = &self.custom_user_agent {
            overrides.insert(USER_AGENT_HEADER.to_string(), user_agent.clone());
        }
        overrides
    }

    /// Generates a fingerprint with matching HTTP headers.
    pub fn generate(&self) -> Result<Fingerprint, GeneratorError> {
        let mut rng = self.build_rng();

        let headers = self.headers.generate_with_constraints(
            &mut rng,
            &self.input_constraints(),
            &self.request_dependent(),
        )?;

        // * The User-Agent threads the two stages together: the fingerprint
        // * network is conditioned on the exact header value.
        let user_agent = headers
            .get(USER_AGENT_HEADER)
            .ok_or(GeneratorError::IncompleteSample("User-Agent header"))?
            .clone();

        let fixed = BTreeMap::from([("userAgent".to_string(), user_agent)]);
        let sample = self.fingerprint_network.generate_sample(&mut rng, &fixed)?;

        let mut fingerprint = build_fingerprint(&sample, headers, self.mock_webrtc, self.slim)?;

        let config = ShapeConfig {
            browser: self.browser.as_deref(),
            screen_constraints: self.screen_constraints.as_ref(),
            window_size: self.window_size.as_ref(),
            firefox_version: self.firefox_version.as_deref(),
            enable_whitelist: self.enable_whitelist,
        };
        if config.is_active() {
            fingerprint = shaper::shape(fingerprint, &config, &mut rng);
        }

        tracing::debug!(
            user_agent = %fingerprint.navigator.user_agent,
            "generated fingerprint"
        );
        Ok(fingerprint)
    }

    /// Runs only the input and header phases. With the whitelist enabled
    /// the returned map is restricted to whitelisted names, always keeping
    /// `User-Agent`.
    pub fn generate_headers_only(&self) -> Result<BTreeMap<String, String>, GeneratorError> {
        let mut rng = self.build_rng();
        let headers = self.headers.generate_with_constraints(
            &mut rng,
            &self.input_constraints(),
            &self.request_dependent(),
        )?;
        if !self.enable_whitelist {
            return Ok(headers);
        }
        let mut filtered = BTreeMap::new();
        for name in DEFAULT_WHITELIST.headers {
            if let Some(value) = headers.get(*name) {
                filtered.insert((*name).to_string(), value.clone());
            }
        }
        if let Some(value) = headers.get(USER_AGENT_HEADER) {
            filtered.insert(USER_AGENT_HEADER.to_string(), value.clone());
        }
        Ok(filtered)
    }
}

// * Decoding. Network samples are flat string maps: structured values
// * arrive behind the *STRINGIFIED* prefix, numeric and boolean fields as
// * bare strings, and *MISSING_VALUE* marks an absent variable.

fn build_fingerprint(
    sample: &BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    mock_webrtc: bool,
    slim: bool,
) -> Result<Fingerprint, GeneratorError> {
    let screen = match stringified_json(sample, "screen")? {
        Some(value) => screen_from_value(&value)?,
        None => ScreenFingerprint::default(),
    };

    let languages: Vec<String> = string_vec(sample, "languages")?;
    let language = languages.first().cloned().unwrap_or_default();

    let user_agent =
        plain_string(sample, "userAgent").ok_or(GeneratorError::IncompleteSample("userAgent"))?;

    let navigator = NavigatorFingerprint {
        user_agent,
        user_agent_data: stringified_json(sample, "userAgentData")?,
        do_not_track: plain_string(sample, "doNotTrack"),
        app_code_name: plain_string(sample, "appCodeName").unwrap_or_default(),
        app_name: plain_string(sample, "appName").unwrap_or_default(),
        app_version: plain_string(sample, "appVersion").unwrap_or_default(),
        oscpu: plain_string(sample, "oscpu"),
        webdriver: bool_from_sample(sample, "webdriver")?.unwrap_or(false),
        language,
        languages,
        platform: plain_string(sample, "platform").unwrap_or_default(),
        device_memory: int_from_sample(sample, "deviceMemory")?,
        hardware_concurrency: int_from_sample(sample, "hardwareConcurrency")?.unwrap_or(0),
        product: plain_string(sample, "product").unwrap_or_default(),
        product_sub: plain_string(sample, "productSub").unwrap_or_default(),
        vendor: plain_string(sample, "vendor").unwrap_or_default(),
        vendor_sub: plain_string(sample, "vendorSub"),
        max_touch_points: int_from_sample(sample, "maxTouchPoints")?.unwrap_or(0),
        extra_properties: stringified_json(sample, "extraProperties")?,
        global_privacy_control: bool_from_sample(sample, "globalPrivacyControl")?,
    };

    let video_card = match stringified_json(sample, "videoCard")? {
        Some(value) => Some(
            serde_json::from_value::<VideoCard>(value)
                .map_err(|err| GeneratorError::decode("videoCard", err.to_string()))?,
        ),
        None => None,
    };

    let multimedia_devices = match stringified_json(sample, "multimediaDevices")? {
        Some(value) => multimedia_devices_from_value(value)?,
        None => Vec::new(),
    };

    Ok(Fingerprint {
        screen,
        navigator,
        headers,
        video_codecs: string_map(sample, "videoCodecs")?,
        audio_codecs: string_map(sample, "audioCodecs")?,
        plugins_data: stringified_json(sample, "pluginsData")?,
        battery: stringified_json(sample, "battery")?,
        video_card,
        multimedia_devices,
        fonts: string_vec(sample, "fonts")?,
        mock_web_rtc: mock_webrtc,
        slim,
    })
}

fn stringified_json(
    sample: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<Option<Value>, GeneratorError> {
    let raw = match sample.get(key) {
        Some(value) if value != MISSING_VALUE_TOKEN && !value.is_empty() => value,
        _ => return Ok(None),
    };
    let payload = raw
        .strip_prefix(STRINGIFIED_PREFIX)
        .ok_or_else(|| GeneratorError::decode(key, "expected a *STRINGIFIED* payload"))?;
    serde_json::from_str(payload)
        .map(Some)
        .map_err(|err| GeneratorError::decode(key, err.to_string()))
}

fn plain_string(sample: &BTreeMap<String, String>, key: &str) -> Option<String> {
    match sample.get(key) {
        Some(value) if value != MISSING_VALUE_TOKEN => Some(value.clone()),
        _ => None,
    }
}

fn int_from_sample(
    sample: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<Option<i64>, GeneratorError> {
    match sample.get(key) {
        Some(value) if value != MISSING_VALUE_TOKEN => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| GeneratorError::decode(key, format!("malformed integer {value:?}"))),
        _ => Ok(None),
    }
}

fn bool_from_sample(
    sample: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<Option<bool>, GeneratorError> {
    match sample.get(key) {
        Some(value) if value != MISSING_VALUE_TOKEN => value
            .parse::<bool>()
            .map(Some)
            .map_err(|_| GeneratorError::decode(key, format!("malformed boolean {value:?}"))),
        _ => Ok(None),
    }
}

fn string_vec(
    sample: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<Vec<String>, GeneratorError> {
    match stringified_json(sample, key)? {
        Some(value) => serde_json::from_value(value)
            .map_err(|err| GeneratorError::decode(key, err.to_string())),
        None => Ok(Vec::new()),
    }
}

fn string_map(
    sample: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<BTreeMap<String, String>, GeneratorError> {
    match stringified_json(sample, key)? {
        Some(value) => serde_json::from_value(value)
            .map_err(|err| GeneratorError::decode(key, err.to_string())),
        None => Ok(BTreeMap::new()),
    }
}

// * Either a plain string array, or an object whose string values are
// * collected in key order so the result is deterministic.
fn multimedia_devices_from_value(value: Value) -> Result<Vec<String>, GeneratorError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                other => Err(GeneratorError::decode(
                    "multimediaDevices",
                    format!("unexpected entry {other}"),
                )),
            })
            .collect(),
        Value::Object(map) => {
            let mut devices = Vec::new();
            for (_, entry) in map {
                if let Value::String(text) = entry {
                    devices.push(text);
                }
            }
            Ok(devices)
        }
        other => Err(GeneratorError::decode(
            "multimediaDevices",
            format!("unexpected payload {other}"),
        )),
    }
}

// * Screen payloads carry numbers, but historical datasets stringified some
// * of them; both spellings are accepted.

fn screen_from_value(value: &Value) -> Result<ScreenFingerprint, GeneratorError> {
    let map = value
        .as_object()
        .ok_or_else(|| GeneratorError::decode("screen", "expected an object"))?;
    Ok(ScreenFingerprint {
        avail_height: int_field(map, "availHeight")?,
        avail_width: int_field(map, "availWidth")?,
        avail_top: int_field(map, "availTop")?,
        avail_left: int_field(map, "availLeft")?,
        color_depth: int_field(map, "colorDepth")?,
        height: int_field(map, "height")?,
        pixel_depth: int_field(map, "pixelDepth")?,
        width: int_field(map, "width")?,
        device_pixel_ratio: float_field(map, "devicePixelRatio")?,
        page_x_offset: int_field(map, "pageXOffset")?,
        page_y_offset: int_field(map, "pageYOffset")?,
        inner_height: int_field(map, "innerHeight")?,
        outer_height: int_field(map, "outerHeight")?,
        outer_width: int_field(map, "outerWidth")?,
        inner_width: int_field(map, "innerWidth")?,
        screen_x: int_field(map, "screenX")?,
        client_width: int_field(map, "clientWidth")?,
        client_height: int_field(map, "clientHeight")?,
        has_hdr: bool_field(map, "hasHDR")?,
    })
}

fn int_field(
    map: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<i64, GeneratorError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .ok_or_else(|| GeneratorError::decode(key, "numeric value out of range")),
        Some(Value::String(text)) => text
            .parse::<i64>()
            .map_err(|_| GeneratorError::decode(key, format!("malformed integer {text:?}"))),
        Some(other) => Err(GeneratorError::decode(
            key,
            format!("unexpected type {other}"),
        )),
    }
}

fn float_field(
    map: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<f64, GeneratorError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| GeneratorError::decode(key, "numeric value out of range")),
        Some(Value::String(text)) => text
            .parse::<f64>()
            .map_err(|_| GeneratorError::decode(key, format!("malformed number {text:?}"))),
        Some(other) => Err(GeneratorError::decode(
            key,
            format!("unexpected type {other}"),
        )),
    }
}

fn bool_field(
    map: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<bool, GeneratorError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(Value::String(text)) => text
            .parse::<bool>()
            .map_err(|_| GeneratorError::decode(key, format!("malformed boolean {text:?}"))),
        Some(other) => Err(GeneratorError::decode(
            key,
            format!("unexpected type {other}"),
        )),
    }
}
