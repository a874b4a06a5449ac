// * Rich fingerprint records mirroring the JavaScript-observable surface.
// * Field names serialize in camelCase to match what page scripts read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Screen and window geometry as a page script observes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenFingerprint {
    pub avail_height: i64,
    pub avail_width: i64,
    pub avail_top: i64,
    pub avail_left: i64,
    pub color_depth: i64,
    pub height: i64,
    pub pixel_depth: i64,
    pub width: i64,
    pub device_pixel_ratio: f64,
    pub page_x_offset: i64,
    pub page_y_offset: i64,
    pub inner_height: i64,
    pub outer_height: i64,
    pub outer_width: i64,
    pub inner_width: i64,
    pub screen_x: i64,
    pub client_width: i64,
    pub client_height: i64,
    #[serde(rename = "hasHDR")]
    pub has_hdr: bool,
}

/// The navigator object. Optional fields are absent on browsers that do
/// not expose them and are skipped in the serialized record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorFingerprint {
    pub user_agent: String,
    pub user_agent_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub do_not_track: Option<String>,
    pub app_code_name: String,
    pub app_name: String,
    pub app_version: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub oscpu: Option<String>,
    pub webdriver: bool,
    pub language: String,
    pub languages: Vec<String>,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub device_memory: Option<i64>,
    pub hardware_concurrency: i64,
    pub product: String,
    pub product_sub: String,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vendor_sub: Option<String>,
    pub max_touch_points: i64,
    pub extra_properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub global_privacy_control: Option<bool>,
}

/// WebGL renderer identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoCard {
    pub renderer: String,
    pub vendor: String,
}

/// The complete generated identity: headers plus every navigator, screen,
/// codec and device property a page script could cross-check against them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub screen: ScreenFingerprint,
    pub navigator: NavigatorFingerprint,
    pub headers: BTreeMap<String, String>,
    pub video_codecs: BTreeMap<String, String>,
    pub audio_codecs: BTreeMap<String, String>,
    pub plugins_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub battery: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub video_card: Option<VideoCard>,
    pub multimedia_devices: Vec<String>,
    pub fonts: Vec<String>,
    #[serde(rename = "mockWebRTC", skip_serializing_if = "is_false", default)]
    pub mock_web_rtc: bool,
    #[serde(skip_serializing_if = "is_false", default)]
    pub slim: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Maximum physical monitor bounds a generated screen may claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenConstraints {
    pub max_width: i64,
    pub max_height: i64,
}

/// Outer window override applied during shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: i64,
    pub height: i64,
}

/// Closed property whitelist applied in Camoufox mode.
#[derive(Debug, Clone, Copy)]
pub struct PropertyWhitelist {
    pub navigator: &'static [&'static str],
    pub screen: &'static [&'static str],
    pub headers: &'static [&'static str],
    pub battery: &'static [&'static str],
}

// * The Camoufox whitelist. screenY is an alias for pageYOffset; the
// * screen record has no separate field for it.
pub const DEFAULT_WHITELIST: PropertyWhitelist = PropertyWhitelist {
    navigator: &[
        "userAgent",
        "doNotTrack",
        "appCodeName",
        "appName",
        "appVersion",
        "oscpu",
        "platform",
        "hardwareConcurrency",
        "product",
        "maxTouchPoints",
        "globalPrivacyControl",
    ],
    screen: &[
        "availLeft",
        "availTop",
        "availWidth",
        "availHeight",
        "width",
        "height",
        "colorDepth",
        "pixelDepth",
        "pageXOffset",
        "pageYOffset",
        "outerWidth",
        "outerHeight",
        "innerWidth",
        "innerHeight",
        "screenX",
        "screenY",
    ],
    headers: &["Accept-Encoding"],
    battery: &["charging", "chargingTime", "dischargingTime"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_serializes_camel_case() {
        let screen = ScreenFingerprint {
            avail_height: 1040,
            has_hdr: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&screen).unwrap();
        assert!(json.contains("\"availHeight\":1040"));
        assert!(json.contains("\"hasHDR\":true"));
        assert!(json.contains("\"pageXOffset\""));
    }

    #[test]
    fn test_absent_optionals_are_skipped() {
        let fingerprint = Fingerprint::default();
        let json = serde_json::to_string(&fingerprint).unwrap();
        assert!(!json.contains("battery"));
        assert!(!json.contains("videoCard"));
        assert!(!json.contains("mockWebRTC"));
        assert!(!json.contains("slim"));
        assert!(!json.contains("deviceMemory"));
    }

    #[test]
    fn test_flags_serialize_when_set() {
        let fingerprint = Fingerprint {
            mock_web_rtc: true,
            slim: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&fingerprint).unwrap();
        assert!(json.contains("\"mockWebRTC\":true"));
        assert!(json.contains("\"slim\":true"));
    }
}
