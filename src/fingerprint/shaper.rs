// * Post-sampling constraint pipeline. Steps run in a fixed order; later
// * steps may observe earlier results. A negative pageYOffset produced by
// * step 4 is deliberately left in place: the falsy clamp has already run.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::Rng;
use regex::{Captures, Regex};
use serde_json::Value;

use super::types::{
    Fingerprint, NavigatorFingerprint, PropertyWhitelist, ScreenConstraints, ScreenFingerprint,
    WindowSize, DEFAULT_WHITELIST,
};
use crate::config::constants::USER_AGENT_HEADER;

// * A 1xx placeholder major with a dotted minor. The leading boundary group
// * stands in for a lookbehind so a longer number (2133.0) never matches.
static PLACEHOLDER_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^0-9])(1[0-9]{2})(\.[0-9]+)").unwrap());

static FIREFOX_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Firefox/([0-9]+(?:\.[0-9]+)?)").unwrap());

/// Shaping configuration snapshot handed over by the generator.
pub(crate) struct ShapeConfig<'a> {
    pub browser: Option<&'a str>,
    pub screen_constraints: Option<&'a ScreenConstraints>,
    pub window_size: Option<&'a WindowSize>,
    pub firefox_version: Option<&'a str>,
    pub enable_whitelist: bool,
}

impl ShapeConfig<'_> {
    pub(crate) fn is_active(&self) -> bool {
        self.enable_whitelist
            || self.screen_constraints.is_some()
            || self.window_size.is_some()
            || self.firefox_version.is_some()
    }
}

pub(crate) fn shape(
    fingerprint: Fingerprint,
    config: &ShapeConfig<'_>,
    rng: &mut StdRng,
) -> Fingerprint {
    let mut fingerprint = fingerprint;

    // * Step 1: clamp negative screen values to zero.
    clamp_falsy_screen_values(&mut fingerprint.screen);

    // * Step 2: cap dimensions at the physical monitor bounds.
    if let Some(constraints) = config.screen_constraints {
        apply_screen_constraints(&mut fingerprint.screen, constraints);
    }

    // * Step 3: override the outer window size.
    if let Some(window) = config.window_size {
        apply_window_size(&mut fingerprint.screen, window);
    }

    // * Step 4: place the window realistically on the screen.
    position_screen(&mut fingerprint.screen, rng);

    // * Step 5: stamp the real Firefox version over the placeholder. With
    // * no configured version, fall back to the one in the User-Agent.
    if let (Some("firefox"), Some(version)) = (config.browser, config.firefox_version) {
        rewrite_firefox_version(&mut fingerprint.navigator, version);
    } else if let Some(detected) = extract_firefox_version(&fingerprint.navigator.user_agent) {
        rewrite_firefox_version(&mut fingerprint.navigator, &detected);
    }

    // * Step 6: project onto the closed property whitelist.
    if config.enable_whitelist {
        fingerprint = whitelist_properties(&fingerprint, &DEFAULT_WHITELIST);
    }

    fingerprint
}

pub(crate) fn clamp_falsy_screen_values(screen: &mut ScreenFingerprint) {
    for value in [
        &mut screen.avail_height,
        &mut screen.avail_width,
        &mut screen.avail_top,
        &mut screen.avail_left,
        &mut screen.height,
        &mut screen.width,
        &mut screen.inner_height,
        &mut screen.inner_width,
        &mut screen.outer_height,
        &mut screen.outer_width,
        &mut screen.screen_x,
        &mut screen.page_x_offset,
        &mut screen.page_y_offset,
    ] {
        if *value < 0 {
            *value = 0;
        }
    }
}

pub(crate) fn apply_screen_constraints(
    screen: &mut ScreenFingerprint,
    constraints: &ScreenConstraints,
) {
    screen.width = screen.width.min(constraints.max_width);
    screen.height = screen.height.min(constraints.max_height);
    screen.avail_width = screen.avail_width.min(constraints.max_width);
    screen.avail_height = screen.avail_height.min(constraints.max_height);

    // * Inner dimensions can never exceed the screen itself.
    screen.inner_width = screen.inner_width.min(screen.width);
    screen.inner_height = screen.inner_height.min(screen.height);
}

pub(crate) fn apply_window_size(screen: &mut ScreenFingerprint, window: &WindowSize) {
    // * Center horizontally; the chrome delta between inner and outer
    // * dimensions carries over to the new size.
    screen.screen_x += (screen.width - window.width) / 2;
    screen.page_x_offset = (screen.width - window.width) / 2;
    screen.inner_width = (window.width - screen.outer_width + screen.inner_width).max(0);
    screen.inner_height = (window.height - screen.outer_height + screen.inner_height).max(0);
    screen.outer_width = window.width;
    screen.outer_height = window.height;
}

pub(crate) fn position_screen(screen: &mut ScreenFingerprint, rng: &mut StdRng) {
    let sx = screen.screen_x;
    if sx == 0 {
        screen.screen_x = 0;
        screen.page_x_offset = 0;
        screen.page_y_offset = 0;
        return;
    }
    if (-50..=50).contains(&sx) {
        // * Small offsets mirror straight onto the vertical axis.
        screen.page_y_offset = sx;
        return;
    }
    let max_y = screen.avail_height - screen.outer_height;
    screen.page_y_offset = if max_y == 0 {
        0
    } else if max_y > 0 {
        rng.gen_range(0..max_y)
    } else {
        // * Window taller than the available area: offset lands in
        // * [maxY, 0) and stays negative.
        max_y + rng.gen_range(0..-max_y)
    };
}

// * Replaces the placeholder major while keeping the sampled minor suffix.
// * Only the major component of the configured version is substituted, so
// * repeated application is a no-op.
pub(crate) fn rewrite_firefox_version(navigator: &mut NavigatorFingerprint, real_version: &str) {
    if real_version.is_empty() {
        return;
    }
    let major = real_version.split('.').next().unwrap_or(real_version);
    navigator.user_agent = substitute_version(&navigator.user_agent, major);
    navigator.app_version = substitute_version(&navigator.app_version, major);
    if let Some(oscpu) = navigator.oscpu.as_mut() {
        *oscpu = substitute_version(oscpu, major);
    }
}

fn substitute_version(text: &str, major: &str) -> String {
    PLACEHOLDER_VERSION_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], major, &caps[3])
        })
        .into_owned()
}

pub(crate) fn extract_firefox_version(user_agent: &str) -> Option<String> {
    FIREFOX_TOKEN_REGEX
        .captures(user_agent)
        .map(|caps| caps[1].to_string())
}

// * Projects the record onto the closed whitelist. screenY aliases
// * pageYOffset; User-Agent always survives so the header map and the
// * navigator stay in agreement.
fn whitelist_properties(fingerprint: &Fingerprint, whitelist: &PropertyWhitelist) -> Fingerprint {
    let mut result = Fingerprint::default();

    for property in whitelist.screen {
        let screen = &mut result.screen;
        let source = &fingerprint.screen;
        match *property {
            "availHeight" => screen.avail_height = source.avail_height,
            "availWidth" => screen.avail_width = source.avail_width,
            "availTop" => screen.avail_top = source.avail_top,
            "availLeft" => screen.avail_left = source.avail_left,
            "width" => screen.width = source.width,
            "height" => screen.height = source.height,
            "colorDepth" => screen.color_depth = source.color_depth,
            "pixelDepth" => screen.pixel_depth = source.pixel_depth,
            "pageXOffset" => screen.page_x_offset = source.page_x_offset,
            "pageYOffset" | "screenY" => screen.page_y_offset = source.page_y_offset,
            "outerWidth" => screen.outer_width = source.outer_width,
            "outerHeight" => screen.outer_height = source.outer_height,
            "innerWidth" => screen.inner_width = source.inner_width,
            "innerHeight" => screen.inner_height = source.inner_height,
            "screenX" => screen.screen_x = source.screen_x,
            _ => {}
        }
    }

    for property in whitelist.navigator {
        let navigator = &mut result.navigator;
        let source = &fingerprint.navigator;
        match *property {
            "userAgent" => navigator.user_agent = source.user_agent.clone(),
            "doNotTrack" => navigator.do_not_track = source.do_not_track.clone(),
            "appCodeName" => navigator.app_code_name = source.app_code_name.clone(),
            "appName" => navigator.app_name = source.app_name.clone(),
            "appVersion" => navigator.app_version = source.app_version.clone(),
            "oscpu" => navigator.oscpu = source.oscpu.clone(),
            "platform" => navigator.platform = source.platform.clone(),
            "hardwareConcurrency" => navigator.hardware_concurrency = source.hardware_concurrency,
            "product" => navigator.product = source.product.clone(),
            "maxTouchPoints" => navigator.max_touch_points = source.max_touch_points,
            "globalPrivacyControl" => {
                navigator.global_privacy_control = source.global_privacy_control
            }
            _ => {}
        }
    }

    for name in whitelist.headers {
        if let Some(value) = fingerprint.headers.get(*name) {
            result.headers.insert((*name).to_string(), value.clone());
        }
    }
    if let Some(value) = fingerprint.headers.get(USER_AGENT_HEADER) {
        result
            .headers
            .insert(USER_AGENT_HEADER.to_string(), value.clone());
    }

    if let Some(battery) = fingerprint.battery.as_ref().and_then(Value::as_object) {
        let mut filtered = serde_json::Map::new();
        for property in whitelist.battery {
            if let Some(value) = battery.get(*property) {
                filtered.insert((*property).to_string(), value.clone());
            }
        }
        result.battery = Some(Value::Object(filtered));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use serde_json::json;

    fn desktop_screen() -> ScreenFingerprint {
        ScreenFingerprint {
            avail_height: 1040,
            avail_width: 1920,
            avail_top: 0,
            avail_left: 0,
            color_depth: 24,
            height: 1080,
            pixel_depth: 24,
            width: 1920,
            device_pixel_ratio: 1.0,
            page_x_offset: 0,
            page_y_offset: 0,
            inner_height: 919,
            outer_height: 1040,
            outer_width: 1920,
            inner_width: 1905,
            screen_x: 0,
            client_width: 1888,
            client_height: 919,
            has_hdr: false,
        }
    }

    #[test]
    fn test_falsy_clamp_zeroes_negatives() {
        let mut screen = desktop_screen();
        screen.screen_x = -12;
        screen.page_y_offset = -300;
        screen.avail_left = -1;
        clamp_falsy_screen_values(&mut screen);
        assert_eq!(screen.screen_x, 0);
        assert_eq!(screen.page_y_offset, 0);
        assert_eq!(screen.avail_left, 0);
        // * Positive values are untouched.
        assert_eq!(screen.width, 1920);
    }

    #[test]
    fn test_screen_constraints_clamp_dimensions() {
        let mut screen = desktop_screen();
        screen.width = 2560;
        screen.avail_width = 2560;
        screen.inner_width = 2543;
        let constraints = ScreenConstraints {
            max_width: 1920,
            max_height: 1080,
        };
        apply_screen_constraints(&mut screen, &constraints);
        assert_eq!(screen.width, 1920);
        assert_eq!(screen.avail_width, 1920);
        assert!(screen.inner_width <= screen.width);
        assert!(screen.inner_height <= screen.height);
    }

    #[test]
    fn test_window_size_preserves_chrome_delta() {
        let mut screen = desktop_screen();
        let window = WindowSize {
            width: 1200,
            height: 800,
        };
        apply_window_size(&mut screen, &window);
        assert_eq!(screen.outer_width, 1200);
        assert_eq!(screen.outer_height, 800);
        // * 1920 -> 1200 centers at (1920 - 1200) / 2 = 360.
        assert_eq!(screen.screen_x, 360);
        assert_eq!(screen.page_x_offset, 360);
        // * inner = window - old outer + old inner, floored at zero.
        assert_eq!(screen.inner_width, 1200 - 1920 + 1905);
        assert_eq!(screen.inner_height, (800 - 1040 + 919).max(0));
    }

    #[test]
    fn test_window_size_floors_inner_dimensions_at_zero() {
        let mut screen = desktop_screen();
        screen.inner_height = 10;
        let window = WindowSize {
            width: 100,
            height: 100,
        };
        apply_window_size(&mut screen, &window);
        assert_eq!(screen.inner_width, 0);
        assert_eq!(screen.inner_height, 0);
    }

    #[test]
    fn test_positioning_zero_screen_x_zeroes_offsets() {
        let mut screen = desktop_screen();
        screen.page_x_offset = 33;
        screen.page_y_offset = 44;
        let mut rng = StdRng::seed_from_u64(1);
        position_screen(&mut screen, &mut rng);
        assert_eq!(screen.screen_x, 0);
        assert_eq!(screen.page_x_offset, 0);
        assert_eq!(screen.page_y_offset, 0);
    }

    #[test]
    fn test_positioning_small_offset_mirrors_to_vertical() {
        for sx in [-50, -7, 13, 50] {
            let mut screen = desktop_screen();
            screen.screen_x = sx;
            let mut rng = StdRng::seed_from_u64(1);
            position_screen(&mut screen, &mut rng);
            assert_eq!(screen.page_y_offset, sx);
        }
    }

    #[test]
    fn test_positioning_draws_within_positive_max_y() {
        let mut screen = desktop_screen();
        screen.screen_x = 200;
        // * maxY = 1040 - 1040 would be zero; shrink the window.
        screen.outer_height = 800;
        let mut rng = StdRng::seed_from_u64(9);
        position_screen(&mut screen, &mut rng);
        assert!(screen.page_y_offset >= 0);
        assert!(screen.page_y_offset < 240);
    }

    #[test]
    fn test_positioning_zero_max_y() {
        let mut screen = desktop_screen();
        screen.screen_x = 200;
        assert_eq!(screen.avail_height, screen.outer_height);
        let mut rng = StdRng::seed_from_u64(9);
        position_screen(&mut screen, &mut rng);
        assert_eq!(screen.page_y_offset, 0);
    }

    #[test]
    fn test_positioning_negative_max_y_stays_negative() {
        // * Window taller than the available area. The offset lands in
        // * [maxY, 0) and, because the falsy clamp already ran, persists.
        let mut screen = desktop_screen();
        screen.screen_x = 200;
        screen.outer_height = 1100;
        let mut rng = StdRng::seed_from_u64(9);
        position_screen(&mut screen, &mut rng);
        assert!(screen.page_y_offset >= -60);
        assert!(screen.page_y_offset < 0);
    }

    fn firefox_navigator() -> NavigatorFingerprint {
        NavigatorFingerprint {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0"
                .to_string(),
            app_version: "5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0"
                .to_string(),
            oscpu: Some("Linux x86_64".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_version_rewrite_replaces_major_keeps_minor() {
        let mut navigator = firefox_navigator();
        rewrite_firefox_version(&mut navigator, "115.0");
        assert_eq!(
            navigator.user_agent,
            "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0"
        );
        assert_eq!(
            navigator.app_version,
            "5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0"
        );
    }

    #[test]
    fn test_version_rewrite_is_idempotent() {
        let mut once = firefox_navigator();
        rewrite_firefox_version(&mut once, "115.0");
        let mut twice = once.clone();
        rewrite_firefox_version(&mut twice, "115.0");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_version_rewrite_ignores_longer_numbers() {
        let mut navigator = firefox_navigator();
        navigator.user_agent = "build 2133.0 Firefox/133.0".to_string();
        rewrite_firefox_version(&mut navigator, "115");
        assert_eq!(navigator.user_agent, "build 2133.0 Firefox/115.0");
    }

    #[test]
    fn test_version_rewrite_touches_oscpu() {
        let mut navigator = firefox_navigator();
        navigator.oscpu = Some("rv:133.0 test".to_string());
        rewrite_firefox_version(&mut navigator, "128.3");
        assert_eq!(navigator.oscpu.as_deref(), Some("rv:128.0 test"));
    }

    #[test]
    fn test_extract_firefox_version() {
        assert_eq!(
            extract_firefox_version("Mozilla/5.0 Gecko/20100101 Firefox/133.0").as_deref(),
            Some("133.0")
        );
        assert_eq!(
            extract_firefox_version("Mozilla/5.0 Firefox/121").as_deref(),
            Some("121")
        );
        assert_eq!(
            extract_firefox_version("Mozilla/5.0 Chrome/131.0.0.0 Safari/537.36"),
            None
        );
    }

    #[test]
    fn test_whitelist_projects_screen_and_navigator() {
        let mut fingerprint = Fingerprint {
            screen: desktop_screen(),
            navigator: firefox_navigator(),
            ..Default::default()
        };
        fingerprint.screen.page_y_offset = 77;
        fingerprint.navigator.vendor = "should vanish".to_string();
        fingerprint.navigator.languages = vec!["en-US".to_string()];
        fingerprint
            .headers
            .insert("User-Agent".to_string(), "ua".to_string());
        fingerprint
            .headers
            .insert("Accept-Encoding".to_string(), "gzip".to_string());
        fingerprint
            .headers
            .insert("Accept".to_string(), "text/html".to_string());
        fingerprint.fonts = vec!["Arial".to_string()];

        let projected = whitelist_properties(&fingerprint, &DEFAULT_WHITELIST);

        assert_eq!(projected.navigator.user_agent, fingerprint.navigator.user_agent);
        assert_eq!(projected.navigator.vendor, "");
        assert!(projected.navigator.languages.is_empty());
        // * screenY alias lands on pageYOffset.
        assert_eq!(projected.screen.page_y_offset, 77);
        assert_eq!(projected.screen.width, fingerprint.screen.width);
        assert!(projected.fonts.is_empty());
        assert_eq!(
            projected.headers.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Accept-Encoding", "User-Agent"]
        );
    }

    #[test]
    fn test_whitelist_filters_battery_keys() {
        let fingerprint = Fingerprint {
            battery: Some(json!({
                "charging": true,
                "chargingTime": 0,
                "dischargingTime": null,
                "level": 0.93
            })),
            ..Default::default()
        };
        let projected = whitelist_properties(&fingerprint, &DEFAULT_WHITELIST);
        let battery = projected.battery.unwrap();
        assert_eq!(battery["charging"], json!(true));
        assert!(battery.get("level").is_none());
    }
}
