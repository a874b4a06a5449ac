use identity_forge::fingerprint::ScreenFingerprint;
use identity_forge::{Fingerprint, Generator, GeneratorOption};

fn screen_dimensions(screen: &ScreenFingerprint) -> [i64; 13] {
    [
        screen.avail_height,
        screen.avail_width,
        screen.avail_top,
        screen.avail_left,
        screen.height,
        screen.width,
        screen.inner_height,
        screen.inner_width,
        screen.outer_height,
        screen.outer_width,
        screen.screen_x,
        screen.page_x_offset,
        screen.page_y_offset,
    ]
}

#[test]
fn test_default_generation_is_consistent() {
    let generator = Generator::with_options([GeneratorOption::Seed(1)]).unwrap();
    let fingerprint = generator.generate().unwrap();

    let user_agent = &fingerprint.headers["User-Agent"];
    assert!(!user_agent.is_empty());
    assert_eq!(&fingerprint.navigator.user_agent, user_agent);
    for dimension in screen_dimensions(&fingerprint.screen) {
        assert!(dimension >= 0);
    }
}

#[test]
fn test_chrome_on_windows_identity() {
    let generator = Generator::with_options([
        GeneratorOption::Browser("chrome".to_string()),
        GeneratorOption::OperatingSystem("windows".to_string()),
        GeneratorOption::Seed(1),
    ])
    .unwrap();
    let fingerprint = generator.generate().unwrap();

    let user_agent = &fingerprint.headers["User-Agent"];
    assert!(user_agent.contains("Chrome"));
    assert!(!user_agent.contains("Firefox"));
    assert!(fingerprint.navigator.platform.starts_with("Win"));
}

#[test]
fn test_user_agent_propagates_to_navigator() {
    for seed in 0..16u64 {
        let generator = Generator::with_options([GeneratorOption::Seed(seed)]).unwrap();
        let fingerprint = generator.generate().unwrap();
        assert_eq!(
            fingerprint.navigator.user_agent,
            fingerprint.headers["User-Agent"]
        );
    }
}

#[test]
fn test_language_heads_the_languages_list() {
    for seed in 0..16u64 {
        let generator = Generator::with_options([GeneratorOption::Seed(seed)]).unwrap();
        let fingerprint = generator.generate().unwrap();
        if !fingerprint.navigator.languages.is_empty() {
            assert_eq!(
                fingerprint.navigator.language,
                fingerprint.navigator.languages[0]
            );
        }
    }
}

#[test]
fn test_no_sentinels_survive_decoding() {
    for seed in 0..16u64 {
        let generator = Generator::with_options([GeneratorOption::Seed(seed)]).unwrap();
        let fingerprint = generator.generate().unwrap();
        let serialized = serde_json::to_string(&fingerprint).unwrap();
        assert!(!serialized.contains("*MISSING_VALUE*"));
        assert!(!serialized.contains("*STRINGIFIED*"));
        assert!(!serialized.contains("\"*BROWSER\""));
    }
}

#[test]
fn test_generation_is_byte_identical_under_seed() {
    for seed in [0u64, 1, 42, (1u64 << 63) - 1] {
        let generator = Generator::with_options([GeneratorOption::Seed(seed)]).unwrap();
        let first = serde_json::to_string(&generator.generate().unwrap()).unwrap();
        let second = serde_json::to_string(&generator.generate().unwrap()).unwrap();
        assert_eq!(first, second, "seed {seed} diverged");
    }
}

#[test]
fn test_identical_configurations_agree() {
    let build = || {
        Generator::with_options([
            GeneratorOption::Seed(42),
            GeneratorOption::Browser("firefox".to_string()),
            GeneratorOption::OperatingSystem("linux".to_string()),
        ])
        .unwrap()
    };
    let first: Fingerprint = build().generate().unwrap();
    let second: Fingerprint = build().generate().unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_custom_user_agent_reaches_the_fingerprint() {
    let custom = "Mozilla/5.0 (compatible; ForgeBot/2.0)";
    let generator = Generator::with_options([
        GeneratorOption::CustomUserAgent(custom.to_string()),
        GeneratorOption::Seed(5),
    ])
    .unwrap();
    let fingerprint = generator.generate().unwrap();
    assert_eq!(fingerprint.headers["User-Agent"], custom);
    assert_eq!(fingerprint.navigator.user_agent, custom);
}

#[test]
fn test_codecs_and_devices_are_populated() {
    let generator = Generator::with_options([GeneratorOption::Seed(2)]).unwrap();
    let fingerprint = generator.generate().unwrap();
    assert!(!fingerprint.audio_codecs.is_empty());
    assert!(!fingerprint.video_codecs.is_empty());
    assert!(!fingerprint.multimedia_devices.is_empty());
    assert!(!fingerprint.fonts.is_empty());
    assert!(fingerprint.video_card.is_some());
}

#[test]
fn test_flags_default_to_false_and_are_omitted() {
    let generator = Generator::with_options([GeneratorOption::Seed(2)]).unwrap();
    let fingerprint = generator.generate().unwrap();
    assert!(!fingerprint.mock_web_rtc);
    assert!(!fingerprint.slim);
    let serialized = serde_json::to_string(&fingerprint).unwrap();
    assert!(!serialized.contains("mockWebRTC"));
}
