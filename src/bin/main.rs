use std::process;

use identity_forge::fingerprint::Generator;
use identity_forge::ops::telemetry;
use serde_json::json;

fn main() {
    telemetry::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        let program = args.first().map(String::as_str).unwrap_or("identity-forge");
        eprintln!("Usage: {program} [headers|fingerprint|all]");
        process::exit(1);
    };

    let generator = match Generator::new() {
        Ok(generator) => generator,
        Err(err) => fail("initializing generator", err),
    };

    match command.as_str() {
        "headers" => match generator.generate_headers_only() {
            Ok(headers) => print_json(&headers),
            Err(err) => fail("generating headers", err),
        },
        "fingerprint" | "all" => match generator.generate() {
            Ok(fingerprint) => {
                if command == "all" {
                    print_json(&fingerprint);
                } else {
                    // * Reduced view without the header map.
                    let reduced = json!({
                        "userAgent": fingerprint.navigator.user_agent,
                        "userAgentData": fingerprint.navigator.user_agent_data,
                        "appVersion": fingerprint.navigator.app_version,
                        "oscpu": fingerprint.navigator.oscpu,
                        "product": fingerprint.navigator.product,
                        "hardwareConcurrency": fingerprint.navigator.hardware_concurrency,
                        "deviceMemory": fingerprint.navigator.device_memory,
                        "extraProperties": fingerprint.navigator.extra_properties,
                        "screen": fingerprint.screen,
                        "audioCodecs": fingerprint.audio_codecs,
                        "videoCodecs": fingerprint.video_codecs,
                        "pluginsData": fingerprint.plugins_data,
                        "multimediaDevices": fingerprint.multimedia_devices,
                        "battery": fingerprint.battery,
                        "fonts": fingerprint.fonts,
                    });
                    print_json(&reduced);
                }
            }
            Err(err) => fail("generating fingerprint", err),
        },
        unknown => {
            eprintln!("Unknown command: {unknown}");
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(output) => println!("{output}"),
        Err(err) => fail("serializing output", err),
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("Error {context}: {err}");
    process::exit(1);
}
