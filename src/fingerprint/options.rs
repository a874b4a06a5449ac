// * Generator configuration. Options are applied in declaration order, so
// * a seed influences any preset that follows it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::generator::Generator;
use super::types::{ScreenConstraints, WindowSize};
use crate::config::constants::CAMOUFOX_OPERATING_SYSTEMS;
use crate::errors::GeneratorError;

/// A single configuration choice for a [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorOption {
    /// Pin the `User-Agent` header; every other variable adapts to it.
    CustomUserAgent(String),
    /// Fixed seed: identical configuration produces identical output.
    Seed(u64),
    /// `desktop`, `mobile` or `tablet`.
    DeviceCategory(String),
    /// Browser family to emulate (`chrome`, `firefox`, ...).
    Browser(String),
    /// Operating system to emulate (`windows`, `macos`, ...).
    OperatingSystem(String),
    /// Firefox-on-desktop identity with the closed property whitelist.
    CamoufoxConstraints,
    /// Maximum physical screen dimensions. Rejects non-positive values.
    ScreenConstraints { max_width: i64, max_height: i64 },
    /// Outer window size override. Rejects non-positive values.
    WindowSize { width: i64, height: i64 },
}

impl GeneratorOption {
    pub(crate) fn apply(self, generator: &mut Generator) -> Result<(), GeneratorError> {
        match self {
            Self::CustomUserAgent(user_agent) => generator.custom_user_agent = Some(user_agent),
            Self::Seed(seed) => generator.seed = Some(seed),
            Self::DeviceCategory(device) => generator.device = Some(device),
            Self::Browser(browser) => generator.browser = Some(browser),
            Self::OperatingSystem(os) => generator.operating_system = Some(os),
            Self::CamoufoxConstraints => apply_camoufox_preset(generator),
            Self::ScreenConstraints {
                max_width,
                max_height,
            } => {
                if max_width <= 0 || max_height <= 0 {
                    return Err(GeneratorError::InvalidOption(
                        "screen constraint dimensions must be positive".to_string(),
                    ));
                }
                generator.screen_constraints = Some(ScreenConstraints {
                    max_width,
                    max_height,
                });
            }
            Self::WindowSize { width, height } => {
                if width <= 0 || height <= 0 {
                    return Err(GeneratorError::InvalidOption(
                        "window size dimensions must be positive".to_string(),
                    ));
                }
                generator.window_size = Some(WindowSize { width, height });
            }
        }
        Ok(())
    }
}

// * The preset pins Firefox, draws one desktop OS (seeded when a seed was
// * already applied) and turns the property whitelist on.
fn apply_camoufox_preset(generator: &mut Generator) {
    generator.browser = Some("firefox".to_string());
    let os = match generator.seed {
        Some(seed) => CAMOUFOX_OPERATING_SYSTEMS
            .choose(&mut StdRng::seed_from_u64(seed))
            .copied(),
        None => CAMOUFOX_OPERATING_SYSTEMS
            .choose(&mut rand::thread_rng())
            .copied(),
    };
    generator.operating_system = os.map(str::to_string);
    generator.enable_whitelist = true;
}
