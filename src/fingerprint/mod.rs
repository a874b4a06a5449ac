// * Fingerprint record types, the composing generator, its configuration
// * options and the post-sampling shaping stage.

pub mod generator;
pub mod options;
mod shaper;
pub mod types;

pub use generator::Generator;
pub use options::GeneratorOption;
pub use types::{
    Fingerprint, NavigatorFingerprint, PropertyWhitelist, ScreenConstraints, ScreenFingerprint,
    VideoCard, WindowSize, DEFAULT_WHITELIST,
};
