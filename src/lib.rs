//! # identity-forge
//!
//! Generates synthetic, statistically realistic browser fingerprints: the
//! HTTP request headers and the JavaScript-observable navigator / screen /
//! codec surface a real browser would expose. Values are drawn jointly
//! from empirical Bayesian networks, so the User-Agent, the client hints,
//! the platform, the screen geometry and the codec matrix all agree on the
//! same browser running on the same operating system.

pub mod bayesian;
pub mod config;
pub mod data;
pub mod errors;
pub mod fingerprint;
pub mod headers;
pub mod ops;

pub use errors::{GeneratorError, Result};
pub use fingerprint::{Fingerprint, Generator, GeneratorOption};
pub use headers::HeaderGenerator;
