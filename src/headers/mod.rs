// * HTTP header synthesis conditioned on a sampled browser identity.

pub mod generator;

pub use generator::HeaderGenerator;
