//! CLI command implementations.

pub mod fingerprint;
pub mod invalidate;
pub mod serve;
