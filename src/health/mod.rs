//! Health probes.
//!
//! ```text
//! /livez  → resolve client → server version → 200 "I am healthy! ..." | 500
//! /readyz → 200 "I am ready!" (no dependencies)
//! ```

pub mod probes;

pub use probes::{liveness, readiness, LIVENESS_PATH, READINESS_PATH};
