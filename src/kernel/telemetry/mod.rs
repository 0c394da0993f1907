//! Pipeline telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a write-only side channel. It must never be read inside
//! decision logic (Arbitrator, Mode Controller, Aggregator).
//!
//! # PRIVACY INVARIANT
//! Events never carry what the camera saw or what was spoken: no labels, no
//! recognized text, no phrases. Only sequence numbers, counts, durations and enums.

pub mod event;
pub mod metrics;
pub mod recorder;
