//! # Protocol Payloads
//!
//! Domain-level payloads carried inside packet bodies.
//!
//! The packet layer in `core` is payload-agnostic; this module gives the
//! body bytes their meaning: drive commands going out, telemetry coming
//! back.

pub mod body;

pub use body::{Direction, DriveBody, TelemetryBody};
