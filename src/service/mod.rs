//! # Services
//!
//! Higher-level operations composed from the codec and the transport.
//!
//! ## Components
//! - **Commander**: one-request/one-reply command and telemetry service

pub mod commander;

pub use commander::Commander;
