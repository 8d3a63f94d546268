//! # Core Protocol Components
//!
//! Low-level packet handling and stream framing.
//!
//! This module provides the foundation for the protocol: the fixed-layout
//! packet structure, its checksum, and the codec for framing packets over
//! byte streams.
//!
//! ## Components
//! - **Packet**: Binary packet format with a bit-count checksum trailer
//! - **Codec**: Tokio codec for framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [Sequence(2, LE)] [Flags(1)] [Length(1)] [Body(N)] [Checksum(1)]
//! ```
//!
//! ## Robustness
//! - Body length is bounds-checked against the buffer before any copy
//! - Truncated input is a recoverable error, never a panic
//! - Checksum verification is explicit and separate from parsing

pub mod codec;
pub mod packet;
