//! # Robot Protocol
//!
//! Command and telemetry protocol core for point-to-point robot control
//! links.
//!
//! The crate has two tightly coupled halves plus a thin service on top:
//!
//! - **Packet codec** ([`core`]): a fixed-layout binary header, an owned
//!   body of up to 255 bytes, and a population-count checksum trailer,
//!   with serialization that round-trips exactly and parsing that treats
//!   malformed input as recoverable errors.
//! - **Transport** ([`transport`]): one TCP or UDP socket, client or
//!   server role, behind a single send/receive contract with a
//!   fixed-capacity receive buffer and deadline-bounded blocking calls.
//! - **Commander** ([`service`]): drive, sleep, and telemetry operations,
//!   each pairing one serialized request with one reply.
//!
//! ## Example
//! ```no_run
//! use robot_protocol::protocol::Direction;
//! use robot_protocol::service::Commander;
//! use robot_protocol::transport::{Kind, Role, Transport};
//!
//! # async fn run() -> robot_protocol::error::Result<()> {
//! let transport = Transport::create(Role::Client, Kind::Udp, "127.0.0.1", 5000, 0, None).await?;
//! let mut commander = Commander::new(transport);
//!
//! let acked = commander.submit_drive(Direction::Forward, 5, 90).await?;
//! let telemetry = commander.request_telemetry().await?;
//! # let _ = (acked, telemetry);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use crate::core::codec::PacketCodec;
pub use crate::core::packet::{Command, Packet};
pub use crate::error::{LinkError, ProtocolError, TransportError};
pub use crate::protocol::{Direction, DriveBody, TelemetryBody};
pub use crate::service::Commander;
pub use crate::transport::{ConnectionState, Kind, Role, Transport};
