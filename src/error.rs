//! # Error Types
//!
//! Error handling for the robot command/telemetry protocol.
//!
//! This module defines every error variant that can occur while building,
//! parsing, or transporting packets, from low-level socket failures to
//! protocol violations in a peer's reply.
//!
//! ## Error Categories
//! - **Protocol Errors**: truncated or corrupted packets, checksum failures,
//!   replies carrying the wrong command discriminant
//! - **Transport Errors**: socket setup and I/O failures, deadline expiry,
//!   operations attempted in the wrong connection state
//!
//! Socket setup failures (create/bind/listen/accept) are recoverable
//! `Result`s surfaced to the caller, never process aborts. Runtime send and
//! receive failures are logged and returned the same way.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::core::packet::Command;

/// Errors raised by the packet codec: malformed buffers, integrity failures,
/// and replies that do not match the request.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("truncated header: buffer holds {0} bytes, the header needs 4")]
    TruncatedHeader(usize),

    #[error("truncated body: frame needs {needed} bytes, buffer holds {available}")]
    TruncatedBody { needed: usize, available: usize },

    #[error("checksum mismatch: packet carries {expected:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { expected: u8, computed: u8 },

    #[error("unexpected command in reply: {0:?}")]
    UnexpectedCommand(Command),

    #[error("body of {0} bytes exceeds the 255-byte length field")]
    OversizedBody(usize),

    #[error("invalid drive direction: {0:#04x}")]
    InvalidDirection(u8),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by the socket transport.
///
/// Setup variants (`SocketCreateFailed` through `ConnectFailed`) mirror the
/// individual syscalls so a caller can tell which stage of construction
/// failed and decide whether to retry, fall back, or abort.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to create socket: {0}")]
    SocketCreateFailed(#[source] io::Error),

    #[error("failed to bind {addr}: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen on {addr}: {source}")]
    ListenFailed {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept a peer connection: {0}")]
    AcceptFailed(#[source] io::Error),

    #[error("failed to connect to {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("send failed: {0}")]
    SendFailed(#[source] io::Error),

    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] io::Error),

    #[error("payload of {len} bytes exceeds the {capacity}-byte receive buffer")]
    OversizedSend { len: usize, capacity: usize },

    #[error("invalid state for operation: {0}")]
    InvalidState(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Top-level error for callers composing the codec and the transport.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using LinkError; modules narrow the error type
/// where only one category applies.
pub type Result<T, E = LinkError> = std::result::Result<T, E>;
