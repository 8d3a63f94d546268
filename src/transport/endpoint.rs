//! # Endpoint Identity
//!
//! The role/kind/state tuple that describes one transport instance.
//!
//! A transport is either the connecting side (`Client`) or the side that
//! waits for a peer (`Server`), over TCP or UDP. The connection state gates
//! which operations are legal and whether the endpoint's identity may still
//! be mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the link this endpoint plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Server,
}

/// The underlying socket kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Tcp,
    Udp,
}

/// Connection lifecycle state.
///
/// TCP clients move `Disconnected -> Connected -> Disconnected`. A TCP
/// server is `Connected` once its single peer is accepted. UDP endpoints
/// are `Bound` as soon as construction succeeds and never `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Bound,
    Connected,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Server => write!(f, "server"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Tcp => write!(f, "tcp"),
            Kind::Udp => write!(f, "udp"),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Bound => write!(f, "bound"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}
