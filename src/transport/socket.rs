//! # Socket Transport
//!
//! One socket behind one send/receive contract.
//!
//! `Transport` unifies TCP (client/server, connection-oriented) and UDP
//! (connectionless) endpoints. Construction opens and binds the socket; a
//! TCP server additionally listens with a backlog of one and waits for its
//! single peer before returning, so a constructed server is ready to talk.
//! Every potentially blocking call takes an explicit optional deadline.
//!
//! ## Responsibilities
//! - Own the socket pair (plus the listener for a TCP server) and the
//!   fixed-capacity receive buffer
//! - Enforce the connection state machine and guard identity mutation
//! - Surface every setup and I/O failure as a recoverable error
//!
//! Send and receive take `&mut self`: the receive buffer is reused across
//! calls, so exclusive access per transport instance is a compile-time
//! property rather than a locking discipline.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream, UdpSocket};
use tracing::{debug, info, instrument, warn};

use crate::config::{DEFAULT_BUFFER_CAPACITY, TransportConfig};
use crate::error::TransportError;
use crate::transport::endpoint::{ConnectionState, Kind, Role};
use crate::utils::timeout::with_deadline;

type Result<T> = std::result::Result<T, TransportError>;

/// A point-to-point socket endpoint with a fixed-capacity receive buffer.
pub struct Transport {
    role: Role,
    kind: Kind,
    address: String,
    port: u16,
    capacity: usize,
    state: ConnectionState,
    buffer: Vec<u8>,
    listener: Option<TcpListener>,
    stream: Option<TcpStream>,
    udp: Option<UdpSocket>,
}

impl Transport {
    /// Construct a transport endpoint and open its socket.
    ///
    /// A `capacity` of zero falls back to the 250-byte default. For a
    /// server role the socket is bound immediately; a TCP server also
    /// listens (backlog 1) and waits for exactly one peer, bounded by
    /// `accept_deadline`, before returning. A TCP client opens nothing
    /// until `connect`. Any setup failure is returned to the caller;
    /// nothing here aborts the process.
    #[instrument(skip(address), fields(address = %address.as_ref()))]
    pub async fn create(
        role: Role,
        kind: Kind,
        address: impl AsRef<str>,
        port: u16,
        capacity: usize,
        accept_deadline: Option<Duration>,
    ) -> Result<Self> {
        let capacity = if capacity == 0 {
            DEFAULT_BUFFER_CAPACITY
        } else {
            capacity
        };

        let mut transport = Self {
            role,
            kind,
            address: address.as_ref().to_string(),
            port,
            capacity,
            state: ConnectionState::Disconnected,
            buffer: vec![0u8; capacity],
            listener: None,
            stream: None,
            udp: None,
        };

        match (role, kind) {
            (Role::Client, Kind::Tcp) => {
                // nothing to open yet; the handshake happens in connect()
                debug!("tcp client created, awaiting connect");
            }
            (Role::Server, Kind::Tcp) => {
                let addr = transport.remote_addr()?;
                let socket = new_tcp_socket(addr)?;
                socket
                    .bind(addr)
                    .map_err(|e| TransportError::BindFailed {
                        addr: addr.to_string(),
                        source: e,
                    })?;
                let listener = socket.listen(1).map_err(|e| TransportError::ListenFailed {
                    addr: addr.to_string(),
                    source: e,
                })?;

                info!(%addr, "waiting for a peer connection");
                let (stream, peer) = with_deadline(accept_deadline, listener.accept())
                    .await?
                    .map_err(TransportError::AcceptFailed)?;
                info!(%peer, "peer connection established");

                transport.listener = Some(listener);
                transport.stream = Some(stream);
                transport.state = ConnectionState::Connected;
            }
            (role, Kind::Udp) => {
                let remote = transport.remote_addr()?;
                let bind_addr = match role {
                    Role::Server => remote,
                    // ephemeral local port; the remote is only a send target
                    Role::Client => unspecified_addr(remote),
                };
                let udp =
                    UdpSocket::bind(bind_addr)
                        .await
                        .map_err(|e| TransportError::BindFailed {
                            addr: bind_addr.to_string(),
                            source: e,
                        })?;
                debug!(local = %bind_addr, "udp socket bound");

                transport.udp = Some(udp);
                transport.state = ConnectionState::Bound;
            }
        }

        Ok(transport)
    }

    /// Construct a transport from a validated [`TransportConfig`], using the
    /// configured connect deadline to bound a TCP server's accept wait.
    pub async fn from_config(config: &TransportConfig) -> Result<Self> {
        Self::create(
            config.role,
            config.kind,
            &config.address,
            config.port,
            config.buffer_capacity,
            Some(config.connect_deadline),
        )
        .await
    }

    /// Initiate the TCP handshake. Valid only for a disconnected TCP
    /// client; every other configuration is an `InvalidState` error.
    #[instrument(skip(self), fields(role = %self.role, kind = %self.kind))]
    pub async fn connect(&mut self, deadline: Option<Duration>) -> Result<()> {
        if self.role != Role::Client || self.kind != Kind::Tcp {
            return Err(TransportError::InvalidState(
                "connect applies only to TCP client transports",
            ));
        }
        if self.state == ConnectionState::Connected {
            return Err(TransportError::InvalidState("already connected"));
        }

        let addr = self.remote_addr()?;
        let socket = new_tcp_socket(addr)?;
        let stream = with_deadline(deadline, socket.connect(addr))
            .await?
            .map_err(|e| TransportError::ConnectFailed {
                addr: addr.to_string(),
                source: e,
            })?;

        info!(%addr, "connected");
        self.stream = Some(stream);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Shut down and drop the TCP connection, returning the endpoint to
    /// `Disconnected`. Errors unless there is a live TCP connection.
    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.kind != Kind::Tcp || self.state != ConnectionState::Connected {
            return Err(TransportError::InvalidState(
                "no TCP connection to disconnect",
            ));
        }

        if let Some(mut stream) = self.stream.take() {
            // best-effort shutdown; the peer may already be gone
            if let Err(e) = stream.shutdown().await {
                debug!(error = %e, "shutdown on close");
            }
        }
        self.listener = None;
        self.state = ConnectionState::Disconnected;
        info!("disconnected");
        Ok(())
    }

    /// Send a buffer to the peer, bounded by `deadline`.
    ///
    /// Payloads larger than the receive buffer capacity are rejected so the
    /// peer's symmetric endpoint can always hold a full message. Returns
    /// the number of bytes actually transmitted.
    #[instrument(skip(self, data), fields(role = %self.role, kind = %self.kind, len = data.len()))]
    pub async fn send(&mut self, data: &[u8], deadline: Option<Duration>) -> Result<usize> {
        if data.len() > self.capacity {
            return Err(TransportError::OversizedSend {
                len: data.len(),
                capacity: self.capacity,
            });
        }

        let sent = match self.kind {
            Kind::Tcp => {
                let stream = self.stream.as_mut().ok_or(TransportError::InvalidState(
                    "send requires an established TCP connection",
                ))?;
                with_deadline(deadline, stream.write(data))
                    .await?
                    .map_err(TransportError::SendFailed)?
            }
            Kind::Udp => {
                let remote = self.remote_addr()?;
                let udp = self.udp.as_ref().ok_or(TransportError::InvalidState(
                    "send requires a bound UDP socket",
                ))?;
                with_deadline(deadline, udp.send_to(data, remote))
                    .await?
                    .map_err(TransportError::SendFailed)?
            }
        };

        debug!(sent, "sent");
        Ok(sent)
    }

    /// Receive into `dest`, bounded by `deadline`.
    ///
    /// Reads up to the buffer capacity from the socket (the accepted peer
    /// stream for a TCP server, the connection stream for a client, or
    /// `recv_from` with the sender discarded for UDP), then copies the
    /// received bytes into `dest` and returns the count. `dest` should be
    /// at least `capacity()` bytes; a shorter destination truncates with a
    /// warning.
    #[instrument(skip(self, dest), fields(role = %self.role, kind = %self.kind))]
    pub async fn receive(&mut self, dest: &mut [u8], deadline: Option<Duration>) -> Result<usize> {
        let received = match self.kind {
            Kind::Tcp => {
                let stream = self.stream.as_mut().ok_or(TransportError::InvalidState(
                    "receive requires an established TCP connection",
                ))?;
                let n = with_deadline(deadline, stream.read(&mut self.buffer))
                    .await?
                    .map_err(TransportError::ReceiveFailed)?;
                if n == 0 {
                    warn!("peer closed the connection");
                    return Err(TransportError::ConnectionClosed);
                }
                n
            }
            Kind::Udp => {
                let udp = self.udp.as_ref().ok_or(TransportError::InvalidState(
                    "receive requires a bound UDP socket",
                ))?;
                let (n, _sender) = with_deadline(deadline, udp.recv_from(&mut self.buffer))
                    .await?
                    .map_err(TransportError::ReceiveFailed)?;
                n
            }
        };

        let copied = received.min(dest.len());
        if copied < received {
            warn!(received, copied, "destination buffer too small, truncating");
        }
        dest[..copied].copy_from_slice(&self.buffer[..copied]);

        debug!(received = copied, "received");
        Ok(copied)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the peer address. Rejected while a connection is live; the
    /// previous value is preserved.
    pub fn set_address(&mut self, address: impl Into<String>) -> Result<()> {
        self.guard_identity_mutation("address")?;
        self.address = address.into();
        Ok(())
    }

    /// Change the peer port. Rejected while a connection is live.
    pub fn set_port(&mut self, port: u16) -> Result<()> {
        self.guard_identity_mutation("port")?;
        self.port = port;
        Ok(())
    }

    /// Change the endpoint role. Rejected while a connection is live. Note
    /// that flipping the role of an already-bound UDP socket does not
    /// rebind it; the new role takes full effect on the next `create`.
    pub fn set_role(&mut self, role: Role) -> Result<()> {
        self.guard_identity_mutation("role")?;
        self.role = role;
        Ok(())
    }

    fn guard_identity_mutation(&self, what: &'static str) -> Result<()> {
        if self.state == ConnectionState::Connected {
            warn!(%what, "identity mutation rejected while connected");
            return Err(TransportError::InvalidState(
                "endpoint identity is immutable while connected",
            ));
        }
        Ok(())
    }

    fn remote_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.address, self.port)
            .parse()
            .map_err(|_| TransportError::InvalidAddress(self.address.clone()))
    }
}

fn new_tcp_socket(addr: SocketAddr) -> Result<TcpSocket> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(TransportError::SocketCreateFailed)?;

    // allow fast rebinds of a recently used server address
    socket
        .set_reuseaddr(true)
        .map_err(TransportError::SocketCreateFailed)?;

    Ok(socket)
}

fn unspecified_addr(remote: SocketAddr) -> SocketAddr {
    if remote.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    }
}
