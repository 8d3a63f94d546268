//! # Commander
//!
//! Request/reply command service over one transport.
//!
//! The commander is the gateway-facing surface of the protocol: it builds a
//! packet, serializes it, sends the bytes, waits for the single reply, and
//! interprets it. One operation is in flight at a time; the sequence number
//! increases monotonically per request so replies can be correlated in
//! device logs.
//!
//! The transport is an explicit handle owned by the commander, never a
//! process-wide singleton; construct one commander per link.

use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::core::packet::{self, Command, Packet};
use crate::error::{ProtocolError, Result};
use crate::protocol::body::{Direction, DriveBody, TelemetryBody};
use crate::transport::Transport;
use crate::utils::timeout::DEFAULT_REPLY_DEADLINE;

/// Command service pairing one request with one reply over a transport.
pub struct Commander {
    transport: Transport,
    sequence: u16,
    reply_deadline: Duration,
}

impl Commander {
    /// Wrap a constructed transport. The transport should already be
    /// connected (TCP) or bound (UDP).
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            sequence: 0,
            reply_deadline: DEFAULT_REPLY_DEADLINE,
        }
    }

    /// Override the per-round-trip deadline.
    pub fn with_reply_deadline(mut self, deadline: Duration) -> Self {
        self.reply_deadline = deadline;
        self
    }

    /// Give the transport back, e.g. to disconnect.
    pub fn into_transport(self) -> Transport {
        self.transport
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Submit a drive command. Returns the reply's acknowledgement flag.
    #[instrument(skip(self))]
    pub async fn submit_drive(
        &mut self,
        direction: Direction,
        duration: u8,
        speed: u8,
    ) -> Result<bool> {
        let body = DriveBody {
            direction,
            duration,
            speed,
        };

        let mut request = self.next_packet(Command::Drive);
        request.set_body(&body.to_bytes())?;

        let reply = self.round_trip(&mut request).await?;
        debug!(ack = reply.ack(), "drive acknowledged");
        Ok(reply.ack())
    }

    /// Submit a sleep command. Returns the reply's acknowledgement flag.
    #[instrument(skip(self))]
    pub async fn submit_sleep(&mut self) -> Result<bool> {
        let mut request = self.next_packet(Command::Sleep);
        let reply = self.round_trip(&mut request).await?;
        debug!(ack = reply.ack(), "sleep acknowledged");
        Ok(reply.ack())
    }

    /// Request telemetry. The reply must carry the response flag and a
    /// 9-byte telemetry body.
    #[instrument(skip(self))]
    pub async fn request_telemetry(&mut self) -> Result<TelemetryBody> {
        let mut request = self.next_packet(Command::Response);
        let reply = self.round_trip(&mut request).await?;

        if reply.command() != Command::Response {
            warn!(command = ?reply.command(), "telemetry reply carried the wrong command");
            return Err(ProtocolError::UnexpectedCommand(reply.command()).into());
        }

        let telemetry = TelemetryBody::from_bytes(reply.body())?;
        debug!(
            grade = telemetry.current_grade,
            hits = telemetry.hit_count,
            "telemetry received"
        );
        Ok(telemetry)
    }

    fn next_packet(&mut self, command: Command) -> Packet {
        self.sequence = self.sequence.wrapping_add(1);
        let mut pkt = Packet::new();
        pkt.set_sequence(self.sequence);
        pkt.set_command(command);
        pkt
    }

    /// Serialize and send one request, then block for its single reply.
    /// The reply's checksum is verified before parsing.
    async fn round_trip(&mut self, request: &mut Packet) -> Result<Packet> {
        let bytes = request.serialize();
        self.transport.send(&bytes, Some(self.reply_deadline)).await?;

        let mut reply_buf = vec![0u8; self.transport.capacity()];
        let received = self
            .transport
            .receive(&mut reply_buf, Some(self.reply_deadline))
            .await?;
        let frame = &reply_buf[..received];

        if !packet::verify_checksum(frame) {
            let expected = frame.last().copied().unwrap_or(0);
            warn!(expected, "reply failed checksum verification");
            return Err(ProtocolError::ChecksumMismatch {
                expected,
                computed: packet::checksum(&frame[..frame.len().saturating_sub(1)]),
            }
            .into());
        }

        let reply = Packet::parse(frame)?;
        Ok(reply)
    }
}
