//! # Packet
//!
//! This file is part of the Robot Protocol project.
//!
//! It defines the `Packet` structure and handles all related serialization
//! and deserialization logic.
//!
//! The `Packet` struct represents a fully decoded command/telemetry packet:
//! a 4-byte header (sequence number, command flags, body length), an owned
//! body of up to 255 bytes, and a 1-byte population-count checksum trailer.
//!
//! The header is an explicit struct serialized through shift/mask
//! operations; the wire layout never depends on native bit-field memory
//! layout. Protocol constants like `HEADER_SIZE` and `MAX_BODY_SIZE` are
//! defined in the `config` module.
//!
//! ## Responsibilities
//! - Build packets in memory through setters
//! - Encode `Packet` structs into raw bytes with an embedded checksum
//! - Decode packets from raw byte buffers, bounds-checked end to end
//! - Compute and verify the population-count checksum

use crate::config::{CHECKSUM_SIZE, HEADER_SIZE, MAX_BODY_SIZE};
use crate::error::ProtocolError;

type Result<T> = std::result::Result<T, ProtocolError>;

/// Flag bit for a drive command (header offset 2, bit 0).
const DRIVE_BIT: u8 = 0x01;
/// Flag bit reserved for status packets; never set by this implementation.
const STATUS_BIT: u8 = 0x02;
/// Flag bit for a sleep command (bit 2).
const SLEEP_BIT: u8 = 0x04;
/// Flag bit for a response/acknowledgement (bit 3).
const ACK_BIT: u8 = 0x08;

/// The command discriminant carried in the header flag bits.
///
/// Exactly one flag bit is set on a well-formed packet. A header with no
/// recognized flag reports `Unknown` rather than being aliased to
/// `Response`, so corrupted headers stay visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Drive,
    Sleep,
    Response,
    Unknown,
}

/// The fixed 4-byte packet header.
///
/// Wire layout: sequence number (u16 little-endian), one flags byte with
/// the command bits in the low nibble and zero padding in the high nibble,
/// then the body length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    pub sequence: u16,
    pub drive: bool,
    pub status: bool,
    pub sleep: bool,
    pub ack: bool,
    pub body_len: u8,
}

impl Header {
    fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut flags = 0u8;
        if self.drive {
            flags |= DRIVE_BIT;
        }
        if self.status {
            flags |= STATUS_BIT;
        }
        if self.sleep {
            flags |= SLEEP_BIT;
        }
        if self.ack {
            flags |= ACK_BIT;
        }

        let seq = self.sequence.to_le_bytes();
        [seq[0], seq[1], flags, self.body_len]
    }

    fn from_bytes(raw: [u8; HEADER_SIZE]) -> Self {
        let flags = raw[2];
        Self {
            sequence: u16::from_le_bytes([raw[0], raw[1]]),
            drive: flags & DRIVE_BIT != 0,
            status: flags & STATUS_BIT != 0,
            sleep: flags & SLEEP_BIT != 0,
            ack: flags & ACK_BIT != 0,
            body_len: raw[3],
        }
    }
}

/// Population-count checksum over a byte slice: the number of set bits
/// across every byte, wrapping at 256. Not a polynomial CRC despite the
/// domain's historical naming.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(b.count_ones() as u8))
}

/// Verify the trailing checksum byte of a serialized packet.
///
/// Returns `false` for an empty buffer; otherwise recomputes the checksum
/// over everything before the final byte and compares.
pub fn verify_checksum(bytes: &[u8]) -> bool {
    match bytes.split_last() {
        Some((stored, prefix)) => checksum(prefix) == *stored,
        None => false,
    }
}

/// A command/telemetry packet under construction or decoded from the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    head: Header,
    body: Vec<u8>,
    checksum: u8,
}

impl Packet {
    /// An empty packet: sequence 0, no command flag set, no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every flag bit, then set exactly the one matching `command`.
    /// `Unknown` leaves all flags clear. The body is untouched.
    pub fn set_command(&mut self, command: Command) {
        self.head.drive = false;
        self.head.status = false;
        self.head.sleep = false;
        self.head.ack = false;

        match command {
            Command::Drive => self.head.drive = true,
            Command::Sleep => self.head.sleep = true,
            Command::Response => self.head.ack = true,
            Command::Unknown => {}
        }
    }

    pub fn set_sequence(&mut self, sequence: u16) {
        self.head.sequence = sequence;
    }

    /// Replace the owned body buffer and update the header length.
    ///
    /// An empty slice is a no-op: the existing body and length are kept.
    /// Bodies longer than the length field can express are rejected.
    pub fn set_body(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        if bytes.len() > MAX_BODY_SIZE {
            return Err(ProtocolError::OversizedBody(bytes.len()));
        }

        self.body = bytes.to_vec();
        self.head.body_len = bytes.len() as u8;
        Ok(())
    }

    /// The command discriminant. Drive wins over Sleep, which wins over
    /// Response; a header with no recognized flag reports `Unknown`.
    pub fn command(&self) -> Command {
        if self.head.drive {
            Command::Drive
        } else if self.head.sleep {
            Command::Sleep
        } else if self.head.ack {
            Command::Response
        } else {
            Command::Unknown
        }
    }

    /// Whether the response/acknowledgement flag is set.
    pub fn ack(&self) -> bool {
        self.head.ack
    }

    pub fn sequence(&self) -> u16 {
        self.head.sequence
    }

    pub fn body_len(&self) -> u8 {
        self.head.body_len
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn header(&self) -> &Header {
        &self.head
    }

    /// The checksum byte embedded by the last `serialize` call, or the byte
    /// carried by the buffer this packet was parsed from.
    pub fn checksum_byte(&self) -> u8 {
        self.checksum
    }

    /// Serialize to header ++ body ++ checksum.
    ///
    /// The checksum is recomputed on every call so it always reflects the
    /// packet's current state, and a fresh buffer is allocated each time.
    /// Finalization is idempotent: serialize, mutate, serialize again is
    /// well-defined.
    pub fn serialize(&mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.body.len() + CHECKSUM_SIZE);
        out.extend_from_slice(&self.head.to_bytes());
        out.extend_from_slice(&self.body);

        self.checksum = checksum(&out);
        out.push(self.checksum);
        out
    }

    /// Parse a packet from a raw buffer (header ++ body ++ checksum).
    ///
    /// Short input is a recoverable error, never a crash: fewer than 4
    /// bytes is `TruncatedHeader`, and a buffer that cannot supply the
    /// declared body plus the checksum byte is `TruncatedBody`. The
    /// trailing checksum byte is stored without being validated; integrity
    /// checking is the caller's explicit `verify_checksum` call. Bytes past
    /// the frame are ignored.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(ProtocolError::TruncatedHeader(buf.len()));
        }

        let mut raw_head = [0u8; HEADER_SIZE];
        raw_head.copy_from_slice(&buf[..HEADER_SIZE]);
        let head = Header::from_bytes(raw_head);

        let frame_len = HEADER_SIZE + head.body_len as usize + CHECKSUM_SIZE;
        if buf.len() < frame_len {
            return Err(ProtocolError::TruncatedBody {
                needed: frame_len,
                available: buf.len(),
            });
        }

        let body = buf[HEADER_SIZE..frame_len - CHECKSUM_SIZE].to_vec();
        let checksum = buf[frame_len - CHECKSUM_SIZE];

        Ok(Self {
            head,
            body,
            checksum,
        })
    }

    /// Total serialized size of this packet in bytes.
    pub fn wire_len(&self) -> usize {
        HEADER_SIZE + self.body.len() + CHECKSUM_SIZE
    }
}
