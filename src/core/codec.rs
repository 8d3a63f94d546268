//! # Packet Codec
//!
//! This file is part of the Robot Protocol project.
//!
//! It adapts the packet layer to `tokio_util`'s framed transport so a byte
//! stream can be driven as a stream/sink of `Packet`s.
//!
//! Decoding waits until a complete frame (header + declared body + checksum)
//! is buffered, splits it off without copying the remainder, verifies the
//! checksum, and parses. Partial input yields `None` and leaves the buffer
//! untouched so the next read can complete the frame.
//!
//! ## Responsibilities
//! - Delimit packet frames on a continuous byte stream
//! - Verify the checksum trailer before handing frames to the parser
//! - Encode packets into an outgoing buffer via `Packet::serialize`

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::{CHECKSUM_SIZE, HEADER_SIZE};
use crate::core::packet::{self, Packet};
use crate::error::ProtocolError;

/// Stateless framing codec for `Packet`s.
pub struct PacketCodec;

/// Offset of the body-length byte within the header.
const LEN_OFFSET: usize = 3;

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, ProtocolError> {
        if src.len() < HEADER_SIZE + CHECKSUM_SIZE {
            return Ok(None);
        }

        let body_len = src[LEN_OFFSET] as usize;
        let frame_len = HEADER_SIZE + body_len + CHECKSUM_SIZE;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_len);

        if !packet::verify_checksum(&frame) {
            return Err(ProtocolError::ChecksumMismatch {
                expected: frame[frame_len - CHECKSUM_SIZE],
                computed: packet::checksum(&frame[..frame_len - CHECKSUM_SIZE]),
            });
        }

        Packet::parse(&frame).map(Some)
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, mut item: Packet, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let bytes = item.serialize();
        dst.reserve(bytes.len());
        dst.put_slice(&bytes);
        Ok(())
    }
}
