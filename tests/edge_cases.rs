#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the packet layer
//! Boundary conditions, malformed buffers, and corruption detection

use bytes::BytesMut;
use robot_protocol::core::codec::PacketCodec;
use robot_protocol::core::packet::{self, Command, Packet};
use robot_protocol::error::ProtocolError;
use robot_protocol::protocol::{Direction, DriveBody, TelemetryBody};
use tokio_util::codec::Decoder;

// ============================================================================
// PACKET BOUNDARY CASES
// ============================================================================

#[test]
fn test_packet_empty_body() {
    let mut pkt = Packet::new();
    pkt.set_sequence(17);
    pkt.set_command(Command::Response);

    let bytes = pkt.serialize();
    assert_eq!(bytes.len(), 5); // header + checksum only

    let decoded = Packet::parse(&bytes).expect("Should decode empty body");
    assert_eq!(decoded.body_len(), 0);
    assert!(decoded.body().is_empty());
    assert_eq!(decoded.sequence(), 17);
}

#[test]
fn test_packet_max_body_size() {
    let body = vec![0xAB; 255];
    let mut pkt = Packet::new();
    pkt.set_command(Command::Drive);
    pkt.set_body(&body).expect("255 bytes is the maximum");

    let bytes = pkt.serialize();
    assert_eq!(bytes.len(), 4 + 255 + 1);

    let decoded = Packet::parse(&bytes).expect("Should decode max body");
    assert_eq!(decoded.body_len(), 255);
    assert_eq!(decoded.body(), &body[..]);
}

#[test]
fn test_packet_body_one_over_max_rejected() {
    let body = vec![0xFF; 256];
    let mut pkt = Packet::new();
    assert!(matches!(
        pkt.set_body(&body),
        Err(ProtocolError::OversizedBody(256))
    ));
}

#[test]
fn test_packet_truncated_header() {
    for len in 0..4usize {
        let buf = vec![0u8; len];
        let result = Packet::parse(&buf);
        assert!(
            matches!(result, Err(ProtocolError::TruncatedHeader(n)) if n == len),
            "Should reject {len}-byte buffer"
        );
    }
}

#[test]
fn test_packet_body_length_overrun() {
    // header claims 200 body bytes, buffer holds 6 total
    let buf = [0x01, 0x00, 0x01, 0xC8, 0xAA, 0xBB];
    let result = Packet::parse(&buf);
    assert!(
        matches!(
            result,
            Err(ProtocolError::TruncatedBody {
                needed: 205,
                available: 6
            })
        ),
        "Claimed body length must be bounds-checked against the buffer"
    );
}

#[test]
fn test_packet_sequence_endianness() {
    let mut pkt = Packet::new();
    pkt.set_sequence(0x0201);
    pkt.set_command(Command::Sleep);

    let bytes = pkt.serialize();
    assert_eq!(bytes[0], 0x01, "low byte first");
    assert_eq!(bytes[1], 0x02);
}

#[test]
fn test_packet_padding_bits_are_zero() {
    let mut pkt = Packet::new();
    pkt.set_sequence(u16::MAX);
    pkt.set_command(Command::Drive);
    pkt.set_body(&[0xFF; 10]).unwrap();

    let bytes = pkt.serialize();
    assert_eq!(bytes[2] & 0xF0, 0, "high nibble of the flags byte is padding");
}

// ============================================================================
// CHECKSUM AND CORRUPTION CASES
// ============================================================================

#[test]
fn test_known_drive_vector() {
    let mut pkt = Packet::new();
    pkt.set_sequence(1);
    pkt.set_command(Command::Drive);
    pkt.set_body(&[1, 5, 90]).unwrap();

    assert_eq!(
        pkt.serialize(),
        [0x01, 0x00, 0x01, 0x03, 0x01, 0x05, 0x5A, 0x0B]
    );
}

#[test]
fn test_known_sleep_vector() {
    let mut pkt = Packet::new();
    pkt.set_sequence(5);
    pkt.set_command(Command::Sleep);

    let bytes = pkt.serialize();
    assert_eq!(bytes, [0x05, 0x00, 0x04, 0x00, 0x03]);
    assert!(packet::verify_checksum(&bytes));
}

#[test]
fn test_corrupted_trailer_detected() {
    let mut pkt = Packet::new();
    pkt.set_sequence(1);
    pkt.set_command(Command::Drive);
    pkt.set_body(&[1, 5, 90]).unwrap();

    let mut bytes = pkt.serialize();
    let last = bytes.len() - 1;
    bytes[last] = 0xFF;
    assert!(!packet::verify_checksum(&bytes));
}

#[test]
fn test_every_checksum_byte_flip_detected() {
    let mut pkt = Packet::new();
    pkt.set_sequence(42);
    pkt.set_command(Command::Drive);
    pkt.set_body(&[2, 7, 55]).unwrap();
    let bytes = pkt.serialize();
    let last = bytes.len() - 1;

    for corrupt in 0..=255u8 {
        if corrupt == bytes[last] {
            continue;
        }
        let mut copy = bytes.clone();
        copy[last] = corrupt;
        assert!(
            !packet::verify_checksum(&copy),
            "trailer byte {corrupt:#04x} must fail verification"
        );
    }
}

#[test]
fn test_verify_checksum_empty_and_tiny() {
    assert!(!packet::verify_checksum(&[]));
    assert!(packet::verify_checksum(&[0x00]));
    assert!(!packet::verify_checksum(&[0x07]));
}

#[test]
fn test_checksum_self_consistency_across_commands() {
    for command in [Command::Drive, Command::Sleep, Command::Response] {
        for seq in [0u16, 1, 255, 256, u16::MAX] {
            let mut pkt = Packet::new();
            pkt.set_sequence(seq);
            pkt.set_command(command);
            let bytes = pkt.serialize();
            assert!(
                packet::verify_checksum(&bytes),
                "{command:?}/{seq} must self-verify"
            );
        }
    }
}

// ============================================================================
// STREAM CODEC CASES
// ============================================================================

#[test]
fn test_codec_partial_decode_preserves_buffer() {
    let mut codec = PacketCodec;

    // only 3 of the 4 header bytes
    let mut buffer = BytesMut::from(&[0x01, 0x00, 0x01][..]);
    let result = codec.decode(&mut buffer).expect("Decode should not error");

    assert!(result.is_none());
    assert_eq!(buffer.len(), 3); // buffer unchanged
}

#[test]
fn test_codec_decode_rejects_corruption() {
    let mut pkt = Packet::new();
    pkt.set_sequence(1);
    pkt.set_command(Command::Sleep);
    let mut bytes = pkt.serialize();
    bytes[4] = 0xEE;

    let mut codec = PacketCodec;
    let mut buffer = BytesMut::from(&bytes[..]);
    assert!(matches!(
        codec.decode(&mut buffer),
        Err(ProtocolError::ChecksumMismatch { .. })
    ));
}

// ============================================================================
// BODY PAYLOAD CASES
// ============================================================================

#[test]
fn test_drive_body_all_directions() {
    for (direction, value) in [
        (Direction::Forward, 1u8),
        (Direction::Backward, 2),
        (Direction::Right, 3),
        (Direction::Left, 4),
    ] {
        let body = DriveBody {
            direction,
            duration: 10,
            speed: 80,
        };
        let bytes = body.to_bytes();
        assert_eq!(bytes[0], value);
        assert_eq!(DriveBody::from_bytes(&bytes).unwrap().direction, direction);
    }
}

#[test]
fn test_telemetry_extremes() {
    let body = TelemetryBody {
        last_sequence: u16::MAX,
        current_grade: 0,
        hit_count: u16::MAX,
        last_command: 0xFF,
        last_command_value: 0,
        last_command_speed: 0xFF,
    };
    let decoded = TelemetryBody::from_bytes(&body.to_bytes()).unwrap();
    assert_eq!(decoded, body);
}

#[test]
fn test_telemetry_inside_packet_round_trip() {
    let telemetry = TelemetryBody {
        last_sequence: 12,
        current_grade: 45,
        hit_count: 2,
        last_command: 0x01,
        last_command_value: 1,
        last_command_speed: 90,
    };

    let mut pkt = Packet::new();
    pkt.set_sequence(13);
    pkt.set_command(Command::Response);
    pkt.set_body(&telemetry.to_bytes()).unwrap();

    let bytes = pkt.serialize();
    let reply = Packet::parse(&bytes).unwrap();
    assert_eq!(reply.command(), Command::Response);
    assert!(reply.ack());
    assert_eq!(TelemetryBody::from_bytes(reply.body()).unwrap(), telemetry);
}

// ============================================================================
// ERROR FORMATTING
// ============================================================================

#[test]
fn test_error_display_formatting() {
    let errors = vec![
        ProtocolError::TruncatedHeader(2),
        ProtocolError::TruncatedBody {
            needed: 15,
            available: 6,
        },
        ProtocolError::ChecksumMismatch {
            expected: 0xFF,
            computed: 0x0B,
        },
        ProtocolError::UnexpectedCommand(Command::Drive),
        ProtocolError::OversizedBody(300),
        ProtocolError::InvalidDirection(9),
    ];

    for err in errors {
        let display_str = format!("{err}");
        assert!(!display_str.is_empty(), "Error should have display format");
    }
}
