//! # Command and Telemetry Bodies
//!
//! This file is part of the Robot Protocol project.
//!
//! It defines the fixed-layout payloads carried inside a packet body: the
//! 3-byte drive command and the 9-byte telemetry response. Both are encoded
//! field by field; multi-byte fields are little-endian to match the header.
//!
//! ## Responsibilities
//! - Encode command parameters into wire-ready body bytes
//! - Decode reply bodies with full bounds checking
//! - Validate the drive direction discriminant

use crate::config::{DRIVE_BODY_SIZE, TELEMETRY_BODY_SIZE};
use crate::error::ProtocolError;

type Result<T> = std::result::Result<T, ProtocolError>;

/// Drive direction discriminant carried in the first body byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Forward = 1,
    Backward = 2,
    Right = 3,
    Left = 4,
}

impl TryFrom<u8> for Direction {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Direction::Forward),
            2 => Ok(Direction::Backward),
            3 => Ok(Direction::Right),
            4 => Ok(Direction::Left),
            other => Err(ProtocolError::InvalidDirection(other)),
        }
    }
}

/// Body of a drive command: direction, duration in seconds, speed in
/// percent (0-255 on the wire, the device clamps).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveBody {
    pub direction: Direction,
    pub duration: u8,
    pub speed: u8,
}

impl DriveBody {
    pub fn to_bytes(self) -> [u8; DRIVE_BODY_SIZE] {
        [self.direction as u8, self.duration, self.speed]
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < DRIVE_BODY_SIZE {
            return Err(ProtocolError::TruncatedBody {
                needed: DRIVE_BODY_SIZE,
                available: buf.len(),
            });
        }

        Ok(Self {
            direction: Direction::try_from(buf[0])?,
            duration: buf[1],
            speed: buf[2],
        })
    }
}

/// Body of a telemetry response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TelemetryBody {
    /// Sequence number of the last command the device processed.
    pub last_sequence: u16,
    /// Current grade reading from the tilt sensor.
    pub current_grade: u16,
    /// Number of obstacle hits registered since power-on.
    pub hit_count: u16,
    /// Flags byte of the last command received.
    pub last_command: u8,
    /// First body byte of the last command (direction for a drive).
    pub last_command_value: u8,
    /// Speed byte of the last command.
    pub last_command_speed: u8,
}

impl TelemetryBody {
    pub fn to_bytes(self) -> [u8; TELEMETRY_BODY_SIZE] {
        let mut out = [0u8; TELEMETRY_BODY_SIZE];
        out[0..2].copy_from_slice(&self.last_sequence.to_le_bytes());
        out[2..4].copy_from_slice(&self.current_grade.to_le_bytes());
        out[4..6].copy_from_slice(&self.hit_count.to_le_bytes());
        out[6] = self.last_command;
        out[7] = self.last_command_value;
        out[8] = self.last_command_speed;
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < TELEMETRY_BODY_SIZE {
            return Err(ProtocolError::TruncatedBody {
                needed: TELEMETRY_BODY_SIZE,
                available: buf.len(),
            });
        }

        Ok(Self {
            last_sequence: u16::from_le_bytes([buf[0], buf[1]]),
            current_grade: u16::from_le_bytes([buf[2], buf[3]]),
            hit_count: u16::from_le_bytes([buf[4], buf[5]]),
            last_command: buf[6],
            last_command_value: buf[7],
            last_command_speed: buf[8],
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn drive_body_layout() {
        let body = DriveBody {
            direction: Direction::Forward,
            duration: 5,
            speed: 90,
        };
        assert_eq!(body.to_bytes(), [1, 5, 90]);
    }

    #[test]
    fn drive_body_round_trip() {
        let body = DriveBody {
            direction: Direction::Left,
            duration: 10,
            speed: 100,
        };
        let decoded = DriveBody::from_bytes(&body.to_bytes()).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn drive_body_rejects_bad_direction() {
        let err = DriveBody::from_bytes(&[9, 1, 1]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidDirection(9)));
    }

    #[test]
    fn drive_body_rejects_short_buffer() {
        let err = DriveBody::from_bytes(&[1, 5]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::TruncatedBody {
                needed: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn direction_discriminants() {
        assert_eq!(Direction::try_from(1).unwrap(), Direction::Forward);
        assert_eq!(Direction::try_from(2).unwrap(), Direction::Backward);
        assert_eq!(Direction::try_from(3).unwrap(), Direction::Right);
        assert_eq!(Direction::try_from(4).unwrap(), Direction::Left);
        assert!(Direction::try_from(0).is_err());
        assert!(Direction::try_from(5).is_err());
    }

    #[test]
    fn telemetry_round_trip() {
        let body = TelemetryBody {
            last_sequence: 513,
            current_grade: 72,
            hit_count: 3,
            last_command: 0x01,
            last_command_value: 1,
            last_command_speed: 90,
        };
        let bytes = body.to_bytes();
        // 513 = 0x0201 little-endian
        assert_eq!(bytes[0], 0x01);
        assert_eq!(bytes[1], 0x02);
        assert_eq!(TelemetryBody::from_bytes(&bytes).unwrap(), body);
    }

    #[test]
    fn telemetry_rejects_short_buffer() {
        let err = TelemetryBody::from_bytes(&[0; 8]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::TruncatedBody {
                needed: 9,
                available: 8
            }
        ));
    }
}
