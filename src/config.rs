//! # Configuration Management
//!
//! Centralized configuration for the robot protocol library.
//!
//! This module provides protocol constants plus structured configuration for
//! the transport and the command service: endpoint identity, buffer sizing,
//! deadlines, and logging options.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`

use crate::error::{LinkError, Result};
use crate::transport::endpoint::{Kind, Role};
use crate::utils::timeout;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Fixed header size: sequence (2) + flags (1) + body length (1).
pub const HEADER_SIZE: usize = 4;

/// Size of the checksum trailer.
pub const CHECKSUM_SIZE: usize = 1;

/// Largest body the one-byte length field can describe.
pub const MAX_BODY_SIZE: usize = 255;

/// Receive buffer capacity used when a caller requests zero.
pub const DEFAULT_BUFFER_CAPACITY: usize = 250;

/// Size of a drive command body: direction + duration + speed.
pub const DRIVE_BODY_SIZE: usize = 3;

/// Size of a telemetry response body.
pub const TELEMETRY_BODY_SIZE: usize = 9;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LinkConfig {
    /// Transport endpoint configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Command service configuration
    #[serde(default)]
    pub commander: CommanderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LinkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| LinkError::Config(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| LinkError::Config(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| LinkError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("ROBOT_PROTOCOL_ADDRESS") {
            config.transport.address = addr;
        }

        if let Ok(port) = std::env::var("ROBOT_PROTOCOL_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.transport.port = val;
            }
        }

        if let Ok(capacity) = std::env::var("ROBOT_PROTOCOL_BUFFER_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.transport.buffer_capacity = val;
            }
        }

        if let Ok(t) = std::env::var("ROBOT_PROTOCOL_IO_DEADLINE_MS") {
            if let Ok(val) = t.parse::<u64>() {
                config.transport.io_deadline = Duration::from_millis(val);
            }
        }

        if let Ok(t) = std::env::var("ROBOT_PROTOCOL_REPLY_DEADLINE_MS") {
            if let Ok(val) = t.parse::<u64>() {
                config.commander.reply_deadline = Duration::from_millis(val);
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LinkError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| LinkError::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.transport.validate());
        errors.extend(self.commander.validate());
        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LinkError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Transport endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Endpoint role
    pub role: Role,

    /// Socket kind
    pub kind: Kind,

    /// Peer address for a client, bind address for a server
    pub address: String,

    /// Peer port for a client, bind port for a server
    pub port: u16,

    /// Receive buffer capacity in bytes (0 selects the 250-byte default)
    pub buffer_capacity: usize,

    /// Deadline for a single send or receive
    #[serde(with = "duration_serde")]
    pub io_deadline: Duration,

    /// Deadline for the TCP connect handshake
    #[serde(with = "duration_serde")]
    pub connect_deadline: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            role: Role::Client,
            kind: Kind::Udp,
            address: String::from("127.0.0.1"),
            port: 5000,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            io_deadline: timeout::DEFAULT_IO_DEADLINE,
            connect_deadline: timeout::DEFAULT_CONNECT_DEADLINE,
        }
    }
}

impl TransportConfig {
    /// Validate transport configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() {
            errors.push("Endpoint address cannot be empty".to_string());
        } else if format!("{}:{}", self.address, self.port)
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            errors.push(format!(
                "Invalid endpoint address: '{}' (expected an IP address such as '192.168.1.10')",
                self.address
            ));
        }

        if self.port == 0 {
            errors.push("Endpoint port cannot be 0".to_string());
        }

        // capacity 0 is legal (falls back to the default) but a tiny buffer
        // cannot hold even a bodyless packet
        if self.buffer_capacity != 0 && self.buffer_capacity < HEADER_SIZE + CHECKSUM_SIZE {
            errors.push(format!(
                "Buffer capacity too small: {} bytes (a bodyless packet needs {})",
                self.buffer_capacity,
                HEADER_SIZE + CHECKSUM_SIZE
            ));
        } else if self.buffer_capacity > 65536 {
            errors.push(format!(
                "Buffer capacity too large: {} bytes (maximum: 65536)",
                self.buffer_capacity
            ));
        }

        if self.io_deadline.as_millis() < 10 {
            errors.push("I/O deadline too short (minimum: 10ms)".to_string());
        } else if self.io_deadline.as_secs() > 300 {
            errors.push("I/O deadline too long (maximum: 300s)".to_string());
        }

        if self.connect_deadline.as_millis() < 100 {
            errors.push("Connect deadline too short (minimum: 100ms)".to_string());
        } else if self.connect_deadline.as_secs() > 300 {
            errors.push("Connect deadline too long (maximum: 300s)".to_string());
        }

        errors
    }
}

/// Command service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommanderConfig {
    /// Deadline for one request/reply round trip
    #[serde(with = "duration_serde")]
    pub reply_deadline: Duration,
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            reply_deadline: timeout::DEFAULT_REPLY_DEADLINE,
        }
    }
}

impl CommanderConfig {
    /// Validate commander configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.reply_deadline.as_millis() < 10 {
            errors.push("Reply deadline too short (minimum: 10ms)".to_string());
        } else if self.reply_deadline.as_secs() > 300 {
            errors.push("Reply deadline too long (maximum: 300s)".to_string());
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("robot-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
