use crate::buffer::DEFAULT_BUFFER_SIZE;
use crate::error::DriverError;
use crate::path::DEFAULT_PATH_MAX;
use nix::sys::signal::Signal;
use serde::Deserialize;
use std::os::fd::RawFd;
use std::path::PathBuf;
use std::str::FromStr;

/// Descriptor the parent leaves open for path delivery and acknowledgments.
pub const DEFAULT_CHANNEL_FD: RawFd = 1023;
/// Byte written back after every successful input.
pub const DEFAULT_ACK_BYTE: u8 = b'A';

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    #[serde(default = "default_channel_fd")]
    pub channel_fd: RawFd,
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    #[serde(default = "default_path_max")]
    pub path_max: usize,
    #[serde(default = "default_ack_byte")]
    pub ack_byte: u8,
    #[serde(default = "default_notify_signal")]
    pub notify_signal: String,
}

fn default_channel_fd() -> RawFd {
    DEFAULT_CHANNEL_FD
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_path_max() -> usize {
    DEFAULT_PATH_MAX
}

fn default_ack_byte() -> u8 {
    DEFAULT_ACK_BYTE
}

fn default_notify_signal() -> String {
    "SIGCONT".to_string()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            channel_fd: default_channel_fd(),
            buffer_size: default_buffer_size(),
            path_max: default_path_max(),
            ack_byte: default_ack_byte(),
            notify_signal: default_notify_signal(),
        }
    }
}

impl DriverConfig {
    pub fn load_from_file(path: &PathBuf) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        let config: DriverConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })?;

        Ok(config)
    }

    pub fn signal(&self) -> Result<Signal, DriverError> {
        Signal::from_str(&self.notify_signal)
            .map_err(|_| DriverError::Config(format!("unknown signal '{}'", self.notify_signal)))
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        if self.channel_fd < 0 {
            return Err(DriverError::Config(format!(
                "channel-fd must be non-negative, got {}",
                self.channel_fd
            )));
        }
        if self.buffer_size == 0 {
            return Err(DriverError::Config("buffer-size must be non-zero".to_string()));
        }
        if self.path_max == 0 {
            return Err(DriverError::Config("path-max must be non-zero".to_string()));
        }
        self.signal().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_wire_protocol() {
        let config = DriverConfig::default();
        assert_eq!(config.channel_fd, 1023);
        assert_eq!(config.buffer_size, 16 * 1024 * 1024);
        assert_eq!(config.path_max, libc::PATH_MAX as usize);
        assert_eq!(config.ack_byte, b'A');
        assert_eq!(config.signal().unwrap(), Signal::SIGCONT);
        config.validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel-fd = 200\nbuffer-size = 4096").unwrap();
        let config = DriverConfig::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.channel_fd, 200);
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.ack_byte, DEFAULT_ACK_BYTE);
        assert_eq!(config.notify_signal, "SIGCONT");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel = 3").unwrap();
        let err = DriverConfig::load_from_file(&file.path().to_path_buf()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = DriverConfig::load_from_file(&PathBuf::from("/nonexistent/driver.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn validation_rejects_unusable_values() {
        let bad = [
            DriverConfig {
                buffer_size: 0,
                ..DriverConfig::default()
            },
            DriverConfig {
                path_max: 0,
                ..DriverConfig::default()
            },
            DriverConfig {
                channel_fd: -1,
                ..DriverConfig::default()
            },
            DriverConfig {
                notify_signal: "SIGNOPE".to_string(),
                ..DriverConfig::default()
            },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(DriverError::Config(_))), "{config:?}");
        }
    }
}
