use crate::error::DriverError;
use crate::io::read_exact_len;
use std::ffi::OsStr;
use std::io::Read;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Default path message length, matching the platform's `PATH_MAX`.
pub const DEFAULT_PATH_MAX: usize = libc::PATH_MAX as usize;

/// Fixed-length path message received from the parent once per iteration.
///
/// The parent always sends exactly `len` bytes. The path is the C string at
/// the front of the message.
pub struct PathMessage {
    bytes: Box<[u8]>,
}

impl PathMessage {
    pub fn new(len: usize) -> Result<Self, DriverError> {
        if len == 0 {
            return Err(DriverError::Config(
                "path message length must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            bytes: vec![0u8; len].into_boxed_slice(),
        })
    }

    /// Blocks until a complete message has arrived. A short message is a
    /// protocol violation.
    pub fn receive<R: Read + ?Sized>(&mut self, channel: &mut R) -> Result<(), DriverError> {
        let expected = self.bytes.len();
        read_exact_len(channel, &mut self.bytes).map_err(|progress| {
            DriverError::IncompletePathMessage {
                received: progress.len,
                expected,
                cause: progress.error,
            }
        })
    }

    /// The path up to the first NUL, or the whole message if it has none.
    pub fn as_path(&self) -> &Path {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        Path::new(OsStr::from_bytes(&self.bytes[..end]))
    }
}

/// Encodes `path` as a path message of `len` bytes, the way a parent would.
pub fn encode_path_message(path: &Path, len: usize) -> Option<Vec<u8>> {
    let raw = path.as_os_str().as_bytes();
    if raw.len() >= len {
        return None;
    }
    let mut message = vec![0u8; len];
    message[..raw.len()].copy_from_slice(raw);
    Some(message)
}
