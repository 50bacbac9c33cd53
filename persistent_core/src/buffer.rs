use crate::error::DriverError;
use crate::io::read_accumulating;
use std::fs::File;
use std::path::Path;

/// Default scratch buffer capacity: 16 MiB.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Fixed-capacity region holding the bytes of the current input.
///
/// Allocated once and never resized. Only the prefix returned by the most
/// recent [`ScratchBuffer::load_file`] is meaningful; anything after it is
/// left over from earlier inputs.
pub struct ScratchBuffer {
    bytes: Box<[u8]>,
}

impl ScratchBuffer {
    pub fn allocate(capacity: usize) -> Result<Self, DriverError> {
        if capacity == 0 {
            return Err(DriverError::Config(
                "scratch buffer capacity must be non-zero".to_string(),
            ));
        }
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| DriverError::BufferAllocation { capacity })?;
        bytes.resize(capacity, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Loads up to `capacity` bytes of the file at `path`, returning the valid
    /// prefix. Longer files are truncated.
    pub fn load_file(&mut self, path: &Path) -> Result<&[u8], DriverError> {
        let mut file = File::open(path).map_err(|source| DriverError::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        let progress = read_accumulating(&mut file, &mut self.bytes);
        drop(file);
        if let Some(source) = progress.error {
            return Err(DriverError::ReadInput {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(&self.bytes[..progress.len])
    }
}
