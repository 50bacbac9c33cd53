//! The persistent loop: receive a path, load it, run the target, acknowledge.
//!
//! ```text
//! STARTUP -> RECEIVE_PATH -> LOAD_FILE -> INVOKE -> ACK -> NOTIFY -> RECEIVE_PATH ...
//!                 \              \           \        \       \
//!                  +--------------+-----------+--------+-------+--> FATAL
//! ```
//!
//! Every failure ends the loop; the caller turns it into an exit status.

use crate::buffer::ScratchBuffer;
use crate::config::DriverConfig;
use crate::error::DriverError;
use crate::io::write_accumulating;
use crate::notify::Notifier;
use crate::path::PathMessage;
use crate::target::FuzzTarget;
use std::ffi::OsString;
use std::io::{Read, Write};

pub struct PersistentDriver<C, T, N> {
    channel: C,
    target: T,
    notifier: N,
    buffer: ScratchBuffer,
    path: PathMessage,
    ack_byte: u8,
    initialized: bool,
    iterations: u64,
}

impl<C, T, N> PersistentDriver<C, T, N>
where
    C: Read + Write,
    T: FuzzTarget,
    N: Notifier,
{
    /// Allocates the scratch buffer and path message. Nothing is read from the
    /// channel yet.
    pub fn new(
        config: &DriverConfig,
        channel: C,
        target: T,
        notifier: N,
    ) -> Result<Self, DriverError> {
        let buffer = ScratchBuffer::allocate(config.buffer_size)?;
        let path = PathMessage::new(config.path_max)?;
        Ok(Self {
            channel,
            target,
            notifier,
            buffer,
            path,
            ack_byte: config.ack_byte,
            initialized: false,
            iterations: 0,
        })
    }

    /// Runs the target's initializer. Only the first call has any effect.
    pub fn initialize(&mut self, args: &mut Vec<OsString>) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.target.initialize(args);
    }

    /// Processes one input and returns its length.
    pub fn run_iteration(&mut self) -> Result<usize, DriverError> {
        self.path.receive(&mut self.channel)?;

        let input = self.buffer.load_file(self.path.as_path())?;
        let len = input.len();

        let code = self.target.test_one_input(input);
        if code != 0 {
            return Err(DriverError::CallbackFailed {
                code,
                len,
                digest: format!("{:x}", md5::compute(input)),
            });
        }

        write_accumulating(&mut self.channel, &[self.ack_byte]).map_err(DriverError::Acknowledge)?;
        self.notifier.notify()?;

        self.iterations += 1;
        Ok(len)
    }

    /// Loops until something fatal happens and returns it.
    pub fn run(&mut self) -> DriverError {
        loop {
            if let Err(e) = self.run_iteration() {
                return e;
            }
        }
    }

    /// Completed iterations so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }
}
