use std::io::{self, Read, Write};
use std::os::fd::RawFd;

/// The bidirectional descriptor shared with the parent.
///
/// The parent opens it before exec and it stays open for the life of the
/// process, so the driver only borrows the number: it never closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChannel {
    fd: RawFd,
}

impl ControlChannel {
    pub fn new(fd: RawFd) -> Self {
        Self { fd }
    }
}

fn cvt(ret: isize) -> io::Result<usize> {
    usize::try_from(ret).map_err(|_| io::Error::last_os_error())
}

impl Read for ControlChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: buf is valid for writes of buf.len() bytes.
        cvt(unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), buf.len()) })
    }
}

impl Write for ControlChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // SAFETY: buf is valid for reads of buf.len() bytes.
        cvt(unsafe { libc::write(self.fd, buf.as_ptr().cast(), buf.len()) })
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
