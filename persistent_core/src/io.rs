//! Retrying read/write primitives shared by the control channel and the
//! input file loader.
//!
//! Interrupted calls (`ErrorKind::Interrupted`) are retried without bound and
//! without losing progress. Nothing else is retried.

use std::io::{self, ErrorKind, Read, Write};

/// Outcome of an accumulating read.
#[derive(Debug)]
pub struct ReadProgress {
    /// Bytes placed at the front of the target buffer.
    pub len: usize,
    /// The error that ended the read early, if it was not a clean end of
    /// stream.
    pub error: Option<io::Error>,
}

impl ReadProgress {
    pub fn is_complete(&self, expected: usize) -> bool {
        self.len == expected
    }
}

/// Reads into `buf` until it is full, the reader reports end of stream, or a
/// non-interrupt error occurs. Returns whatever was accumulated.
pub fn read_accumulating<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> ReadProgress {
    let mut len = 0;
    while len < buf.len() {
        match reader.read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return ReadProgress { len, error: Some(e) },
        }
    }
    ReadProgress { len, error: None }
}

/// Fills `buf` completely or reports how far it got.
pub fn read_exact_len<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<(), ReadProgress> {
    let progress = read_accumulating(reader, buf);
    if progress.is_complete(buf.len()) {
        Ok(())
    } else {
        Err(progress)
    }
}

/// Writes all of `buf`. Any non-interrupt error aborts the whole write; a
/// writer that accepts zero bytes is treated as failed.
pub fn write_accumulating<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "control channel accepted zero bytes",
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::mock::{ScriptedReader, ScriptedWriter, Step};
    use super::*;

    #[test]
    fn accumulates_partial_reads() {
        let data = b"persistent";
        let mut reader = ScriptedReader::new(data, vec![Step::Chunk(3), Step::Chunk(1), Step::Chunk(4)]);
        let mut buf = [0u8; 10];
        assert!(read_exact_len(&mut reader, &mut buf).is_ok());
        assert_eq!(&buf, data);
        assert_eq!(reader.calls, 4);
    }

    #[test]
    fn interrupted_reads_are_retried_without_losing_progress() {
        let data = b"abcdef";
        let mut reader = ScriptedReader::new(
            data,
            vec![
                Step::Fail(ErrorKind::Interrupted),
                Step::Chunk(2),
                Step::Fail(ErrorKind::Interrupted),
                Step::Fail(ErrorKind::Interrupted),
                Step::Chunk(4),
            ],
        );
        let mut buf = [0u8; 6];
        assert!(read_exact_len(&mut reader, &mut buf).is_ok());
        assert_eq!(&buf, data);
    }

    #[test]
    fn end_of_stream_returns_short_progress() {
        let mut reader = ScriptedReader::new(b"abc", vec![]);
        let mut buf = [0u8; 8];
        let progress = read_accumulating(&mut reader, &mut buf);
        assert_eq!(progress.len, 3);
        assert!(progress.error.is_none());
        assert!(!progress.is_complete(8));
    }

    #[test]
    fn hard_error_stops_read_and_is_reported() {
        let mut reader = ScriptedReader::new(b"abcdef", vec![Step::Chunk(2), Step::Fail(ErrorKind::BrokenPipe)]);
        let mut buf = [0u8; 6];
        let progress = read_exact_len(&mut reader, &mut buf).unwrap_err();
        assert_eq!(progress.len, 2);
        assert_eq!(progress.error.map(|e| e.kind()), Some(ErrorKind::BrokenPipe));
    }

    #[test]
    fn write_retries_interrupts_and_partial_writes() {
        let mut writer = ScriptedWriter::new(vec![
            Step::Fail(ErrorKind::Interrupted),
            Step::Chunk(1),
            Step::Chunk(2),
        ]);
        write_accumulating(&mut writer, b"done").unwrap();
        assert_eq!(writer.written, b"done");
    }

    #[test]
    fn write_error_aborts() {
        let mut writer = ScriptedWriter::new(vec![Step::Chunk(1), Step::Fail(ErrorKind::BrokenPipe)]);
        let err = write_accumulating(&mut writer, b"done").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }

    #[test]
    fn zero_length_write_is_a_failure() {
        let mut writer = ScriptedWriter::new(vec![Step::Chunk(0)]);
        let err = write_accumulating(&mut writer, b"A").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteZero);
        assert!(writer.written.is_empty());
    }
}
