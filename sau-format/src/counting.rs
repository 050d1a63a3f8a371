//! Byte-counting stream wrappers and the exact-length copy used for payloads.

use std::io::{self, BufRead, Read, Write};

const COPY_BUFFER_LEN: usize = 8 * 1024;

/// A writer wrapper that counts bytes written through it.
pub(crate) struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    #[allow(dead_code)]
    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A buffered reader wrapper that tracks the offset of the next unread byte.
#[derive(Debug)]
pub(crate) struct CountingReader<R> {
    inner: R,
    position: u64,
}

impl<R> CountingReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub(crate) fn position(&self) -> u64 {
        self.position
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<R: BufRead> BufRead for CountingReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
        self.position += amt as u64;
    }
}

#[derive(Debug)]
pub(crate) enum CopyError {
    Read(io::Error),
    Write(io::Error),
    /// The source ended after this many bytes.
    Short(u64),
}

/// Copies exactly `length` bytes from `reader` to `writer` in blocks.
pub(crate) fn copy_exact<R, W>(reader: &mut R, writer: &mut W, length: u64) -> Result<(), CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; COPY_BUFFER_LEN];
    let mut remaining = length;

    while remaining > 0 {
        let want = remaining.min(buf.len() as u64) as usize;
        let n = match reader.read(&mut buf[..want]) {
            Ok(0) => return Err(CopyError::Short(length - remaining)),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        writer.write_all(&buf[..n]).map_err(CopyError::Write)?;
        remaining -= n as u64;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counting_writer() {
        let mut buf = Vec::new();
        let mut writer = CountingWriter::new(&mut buf);

        writer.write_all(b"hello").unwrap();
        assert_eq!(writer.bytes_written(), 5);

        writer.write_all(b" world").unwrap();
        assert_eq!(writer.bytes_written(), 11);

        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), b"hello world");
    }

    #[test]
    fn counting_reader_tracks_consume() {
        let mut reader = CountingReader::new(Cursor::new(b"abcdef".to_vec()));
        assert_eq!(reader.fill_buf().unwrap(), b"abcdef");
        reader.consume(2);
        assert_eq!(reader.position(), 2);

        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"cde");
        assert_eq!(reader.position(), 5);
    }

    #[test]
    fn copy_exact_stops_at_length() {
        let mut src = Cursor::new(vec![b'x'; 20_000]);
        let mut dst = Vec::new();
        copy_exact(&mut src, &mut dst, 17_000).unwrap();
        assert_eq!(dst.len(), 17_000);
        assert_eq!(src.position(), 17_000);
    }

    #[test]
    fn copy_exact_reports_short_source() {
        let mut src = Cursor::new(b"abc".to_vec());
        let mut dst = Vec::new();
        match copy_exact(&mut src, &mut dst, 10) {
            Err(CopyError::Short(3)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(dst, b"abc");
    }
}
