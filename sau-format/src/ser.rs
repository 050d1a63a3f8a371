use std::io::{Read, Write};

use crate::{
    counting::{copy_exact, CopyError},
    header::{SauHeader, ENTRY_DELIMITER, FIELD_SEPARATOR, FRAMING_BYTE, HEADER_DIGITS},
    record::EntryRecord,
};

pub(crate) trait Serialize {
    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl Serialize for SauHeader {
    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "{:0width$}", self.reserved, width = HEADER_DIGITS)?;
        writer.write_all(&[FRAMING_BYTE])
    }
}

impl Serialize for EntryRecord {
    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&[ENTRY_DELIMITER])?;
        writer.write_all(self.name.as_bytes())?;
        writer.write_all(&[FIELD_SEPARATOR])?;
        write!(writer, "{:o}", self.mode)?;
        writer.write_all(&[FIELD_SEPARATOR])?;
        write!(writer, "{}", self.length)?;
        writer.write_all(&[ENTRY_DELIMITER])?;

        tracing::trace!(name = %self.name, mode = format_args!("{:o}", self.mode), length = self.length, "serialized EntryRecord");
        Ok(())
    }
}

/// Copies the payload of `record` verbatim from `content` into the archive.
pub(crate) fn write_payload<R, W>(
    record: &EntryRecord,
    content: &mut R,
    writer: &mut W,
) -> Result<(), CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    copy_exact(content, writer, record.length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::EntryName;

    #[test]
    fn header_is_ten_digits_and_framing_byte() {
        let mut buf = Vec::new();
        SauHeader::new().write(&mut buf).unwrap();
        assert_eq!(buf, b"0000000011\n");
    }

    #[test]
    fn entry_line() {
        let record = EntryRecord::new(EntryName::new("notes.txt").unwrap(), 0o100644, 42);
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        assert_eq!(buf, b"|notes.txt,644,42|");
    }

    #[test]
    fn mode_is_unpadded_octal() {
        let record = EntryRecord::new(EntryName::new("a").unwrap(), 0o007, 0);
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        assert_eq!(buf, b"|a,7,0|");
    }

    #[test]
    fn payload_is_copied_verbatim() {
        let content = b"line one\nline two\n";
        let record = EntryRecord::new(EntryName::new("a").unwrap(), 0o644, content.len() as u64);
        let mut buf = Vec::new();
        write_payload(&record, &mut &content[..], &mut buf).unwrap();
        assert_eq!(buf, content);
    }
}
