use std::io::{BufRead, Write};

use crate::{
    counting::{copy_exact, CopyError},
    header::{SauHeader, ENTRY_DELIMITER, FIELD_SEPARATOR, HEADER_DIGITS},
    path::MAX_NAME_LEN,
};

/// Longest run of digits accepted for a numeric field.
const MAX_FIELD_DIGITS: usize = 20;

/// The header fields of an entry as they appear in the stream. The name is
/// not yet validated; that is the reader's decision to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryLine {
    pub(crate) name: Vec<u8>,
    pub(crate) mode: u32,
    pub(crate) length: u64,
}

#[derive(Debug)]
pub(crate) enum HeaderError {
    /// Only this many digits were found before the field ended.
    Malformed(usize),
    Io(std::io::Error),
}

#[inline(always)]
fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> std::io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[inline(always)]
fn next_byte<R: BufRead + ?Sized>(reader: &mut R) -> std::io::Result<Option<u8>> {
    let byte = peek_byte(reader)?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}

/// Reads a run of digits in `radix` terminated by `terminator`. Returns
/// `None` if anything else is found or the value does not fit.
fn read_number<R: BufRead + ?Sized>(
    reader: &mut R,
    radix: u32,
    terminator: u8,
) -> std::io::Result<Option<u64>> {
    let mut value: u64 = 0;
    let mut digits = 0;

    loop {
        let byte = match next_byte(reader)? {
            Some(b) => b,
            None => return Ok(None),
        };

        if byte == terminator {
            return Ok(if digits == 0 { None } else { Some(value) });
        }

        let digit = match char::from(byte).to_digit(radix) {
            Some(d) => d,
            None => return Ok(None),
        };

        digits += 1;
        if digits > MAX_FIELD_DIGITS {
            return Ok(None);
        }

        value = match value
            .checked_mul(radix as u64)
            .and_then(|v| v.checked_add(digit as u64))
        {
            Some(v) => v,
            None => return Ok(None),
        };
    }
}

/// What followed the ten header digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Framing {
    /// A framing byte was skipped; the next byte opens the first entry.
    Skipped,
    /// No framing byte. The delimiter opening the first entry has already
    /// been consumed.
    Absent,
}

impl SauHeader {
    /// Reads the ten header digits and the byte after them.
    ///
    /// That byte is the framing byte, except in archives written without one
    /// where it is the delimiter opening the first entry. A delimiter is only
    /// taken as the framing byte when another delimiter follows it, since an
    /// entry name cannot be empty.
    pub(crate) fn read<R: BufRead + ?Sized>(
        reader: &mut R,
    ) -> Result<(SauHeader, Framing), HeaderError> {
        let mut reserved: u64 = 0;

        for found in 0..HEADER_DIGITS {
            match next_byte(reader).map_err(HeaderError::Io)? {
                Some(b) if b.is_ascii_digit() => {
                    reserved = reserved * 10 + u64::from(b - b'0');
                }
                _ => return Err(HeaderError::Malformed(found)),
            }
        }

        let framing = match next_byte(reader).map_err(HeaderError::Io)? {
            Some(ENTRY_DELIMITER) => match peek_byte(reader).map_err(HeaderError::Io)? {
                Some(ENTRY_DELIMITER) => Framing::Skipped,
                _ => {
                    tracing::debug!(reserved, "header without framing byte");
                    Framing::Absent
                }
            },
            _ => Framing::Skipped,
        };

        tracing::debug!(reserved, "deserialized SauHeader");
        Ok((SauHeader { reserved }, framing))
    }
}

impl EntryLine {
    /// Matches `|name,mode,size|` at the current position.
    ///
    /// `Ok(None)` means the stream holds no further entry, either because it
    /// ended or because the bytes do not form an entry header. It is not an
    /// error.
    pub(crate) fn read_next<R: BufRead + ?Sized>(
        reader: &mut R,
    ) -> std::io::Result<Option<EntryLine>> {
        match next_byte(reader)? {
            Some(ENTRY_DELIMITER) => EntryLine::read_opened(reader),
            _ => Ok(None),
        }
    }

    /// Like [`EntryLine::read_next`] for a header whose opening delimiter
    /// has already been consumed.
    pub(crate) fn read_opened<R: BufRead + ?Sized>(
        reader: &mut R,
    ) -> std::io::Result<Option<EntryLine>> {
        let mut name = Vec::new();
        loop {
            match next_byte(reader)? {
                Some(FIELD_SEPARATOR) => break,
                Some(ENTRY_DELIMITER) | None => return Ok(None),
                Some(b) => {
                    if name.len() == MAX_NAME_LEN {
                        return Ok(None);
                    }
                    name.push(b);
                }
            }
        }

        if name.is_empty() {
            return Ok(None);
        }

        let mode = match read_number(reader, 8, FIELD_SEPARATOR)? {
            Some(m) if m <= 0o777 => m as u32,
            _ => return Ok(None),
        };

        let length = match read_number(reader, 10, ENTRY_DELIMITER)? {
            Some(l) => l,
            None => return Ok(None),
        };

        Ok(Some(EntryLine { name, mode, length }))
    }
}

/// Copies exactly `length` payload bytes from the archive into `dest`.
pub(crate) fn read_payload<R, W>(reader: &mut R, dest: &mut W, length: u64) -> Result<(), CopyError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    copy_exact(reader, dest, length)
}
