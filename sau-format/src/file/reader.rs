use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::Path;

use crate::{
    counting::{CopyError, CountingReader},
    de::{read_payload, EntryLine, Framing, HeaderError},
    error::ExtractError,
    fs,
    header::SauHeader,
    path::EntryName,
    record::EntryRecord,
};

/// Totals reported after an extraction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub files_extracted: u64,
    pub bytes_written: u64,
}

/// Forward-only reader over a `.sau` stream.
///
/// Entries are yielded in archive order by [`SauFileReader::next_entry`];
/// the payload of the current entry can be read with
/// [`SauFileReader::read_payload`] and is skipped otherwise.
#[derive(Debug)]
pub struct SauFileReader<R> {
    reader: CountingReader<R>,
    header: SauHeader,
    current: Option<EntryRecord>,
    remaining: u64,
    /// The delimiter opening the next entry was consumed with the header.
    opened: bool,
    done: bool,
}

impl SauFileReader<BufReader<File>> {
    /// Opens an archive on disk and reads its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ExtractError::ArchiveUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "opened archive");
        SauFileReader::new(BufReader::new(file))
    }
}

impl<R: BufRead> SauFileReader<R> {
    /// Reads the header from `reader`, leaving it positioned at the first entry.
    pub fn new(reader: R) -> Result<Self, ExtractError> {
        let mut reader = CountingReader::new(reader);
        let (header, framing) = SauHeader::read(&mut reader).map_err(|e| match e {
            HeaderError::Malformed(found) => ExtractError::MalformedHeader { found },
            HeaderError::Io(source) => ExtractError::Read { source },
        })?;

        Ok(SauFileReader {
            reader,
            header,
            current: None,
            remaining: 0,
            opened: framing == Framing::Absent,
            done: false,
        })
    }

    #[inline(always)]
    pub fn header(&self) -> &SauHeader {
        &self.header
    }

    /// Advances to the next entry, skipping whatever is left of the payload
    /// of the current one. Returns `None` once no further entry matches, and
    /// on every call after that.
    pub fn next_entry(&mut self) -> Result<Option<EntryRecord>, ExtractError> {
        if self.done {
            return Ok(None);
        }

        self.skip_payload()?;
        self.current = None;

        let start = self.reader.position();
        let line = if std::mem::take(&mut self.opened) {
            EntryLine::read_opened(&mut self.reader)
        } else {
            EntryLine::read_next(&mut self.reader)
        };
        let line = match line.map_err(|source| ExtractError::Read { source })? {
            Some(line) => line,
            None => {
                self.done = true;
                if self.reader.position() > start {
                    tracing::warn!(
                        offset = format_args!("{:#x}", start),
                        "trailing data after last entry ignored"
                    );
                }
                return Ok(None);
            }
        };

        let name = EntryName::new(&line.name).map_err(|source| ExtractError::UnsafeEntryName {
            name: String::from_utf8_lossy(&line.name).into_owned(),
            source,
        })?;
        let record = EntryRecord::new(name, line.mode, line.length);

        let end = self.reader.position();
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            name = %record.name,
            mode = format_args!("{:o}", record.mode),
            length = record.length,
            "deserialized EntryRecord"
        );

        self.remaining = record.length;
        self.current = Some(record.clone());
        Ok(Some(record))
    }

    /// Streams the unread payload of the current entry into `dest` and
    /// returns the number of bytes copied.
    pub fn read_payload<W: Write + ?Sized>(&mut self, dest: &mut W) -> Result<u64, ExtractError> {
        match self.copy_payload(dest) {
            Ok(n) => Ok(n),
            Err(PayloadError::Archive(e)) => Err(e),
            Err(PayloadError::Dest(source)) => Err(ExtractError::Write { source }),
        }
    }

    fn copy_payload<W: Write + ?Sized>(&mut self, dest: &mut W) -> Result<u64, PayloadError> {
        let length = self.remaining;
        let result = read_payload(&mut self.reader, dest, length);
        self.remaining = 0;

        match result {
            Ok(()) => Ok(length),
            Err(CopyError::Write(e)) => Err(PayloadError::Dest(e)),
            Err(CopyError::Read(source)) => {
                Err(PayloadError::Archive(ExtractError::Read { source }))
            }
            Err(CopyError::Short(actual)) => {
                let name = self
                    .current
                    .as_ref()
                    .map(|r| r.name.to_string())
                    .unwrap_or_default();
                Err(PayloadError::Archive(ExtractError::Truncated {
                    name,
                    expected: length,
                    actual,
                }))
            }
        }
    }

    fn skip_payload(&mut self) -> Result<(), ExtractError> {
        if self.remaining == 0 {
            return Ok(());
        }

        match self.copy_payload(&mut std::io::sink()) {
            Ok(_) => Ok(()),
            Err(PayloadError::Archive(e)) => Err(e),
            Err(PayloadError::Dest(source)) => Err(ExtractError::Write { source }),
        }
    }

    /// Reads every remaining entry header, skipping payloads.
    pub fn entries(mut self) -> Result<Vec<EntryRecord>, ExtractError> {
        let mut out = vec![];
        while let Some(record) = self.next_entry()? {
            out.push(record);
        }
        Ok(out)
    }

    /// Recreates every remaining entry as a file under `dest`.
    ///
    /// `dest` is created with mode `0700` if it does not exist. Files are
    /// written in archive order; a later entry with the same name replaces an
    /// earlier one. On error, files already written are left in place.
    pub fn extract_all<P: AsRef<Path>>(mut self, dest: P) -> Result<ExtractStats, ExtractError> {
        let dest = dest.as_ref();
        fs::create_output_dir(dest).map_err(|source| ExtractError::OutputDirUnavailable {
            path: dest.to_path_buf(),
            source,
        })?;

        let mut stats = ExtractStats::default();

        while let Some(record) = self.next_entry()? {
            let path = dest.join(record.name.to_path_buf());

            let file = fs::create_output_file(&path).map_err(|source| ExtractError::CreateFile {
                path: path.clone(),
                source,
            })?;
            fs::set_mode(&file, record.mode).map_err(|source| ExtractError::SetPermissions {
                path: path.clone(),
                mode: record.mode,
                source,
            })?;

            let mut out = BufWriter::new(file);
            let written = match self.copy_payload(&mut out) {
                Ok(n) => n,
                Err(PayloadError::Archive(e)) => return Err(e),
                Err(PayloadError::Dest(source)) => {
                    return Err(ExtractError::WriteFile { path, source })
                }
            };
            out.flush().map_err(|source| ExtractError::WriteFile {
                path: path.clone(),
                source,
            })?;

            tracing::debug!(path = %path.display(), bytes = written, "extracted entry");
            stats.files_extracted += 1;
            stats.bytes_written += written;
        }

        tracing::info!(
            files = stats.files_extracted,
            bytes = stats.bytes_written,
            dest = %dest.display(),
            "extraction finished"
        );
        Ok(stats)
    }
}

/// Failure while copying a payload out of the archive.
enum PayloadError {
    /// The archive itself failed: truncated or unreadable.
    Archive(ExtractError),
    /// Writing to the destination failed.
    Dest(std::io::Error),
}
