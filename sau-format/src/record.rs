use std::path::Path;

use crate::{error::BuildError, fs, path::EntryName};

/// Metadata of one archive entry: everything in its `|name,mode,size|` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// The file name the entry is extracted to.
    pub name: EntryName,

    /// Permission bits, always masked to `0o777`.
    pub mode: u32,

    /// The exact number of payload bytes following the header line.
    pub length: u64,
}

impl EntryRecord {
    pub fn new(name: EntryName, mode: u32, length: u64) -> EntryRecord {
        EntryRecord {
            name,
            mode: mode & 0o777,
            length,
        }
    }

    /// Describes the file at `path`, whose content is known to be `length`
    /// bytes long. The permission bits are read from the filesystem now.
    pub fn from_path<P: AsRef<Path>>(path: P, length: u64) -> Result<EntryRecord, BuildError> {
        let path = path.as_ref();
        let name = EntryName::from_path(path).map_err(|source| BuildError::InvalidName {
            path: path.to_path_buf(),
            source,
        })?;
        let mode = fs::read_mode(path).map_err(|source| BuildError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(EntryRecord::new(name, mode, length))
    }

    #[inline(always)]
    pub fn name(&self) -> &EntryName {
        &self.name
    }

    #[inline(always)]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[inline(always)]
    pub fn length(&self) -> u64 {
        self.length
    }
}
