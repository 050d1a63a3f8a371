use std::path::PathBuf;

use crate::path::IntoEntryNameError;

/// Broad class of a failure, independent of the operation that hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A source file is missing, unreadable, not text, or over a limit.
    Input,
    /// The archive stream does not follow the format.
    Format,
    /// Creating, writing or changing permissions on the filesystem failed.
    Filesystem,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No input files given")]
    NoInputs,

    #[error("Too many input files: {count} given, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },

    #[error("Input file `{}` not found", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read input file `{}`", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file `{}` is not a plain-text file", .path.display())]
    NotText { path: PathBuf },

    #[error("Cannot store `{}` under its file name", .path.display())]
    InvalidName {
        path: PathBuf,
        #[source]
        source: IntoEntryNameError,
    },

    #[error("Total size of input files exceeds {max} bytes at `{}`", .path.display())]
    SizeLimitExceeded { path: PathBuf, max: u64 },

    #[error("Input file `{}` is the archive being written", .path.display())]
    ArchiveIsInput { path: PathBuf },

    #[error("Cannot read permissions of `{}`", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file `{}` shrank from {expected} to {actual} bytes while archiving", .path.display())]
    InputChanged {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Cannot write archive `{}`", .path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write archive stream")]
    Write {
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::NoInputs
            | BuildError::TooManyFiles { .. }
            | BuildError::InputNotFound { .. }
            | BuildError::InputUnreadable { .. }
            | BuildError::NotText { .. }
            | BuildError::InvalidName { .. }
            | BuildError::SizeLimitExceeded { .. }
            | BuildError::ArchiveIsInput { .. }
            | BuildError::Metadata { .. }
            | BuildError::InputChanged { .. } => ErrorKind::Input,
            BuildError::OutputUnwritable { .. } | BuildError::Write { .. } => {
                ErrorKind::Filesystem
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Archive file `{}` is inappropriate or corrupt", .path.display())]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed archive header: expected 10 digits, found {found}")]
    MalformedHeader { found: usize },

    #[error("Cannot read archive stream")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output directory `{}`", .path.display())]
    OutputDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsafe entry name `{name}`")]
    UnsafeEntryName {
        name: String,
        #[source]
        source: IntoEntryNameError,
    },

    #[error("Unexpected end of archive: entry `{name}` declares {expected} bytes, only {actual} present")]
    Truncated {
        name: String,
        expected: u64,
        actual: u64,
    },

    #[error("Cannot create output file `{}`", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot set permissions {mode:o} on `{}`", .path.display())]
    SetPermissions {
        path: PathBuf,
        mode: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write output file")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write output file `{}`", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::ArchiveUnreadable { .. } => ErrorKind::Input,
            ExtractError::MalformedHeader { .. }
            | ExtractError::UnsafeEntryName { .. }
            | ExtractError::Truncated { .. } => ErrorKind::Format,
            ExtractError::Read { .. }
            | ExtractError::OutputDirUnavailable { .. }
            | ExtractError::CreateFile { .. }
            | ExtractError::SetPermissions { .. }
            | ExtractError::Write { .. }
            | ExtractError::WriteFile { .. } => ErrorKind::Filesystem,
        }
    }
}
