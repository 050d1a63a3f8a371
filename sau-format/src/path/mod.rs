use std::fmt;
use std::path::{Path, PathBuf};

mod error;

pub use self::error::IntoEntryNameError;

/// Longest name accepted, matching the usual `NAME_MAX` of POSIX filesystems.
pub const MAX_NAME_LEN: usize = 255;

/// Bytes that may never appear in a name. `,` and `|` frame the entry header
/// line and there is no escaping; the others would let a name leave the
/// extraction directory.
const FORBIDDEN_BYTES: &[u8] = b",|/\\\0";

/// The name of one archive entry: a single, plain file name.
///
/// Names are stored without a directory part, so extracting an entry always
/// creates a file directly inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryName(Vec<u8>);

impl EntryName {
    pub fn new<B: AsRef<[u8]>>(bytes: B) -> Result<EntryName, IntoEntryNameError> {
        let bytes = bytes.as_ref();

        if bytes.is_empty() {
            return Err(IntoEntryNameError::EmptyName);
        }

        if bytes.len() > MAX_NAME_LEN {
            return Err(IntoEntryNameError::TooLong(bytes.len()));
        }

        if bytes == b"." || bytes == b".." {
            return Err(IntoEntryNameError::ReservedName);
        }

        if let Some(b) = bytes.iter().find(|b| FORBIDDEN_BYTES.contains(b)) {
            return Err(IntoEntryNameError::ForbiddenByte(*b));
        }

        Ok(EntryName(bytes.to_vec()))
    }

    /// Takes the final component of `path` as the entry name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<EntryName, IntoEntryNameError> {
        let file_name = path
            .as_ref()
            .file_name()
            .ok_or(IntoEntryNameError::NoFileName)?;

        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            EntryName::new(file_name.as_bytes())
        }

        #[cfg(not(unix))]
        {
            let s = file_name
                .to_str()
                .ok_or(IntoEntryNameError::UnrepresentableStr)?;
            EntryName::new(s.as_bytes())
        }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The name as a relative path, to be joined onto an output directory.
    pub fn to_path_buf(&self) -> PathBuf {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            PathBuf::from(std::ffi::OsStr::from_bytes(&self.0))
        }

        #[cfg(not(unix))]
        {
            PathBuf::from(String::from_utf8_lossy(&self.0).into_owned())
        }
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
