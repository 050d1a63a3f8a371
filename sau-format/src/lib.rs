//! Reader and writer for the `.sau` archive format.
//!
//! A `.sau` archive bundles a handful of plain-text files into one stream:
//!
//! ```text
//! <10 ASCII digits><framing byte>|name,mode,size|<size bytes>|name,mode,size|<size bytes>...
//! ```
//!
//! The ten digits are a reserved field, the mode is rendered in octal and the
//! size in decimal. There is no index or trailer; the stream is read strictly
//! forward and ends where the next entry header no longer matches.

mod counting;
mod de;
mod error;
mod file;
pub mod fs;
mod header;
pub mod path;
mod record;
mod ser;

pub use error::{BuildError, ErrorKind, ExtractError};
#[cfg(feature = "reader")]
pub use file::reader::{ExtractStats, SauFileReader};
#[cfg(feature = "writer")]
pub use file::writer::{BuildStats, Limits, PreparedInput, SauFileWriter};
pub use header::SauHeader;
pub use path::EntryName;
pub use record::EntryRecord;
