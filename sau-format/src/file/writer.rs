use std::fs::File;
use std::io::{prelude::*, BufWriter};
use std::path::{Path, PathBuf};

use crate::{
    counting::{CopyError, CountingWriter},
    error::BuildError,
    fs,
    header::SauHeader,
    path::EntryName,
    record::EntryRecord,
    ser::{write_payload, Serialize},
};

/// Admission limits applied before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_files: usize,
    pub max_total_bytes: u64,
}

impl Limits {
    pub const DEFAULT_MAX_FILES: usize = 32;
    pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 200 * 1024 * 1024;
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_files: Limits::DEFAULT_MAX_FILES,
            max_total_bytes: Limits::DEFAULT_MAX_TOTAL_BYTES,
        }
    }
}

/// Totals reported after a build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub files: usize,
    pub payload_bytes: u64,
    pub archive_bytes: u64,
}

/// An input file that passed admission, with its measured length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInput {
    path: PathBuf,
    name: EntryName,
    length: u64,
}

impl PreparedInput {
    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn name(&self) -> &EntryName {
        &self.name
    }

    #[inline(always)]
    pub fn length(&self) -> u64 {
        self.length
    }
}

type TextFilter = Box<dyn Fn(&Path) -> bool>;

/// Builds `.sau` archives from a list of files.
///
/// Building happens in two steps: [`SauFileWriter::prepare`] checks every
/// input against the limits and the text filter and measures it, then
/// [`SauFileWriter::write`] streams the archive. [`SauFileWriter::build`]
/// does both and writes the result to a file.
pub struct SauFileWriter {
    limits: Limits,
    is_text: TextFilter,
}

impl std::fmt::Debug for SauFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SauFileWriter")
            .field("limits", &self.limits)
            .finish()
    }
}

impl Default for SauFileWriter {
    fn default() -> Self {
        SauFileWriter::new()
    }
}

#[inline(always)]
fn open_input(path: &Path) -> Result<File, BuildError> {
    File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            BuildError::InputNotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            BuildError::InputUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl SauFileWriter {
    /// A writer with the default limits that only accepts 7-bit ASCII files.
    pub fn new() -> SauFileWriter {
        SauFileWriter {
            limits: Limits::default(),
            is_text: Box::new(|path: &Path| fs::is_text_file(path)),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> SauFileWriter {
        self.limits = limits;
        self
    }

    /// Replaces the predicate deciding whether an input counts as text.
    pub fn with_text_filter<F>(mut self, is_text: F) -> SauFileWriter
    where
        F: Fn(&Path) -> bool + 'static,
    {
        self.is_text = Box::new(is_text);
        self
    }

    #[inline(always)]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Checks and measures every input, in order.
    ///
    /// Each file is read in full to learn its length, so the length stored in
    /// the archive is the number of bytes actually available.
    pub fn prepare<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<PreparedInput>, BuildError> {
        if paths.is_empty() {
            return Err(BuildError::NoInputs);
        }

        if paths.len() > self.limits.max_files {
            return Err(BuildError::TooManyFiles {
                count: paths.len(),
                max: self.limits.max_files,
            });
        }

        let mut inputs = Vec::with_capacity(paths.len());
        let mut total: u64 = 0;

        for path in paths {
            let path = path.as_ref();
            let file = open_input(path)?;

            let meta = file
                .metadata()
                .map_err(|source| BuildError::InputUnreadable {
                    path: path.to_path_buf(),
                    source,
                })?;
            if !meta.is_file() {
                return Err(BuildError::InputUnreadable {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "not a regular file",
                    ),
                });
            }

            if !(self.is_text)(path) {
                return Err(BuildError::NotText {
                    path: path.to_path_buf(),
                });
            }

            let name = EntryName::from_path(path).map_err(|source| BuildError::InvalidName {
                path: path.to_path_buf(),
                source,
            })?;

            // Read at most one byte past the remaining budget.
            let budget = self.limits.max_total_bytes.saturating_sub(total);
            let mut limited = file.take(budget.saturating_add(1));
            let length = std::io::copy(&mut limited, &mut std::io::sink()).map_err(|source| {
                BuildError::InputUnreadable {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

            if length > budget {
                return Err(BuildError::SizeLimitExceeded {
                    path: path.to_path_buf(),
                    max: self.limits.max_total_bytes,
                });
            }
            total += length;

            tracing::debug!(path = %path.display(), %name, length, total, "admitted input");
            inputs.push(PreparedInput {
                path: path.to_path_buf(),
                name,
                length,
            });
        }

        Ok(inputs)
    }

    /// Streams the archive for `inputs` into `out`.
    pub fn write<W: Write>(&self, inputs: &[PreparedInput], out: W) -> Result<BuildStats, BuildError> {
        let mut out = CountingWriter::new(BufWriter::new(out));
        SauHeader::new()
            .write(&mut out)
            .map_err(|source| BuildError::Write { source })?;

        let mut stats = BuildStats::default();

        for input in inputs {
            let record = EntryRecord::from_path(&input.path, input.length)?;
            record
                .write(&mut out)
                .map_err(|source| BuildError::Write { source })?;

            let mut file = open_input(&input.path)?;
            write_payload(&record, &mut file, &mut out).map_err(|e| match e {
                CopyError::Read(source) => BuildError::InputUnreadable {
                    path: input.path.clone(),
                    source,
                },
                CopyError::Write(source) => BuildError::Write { source },
                CopyError::Short(actual) => BuildError::InputChanged {
                    path: input.path.clone(),
                    expected: input.length,
                    actual,
                },
            })?;

            tracing::trace!(path = %input.path.display(), length = input.length, "wrote entry");
            stats.files += 1;
            stats.payload_bytes += input.length;
        }

        out.flush().map_err(|source| BuildError::Write { source })?;
        stats.archive_bytes = out.bytes_written();
        Ok(stats)
    }

    /// Builds an archive of `paths` at `output`, replacing any existing file.
    ///
    /// The archive is written to a temporary file next to `output` and only
    /// moved into place once complete, so a failed build leaves no partial
    /// archive behind.
    pub fn build<P, Q>(&self, paths: &[P], output: Q) -> Result<BuildStats, BuildError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let output = output.as_ref();
        let inputs = self.prepare(paths)?;

        if let Some(input) = inputs.iter().find(|i| is_same_file(i.path(), output)) {
            return Err(BuildError::ArchiveIsInput {
                path: input.path.clone(),
            });
        }

        let output_error = |source: std::io::Error| BuildError::OutputUnwritable {
            path: output.to_path_buf(),
            source,
        };

        let dir = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp = tempfile::Builder::new()
            .prefix(".sau")
            .tempfile_in(dir)
            .map_err(output_error)?;

        let stats = self.write(&inputs, temp.as_file_mut())?;

        fs::set_mode(temp.as_file(), 0o644).map_err(output_error)?;
        temp.persist(output).map_err(|e| output_error(e.error))?;

        tracing::info!(
            output = %output.display(),
            files = stats.files,
            bytes = stats.archive_bytes,
            "archive created"
        );
        Ok(stats)
    }
}
