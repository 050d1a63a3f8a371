//! Filesystem collaborators of the archive reader and writer.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Mode given to an output directory created during extraction.
pub const OUTPUT_DIR_MODE: u32 = 0o700;

/// Whether every byte of the file is 7-bit ASCII.
///
/// Unreadable files are reported as not being text.
pub fn is_text_file<P: AsRef<Path>>(path: P) -> bool {
    let file = match File::open(path.as_ref()) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut reader = BufReader::new(file);

    loop {
        let len = match reader.fill_buf() {
            Ok([]) => return true,
            Ok(buf) if !buf.is_ascii() => return false,
            Ok(buf) => buf.len(),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => return false,
        };
        reader.consume(len);
    }
}

/// Permission bits of `path`, masked to `0o777`.
#[cfg(unix)]
pub fn read_mode<P: AsRef<Path>>(path: P) -> std::io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(std::fs::metadata(path)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
pub fn read_mode<P: AsRef<Path>>(path: P) -> std::io::Result<u32> {
    let meta = std::fs::metadata(path)?;
    Ok(if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    })
}

/// Applies permission bits to an open file.
#[cfg(unix)]
pub fn set_mode(file: &File, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode & 0o777))
}

#[cfg(not(unix))]
pub fn set_mode(file: &File, mode: u32) -> std::io::Result<()> {
    let mut permissions = file.metadata()?.permissions();
    permissions.set_readonly(mode & 0o222 == 0);
    file.set_permissions(permissions)
}

/// Makes sure `path` is a directory, creating it (and any missing parents)
/// with [`OUTPUT_DIR_MODE`].
pub fn create_output_dir<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(OUTPUT_DIR_MODE);
    }

    builder.create(path)?;
    tracing::debug!(path = %path.display(), "created output directory");
    Ok(())
}

/// Opens `path` for writing, truncating an existing file. A read-only file
/// left by an earlier entry of the same name is replaced.
pub fn create_output_file<P: AsRef<Path>>(path: P) -> std::io::Result<File> {
    let path = path.as_ref();
    let open = || {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    };

    match open() {
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied && path.is_file() => {
            tracing::debug!(path = %path.display(), "replacing read-only file");
            std::fs::remove_file(path)?;
            open()
        }
        result => result,
    }
}
