use std::path::PathBuf;

use humansize::{format_size, BINARY};
use sau_format::SauFileReader;

use crate::error::{Error, Result};

pub fn run(archive: PathBuf, output: PathBuf, verbose: bool) -> Result<()> {
    tracing::debug!(archive = %archive.display(), dest = %output.display(), "extracting archive");
    let reader = SauFileReader::open(&archive).map_err(|source| Error::OpenArchive {
        path: archive.clone(),
        source,
    })?;

    let stats = reader
        .extract_all(&output)
        .map_err(|source| Error::Extract {
            path: archive.clone(),
            source,
        })?;

    if verbose {
        println!(
            "{} files, {} written",
            stats.files_extracted,
            format_size(stats.bytes_written, BINARY)
        );
    }

    println!("Archive extracted successfully to {}", output.display());
    Ok(())
}
