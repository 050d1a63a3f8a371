use std::path::PathBuf;

use humansize::{format_size, BINARY};
use sau_format::SauFileWriter;

use crate::error::{Error, Result};

pub fn run(output: PathBuf, files: Vec<PathBuf>, verbose: bool) -> Result<()> {
    let writer = SauFileWriter::new();
    let limits = writer.limits();
    tracing::debug!(
        output = %output.display(),
        files = files.len(),
        max_files = limits.max_files,
        max_total_bytes = limits.max_total_bytes,
        "building archive"
    );

    let stats = writer
        .build(&files, &output)
        .map_err(|source| Error::CreateArchive {
            path: output.clone(),
            source,
        })?;

    if verbose {
        println!(
            "Limits: {} files, {} of content",
            limits.max_files,
            format_size(limits.max_total_bytes, BINARY)
        );
        for file in &files {
            println!("{}", file.display());
        }
        println!(
            "{} files, {} of content, {} archive",
            stats.files,
            format_size(stats.payload_bytes, BINARY),
            format_size(stats.archive_bytes, BINARY),
        );
    }

    println!("Archive created successfully: {}", output.display());
    Ok(())
}
