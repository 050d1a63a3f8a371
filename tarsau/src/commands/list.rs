use std::path::PathBuf;

use humansize::{format_size, BINARY};
use sau_format::{EntryRecord, SauFileReader};

use crate::error::{Error, Result};

macro_rules! add {
    ($ident:ident, $value:tt => $s:ident) => {
        if $ident {
            $s.push($value);
        } else {
            $s.push('-');
        }
    };
}

#[inline(always)]
fn from_mode(mode: u32) -> String {
    let or = (mode & 0b1_0000_0000) > 0;
    let ow = (mode & 0b0_1000_0000) > 0;
    let ox = (mode & 0b0_0100_0000) > 0;
    let gr = (mode & 0b0_0010_0000) > 0;
    let gw = (mode & 0b0_0001_0000) > 0;
    let gx = (mode & 0b0_0000_1000) > 0;
    let ar = (mode & 0b0_0000_0100) > 0;
    let aw = (mode & 0b0_0000_0010) > 0;
    let ax = (mode & 0b0_0000_0001) > 0;

    let mut s = String::new();
    add!(or, 'r' => s);
    add!(ow, 'w' => s);
    add!(ox, 'x' => s);
    add!(gr, 'r' => s);
    add!(gw, 'w' => s);
    add!(gx, 'x' => s);
    add!(ar, 'r' => s);
    add!(aw, 'w' => s);
    add!(ax, 'x' => s);

    s
}

fn print_json(records: &[EntryRecord]) -> Result<()> {
    let entries = records
        .iter()
        .map(|r| {
            serde_json::json!({
                "name": r.name().to_string(),
                "mode": format!("{:o}", r.mode()),
                "size": r.length(),
            })
        })
        .collect::<Vec<_>>();

    let out = serde_json::to_string_pretty(&entries).map_err(|source| Error::Json { source })?;
    println!("{}", out);
    Ok(())
}

pub fn run(archive: PathBuf, json: bool, verbose: bool) -> Result<()> {
    let reader = SauFileReader::open(&archive).map_err(|source| Error::OpenArchive {
        path: archive.clone(),
        source,
    })?;
    let header = *reader.header();
    tracing::debug!(archive = %archive.display(), reserved = header.reserved(), "listing archive");

    let records = reader.entries().map_err(|source| Error::List {
        path: archive.clone(),
        source,
    })?;

    if json {
        return print_json(&records);
    }

    if verbose {
        println!("Reserved header field: {}", header.reserved());
    }

    println!("Mode       Octal  Size          Name");
    println!("---------  -----  ------------  --------");
    for record in records.iter() {
        println!(
            "{:9}  {:>5o}  {:>12}  {}",
            from_mode(record.mode()),
            record.mode(),
            format_size(record.length(), BINARY),
            record.name(),
        );
    }

    Ok(())
}
