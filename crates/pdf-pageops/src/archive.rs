//! Output packaging
//!
//! A single output is handed over as-is; several are bundled into one zip
//! archive so they can be delivered as one file.

use crate::types::*;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One produced file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// What gets delivered for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Number of files inside
    pub entries: usize,
}

/// Package outputs, stamping archives with the current local time
pub fn package(outputs: Vec<OutputFile>, stem: &str) -> Result<Package> {
    package_at(outputs, stem, chrono::Local::now().naive_local())
}

/// Package outputs; archives are named `{stem}-{YYYYMMDD-HHMMSS}.zip`
pub fn package_at(outputs: Vec<OutputFile>, stem: &str, at: NaiveDateTime) -> Result<Package> {
    if outputs.len() <= 1 {
        let output = outputs.into_iter().next().ok_or(PageOpsError::EmptyInput)?;
        return Ok(Package {
            bytes: output.bytes,
            filename: output.filename,
            entries: 1,
        });
    }

    let entries = outputs.len();
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut used = HashSet::new();

    for output in outputs {
        let name = unique_entry_name(&mut used, &output.filename);
        writer.start_file(name, options)?;
        writer.write_all(&output.bytes)?;
    }

    let bytes = writer.finish()?.into_inner();
    let filename = format!("{}-{}.zip", stem, at.format("%Y%m%d-%H%M%S"));
    log::debug!("Packed {} files into {} ({} bytes)", entries, filename, bytes.len());

    Ok(Package {
        bytes,
        filename,
        entries,
    })
}

/// `report.pdf`, then `report-2.pdf`, `report-3.pdf`, ...
fn unique_entry_name(used: &mut HashSet<String>, filename: &str) -> String {
    let mut candidate = filename.to_string();
    let mut n = 1;
    while used.contains(&candidate) {
        n += 1;
        candidate = match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
            _ => format!("{filename}-{n}"),
        };
    }
    used.insert(candidate.clone());
    candidate
}
