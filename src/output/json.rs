//! JSON artifact reader and writer.
//!
//! The pipeline checkpoints its stages as pretty-printed JSON arrays:
//! parsed debug records at the caller's path, merged records next to it
//! under a `time`-prefixed file name.

use crate::utils::config::MERGED_FILE_PREFIX;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write records to a JSON array file
///
/// **Public** - main entry point for artifact output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_records<T: Serialize>(
    records: &[T],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    debug!("Writing {} records to: {}", records.len(), output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Wrote {} ({} bytes)",
        output_path.display(),
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a JSON array file written by `write_records`
///
/// # Errors
/// * `OutputError::ReadFailed` - File cannot be opened
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_records<T: DeserializeOwned>(
    input_path: impl AsRef<Path>,
) -> Result<Vec<T>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading records from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let records: Vec<T> = serde_json::from_reader(BufReader::new(file))?;

    debug!("Loaded {} records", records.len());

    Ok(records)
}

/// Path of the merged-records artifact for a parsed-records path
///
/// `out/sdk.json` becomes `out/timesdk.json`.
pub fn merged_output_path(parsed_path: impl AsRef<Path>) -> Result<PathBuf, OutputError> {
    let parsed_path = parsed_path.as_ref();
    let file_name = parsed_path.file_name().ok_or_else(|| {
        OutputError::InvalidPath(format!("No file name in {}", parsed_path.display()))
    })?;

    let mut merged_name = std::ffi::OsString::from(MERGED_FILE_PREFIX);
    merged_name.push(file_name);

    Ok(parsed_path.with_file_name(merged_name))
}

/// Validate that output path is writable
///
/// **Public** - shared by the pipeline before any stage runs
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
