//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::GlobSet;

pub mod analyze;
pub mod info;
pub mod reference;
pub mod schema;

/// Read a file as raw bytes and validate its size against the configured limit.
///
/// Decoding is left to the caller so that undecodable files can be reported
/// per document instead of aborting the whole run.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<Vec<u8>> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

/// Expand the given paths into input files.
///
/// Files are kept as given. Directories contribute their direct children
/// whose file names match `include`, sorted by name.
pub fn expand_paths(paths: &[Utf8PathBuf], include: &GlobSet) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let entries = path
            .read_dir_utf8()
            .with_context(|| format!("failed to list {path}"))?;
        let mut matched = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("failed to list {path}"))?;
            let is_file = entry.file_type().is_ok_and(|t| t.is_file());
            if is_file && include.is_match(entry.file_name()) {
                matched.push(entry.into_path());
            }
        }
        matched.sort();
        tracing::debug!(dir = %path, files = matched.len(), "expanded directory");
        files.extend(matched);
    }
    Ok(files)
}
