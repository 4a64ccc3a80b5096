//! Wheel archive inspection.
//!
//! [`WheelContents::from_bytes`] is a pure function over the raw archive: it
//! returns the METADATA text, the `top_level.txt` names and the full entry
//! list, so every check downstream can run without the build tool or the
//! filesystem.

use crate::metadata::CoreMetadata;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

/// Errors arising from reading a wheel archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// I/O error while reading the wheel.
    #[error("wheel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a valid zip archive.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Everything the verifier needs from a wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WheelContents {
    /// Text of the first entry whose name ends in `METADATA`, or empty.
    pub metadata: String,
    /// Lines of the first entry whose name ends in `top_level.txt`, if any.
    pub top_level: Option<Vec<String>>,
    /// Every entry name in archive order.
    pub file_names: Vec<String>,
}

impl WheelContents {
    /// Inspect a wheel held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Zip`] if `bytes` are not a zip archive, or
    /// [`ArchiveError::Io`] if an entry cannot be read.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let file_names: Vec<String> = archive.file_names().map(str::to_owned).collect();

        let metadata = read_entry_ending_with(&mut archive, &file_names, "METADATA")?
            .unwrap_or_default();
        let top_level = read_entry_ending_with(&mut archive, &file_names, "top_level.txt")?
            .map(|text| text.lines().map(str::to_owned).collect());

        Ok(Self {
            metadata,
            top_level,
            file_names,
        })
    }

    /// Parse the METADATA header block.
    #[must_use]
    pub fn core_metadata(&self) -> CoreMetadata {
        CoreMetadata::parse(&self.metadata)
    }

    /// Whether `top_level.txt` exists and lists `name`.
    #[must_use]
    pub fn lists_top_level(&self, name: &str) -> bool {
        self.top_level
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n.trim() == name))
    }

    /// Whether the archive contains an entry named exactly `path`.
    #[must_use]
    pub fn contains_file(&self, path: &str) -> bool {
        self.file_names.iter().any(|name| name == path)
    }
}

/// Read the first entry whose name ends with `suffix`, decoded lossily.
fn read_entry_ending_with(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    file_names: &[String],
    suffix: &str,
) -> Result<Option<String>, ArchiveError> {
    let Some(name) = file_names.iter().find(|n| n.ends_with(suffix)) else {
        return Ok(None);
    };

    let mut entry = archive.by_name(name)?;
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw)?;
    Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
}

/// A wheel located on disk after a successful build.
#[derive(Debug, Clone)]
pub struct BuiltWheel {
    /// Full path to the `.whl` file.
    pub path: Utf8PathBuf,
    /// Inspected archive contents.
    pub contents: WheelContents,
}

impl BuiltWheel {
    /// Read and inspect the wheel at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArchiveError`] if the file cannot be read or is not a
    /// valid archive.
    pub fn open(path: &Utf8Path) -> Result<Self, ArchiveError> {
        debug!("inspecting wheel {path}");
        let bytes = std::fs::read(path)?;
        let contents = WheelContents::from_bytes(&bytes)?;
        Ok(Self {
            path: path.to_owned(),
            contents,
        })
    }

    /// The wheel's file name without its directory.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }
}
