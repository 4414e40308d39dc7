//! Directory loader: reads every bundle file and extracts patient records.

use std::fs;
use std::path::{Path, PathBuf};

use chart_core::{ChartError, ChartResult, PatientDirectory, PatientRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::extract_record;

/// Where and how bundle files are discovered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    pub data_dir: PathBuf,
    /// File extension, without the dot.
    pub extension: String,
    /// 1 means only files directly inside `data_dir`.
    pub max_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/synthea_sample_data_fhir_latest"),
            extension: "json".to_string(),
            max_depth: 1,
        }
    }
}

impl LoaderConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// A file the loader could not turn into a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one directory load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Extracted records, in file-name order.
    pub records: Vec<PatientRecord>,
    /// Unreadable or malformed files.
    pub skipped: Vec<SkippedDocument>,
    /// Well-formed bundles without a Patient resource.
    pub dropped: usize,
}

impl LoadReport {
    pub fn into_directory(self) -> PatientDirectory {
        PatientDirectory::new(self.records)
    }
}

fn read_document(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&text).map_err(|err| err.to_string())
}

/// Load every matching file under `config.data_dir`.
///
/// Bad files are skipped and reported; only an unreadable directory fails
/// the whole load.
pub fn load_directory(config: &LoaderConfig) -> ChartResult<LoadReport> {
    let root = &config.data_dir;
    let metadata = fs::metadata(root).map_err(|source| ChartError::Io {
        path: root.clone(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ChartError::Io {
            path: root.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut report = LoadReport::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(config.max_depth.max(1))
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                report.skipped.push(SkippedDocument {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !config.matches(path) {
            continue;
        }

        let document = match read_document(path) {
            Ok(document) => document,
            Err(reason) => {
                warn!(path = %path.display(), error = %reason, "skipping malformed document");
                report.skipped.push(SkippedDocument {
                    path: path.to_path_buf(),
                    reason,
                });
                continue;
            }
        };

        match extract_record(&document) {
            Ok(record) => report.records.push(record),
            Err(ChartError::MissingSubject { .. }) => report.dropped += 1,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping document");
                report.skipped.push(SkippedDocument {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
            }
        }
    }

    debug!(
        dir = %root.display(),
        loaded = report.records.len(),
        skipped = report.skipped.len(),
        dropped = report.dropped,
        "loaded patient bundles"
    );

    Ok(report)
}
