use crate::error::{CrefError, Result};
use crate::extractor::progress::{BatchProgress, FileError};
use crate::scanner::DataFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One cross-reference entry. Only the category fields are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub primary_category: Option<String>,
    #[serde(default)]
    pub secondary_category: Option<String>,
}

/// A data file. A missing or `null` `items` key counts as no records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub items: Option<Vec<Record>>,
}

impl Dataset {
    pub fn records(&self) -> &[Record] {
        self.items.as_deref().unwrap_or(&[])
    }
}

/// Reads and parses one data file. Bytes that are not UTF-8 are reported as a
/// parse error for that file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = fs::read(path).map_err(|source| CrefError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| CrefError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Category labels seen so far, kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    labels: BTreeSet<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty labels are dropped. Returns `true` if the label was new.
    pub fn insert(&mut self, label: &str) -> bool {
        if label.is_empty() || self.labels.contains(label) {
            return false;
        }
        self.labels.insert(label.to_string())
    }

    /// Adds both category fields of every record; returns how many labels were new.
    pub fn extend_from_dataset(&mut self, dataset: &Dataset) -> usize {
        let mut added = 0;
        for record in dataset.records() {
            for label in [&record.primary_category, &record.secondary_category]
                .into_iter()
                .flatten()
            {
                if self.insert(label) {
                    added += 1;
                }
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    /// Creates or truncates `path` and writes one label per line.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        for label in &self.labels {
            writeln!(writer, "{}", label)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Everything gathered by one extraction pass.
#[derive(Debug)]
pub struct CategoryExtraction {
    pub categories: CategorySet,
    pub records_seen: usize,
    pub progress: BatchProgress,
}

pub struct CategoryExtractor {
    fail_fast: bool,
}

impl CategoryExtractor {
    pub fn new() -> Self {
        Self { fail_fast: true }
    }

    /// When disabled, files that fail to read or parse are recorded in the
    /// progress errors and the batch continues.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn extract(
        &self,
        files: &[DataFile],
        progress_callback: Option<&dyn Fn(&BatchProgress)>,
    ) -> Result<CategoryExtraction> {
        let total_bytes = files.iter().map(|f| f.size).sum();
        let mut progress = BatchProgress::new(files.len(), total_bytes);
        let mut categories = CategorySet::new();
        let mut records_seen = 0;

        for file in files {
            progress.start_file(file.display_path());
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            match load_dataset(&file.path) {
                Ok(dataset) => {
                    records_seen += dataset.records().len();
                    categories.extend_from_dataset(&dataset);
                    progress.update_file(file.filename.clone(), file.size);
                }
                Err(e) if !self.fail_fast => {
                    progress.add_error(file.display_path(), e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(CategoryExtraction {
            categories,
            records_seen,
            progress,
        })
    }
}

impl Default for CategoryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub data_dir: PathBuf,
    pub output_file: PathBuf,
    pub files_processed: usize,
    pub records_seen: usize,
    pub categories: Vec<String>,
    pub errors: Vec<FileError>,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
}

impl CategoryReport {
    pub fn new(data_dir: &Path, output_file: &Path, extraction: &CategoryExtraction) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            output_file: output_file.to_path_buf(),
            files_processed: extraction.progress.files_processed,
            records_seen: extraction.records_seen,
            categories: extraction.categories.to_sorted_vec(),
            errors: extraction.progress.errors.clone(),
            duration_ms: extraction.progress.elapsed().as_millis() as u64,
            generated_at: Utc::now(),
        }
    }
}
