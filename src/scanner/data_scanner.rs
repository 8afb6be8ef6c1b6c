use crate::error::{CrefError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct DataFile {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl DataFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path,
            filename,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Lists the files directly inside a directory that pass a [`FileFilter`].
pub struct DataScanner {
    filter: FileFilter,
}

impl DataScanner {
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    /// Returns matching regular files sorted by file name. Subdirectories are
    /// not descended into. An empty result is not an error.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<DataFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(CrefError::InvalidPath {
                path: format!("{} does not exist", root_path.display()),
            });
        }

        if !root_path.is_dir() {
            return Err(CrefError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            // Depth is capped at one, so following links cannot loop.
            .follow_links(true)
            .sort_by_file_name();

        let mut files = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // A broken entry only matters if the filter would have picked it.
                Err(err) if err.path().is_some_and(|p| !self.filter.matches(p)) => continue,
                Err(err) => return Err(std::io::Error::from(err).into()),
            };

            if !entry.file_type().is_file() || !self.filter.matches(entry.path()) {
                continue;
            }

            let metadata = entry.metadata().map_err(std::io::Error::from)?;
            files.push(DataFile::new(entry.path().to_path_buf(), metadata.len()));
        }

        Ok(files)
    }

    pub fn get_statistics(&self, files: &[DataFile]) -> ScanStatistics {
        let (largest_file_size, largest_file) = files
            .iter()
            .max_by_key(|f| f.size)
            .map(|f| (f.size, Some(f.filename.clone())))
            .unwrap_or((0, None));

        ScanStatistics {
            pattern: self.filter.describe(),
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            largest_file_size,
            largest_file,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub pattern: String,
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file: Option<String>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results ({}):\n  Total files: {}\n  Total size: {}\n",
            self.pattern,
            self.total_files,
            format_bytes(self.total_size)
        );

        if let Some(ref largest) = self.largest_file {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                largest,
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
