use crate::error::{CrefError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_RESULTS_SUFFIX: &str = "_verified_results.json";
pub const DEFAULT_CATEGORIES_FILE: &str = "categories.txt";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub categories: CategoriesConfig,
    #[serde(default)]
    pub rename: RenameConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoriesConfig {
    pub data_dir: PathBuf,
    /// Defaults to `categories.txt` inside `data_dir`.
    pub output_file: Option<PathBuf>,
    pub extension: String,
    /// Regexes matched against file names; matching files are skipped.
    pub exclude_patterns: Vec<String>,
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenameConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub suffix: String,
    pub on_collision: CollisionPolicy,
}

/// What to do when two source files derive the same target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The later source (in name order) replaces the earlier one
    #[default]
    Overwrite,
    /// Refuse to copy anything
    Error,
    /// Keep the first source, skip the rest
    Skip,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_file: None,
            extension: "json".to_string(),
            exclude_patterns: Vec::new(),
            fail_fast: true,
        }
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("verified-results"),
            dest_dir: PathBuf::from("."),
            suffix: DEFAULT_RESULTS_SUFFIX.to_string(),
            on_collision: CollisionPolicy::Overwrite,
        }
    }
}

impl CategoriesConfig {
    pub fn resolved_output_file(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_CATEGORIES_FILE))
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CrefError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CrefError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| CrefError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["crefkit.toml", ".crefkit.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref data_dir) = cli_args.data_dir {
            self.categories.data_dir = data_dir.clone();
        }

        if let Some(ref output_file) = cli_args.output_file {
            self.categories.output_file = Some(output_file.clone());
        }

        if cli_args.keep_going {
            self.categories.fail_fast = false;
        }

        if let Some(ref source_dir) = cli_args.source_dir {
            self.rename.source_dir = source_dir.clone();
        }

        if let Some(ref dest_dir) = cli_args.dest_dir {
            self.rename.dest_dir = dest_dir.clone();
        }

        if let Some(ref suffix) = cli_args.suffix {
            self.rename.suffix = suffix.clone();
        }

        if let Some(policy) = cli_args.on_collision {
            self.rename.on_collision = policy;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| CrefError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| CrefError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let extension = self.categories.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(CrefError::Config {
                message: "A data file extension must be specified".to_string(),
            });
        }

        for pattern in &self.categories.exclude_patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(CrefError::Config {
                    message: format!("Invalid exclude pattern {:?}: {}", pattern, e),
                });
            }
        }

        if self.rename.suffix.is_empty() {
            return Err(CrefError::Config {
                message: "The verified-results suffix cannot be empty".to_string(),
            });
        }

        if !self.rename.suffix.ends_with(".json") {
            return Err(CrefError::Config {
                message: format!(
                    "The verified-results suffix must end with .json: {}",
                    self.rename.suffix
                ),
            });
        }

        if self.rename.suffix.contains('/') || self.rename.suffix.contains('\\') {
            return Err(CrefError::Config {
                message: "The verified-results suffix cannot contain path separators".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub keep_going: bool,
    pub source_dir: Option<PathBuf>,
    pub dest_dir: Option<PathBuf>,
    pub suffix: Option<String>,
    pub on_collision: Option<CollisionPolicy>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn with_output_file(mut self, output_file: Option<PathBuf>) -> Self {
        self.output_file = output_file;
        self
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn with_source_dir(mut self, source_dir: Option<PathBuf>) -> Self {
        self.source_dir = source_dir;
        self
    }

    pub fn with_dest_dir(mut self, dest_dir: Option<PathBuf>) -> Self {
        self.dest_dir = dest_dir;
        self
    }

    pub fn with_suffix(mut self, suffix: Option<String>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn with_on_collision(mut self, policy: Option<CollisionPolicy>) -> Self {
        self.on_collision = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.categories.extension, "json");
        assert!(config.categories.fail_fast);
        assert_eq!(config.rename.suffix, "_verified_results.json");
        assert_eq!(config.rename.source_dir, PathBuf::from("verified-results"));
        assert_eq!(config.rename.on_collision, CollisionPolicy::Overwrite);
    }

    #[test]
    fn test_output_file_defaults_into_data_dir() {
        let mut config = Config::default();
        config.categories.data_dir = PathBuf::from("data");
        assert_eq!(
            config.categories.resolved_output_file(),
            PathBuf::from("data").join("categories.txt")
        );

        config.categories.output_file = Some(PathBuf::from("out.txt"));
        assert_eq!(config.categories.resolved_output_file(), PathBuf::from("out.txt"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.rename.suffix = "_verified_results.txt".to_string();
        assert!(config.validate().is_err());

        config.rename.suffix = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.categories.extension = ".".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.categories.exclude_patterns = vec!["(unclosed".to_string()];
        assert!(matches!(config.validate(), Err(CrefError::Config { .. })));
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.rename.on_collision = CollisionPolicy::Skip;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.rename.on_collision, CollisionPolicy::Skip);
        assert_eq!(loaded.rename.suffix, config.rename.suffix);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "[rename]\non_collision = \"error\"\n").unwrap();

        let loaded = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.rename.on_collision, CollisionPolicy::Error);
        assert_eq!(loaded.rename.suffix, DEFAULT_RESULTS_SUFFIX);
        assert!(loaded.categories.fail_fast);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/nonexistent/crefkit.toml");
        assert!(matches!(result, Err(CrefError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_data_dir(Some(PathBuf::from("crefs_json")))
            .with_keep_going(true)
            .with_on_collision(Some(CollisionPolicy::Error));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.categories.data_dir, PathBuf::from("crefs_json"));
        assert!(!config.categories.fail_fast);
        assert_eq!(config.rename.on_collision, CollisionPolicy::Error);
        assert_eq!(config.rename.dest_dir, PathBuf::from("."));
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[categories]"));
        assert!(sample.contains("[rename]"));
        assert!(sample.contains("on_collision = \"overwrite\""));
    }
}
