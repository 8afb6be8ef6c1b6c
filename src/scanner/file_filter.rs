use regex::Regex;
use std::path::Path;

#[derive(Debug, Clone)]
enum MatchRule {
    /// File extension, compared ignoring ASCII case.
    Extension(String),
    /// Exact tail of the file name.
    Suffix(String),
}

/// Decides which directory entries a command should look at.
#[derive(Debug, Clone)]
pub struct FileFilter {
    rule: MatchRule,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn extension<S: Into<String>>(extension: S) -> Self {
        let extension = extension.into();
        Self {
            rule: MatchRule::Extension(extension.trim_start_matches('.').to_lowercase()),
            exclude_patterns: Vec::new(),
        }
    }

    pub fn suffix<S: Into<String>>(suffix: S) -> Self {
        Self {
            rule: MatchRule::Suffix(suffix.into()),
            exclude_patterns: Vec::new(),
        }
    }

    /// Skips file names matching any of `patterns`. Patterns that fail to
    /// compile are ignored; `Config::validate` reports them up front.
    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Self {
        self.exclude_patterns = patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();
        self
    }

    /// Hidden files (leading `.`) never match.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if filename.starts_with('.') {
            return false;
        }

        let accepted = match &self.rule {
            MatchRule::Extension(wanted) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(wanted)),
            MatchRule::Suffix(suffix) => filename.ends_with(suffix.as_str()),
        };

        accepted && !self.is_excluded(filename)
    }

    pub fn is_excluded(&self, filename: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(filename))
    }

    pub fn describe(&self) -> String {
        match &self.rule {
            MatchRule::Extension(ext) => format!("*.{}", ext),
            MatchRule::Suffix(suffix) => format!("*{}", suffix),
        }
    }
}
