use crate::config::CollisionPolicy;
use crate::error::{CrefError, Result};
use crate::extractor::progress::BatchProgress;
use crate::scanner::DataFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A parsed `<prefix>-<book_name><suffix>` file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedResultName {
    pub source_filename: String,
    pub prefix: String,
    pub book_name: String,
}

impl VerifiedResultName {
    pub fn parse(filename: &str, suffix: &str) -> Result<Self> {
        NamePattern::new(suffix).parse(filename)
    }

    pub fn target_filename(&self) -> String {
        format!("{}.json", self.book_name)
    }
}

/// Parser for verified-results file names with a fixed suffix.
#[derive(Debug, Clone)]
pub struct NamePattern {
    suffix: String,
}

impl NamePattern {
    pub fn new<S: Into<String>>(suffix: S) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// The book name is everything between the first `-` and the suffix.
    pub fn parse(&self, filename: &str) -> Result<VerifiedResultName> {
        let invalid = |reason: String| CrefError::InvalidFilenamePattern {
            filename: filename.to_string(),
            reason,
        };

        let stem = filename
            .strip_suffix(self.suffix.as_str())
            .ok_or_else(|| invalid(format!("name does not end with {}", self.suffix)))?;

        let (prefix, book_name) = stem
            .split_once('-')
            .ok_or_else(|| invalid("no '-' between prefix and book name".to_string()))?;

        if prefix.is_empty() {
            return Err(invalid("empty prefix before '-'".to_string()));
        }

        if book_name.is_empty() {
            return Err(invalid("empty book name".to_string()));
        }

        if book_name.contains(['/', '\\']) || book_name == "." || book_name == ".." {
            return Err(invalid(format!(
                "book name {:?} is not a plain file name",
                book_name
            )));
        }

        Ok(VerifiedResultName {
            source_filename: filename.to_string(),
            prefix: prefix.to_string(),
            book_name: book_name.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RenamePlan {
    pub source: DataFile,
    pub name: VerifiedResultName,
    pub target: PathBuf,
}

/// Several sources that derive the same target file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub target: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyRecord {
    pub source: PathBuf,
    pub target: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    pub dest_dir: PathBuf,
    pub dry_run: bool,
    pub on_collision: CollisionPolicy,
    pub copies: Vec<CopyRecord>,
    pub collisions: Vec<Collision>,
    pub skipped: Vec<String>,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
}

pub struct ResultRenamer {
    pattern: NamePattern,
    policy: CollisionPolicy,
    dry_run: bool,
    buffer_size: usize,
}

impl ResultRenamer {
    pub fn new<S: Into<String>>(suffix: S) -> Self {
        Self {
            pattern: NamePattern::new(suffix),
            policy: CollisionPolicy::Overwrite,
            dry_run: false,
            buffer_size: 64 * 1024,
        }
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Parses every source name and groups sources that share a target.
    /// The first malformed name aborts the plan.
    pub fn plan(
        &self,
        files: &[DataFile],
        dest_dir: &Path,
    ) -> Result<(Vec<RenamePlan>, Vec<Collision>)> {
        let mut plans = Vec::with_capacity(files.len());
        let mut by_target: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for file in files {
            let name = self.pattern.parse(&file.filename)?;
            let target_name = name.target_filename();

            by_target
                .entry(target_name.clone())
                .or_default()
                .push(file.filename.clone());

            plans.push(RenamePlan {
                source: file.clone(),
                name,
                target: dest_dir.join(target_name),
            });
        }

        let collisions = by_target
            .into_iter()
            .filter(|(_, sources)| sources.len() > 1)
            .map(|(target, sources)| Collision { target, sources })
            .collect();

        Ok((plans, collisions))
    }

    /// Applies the collision policy. Returns the plans to execute and the
    /// source names left out.
    pub fn resolve(
        &self,
        plans: Vec<RenamePlan>,
        collisions: &[Collision],
    ) -> Result<(Vec<RenamePlan>, Vec<String>)> {
        match self.policy {
            CollisionPolicy::Overwrite => Ok((plans, Vec::new())),
            CollisionPolicy::Error => match collisions.first() {
                Some(collision) => Err(CrefError::NameCollision {
                    target: collision.target.clone(),
                    sources: collision.sources.clone(),
                }),
                None => Ok((plans, Vec::new())),
            },
            CollisionPolicy::Skip => {
                let mut seen = std::collections::HashSet::new();
                let mut kept = Vec::with_capacity(plans.len());
                let mut skipped = Vec::new();

                for plan in plans {
                    if seen.insert(plan.target.clone()) {
                        kept.push(plan);
                    } else {
                        skipped.push(plan.source.filename.clone());
                    }
                }

                Ok((kept, skipped))
            }
        }
    }

    pub fn rename(
        &self,
        files: &[DataFile],
        dest_dir: &Path,
        progress_callback: Option<&dyn Fn(&BatchProgress)>,
    ) -> Result<RenameReport> {
        let (plans, collisions) = self.plan(files, dest_dir)?;
        self.execute(plans, collisions, dest_dir, progress_callback)
    }

    /// Resolves collisions, then copies each planned file in order. A failed
    /// copy aborts the batch; earlier copies stay in place.
    pub fn execute(
        &self,
        plans: Vec<RenamePlan>,
        collisions: Vec<Collision>,
        dest_dir: &Path,
        progress_callback: Option<&dyn Fn(&BatchProgress)>,
    ) -> Result<RenameReport> {
        let (plans, skipped) = self.resolve(plans, &collisions)?;

        let total_bytes = plans.iter().map(|p| p.source.size).sum();
        let mut progress = BatchProgress::new(plans.len(), total_bytes);
        let mut copies = Vec::with_capacity(plans.len());

        if !self.dry_run && !plans.is_empty() {
            fs::create_dir_all(dest_dir)?;
        }

        for plan in &plans {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let bytes = if self.dry_run {
                plan.source.size
            } else {
                self.copy_file(&plan.source.path, &plan.target)?
            };

            progress.update_file(plan.source.filename.clone(), bytes);
            copies.push(CopyRecord {
                source: plan.source.path.clone(),
                target: plan.target.clone(),
                bytes,
            });
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(RenameReport {
            dest_dir: dest_dir.to_path_buf(),
            dry_run: self.dry_run,
            on_collision: self.policy,
            copies,
            collisions,
            skipped,
            duration_ms: progress.elapsed().as_millis() as u64,
            generated_at: Utc::now(),
        })
    }

    /// Copies the bytes of `source` to `dest`, replacing any existing file.
    fn copy_file(&self, source: &Path, dest: &Path) -> Result<u64> {
        let source_file = fs::File::open(source)?;
        let dest_file = fs::File::create(dest)?;

        let mut reader = BufReader::with_capacity(self.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size, dest_file);

        let total_bytes = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;

        Ok(total_bytes)
    }
}
