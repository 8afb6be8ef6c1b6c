pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{CategoriesArgs, Cli, Commands, OutputFormat, RenameArgs};
pub use config::{CategoriesConfig, CliOverrides, CollisionPolicy, Config, RenameConfig};
pub use error::{CrefError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    BatchProgress, CategoryExtractor, CategoryReport, CategorySet, Dataset, NamePattern, Record,
    RenameReport, ResultRenamer, VerifiedResultName,
};
pub use scanner::{DataFile, DataScanner, FileFilter};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for crefkit
pub struct CrefKit {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl CrefKit {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Bars would interleave with JSON lines.
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    /// Reads every data file in the configured directory and writes the
    /// sorted category list. Nothing is written if a file fails in
    /// fail-fast mode.
    pub fn extract_categories(&self) -> Result<CategoryReport> {
        let settings = &self.config.categories;
        let data_dir = settings.data_dir.as_path();
        let output_file = settings.resolved_output_file();

        self.output_formatter
            .start_operation(&format!("Extracting categories from {}", data_dir.display()));

        let scanner = DataScanner::new(
            FileFilter::extension(settings.extension.as_str())
                .with_exclude_patterns(&settings.exclude_patterns),
        );
        let files = scanner.scan_directory(data_dir)?;
        self.output_formatter
            .print_scan_statistics(&scanner.get_statistics(&files));

        if files.is_empty() {
            self.output_formatter.warning(&format!(
                "No {} files found in {}",
                scanner.filter().describe(),
                data_dir.display()
            ));
        }

        let file_progress = self
            .progress_manager
            .create_file_progress(files.len() as u64, "Reading data files");
        let progress_callback = |progress: &BatchProgress| {
            if progress.files_remaining() > 0 {
                if let Some(ref file) = progress.current_file {
                    self.progress_manager.suspend(|| {
                        self.output_formatter
                            .debug(&format!("Processing {}...", file))
                    });
                }
            }
            ui::progress::update_file_progress(&file_progress, progress);
        };

        let extraction = CategoryExtractor::new()
            .with_fail_fast(settings.fail_fast)
            .extract(&files, Some(&progress_callback));

        let extraction = match extraction {
            Ok(extraction) => extraction,
            Err(e) => {
                file_progress.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Read {} files", extraction.progress.files_processed),
            extraction.progress.elapsed(),
        );

        for error in &extraction.progress.errors {
            self.progress_manager.suspend(|| {
                self.output_formatter
                    .warning(&format!("Skipped {}: {}", error.path, error.message))
            });
        }

        extraction.categories.write_to(&output_file)?;

        self.output_formatter.success(&format!(
            "Wrote {} categories to {}",
            extraction.categories.len(),
            output_file.display()
        ));

        Ok(CategoryReport::new(data_dir, &output_file, &extraction))
    }

    /// Copies every verified-results file in the source directory into the
    /// destination directory under its book name.
    pub fn rename_results(&self, dry_run: bool) -> Result<RenameReport> {
        let settings = &self.config.rename;
        let source_dir = settings.source_dir.as_path();
        let dest_dir = settings.dest_dir.as_path();

        if dry_run {
            self.output_formatter
                .info("DRY RUN MODE - No files will be written");
        }

        self.output_formatter.start_operation(&format!(
            "Copying verified results from {} to {}",
            source_dir.display(),
            dest_dir.display()
        ));

        let scanner = DataScanner::new(FileFilter::suffix(settings.suffix.as_str()));
        let files = scanner.scan_directory(source_dir)?;
        self.output_formatter
            .print_scan_statistics(&scanner.get_statistics(&files));

        if files.is_empty() {
            self.output_formatter.warning(&format!(
                "No {} files found in {}",
                scanner.filter().describe(),
                source_dir.display()
            ));
        }

        let renamer = ResultRenamer::new(settings.suffix.as_str())
            .with_collision_policy(settings.on_collision)
            .with_dry_run(dry_run);

        let (plans, collisions) = renamer.plan(&files, dest_dir)?;
        for collision in &collisions {
            self.output_formatter.warning(&format!(
                "{} files map to {}: {}",
                collision.sources.len(),
                collision.target,
                collision.sources.join(", ")
            ));
        }
        for plan in &plans {
            self.output_formatter.debug(&format!(
                "Copying {} to {}",
                plan.source.display_path(),
                plan.target.display()
            ));
        }

        let file_progress = self
            .progress_manager
            .create_file_progress(plans.len() as u64, "Copying files");
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &BatchProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let report = match renamer.execute(plans, collisions, dest_dir, Some(&progress_callback)) {
            Ok(report) => report,
            Err(e) => {
                file_progress.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Copied {} files", report.copies.len()),
            std::time::Duration::from_millis(report.duration_ms),
        );

        if !dry_run {
            self.output_formatter.success(&format!(
                "Copied {} files into {}",
                report.copies.len(),
                dest_dir.display()
            ));
        }

        Ok(report)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        std::fs::write(output_path.as_ref(), Config::create_sample_config())?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &CrefError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extracts categories from `data_dir` into `data_dir/categories.txt`
/// with default settings and no terminal output.
pub fn extract_categories_simple(data_dir: &Path) -> Result<CategoryReport> {
    let mut config = Config::default();
    config.categories.data_dir = data_dir.to_path_buf();

    CrefKit::new(config, OutputMode::Plain, 0, true).extract_categories()
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
