use crate::error::{CrefError, UserFriendlyError};
use crate::extractor::{CategoryReport, RenameReport};
use crate::scanner::ScanStatistics;
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &CrefError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    pub fn print_scan_statistics(&self, stats: &ScanStatistics) {
        self.debug(stats.display_summary().trim_end());
    }

    pub fn print_category_report(&self, report: &CategoryReport) {
        match self.mode {
            OutputMode::Human => self.print_human_category_report(report),
            OutputMode::Json => self.print_json_report(report),
            OutputMode::Plain => self.print_plain_category_report(report),
        }
    }

    pub fn print_rename_report(&self, report: &RenameReport) {
        match self.mode {
            OutputMode::Human => self.print_human_rename_report(report),
            OutputMode::Json => self.print_json_report(report),
            OutputMode::Plain => self.print_plain_rename_report(report),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => println!("=== {} ===", title),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (&CHECKMARK, style(message).green().bold()),
                MessageType::Error => (&CROSS, style(message).red().bold()),
                MessageType::Warning => (&WARNING, style(message).yellow().bold()),
                MessageType::Info => (&INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_json_report<T: serde::Serialize>(&self, report: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn highlight(&self, value: String) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value
        }
    }

    fn print_human_category_report(&self, report: &CategoryReport) {
        if self.quiet {
            return;
        }

        self.print_header("Category Extraction");
        println!("  Files processed: {}", self.highlight(report.files_processed.to_string()));
        println!("  Records seen:    {}", self.highlight(report.records_seen.to_string()));
        println!("  Categories:      {}", self.highlight(report.categories.len().to_string()));
        println!("  Written to:      {}", report.output_file.display());
        println!(
            "  Time taken:      {}",
            self.highlight(format_duration(Duration::from_millis(report.duration_ms)))
        );

        if self.verbose_level >= 1 && !report.categories.is_empty() {
            println!();
            for category in &report.categories {
                println!("    {}", category);
            }
        }

        if !report.errors.is_empty() {
            println!();
            println!("Files skipped:");
            for error in &report.errors {
                println!("  - {}: {}", error.path, error.message);
            }
        }

        self.print_separator();
    }

    fn print_plain_category_report(&self, report: &CategoryReport) {
        if self.quiet {
            return;
        }

        println!("COMPLETED: Category extraction");
        println!("Files processed: {}", report.files_processed);
        println!("Records seen: {}", report.records_seen);
        println!("Categories: {}", report.categories.len());
        println!("Output: {}", report.output_file.display());
        for error in &report.errors {
            println!("SKIPPED: {}: {}", error.path, error.message);
        }
    }

    fn print_human_rename_report(&self, report: &RenameReport) {
        if self.quiet {
            return;
        }

        let title = if report.dry_run {
            "Rename Plan (dry run)"
        } else {
            "Rename Results"
        };
        self.print_header(title);

        for copy in &report.copies {
            let target = copy
                .target
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let source = copy
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            println!("  {} -> {}", source, self.highlight(target));
        }

        println!();
        println!(
            "  Files {}: {}",
            if report.dry_run { "planned" } else { "copied" },
            self.highlight(report.copies.len().to_string())
        );
        println!("  Destination:  {}", report.dest_dir.display());

        if !report.collisions.is_empty() {
            println!();
            println!("Name collisions ({:?}):", report.on_collision);
            for collision in &report.collisions {
                println!("  {} <- {}", collision.target, collision.sources.join(", "));
            }
        }

        if !report.skipped.is_empty() {
            println!("Skipped: {}", report.skipped.join(", "));
        }

        self.print_separator();
    }

    fn print_plain_rename_report(&self, report: &RenameReport) {
        if self.quiet {
            return;
        }

        println!(
            "COMPLETED: Rename{}",
            if report.dry_run { " (dry run)" } else { "" }
        );
        for copy in &report.copies {
            println!("COPY: {} -> {}", copy.source.display(), copy.target.display());
        }
        for collision in &report.collisions {
            println!(
                "COLLISION: {} <- {}",
                collision.target,
                collision.sources.join(", ")
            );
        }
        for skipped in &report.skipped {
            println!("SKIPPED: {}", skipped);
        }
        println!("Files: {}", report.copies.len());
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
