use crate::config::{CliOverrides, CollisionPolicy, Config};
use crate::error::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crefkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Maintain a local collection of cross-reference JSON data files")]
#[command(
    long_about = "crefkit extracts the sorted list of category labels used by a directory of \
                  cross-reference data files, and copies verified-results files into that \
                  directory under their book names."
)]
#[command(after_help = "EXAMPLES:\n  \
    crefkit categories\n  \
    crefkit categories data/crefs_json --output categories.txt --keep-going\n  \
    crefkit rename verified-results --dest . --dry-run\n  \
    crefkit rename --on-collision error -v\n  \
    crefkit --generate-config --config crefkit.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Write a sample configuration file and exit")]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write the sorted, deduplicated category labels found in a data directory
    Categories(CategoriesArgs),
    /// Copy verified-results files into a directory under their book names
    Rename(RenameArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CategoriesArgs {
    /// Directory containing the JSON data files
    pub dir: Option<PathBuf>,

    /// Output file (defaults to categories.txt inside the data directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip files that fail to parse instead of aborting
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenameArgs {
    /// Directory containing the verified-results files
    pub source: Option<PathBuf>,

    /// Destination directory for the renamed copies
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// File name suffix identifying verified-results files
    #[arg(long)]
    pub suffix: Option<String>,

    /// What to do when two sources map to the same book name
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// Show what would be copied without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        match &self.command {
            Some(Commands::Categories(args)) => CliOverrides::new()
                .with_data_dir(args.dir.clone())
                .with_output_file(args.output.clone())
                .with_keep_going(args.keep_going),
            Some(Commands::Rename(args)) => CliOverrides::new()
                .with_source_dir(args.source.clone())
                .with_dest_dir(args.dest.clone())
                .with_suffix(args.suffix.clone())
                .with_on_collision(args.on_collision),
            None => CliOverrides::new(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(&self.command, Some(Commands::Rename(args)) if args.dry_run)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_command() {
        let cli = Cli::try_parse_from([
            "crefkit",
            "categories",
            "data/crefs_json",
            "--output",
            "out.txt",
            "--keep-going",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Categories(ref args)) => {
                assert_eq!(args.dir, Some(PathBuf::from("data/crefs_json")));
                assert_eq!(args.output, Some(PathBuf::from("out.txt")));
                assert!(args.keep_going);
            }
            ref other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rename_command() {
        let cli = Cli::try_parse_from([
            "crefkit",
            "rename",
            "verified-results",
            "-d",
            "out",
            "--on-collision",
            "skip",
            "--dry-run",
            "-vv",
        ])
        .unwrap();

        assert!(cli.is_dry_run());
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Some(Commands::Rename(ref args)) => {
                assert_eq!(args.source, Some(PathBuf::from("verified-results")));
                assert_eq!(args.dest, Some(PathBuf::from("out")));
                assert_eq!(args.on_collision, Some(CollisionPolicy::Skip));
            }
            ref other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["crefkit", "-q", "-v", "categories"]).is_err());
    }

    #[test]
    fn test_rename_overrides() {
        let cli = Cli {
            command: Some(Commands::Rename(RenameArgs {
                source: Some(PathBuf::from("in")),
                dest: None,
                suffix: Some("_checked.json".to_string()),
                on_collision: Some(CollisionPolicy::Error),
                dry_run: false,
            })),
            config: None,
            output_format: OutputFormat::Plain,
            verbose: 0,
            quiet: true,
            generate_config: false,
        };

        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.rename.source_dir, PathBuf::from("in"));
        assert_eq!(config.rename.dest_dir, PathBuf::from("."));
        assert_eq!(config.rename.suffix, "_checked.json");
        assert_eq!(config.rename.on_collision, CollisionPolicy::Error);
        assert!(!cli.is_dry_run());
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_categories_overrides_leave_rename_untouched() {
        let cli = Cli {
            command: Some(Commands::Categories(CategoriesArgs {
                dir: Some(PathBuf::from("data")),
                output: None,
                keep_going: true,
            })),
            config: None,
            output_format: OutputFormat::Human,
            verbose: 1,
            quiet: false,
            generate_config: false,
        };

        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.categories.data_dir, PathBuf::from("data"));
        assert!(!config.categories.fail_fast);
        assert_eq!(config.rename.source_dir, PathBuf::from("verified-results"));
    }
}
