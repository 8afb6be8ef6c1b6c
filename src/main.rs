use clap::Parser;
use crefkit::{Cli, Commands, CrefError, CrefKit, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let Some(command) = cli.command.clone() else {
        eprintln!("No command given. Run `crefkit --help` for usage.");
        return 1;
    };

    let crefkit = match CrefKit::from_cli(&cli) {
        Ok(crefkit) => crefkit,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    match command {
        Commands::Categories(_) => match crefkit.extract_categories() {
            Ok(report) => {
                crefkit.output_formatter().print_category_report(&report);
                if report.errors.is_empty() {
                    0
                } else {
                    2 // Success with skipped files
                }
            }
            Err(e) => {
                crefkit.handle_error(&e);
                e.exit_code()
            }
        },
        Commands::Rename(args) => match crefkit.rename_results(args.dry_run) {
            Ok(report) => {
                crefkit.output_formatter().print_rename_report(&report);
                0
            }
            Err(e) => {
                crefkit.handle_error(&e);
                e.exit_code()
            }
        },
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "crefkit.toml".to_string());

    match CrefKit::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  crefkit --config {} categories", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &CrefError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli {
            command: None,
            config: Some(config_path.clone()),
            output_format: crefkit::OutputFormat::Human,
            verbose: 0,
            quiet: false,
            generate_config: true,
        };

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[categories]"));
    }

    #[test]
    fn test_generate_config_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();

        let cli = Cli {
            command: None,
            config: Some(temp_dir.path().join("missing").join("crefkit.toml")),
            output_format: crefkit::OutputFormat::Plain,
            verbose: 0,
            quiet: true,
            generate_config: true,
        };

        assert_eq!(handle_generate_config(&cli), 1);
    }
}
