//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// loggen -- synthetic log line generator.
///
/// Use `loggen <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "loggen", version, about, long_about = None)]
pub struct Cli {
    /// Path to the loggen.toml configuration file.
    #[arg(short, long, default_value = "loggen.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format for reports.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render template lines to stdout.
    Generate(GenerateArgs),

    /// Check a line stream for missing sequence numbers.
    Check(CheckArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- generate ----

/// Render template lines to stdout.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Inline template (overrides the configured template).
    #[arg(short, long, conflicts_with = "template_file")]
    pub template: Option<String>,

    /// Read the template from a file.
    #[arg(short = 'f', long)]
    pub template_file: Option<PathBuf>,

    /// Number of lines to generate (0 = until interrupted).
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Lines per second (0 = unthrottled).
    #[arg(short, long)]
    pub rate: Option<u64>,

    /// Literal `{key}` replacement, repeatable (`--translation host=web-01`).
    #[arg(long = "translation", value_parser = parse_translation)]
    pub translations: Vec<(String, String)>,

    /// Check generated lines for sequence gaps with this pattern.
    #[arg(long)]
    pub check_pattern: Option<String>,
}

/// Parse a `key=value` translation pair.
pub fn parse_translation(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() || key.contains(['{', '}', ':']) {
        return Err(format!("invalid translation key '{key}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

// ---- check ----

/// Check a line stream for missing sequence numbers.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Extraction regex with exactly one capture group (default: `[gap] pattern`).
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Input file (default: stdin).
    pub file: Option<PathBuf>,

    /// Echo every input line to stdout before the report.
    #[arg(long)]
    pub passthrough: bool,

    /// Exit with a non-zero code when gaps remain open.
    #[arg(long)]
    pub strict: bool,
}

// ---- config ----

/// Manage loggen configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, generator, gap).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["loggen", "generate"]).expect("parse succeeded");
        match cli.command {
            Commands::Generate(args) => {
                assert!(args.template.is_none());
                assert!(args.count.is_none());
                assert!(args.translations.is_empty());
                assert!(args.check_pattern.is_none());
            }
            _ => panic!("expected Generate command"),
        }
        assert_eq!(cli.config, PathBuf::from("loggen.toml"));
    }

    #[test]
    fn test_cli_parse_generate_full() {
        let cli = Cli::try_parse_from([
            "loggen",
            "generate",
            "-t",
            "seq={counter:seq:1}",
            "-n",
            "5",
            "--rate",
            "100",
            "--translation",
            "host=web-01",
            "--translation",
            "app=api",
            "--check-pattern",
            r"seq=(\d+)",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.template.as_deref(), Some("seq={counter:seq:1}"));
                assert_eq!(args.count, Some(5));
                assert_eq!(args.rate, Some(100));
                assert_eq!(
                    args.translations,
                    vec![
                        ("host".to_owned(), "web-01".to_owned()),
                        ("app".to_owned(), "api".to_owned())
                    ]
                );
                assert_eq!(args.check_pattern.as_deref(), Some(r"seq=(\d+)"));
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn test_cli_template_conflicts_with_file() {
        let args = Cli::try_parse_from(["loggen", "generate", "-t", "x", "-f", "tpl.txt"]);
        assert!(args.is_err(), "template and template-file are exclusive");
    }

    #[test]
    fn test_cli_invalid_translation() {
        assert!(Cli::try_parse_from(["loggen", "generate", "--translation", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["loggen", "generate", "--translation", "a:b=c"]).is_err());
    }

    #[test]
    fn test_parse_translation_keeps_equals_in_value() {
        assert_eq!(
            parse_translation("query=a=b").unwrap(),
            ("query".to_owned(), "a=b".to_owned())
        );
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["loggen", "check", "-p", r"n=(\d+)", "app.log", "--strict"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.pattern.as_deref(), Some(r"n=(\d+)"));
                assert_eq!(args.file, Some(PathBuf::from("app.log")));
                assert!(args.strict);
                assert!(!args.passthrough);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_check_stdin() {
        let cli = Cli::try_parse_from(["loggen", "check"]).expect("parse succeeded");
        match cli.command {
            Commands::Check(args) => assert!(args.file.is_none()),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["loggen", "config", "show", "--section", "gap"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => assert_eq!(section.as_deref(), Some("gap")),
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "loggen",
            "-c",
            "/etc/loggen.toml",
            "check",
            "--log-level",
            "debug",
            "--output",
            "json",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/loggen.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["loggen"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "loggen");
        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for name in ["generate", "check", "config"] {
            assert!(subcommands.contains(&name), "should have '{name}' subcommand");
        }
    }
}
