use std::process::ExitCode;

use clap::Parser;

use loggen_cli::cli::{Cli, Commands};
use loggen_cli::commands;
use loggen_cli::error::CliError;
use loggen_cli::logging;
use loggen_cli::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // config 명령은 파일을 직접 엄격하게 로드
    let config = commands::load_config(&cli.config).await;

    let mut general = config
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general)
        .map_err(|e| CliError::Command(format!("failed to initialize logging: {e}")))?;

    tracing::debug!(config = %cli.config.display(), "loggen starting");

    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, config?).await,
        Commands::Check(args) => commands::check::execute(args, &config?, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
