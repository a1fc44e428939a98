//! docgate CLI - authenticated JSON document gateway.

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use docgate_config::{load_config, LogFormat};

mod commands;
mod output;
pub(crate) mod shared;

/// docgate - JSON document CRUD over multiple clusters behind one API key.
#[derive(Debug, Parser)]
#[command(name = "docgate", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbosity level (-v, -vv). Overrides logging.level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain or json. Overrides logging.format.
    #[arg(long, global = true, value_parser = ["plain", "json"])]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the HTTP gateway.
    Serve(commands::serve::ServeArgs),
    /// Check the API key and instance credentials without connecting.
    Validate(commands::validate::ValidateArgs),
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .init(),
        LogFormat::Plain => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).inspect_err(|e| {
        output::print_error(&e.to_string());
    })?;

    let level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let format = match cli.log_format.as_deref() {
        Some("json") => LogFormat::Json,
        Some(_) => LogFormat::Plain,
        None => config.logging.format,
    };
    init_tracing(level, format);

    tracing::debug!(config = ?cli.config, "docgate starting");

    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Validate(args) => commands::validate::execute(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_port_override() {
        let cli = Cli::try_parse_from(["docgate", "-vv", "serve", "--port", "9000"]).expect("parse");
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Cli::try_parse_from(["docgate", "--log-format", "xml", "validate"]).is_err());
    }
}
