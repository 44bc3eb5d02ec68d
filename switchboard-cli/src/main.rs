use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;
use switchboard::{BridgeConfig, BridgeConfigBuilder, ConfigError, LogFormat};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CliError;

#[derive(Parser, Debug)]
#[command(name = "switchboard", version)]
#[command(about = "Switchboard - personal data tools over the Model Context Protocol")]
struct Cli {
    /// Log output format (json, pretty); overrides SWITCHBOARD_LOG_FORMAT
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Default per-call deadline in seconds; overrides SWITCHBOARD_TOOL_TIMEOUT_SECS
    #[arg(long, global = true)]
    tool_timeout_secs: Option<u64>,

    /// Leave the maps tools unarmed instead of driving the automation host
    #[arg(long, global = true)]
    no_automation: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,
    /// List the available tools grouped by domain
    Tools {
        /// Only list tools of this domain
        #[arg(long)]
        domain: Option<String>,
    },
    /// Dispatch a single tool call and print the result envelope
    Call {
        /// Tool name, e.g. maps_search
        name: String,
        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
        /// Deadline for this call, e.g. 500ms or 10s
        #[arg(long, value_parser = humantime::parse_duration)]
        timeout: Option<Duration>,
    },
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    value.parse()
}

fn load_config(cli: &Cli) -> Result<BridgeConfig, ConfigError> {
    let mut builder = BridgeConfigBuilder::from_env()?;
    if let Some(format) = cli.log_format {
        builder = builder.log_format(format);
    }
    if let Some(secs) = cli.tool_timeout_secs {
        builder = builder.tool_timeout_secs(secs);
    }
    if cli.no_automation {
        builder = builder.enable_automation(false);
    }
    builder.build()
}

/// Initialize logging once. Logs go to stderr; stdout carries MCP frames.
///
/// Fails if a global subscriber is already installed.
fn init_logging(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
}

async fn run(cli: Cli, config: BridgeConfig) -> Result<ExitCode, CliError> {
    match cli.command {
        Commands::Serve => {
            commands::serve(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tools { domain } => {
            print!("{}", commands::tools(domain.as_deref())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Call {
            name,
            args,
            timeout,
        } => {
            let (output, failed) =
                commands::call(&config, &name, args.as_deref(), timeout).await?;
            println!("{output}");
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(config.log_format) {
        eprintln!("Warning: logging disabled: {err}");
    }

    match run(cli, config).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_accepts_human_timeouts() {
        let cli = Cli::try_parse_from([
            "switchboard",
            "call",
            "maps_search",
            "--args",
            r#"{"query": "cafe"}"#,
            "--timeout",
            "500ms",
        ])
        .unwrap();

        match cli.command {
            Commands::Call { name, timeout, .. } => {
                assert_eq!(name, "maps_search");
                assert_eq!(timeout, Some(Duration::from_millis(500)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_override_configuration() {
        let cli = Cli::try_parse_from([
            "switchboard",
            "tools",
            "--log-format",
            "pretty",
            "--no-automation",
            "--tool-timeout-secs",
            "12",
        ])
        .unwrap();

        assert_eq!(cli.log_format, Some(LogFormat::Pretty));
        let builder = BridgeConfigBuilder::new()
            .log_format(cli.log_format.unwrap_or_default())
            .tool_timeout_secs(cli.tool_timeout_secs.unwrap_or(30))
            .enable_automation(!cli.no_automation);
        let config = builder.build().unwrap();
        assert_eq!(config.tool_timeout, Duration::from_secs(12));
        assert!(!config.enable_automation);
    }

    #[test]
    fn second_logging_init_is_reported() {
        init_logging(LogFormat::Json).ok();
        assert!(init_logging(LogFormat::Pretty).is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = Cli::try_parse_from(["switchboard", "--log-format", "xml", "serve"]);
        assert!(result.is_err());
    }
}
