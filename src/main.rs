use color_eyre::Result;
use threadpeek::cli::{connect_from_env, parse_args, run_cli_command, CliCommand, USAGE};
use threadpeek::error::PeekError;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr; stdout carries the preview
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = parse_args(std::env::args());
    tracing::debug!(?command, "starting");

    let runtime = tokio::runtime::Runtime::new()?;
    let usage_error = matches!(command, CliCommand::Invalid(_));
    match runtime.block_on(run_cli_command(command, connect_from_env)) {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(err) => {
            tracing::debug!(
                code = err.error_code(),
                category = %err.category(),
                "command failed"
            );
            match &err {
                PeekError::Entry(_) => eprintln!("{}", err),
                _ if usage_error => eprintln!("{}\n\n{}", err, USAGE),
                _ => eprintln!("Error: {}", err.user_message()),
            }
            std::process::exit(1);
        }
    }
}
