mod args;
mod commands;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use xwatch_app::{AppError, AppPaths, load_config, resolve_config_dir};
use xwatch_core::FetchError;

use crate::args::Cli;
use crate::commands::Context;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(kind = err.label(), "command failed");
            for line in error_lines(&err) {
                eprintln!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}

/// What the user sees on stderr for a failed command.
fn error_lines(err: &AppError) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", err)];
    if matches!(err, AppError::Fetch(FetchError::PaymentRequired(_))) {
        lines.push("Add credits at https://developer.x.com to use the read endpoints.".to_string());
    }
    lines
}

fn run(cli: Cli) -> Result<(), AppError> {
    let paths = AppPaths::new(resolve_config_dir()?);
    let config = load_config(&paths.config_path);
    let level = config
        .as_ref()
        .ok()
        .and_then(|config| config.logging.level.as_deref());
    logging::init_tracing(level, cli.global.verbose);

    let config = config?;
    let ctx = Context::new(&paths, config, cli.global)?;
    commands::run(&ctx, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_reported_once() {
        let lines = error_lines(&AppError::InvalidInput("username is empty".to_string()));
        assert_eq!(lines, vec!["Error: username is empty".to_string()]);

        let payment = AppError::Fetch(FetchError::PaymentRequired("no credits".to_string()));
        let lines = error_lines(&payment);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines.iter().filter(|line| line.starts_with("Error:")).count(),
            1
        );
        assert!(lines[1].contains("Add credits"));
    }
}
