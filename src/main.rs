//! Countdown - a single-screen countdown timer for the terminal
//!
//! Pick minutes and seconds, start the countdown and watch it reach zero:
//! - `HH:mm:ss:SS` display updated in place
//! - start/reset/set commands typed while it runs
//! - an alert when the countdown is over

use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use countdown::cli::{Cli, Commands, CountdownView, Display};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries countdown output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Start(args)) => {
            let config = args.to_config();
            tracing::debug!(?config, "opening countdown screen");

            let mut view = CountdownView::new(&config, std::io::stdout())?;
            let input = BufReader::new(tokio::io::stdin());
            view.run(input).await?;
        }
        Some(Commands::Format { seconds }) => {
            let span = Duration::try_from_secs_f64(seconds)?;
            Display::show_time_span(span);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
