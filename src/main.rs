//! mwql - MWDB query editor
//!
//! An interactive editor for the MWDB search query language.
//!
//! # Features
//!
//! - Syntax highlighting as the query is typed, with the active group emphasised
//! - Field name completion from a configurable field vocabulary
//! - Inline hints from field names and history
//! - Malformed queries are refused with a pointer to the error
//! - One-shot subcommands for annotating and completing queries from scripts
//! - Multiple output formats (shell, JSON, table)
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! mwql
//!
//! # One-shot
//! mwql annotate 'tag:emotet AND cfg.ur'
//! mwql suggest 'tag:emotet AND sha' --format json
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use mwql::cli::CliInterface;
use mwql::error::Result;
use mwql::{Formatter, ReplEngine, ReplInput};

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands or start the editor
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    run_interactive_mode(&cli)
}

/// Run the interactive query editor
fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let vocabulary = cli.load_vocabulary()?;
    let mut repl = ReplEngine::new(cli.config(), vocabulary)?;
    let formatter = cli.formatter();

    run_repl_loop(&mut repl, &formatter)?;

    if !cli.args().quiet {
        println!("Goodbye!");
    }
    Ok(())
}

/// Main REPL loop
fn run_repl_loop(repl: &mut ReplEngine, formatter: &Formatter) -> Result<()> {
    loop {
        let input = match repl.read_line()? {
            ReplInput::Line(line) if !line.trim().is_empty() => line,
            ReplInput::Line(_) | ReplInput::Interrupted => continue,
            ReplInput::Exit => break,
        };

        match repl.process_input(&input) {
            Ok(annotated) => match formatter.format_submitted(&annotated) {
                Ok(output) => println!("{}", output),
                Err(e) => eprintln!("Format error: {}", e),
            },
            Err(e) => eprintln!("{}", formatter.format_rejected(input.trim(), &e)),
        }
    }

    Ok(())
}

/// Initialize logging system
///
/// The configured level (after `-q`/`-v`/`--vv`) is the default directive;
/// `RUST_LOG` overrides it when set. Logs go to stderr so they never mix
/// with query output.
///
/// # Arguments
/// * `cli` - CLI interface with logging settings
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
