use clap::Parser;
use std::process;
use textmerge::{Cli, OutputFormatter, TextMerge, TextMergeError, UserFriendlyError};
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    init_logging(&cli);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let Some(ref command) = cli.command else {
        eprintln!("No command given. Run `textmerge concat` or `textmerge matrix` (see --help).");
        return 2;
    };

    tracing::debug!(?command, "starting");

    let textmerge = match TextMerge::from_cli(&cli) {
        Ok(textmerge) => textmerge,
        Err(e) => {
            print_startup_error(&cli, &e);
            return e.exit_code();
        }
    };

    match textmerge.run(command) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            textmerge.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "textmerge.toml".to_string());

    match TextMerge::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  textmerge concat --config {}", config_path);
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

fn print_startup_error(cli: &Cli, error: &TextMergeError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}

// Diagnostics go to stderr so stdout stays clean for plain and json output.
fn init_logging(cli: &Cli) {
    let level = match cli.verbosity_level() {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("textmerge={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
