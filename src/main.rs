//! incomelr: Census Income Classifier CLI
//!
//! Trains a logistic regression on a headerless census CSV with a
//! cross-validated regularization search, then saves the model artifact and
//! the held-out ROC-AUC.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use incomelr::cli::{run_score, Cli, Commands, ConsoleObserver};
use incomelr::pipeline::{run_training, PipelineError, Session};
use incomelr::report::display_summary;
use incomelr::utils::{
    print_banner, print_completion, print_config, print_error, print_info, print_warning,
};

const APP_NAME: &str = "incomelr";

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(err) = run(&cli) {
        print_error(&err);
        let code = err
            .downcast_ref::<PipelineError>()
            .map(PipelineError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

/// Diagnostics go to stderr; RUST_LOG takes precedence over --log-level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Score {
                model,
                input,
                output,
            } => run_score(model, input, output.as_deref()),
        };
    }

    let config = cli.training_config();

    println!("Processing started. Please wait...");
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let session = Session::start(APP_NAME, config.parallelism)?;
    let outcome = run_training(&config, &session, &mut ConsoleObserver);
    let elapsed = session.close();
    let outcome = outcome?;

    let unseen: Vec<String> = outcome
        .unseen_test_values
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(column, n)| format!("{} ({})", column, n))
        .collect();
    if !unseen.is_empty() {
        print_warning(&format!(
            "Test categories unseen in training, encoded as all-zero: {}",
            unseen.join(", ")
        ));
    }

    display_summary(&outcome);
    print_completion();
    print_info(&format!("Total time: {:.2}s", elapsed.as_secs_f64()));

    println!("Processing completed successfully.");
    Ok(())
}
