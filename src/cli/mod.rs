//! CLI module - argument parsing, console output and the score subcommand

pub mod args;
pub mod observer;
pub mod score;

pub use args::{scored_output_path, Cli, Commands};
pub use observer::ConsoleObserver;
pub use score::{run_score, score_frame, ScoredFrame};
