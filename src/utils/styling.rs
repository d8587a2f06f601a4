//! Terminal styling utilities

use console::{style, Emoji};

use crate::pipeline::TrainingConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("incomelr").cyan().bold(),
        style("census income classifier").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(config: &TrainingConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let grid = config
        .cross_validator
        .reg_params
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    println!("    ┌{}┐", line);
    println!("    │ {:<53}│", style("Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!(
        "    │  {}Input:   {:<41}│",
        FOLDER,
        truncate_string(&config.input.display().to_string(), 40)
    );
    println!(
        "    │  {}Model:   {:<41}│",
        SAVE,
        truncate_string(&config.model_output.display().to_string(), 40)
    );
    println!(
        "    │  {}Metric:  {:<41}│",
        SAVE,
        truncate_string(&config.metric_output.display().to_string(), 40)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {}Split:       {:<37}│",
        CHART,
        style(format!(
            "{:.0}/{:.0} (seed {})",
            config.train_fraction * 100.0,
            (1.0 - config.train_fraction) * 100.0,
            config.seed
        ))
        .yellow()
    );
    println!(
        "    │  {}Grid:        {:<37}│",
        CHART,
        style(format!("reg_param ∈ {{{}}}", grid)).yellow()
    );
    println!(
        "    │  {}Folds:       {:<37}│",
        CHART,
        style(format!(
            "{} (parallelism {})",
            config.cross_validator.num_folds, config.parallelism
        ))
        .yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {}{}", WARN, style(message).yellow());
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {}{}",
        ROCKET,
        style("Training complete!").green().bold()
    );
    println!();
}

/// Print a fatal error and its cause chain to stderr
pub fn print_error(err: &anyhow::Error) {
    eprintln!();
    eprintln!("    {} {}", style("✗").red().bold(), style(err).red().bold());
    for cause in err.chain().skip(1) {
        eprintln!("      {} {}", style("caused by:").dim(), cause);
    }
    eprintln!();
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
