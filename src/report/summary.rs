//! Training run summary tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::TrainingOutcome;

/// Render the dataset and model summary of a completed run
pub fn summary_table(outcome: &TrainingOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("📁 Rows loaded"), Cell::new(outcome.loaded_rows)]);
    for (column, filled) in &outcome.cleaning.filled {
        table.add_row(vec![
            Cell::new(format!("🩹 Filled '{}'", column)),
            Cell::new(filled),
        ]);
    }
    table.add_row(vec![
        Cell::new("🗑️  Rows dropped"),
        Cell::new(outcome.cleaning.dropped_rows).fg(if outcome.cleaning.dropped_rows == 0 {
            Color::White
        } else {
            Color::Red
        }),
    ]);
    table.add_row(vec![
        Cell::new("✂️  Train / Test"),
        Cell::new(format!("{} / {}", outcome.train_rows, outcome.test_rows)),
    ]);
    table.add_row(vec![Cell::new("🧮 Features"), Cell::new(outcome.feature_count)]);

    let unseen: usize = outcome.unseen_test_values.iter().map(|(_, n)| n).sum();
    table.add_row(vec![
        Cell::new("❓ Unseen test categories"),
        Cell::new(unseen).fg(if unseen == 0 { Color::White } else { Color::Yellow }),
    ]);
    table.add_row(vec![
        Cell::new("🎛️  Best reg_param"),
        Cell::new(outcome.best_reg_param).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("✅ Test ROC-AUC"),
        Cell::new(format!("{:.4}", outcome.test_auc))
            .fg(auc_color(outcome.test_auc))
            .add_attribute(Attribute::Bold),
    ]);

    table
}

/// Render the per-grid-point cross-validation results
pub fn grid_table(outcome: &TrainingOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("reg_param").add_attribute(Attribute::Bold),
        Cell::new("Avg ROC-AUC").add_attribute(Attribute::Bold),
        Cell::new("Folds scored").add_attribute(Attribute::Bold),
    ]);

    for result in &outcome.results {
        let is_best = result.reg_param == outcome.best_reg_param;
        let mut metric = Cell::new(format!("{:.4}", result.avg_metric)).fg(auc_color(result.avg_metric));
        if is_best {
            metric = metric.add_attribute(Attribute::Bold);
        }
        let scored = result.fold_metrics.len() - result.excluded_folds.len();

        table.add_row(vec![
            Cell::new(if is_best {
                format!("{} ★", result.reg_param)
            } else {
                result.reg_param.to_string()
            }),
            metric,
            Cell::new(format!("{}/{}", scored, result.fold_metrics.len())).fg(
                if result.excluded_folds.is_empty() {
                    Color::White
                } else {
                    Color::Yellow
                },
            ),
        ]);
    }

    table
}

/// Print both tables and the stage timings
pub fn display_summary(outcome: &TrainingOutcome) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("TRAINING SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();
    print_indented(&summary_table(outcome));

    println!();
    println!(
        "    {} {}",
        style("🔍").cyan(),
        style("CROSS-VALIDATION").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();
    print_indented(&grid_table(outcome));

    println!();
    println!(
        "    {} {}",
        style("⏱").cyan(),
        style("STAGE TIMINGS").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    for (stage, elapsed) in &outcome.stage_times {
        println!(
            "      {:<20} {}",
            stage.title(),
            style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
        );
    }
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn auc_color(auc: f64) -> Color {
    if auc >= 0.85 {
        Color::Green
    } else if auc >= 0.7 {
        Color::Yellow
    } else {
        Color::Red
    }
}
