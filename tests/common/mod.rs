//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use incomelr::pipeline::{CrossValidator, TrainingConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

const WORKCLASSES: [&str; 4] = ["Private", "Self-emp-not-inc", "Local-gov", "State-gov"];
const EDUCATIONS: [&str; 4] = ["HS-grad", "Some-college", "Bachelors", "Masters"];
const MARITAL: [&str; 3] = ["Never-married", "Married-civ-spouse", "Divorced"];
const OCCUPATIONS: [&str; 4] = ["Adm-clerical", "Exec-managerial", "Sales", "Craft-repair"];
const RELATIONSHIPS: [&str; 3] = ["Husband", "Not-in-family", "Own-child"];
const RACES: [&str; 2] = ["White", "Black"];
const SEXES: [&str; 2] = ["Male", "Female"];
const COUNTRIES: [&str; 3] = ["United-States", "Mexico", "India"];

/// Generate `n` census rows (15 fields each) with an exact 50/50 label split.
///
/// Even rows are `<=50K`, odd rows `>50K`. Education, hours and age carry
/// signal; the other fields are noise. No field is missing.
pub fn census_rows(n: usize, seed: u64) -> Vec<Vec<String>> {
    imbalanced_census_rows(n, 1, seed)
}

/// Like [`census_rows`], but with `negatives_per_positive` `<=50K` rows for
/// every `>50K` row, so the positive class is the minority.
pub fn imbalanced_census_rows(n: usize, negatives_per_positive: usize, seed: u64) -> Vec<Vec<String>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let period = negatives_per_positive + 1;
    (0..n)
        .map(|i| {
            let high = i % period == negatives_per_positive;
            let age: u32 = if high { rng.gen_range(35..60) } else { rng.gen_range(18..45) };
            let education_num: u32 = if high { rng.gen_range(11..16) } else { rng.gen_range(6..12) };
            let hours: u32 = if high { rng.gen_range(40..60) } else { rng.gen_range(20..45) };
            let education = EDUCATIONS[(education_num as usize - 6) * EDUCATIONS.len() / 10];
            vec![
                age.to_string(),
                pick(&mut rng, &WORKCLASSES),
                rng.gen_range(20_000u32..400_000).to_string(),
                education.to_string(),
                education_num.to_string(),
                pick(&mut rng, &MARITAL),
                pick(&mut rng, &OCCUPATIONS),
                pick(&mut rng, &RELATIONSHIPS),
                pick(&mut rng, &RACES),
                pick(&mut rng, &SEXES),
                if high && rng.gen_bool(0.3) { "5178".to_string() } else { "0".to_string() },
                "0".to_string(),
                hours.to_string(),
                pick(&mut rng, &COUNTRIES),
                if high { ">50K".to_string() } else { "<=50K".to_string() },
            ]
        })
        .collect()
}

fn pick(rng: &mut ChaCha8Rng, values: &[&str]) -> String {
    values[rng.gen_range(0..values.len())].to_string()
}

/// Join rows into headerless CSV lines, with a space after each comma like
/// the public census files.
pub fn to_lines(rows: &[Vec<String>]) -> Vec<String> {
    rows.iter().map(|row| row.join(", ")).collect()
}

/// Write headerless CSV lines into a fresh temporary directory.
pub fn write_temp_csv(lines: &[String]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dataset.csv");
    write_lines(&path, lines);
    (temp_dir, path)
}

pub fn write_lines(path: &Path, lines: &[String]) {
    let mut file = std::fs::File::create(path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

/// Training configuration reading `input` and writing into `dir`.
pub fn training_config(dir: &Path, input: &Path) -> TrainingConfig {
    TrainingConfig {
        input: input.to_path_buf(),
        model_output: dir.join("model"),
        metric_output: dir.join("auc.csv"),
        cross_validator: CrossValidator {
            seed: 42,
            ..CrossValidator::default()
        },
        ..TrainingConfig::default()
    }
}

/// Assert that a metric file holds exactly one float in [0, 1].
pub fn read_metric(path: &Path) -> f64 {
    let content = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 1, "metric file should hold one row: {:?}", lines);
    let value: f64 = lines[0].trim().parse().unwrap();
    assert!((0.0..=1.0).contains(&value), "metric out of range: {}", value);
    value
}
