//! Benchmarks for feature encoding and ROC-AUC scoring
//!
//! Run with: cargo bench --bench pipeline_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use incomelr::pipeline::{roc_auc, FeaturePipeline};

const WORKCLASSES: [&str; 5] = ["Private", "Self-emp-not-inc", "Local-gov", "State-gov", "Unknown"];
const EDUCATIONS: [&str; 6] = ["HS-grad", "Some-college", "Bachelors", "Masters", "Doctorate", "11th"];
const COUNTRIES: [&str; 6] = ["United-States", "Mexico", "India", "Canada", "Germany", "Unknown"];

fn pick(rng: &mut StdRng, n_rows: usize, values: &[&str]) -> Vec<String> {
    (0..n_rows)
        .map(|_| values[rng.gen_range(0..values.len())].to_string())
        .collect()
}

fn uniform(rng: &mut StdRng, n_rows: usize, low: f64, high: f64) -> Vec<f64> {
    (0..n_rows).map(|_| rng.gen_range(low..high).round()).collect()
}

/// Generate a cleaned census-shaped frame
fn generate_census_frame(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let rng = &mut rng;

    let workclass = pick(rng, n_rows, &WORKCLASSES);
    let education = pick(rng, n_rows, &EDUCATIONS);
    let marital = pick(rng, n_rows, &["Never-married", "Married-civ-spouse", "Divorced"]);
    let occupation = pick(rng, n_rows, &["Adm-clerical", "Exec-managerial", "Sales", "Unknown"]);
    let relationship = pick(rng, n_rows, &["Husband", "Not-in-family", "Own-child"]);
    let race = pick(rng, n_rows, &["White", "Black", "Asian-Pac-Islander"]);
    let sex = pick(rng, n_rows, &["Male", "Female"]);
    let country = pick(rng, n_rows, &COUNTRIES);
    let income = pick(rng, n_rows, &["<=50K", ">50K"]);

    let age = uniform(rng, n_rows, 17.0, 90.0);
    let fnlwgt = uniform(rng, n_rows, 10_000.0, 1_000_000.0);
    let education_num = uniform(rng, n_rows, 1.0, 16.0);
    let capital_gain = uniform(rng, n_rows, 0.0, 10_000.0);
    let capital_loss = uniform(rng, n_rows, 0.0, 2_000.0);
    let hours = uniform(rng, n_rows, 1.0, 99.0);

    df! {
        "age" => age,
        "workclass" => workclass,
        "fnlwgt" => fnlwgt,
        "education" => education,
        "education_num" => education_num,
        "marital_status" => marital,
        "occupation" => occupation,
        "relationship" => relationship,
        "race" => race,
        "sex" => sex,
        "capital_gain" => capital_gain,
        "capital_loss" => capital_loss,
        "hours_per_week" => hours,
        "native_country" => country,
        "income" => income,
    }
    .expect("Failed to create DataFrame")
}

/// Benchmark fitting and applying the feature pipeline
fn benchmark_feature_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_pipeline");
    group.sample_size(20);

    for n_rows in [1_000, 10_000, 50_000] {
        let df = generate_census_frame(n_rows, 42);
        let pipeline = FeaturePipeline::default();
        let fitted = pipeline.fit(&df).expect("Failed to fit pipeline");

        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &df, |b, df| {
            b.iter(|| {
                let _ = pipeline.fit(black_box(df));
            });
        });

        group.bench_with_input(BenchmarkId::new("transform", n_rows), &df, |b, df| {
            b.iter(|| {
                let _ = fitted.transform(black_box(df));
            });
        });
    }

    group.finish();
}

/// Benchmark ROC-AUC over score vectors with and without ties
fn benchmark_roc_auc(c: &mut Criterion) {
    let mut group = c.benchmark_group("roc_auc");
    group.sample_size(30);

    let mut rng = StdRng::seed_from_u64(123);

    for n_rows in [10_000, 100_000, 1_000_000] {
        let labels: Vec<usize> = (0..n_rows).map(|_| usize::from(rng.gen_bool(0.25))).collect();
        let distinct: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>()).collect();
        // Coarse scores produce many tied ranks
        let tied: Vec<f64> = distinct.iter().map(|s| (s * 20.0).round() / 20.0).collect();

        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(
            BenchmarkId::new("distinct_scores", n_rows),
            &(&distinct, &labels),
            |b, (scores, labels)| {
                b.iter(|| roc_auc(black_box(scores.as_slice()), black_box(labels.as_slice())));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("tied_scores", n_rows),
            &(&tied, &labels),
            |b, (scores, labels)| {
                b.iter(|| roc_auc(black_box(scores.as_slice()), black_box(labels.as_slice())));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_feature_pipeline, benchmark_roc_auc);
criterion_main!(benches);
