use anyhow::{Context, Result};
use clap::Parser;
use gaussian_bayes::{accuracy, dataset, GaussianNaiveBayes};
use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};

/// Train a Gaussian Naive Bayes classifier on part of a CSV dataset and report
/// its accuracy on the rest.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Headerless CSV file; the last column is the class label
    #[arg(default_value = "pima-indians-diabetes.data.csv")]
    data: PathBuf,

    /// Fraction of rows used for training
    #[arg(long, default_value_t = 0.67)]
    split_ratio: f64,

    /// Seed for the train/test partition
    #[arg(long)]
    seed: Option<u64>,

    /// Write the test set predictions to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gaussian_bayes=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let rows = dataset::load_csv(&cli.data)?;
    let total = rows.len();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (train, test) = dataset::split(rows, cli.split_ratio, &mut rng)?;
    tracing::info!(total, train = train.len(), test = test.len(), "partitioned dataset");
    println!(
        "Split {} rows into train set = {} and test set = {} rows",
        total,
        train.len(),
        test.len()
    );

    let model = GaussianNaiveBayes::train(&train).context("training failed")?;
    let predictions = model.predict_all(&test)?;
    let accuracy = accuracy(&predictions, &test).context("cannot score an empty test set")?;
    tracing::info!(accuracy, classes = model.classes().count(), "evaluated model");

    if let Some(output) = &cli.output {
        write_predictions(output, &predictions, &test)?;
    }

    println!("Accuracy: {}", accuracy);

    Ok(())
}

fn write_predictions(path: &Path, predictions: &[f64], test: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(["ID", "Predicted", "Actual"])?;
    for (i, (prediction, row)) in predictions.iter().zip(test.iter()).enumerate() {
        let actual = row.last().map(f64::to_string).unwrap_or_default();
        writer.write_record(&[(i + 1).to_string(), prediction.to_string(), actual])?;
    }
    writer.flush()?;

    Ok(())
}
