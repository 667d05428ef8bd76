use anyhow::Context;
use clap::Parser;
use prognos::application::ml::training::{HeartTrainingRecord, train_risk_model};
use prognos::config::Config;
use prognos::infrastructure::FileArtifactStore;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fit the heart-disease scaler and classifier", long_about = None)]
struct Args {
    /// Path to the UCI-layout training CSV (age,...,thal,target)
    #[arg(long, default_value = "data/heart.csv")]
    input: PathBuf,

    /// Output directory for scaler.json and model.json (overrides MODELS_DIR)
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    let models_dir = args.models_dir.unwrap_or(config.model.models_dir);

    println!("Loading training data from {:?}", args.input);
    let file = File::open(&args.input)
        .with_context(|| format!("Training data not found at {:?}", args.input))?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));

    let records = rdr
        .deserialize::<HeartTrainingRecord>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to parse training CSV")?;
    if records.is_empty() {
        anyhow::bail!("No training rows found in {:?}", args.input);
    }

    let positives = records.iter().filter(|r| r.label() == 1).count();
    println!("\nTarget Distribution:");
    println!("  Total:    {}", records.len());
    println!(
        "  Disease:  {} ({:.1}%)",
        positives,
        positives as f64 / records.len() as f64 * 100.0
    );

    let trained = train_risk_model(&records)?;
    println!(
        "\nIn-sample accuracy: {:.2}% over {} rows",
        trained.in_sample_accuracy * 100.0,
        trained.samples
    );

    let store = FileArtifactStore::new(&models_dir);
    trained.model.save(&store)?;
    info!("Artifacts written to {}", store.dir().display());
    println!("Model saved to {:?}", models_dir);

    Ok(())
}
