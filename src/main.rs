use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use prognos::application::ml::PriceModelKind;
use prognos::application::{HeartDiseaseService, StockForecastRequest, StockForecastService};
use prognos::config::Config;
use prognos::domain::health::PatientForm;
use prognos::domain::market::BarRequest;
use prognos::domain::ports::MarketDataProvider;
use prognos::infrastructure::{CsvBarProvider, FileArtifactStore, YahooMarketDataProvider};
use prognos::interfaces::report::{HeartReport, StockReport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Heart-disease risk and next-day stock price predictions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Heart disease risk assessment from patient data
    Heart(HeartArgs),
    /// Next-day closing price forecast for a ticker
    Stock(StockArgs),
}

/// Unset flags fall back to the form defaults.
#[derive(Args)]
struct HeartArgs {
    /// Age in years (0-120)
    #[arg(long)]
    age: Option<i64>,

    /// "Male" or "Female"
    #[arg(long)]
    sex: Option<String>,

    /// "No Pain", "Typical Angina", "Atypical Angina", "Non-Anginal Pain" or "Severe Pain"
    #[arg(long)]
    chest_pain: Option<String>,

    /// Resting blood pressure in mm Hg (50-200)
    #[arg(long)]
    resting_bp: Option<i64>,

    /// Serum cholesterol in mg/dL (50-600)
    #[arg(long)]
    cholesterol: Option<i64>,

    /// Fasting blood sugar above 120 mg/dL: "Yes" or "No"
    #[arg(long)]
    fasting_blood_sugar: Option<String>,

    /// "Normal", "Abnormal ST-T Wave" or "Probable or Definite Hypertrophy"
    #[arg(long)]
    resting_ecg: Option<String>,

    /// Maximum heart rate achieved (50-250)
    #[arg(long)]
    max_heart_rate: Option<i64>,

    /// Exercise-induced angina: "Yes" or "No"
    #[arg(long)]
    exercise_angina: Option<String>,

    /// ST depression induced by exercise (0.0-10.0)
    #[arg(long)]
    st_depression: Option<f64>,

    /// "Upsloping", "Flat" or "Downsloping"
    #[arg(long)]
    st_slope: Option<String>,

    /// Number of major vessels colored by fluoroscopy (0-3)
    #[arg(long)]
    vessels: Option<i64>,

    /// "Normal", "Fixed Defect" or "Reversible Defect"
    #[arg(long)]
    thalassemia: Option<String>,

    /// Directory holding scaler.json and model.json (overrides MODELS_DIR)
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

impl HeartArgs {
    fn into_form(self) -> PatientForm {
        let d = PatientForm::default();
        PatientForm {
            age: self.age.unwrap_or(d.age),
            sex: self.sex.unwrap_or(d.sex),
            chest_pain_type: self.chest_pain.unwrap_or(d.chest_pain_type),
            resting_bp: self.resting_bp.unwrap_or(d.resting_bp),
            cholesterol: self.cholesterol.unwrap_or(d.cholesterol),
            fasting_blood_sugar: self.fasting_blood_sugar.unwrap_or(d.fasting_blood_sugar),
            resting_ecg: self.resting_ecg.unwrap_or(d.resting_ecg),
            max_heart_rate: self.max_heart_rate.unwrap_or(d.max_heart_rate),
            exercise_angina: self.exercise_angina.unwrap_or(d.exercise_angina),
            st_depression: self.st_depression.unwrap_or(d.st_depression),
            st_slope: self.st_slope.unwrap_or(d.st_slope),
            vessels_colored: self.vessels.unwrap_or(d.vessels_colored),
            thalassemia: self.thalassemia.unwrap_or(d.thalassemia),
        }
    }
}

#[derive(Args)]
struct StockArgs {
    /// Ticker symbol (defaults to DEFAULT_TICKER)
    #[arg(short, long)]
    ticker: Option<String>,

    /// Start date (YYYY-MM-DD); defaults to DEFAULT_LOOKBACK_DAYS before the end date
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), inclusive; defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,

    /// "linear-regression" or "random-forest"
    #[arg(short, long, default_value = "linear-regression")]
    model: PriceModelKind,

    /// Read bars from a CSV export instead of the network
    #[arg(long)]
    bars_csv: Option<PathBuf>,

    /// Print the forecast as JSON
    #[arg(long)]
    json: bool,
}

fn run_heart(args: HeartArgs, config: &Config) -> anyhow::Result<()> {
    let models_dir = args
        .models_dir
        .clone()
        .unwrap_or_else(|| config.model.models_dir.clone());
    let json = args.json;

    let service = HeartDiseaseService::new(Arc::new(FileArtifactStore::new(models_dir)));
    let assessment = service.assess(&args.into_form())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print!("{}", HeartReport(&assessment));
    }
    Ok(())
}

async fn run_stock(args: StockArgs, config: &Config) -> anyhow::Result<()> {
    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    let start = match args.start {
        Some(start) => start,
        None => config.model.default_start(end)?,
    };
    let ticker = args
        .ticker
        .unwrap_or_else(|| config.model.default_ticker.clone());

    let provider: Arc<dyn MarketDataProvider> = match &args.bars_csv {
        Some(path) => Arc::new(CsvBarProvider::new(path.clone())),
        None => Arc::new(YahooMarketDataProvider::new(&config.market_data)),
    };
    info!("Using {} market data", provider.name());

    let mut service = StockForecastService::new(provider);
    let request = StockForecastRequest {
        bars: BarRequest::new(&ticker, start, end),
        model: args.model,
    };
    let forecast = service.forecast(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        print!("{}", StockReport(&forecast));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load Env (before starting anything)
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let outcome = match cli.command {
        Commands::Heart(args) => run_heart(args, &config),
        Commands::Stock(args) => run_stock(args, &config).await,
    };

    if let Err(e) = outcome {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
