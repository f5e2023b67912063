use anyhow::Context;
use asset_owner_predictor::{
    config::Config,
    ingest::{DatasetReader, EncodingCandidates},
    ml::{predict, service::train_from_path, OwnerTrainer, TrainingParams},
    models::{AssetRecord, PredictionRequest},
};
use clap::{Args, Parser, Subcommand};
use reqwest::Client;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asset-owner-cli")]
#[command(about = "Asset Owner Predictor CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Server URL for remote commands
    #[arg(short, long, env = "ASSET_OWNER_ENDPOINT", default_value = "http://localhost:5000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RecordArgs {
    #[arg(long, default_value = "")]
    hostname: String,

    #[arg(long, default_value = "")]
    ip: String,

    #[arg(long, default_value = "")]
    location: String,

    #[arg(long = "os", default_value = "")]
    operating_system: String,
}

impl From<RecordArgs> for PredictionRequest {
    fn from(args: RecordArgs) -> Self {
        PredictionRequest {
            hostname: args.hostname,
            ip: args.ip,
            location: args.location,
            operating_system: args.operating_system,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a dataset locally and print the model summary
    Train {
        #[arg(short, long, value_name = "CSV")]
        input: PathBuf,
    },

    /// Train on a dataset locally, then predict owners for one record
    Predict {
        #[arg(short, long, value_name = "CSV")]
        input: PathBuf,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Predict owners with a running server
    RemotePredict {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Show the model summary of a running server
    Model,

    /// Check server health
    Health,
}

fn local_pipeline() -> anyhow::Result<(DatasetReader, OwnerTrainer)> {
    let config = Config::load().unwrap_or_default();
    let reader = DatasetReader::new(EncodingCandidates::from_labels(&config.dataset.encodings)?);
    let trainer = OwnerTrainer::new(TrainingParams::from(&config.model))?;
    Ok((reader, trainer))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Train { input } => {
            let (reader, trainer) = local_pipeline()?;
            let bundle = train_from_path(&reader, &trainer, &input)
                .with_context(|| format!("training on {}", input.display()))?;

            println!("{}", serde_json::to_string_pretty(&bundle.summary(1))?);
        }

        Commands::Predict { input, record } => {
            let (reader, trainer) = local_pipeline()?;
            let bundle = train_from_path(&reader, &trainer, &input)
                .with_context(|| format!("training on {}", input.display()))?;

            let record = AssetRecord::from(PredictionRequest::from(record));
            let prediction = predict(&record, &bundle)?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }

        Commands::RemotePredict { record } => {
            let response = client
                .post(format!("{}/v1/predict", cli.endpoint))
                .json(&PredictionRequest::from(record))
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Model => {
            let response = client
                .get(format!("{}/v1/model", cli.endpoint))
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Health => {
            let response = client
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
