use std::path::PathBuf;

use carprice::config::TrainingPipelineConfig;
use carprice::constants::{ARTIFACT_DIR, CONNECTION_ENV_VAR, FINAL_MODEL_DIR};
use carprice::store::connect;
use carprice::TrainingPipeline;
use clap::Parser;
use log::info;

/// Run ingestion, transformation and training, publishing the model.
#[derive(Parser, Debug)]
#[command(name = "train_pipeline")]
struct Args {
    #[arg(long, value_name = "DIR", default_value = ARTIFACT_DIR)]
    artifact_dir: PathBuf,

    #[arg(long, value_name = "DIR", default_value = FINAL_MODEL_DIR)]
    final_model_dir: PathBuf,

    /// Fix the train/test shuffle
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    epochs: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let connection = std::env::var(CONNECTION_ENV_VAR)
        .map_err(|_| format!("{} is not set", CONNECTION_ENV_VAR))?;
    let store = connect(&connection)?;

    let config = TrainingPipelineConfig::new()
        .with_artifact_root(args.artifact_dir)
        .with_final_model_dir(args.final_model_dir);
    info!("Artifacts for this run go to {:?}", config.artifact_dir());

    let mut pipeline = TrainingPipeline::new(&config);
    if let Some(seed) = args.seed {
        pipeline.ingestion = pipeline.ingestion.with_seed(seed);
    }
    if let Some(epochs) = args.epochs {
        pipeline.trainer = pipeline.trainer.with_epochs(epochs);
    }

    let artifact = pipeline.run(store)?;
    println!("Model: {}", artifact.trained_model_file_path.display());
    println!("Train: {}", artifact.train_metrics);
    println!("Test:  {}", artifact.test_metrics);

    Ok(())
}
