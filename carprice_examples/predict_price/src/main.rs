use std::path::PathBuf;

use carprice::constants::FINAL_MODEL_DIR;
use carprice::data::{load_data, CsvLoader};
use carprice::presentation::{run_app, MarketSummary};
use carprice::PriceModel;
use clap::Parser;
use log::warn;

/// Interactive used-car price estimate.
#[derive(Parser, Debug)]
#[command(name = "predict_price")]
struct Args {
    /// Historical listings used for brand and model statistics
    #[arg(short, long, value_name = "PATH")]
    data_path: PathBuf,

    #[arg(short, long, value_name = "DIR", default_value = FINAL_MODEL_DIR)]
    model_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let history = load_data::<CsvLoader, _>(&args.data_path)?;
    let summary = MarketSummary::from_frame(&history)?;

    // A missing model still lets the user browse statistics.
    let service = PriceModel::from_final_model_dir(&args.model_dir);
    if let Err(e) = &service {
        warn!("Serving without a model: {}", e);
    }

    if let Some(report) = run_app(&summary, service)? {
        print!("{}", report);
    }

    Ok(())
}
