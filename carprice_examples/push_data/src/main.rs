use std::path::PathBuf;

use carprice::components::push_csv_to_store;
use carprice::constants::{COLLECTION_NAME, CONNECTION_ENV_VAR, DATABASE_NAME};
use carprice::store::connect;
use clap::Parser;
use log::info;

/// Load a CSV of car listings into the document store.
#[derive(Parser, Debug)]
#[command(name = "push_data")]
struct Args {
    /// CSV file with a header row
    #[arg(short, long, value_name = "PATH")]
    csv_path: PathBuf,

    #[arg(long, default_value = DATABASE_NAME)]
    database: String,

    #[arg(long, default_value = COLLECTION_NAME)]
    collection: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let connection = std::env::var(CONNECTION_ENV_VAR)
        .map_err(|_| format!("{} is not set", CONNECTION_ENV_VAR))?;
    let store = connect(&connection)?;

    let inserted = push_csv_to_store(&store, &args.csv_path, &args.database, &args.collection)?;
    info!("Pushed {} records", inserted);
    println!("{}", inserted);

    Ok(())
}
