use hydro_dynamo::io::{GranuleReader, ShapefileReader};
use hydro_dynamo::store::{Database, DynamoClient};
use hydro_dynamo::Config;

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Loads a single granule archive into an existing table, bypassing
/// discovery. Useful for backfill and manual testing.
#[derive(Debug, Parser)]
#[command(name = "load_granule")]
struct Args {
    /// The name of the table to load into.
    #[arg(short, long)]
    table_name: String,
    /// A local path or `s3://bucket/key` locator of a zipped granule.
    #[arg(short, long)]
    path: String,
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::new();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(err) = run(Args::parse()).await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::new();

    let client = DynamoClient::builder()
        .await
        .endpoint_url(config.endpoint_url())
        .build();
    let database = Database::new(Arc::new(client));
    let table = database.load(&args.table_name).await?;

    let reader = ShapefileReader::builder()
        .await
        .endpoint_url(config.endpoint_url())
        .build();

    let records = reader.read(&args.path).await?;
    let count = records.len();

    for mut record in records {
        record.coerce_string_keys(table.key_schema());
        table.add(record).await?;
    }

    info!("loaded {count} records from `{}` into `{}`", args.path, table.name());
    Ok(())
}
