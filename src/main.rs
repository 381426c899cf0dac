use hydro_dynamo::ingest::Ingestor;
use hydro_dynamo::io::ShapefileReader;
use hydro_dynamo::search::{CmrClient, DateWindow};
use hydro_dynamo::store::{Database, DynamoClient};
use hydro_dynamo::Config;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Searches for new granules and loads their observations into the
/// appropriate feature table.
#[derive(Debug, Parser)]
#[command(name = "hydro-dynamo")]
struct Args {
    /// The name of the table to populate.
    #[arg(short, long)]
    table_name: String,
    /// The ISO date after which data should be retrieved,
    /// e.g. --start-date 2023-06-14.
    #[arg(short, long)]
    start_date: Option<NaiveDate>,
    /// The ISO date before which data should be retrieved,
    /// e.g. --end-date 2023-07-14.
    #[arg(short, long)]
    end_date: Option<NaiveDate>,
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

    let search = CmrClient::new(config.cmr_endpoint_url(), config.earthdata_token());
    let reader = ShapefileReader::builder()
        .await
        .endpoint_url(config.endpoint_url())
        .build();

    let window = DateWindow::new(
        args.start_date.unwrap_or_else(|| config.default_start_date()),
        args.end_date.unwrap_or_else(|| Utc::now().date_naive()),
    );

    let ingestor = Ingestor::new(database, Arc::new(search), Arc::new(reader), config.bindings());
    let summary = ingestor.run(&args.table_name, window).await?;

    info!(
        "run {} wrote {} records into `{}`",
        summary.run_id, summary.records_written, summary.table_name,
    );

    Ok(())
}
