use hydro_dynamo::store::{Database, DynamoClient};
use hydro_dynamo::types::{KeyKind, KeySchema};
use hydro_dynamo::Config;

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Declares a feature table with the standard partition+sort key schema.
#[derive(Debug, Parser)]
#[command(name = "create_table")]
struct Args {
    /// The name of the table to create.
    #[arg(short, long)]
    table_name: String,
    /// The partition key attribute, the feature identifier.
    #[arg(short, long, default_value = "reach_id")]
    partition_key: String,
    /// The sort key attribute, the observation timestamp.
    #[arg(short, long, default_value = "range_start_time")]
    sort_key: String,
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

    if database.exists(&args.table_name).await? {
        info!("table `{}` already exists", args.table_name);
        return Ok(());
    }

    let key_schema = KeySchema::new(
        args.partition_key,
        KeyKind::String,
        args.sort_key,
        KeyKind::String,
    );
    let table = database.create(&args.table_name, key_schema).await?;

    info!("created table `{}`", table.name());
    Ok(())
}
