mod config;
mod error;

pub mod ingest;
pub mod io;
pub mod search;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};

pub const ENV_DYNAMODB_ENDPOINT_URL: &str = "DYNAMODB_ENDPOINT_URL";
pub const ENV_CMR_ENDPOINT_URL: &str = "CMR_ENDPOINT_URL";
pub const ENV_EARTHDATA_TOKEN: &str = "EARTHDATA_TOKEN";
pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
