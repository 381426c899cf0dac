mod file;

use crate::ingest::{FeatureKind, TableBinding};
use crate::{
    ENV_CMR_ENDPOINT_URL, ENV_CONFIG_PATH, ENV_DYNAMODB_ENDPOINT_URL, ENV_EARTHDATA_TOKEN,
};

use chrono::NaiveDate;
use file::ConfigFile;
use std::env;

const DEFAULT_CMR_ENDPOINT_URL: &str = "https://cmr.earthdata.nasa.gov";

#[derive(Debug)]
pub struct Config {
    endpoint_url: Option<String>,
    cmr_endpoint_url: String,
    earthdata_token: Option<String>,
    default_start_date: NaiveDate,
    bindings: Vec<TableBinding>,
}

impl Config {
    pub fn new() -> Self {
        let endpoint_url = env::var(ENV_DYNAMODB_ENDPOINT_URL).ok();
        let cmr_endpoint_url = env::var(ENV_CMR_ENDPOINT_URL)
            .unwrap_or_else(|_| DEFAULT_CMR_ENDPOINT_URL.to_string());
        let earthdata_token = env::var(ENV_EARTHDATA_TOKEN).ok();

        let conf_path = env::var(ENV_CONFIG_PATH).ok();
        let file = ConfigFile::new(conf_path);

        let default_start_date = file
            .default_start_date()
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());

        Self {
            endpoint_url,
            cmr_endpoint_url,
            earthdata_token,
            default_start_date,
            bindings: merge_bindings(builtin_bindings(), file.tables()),
        }
    }

    pub fn endpoint_url(&self) -> Option<String> {
        self.endpoint_url.clone()
    }

    pub fn cmr_endpoint_url(&self) -> &str {
        &self.cmr_endpoint_url
    }

    pub fn earthdata_token(&self) -> Option<String> {
        self.earthdata_token.clone()
    }

    pub fn default_start_date(&self) -> NaiveDate {
        self.default_start_date
    }

    pub fn bindings(&self) -> Vec<TableBinding> {
        self.bindings.clone()
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

fn builtin_bindings() -> Vec<TableBinding> {
    vec![
        TableBinding::new("hydro-swot-reach-table", FeatureKind::Reach),
        TableBinding::new("hydro-swot-node-table", FeatureKind::Node),
        TableBinding::new("hydro-swot-lake-table", FeatureKind::Lake),
    ]
}

/// File entries override a built-in binding of the same table name and
/// extend the set otherwise.
fn merge_bindings(builtin: Vec<TableBinding>, from_file: Vec<TableBinding>) -> Vec<TableBinding> {
    let mut bindings = builtin;

    for binding in from_file {
        match bindings
            .iter_mut()
            .find(|known| known.table_name == binding.table_name)
        {
            Some(known) => *known = binding,
            None => bindings.push(binding),
        }
    }

    bindings
}
