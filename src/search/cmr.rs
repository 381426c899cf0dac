use super::{DateWindow, GranuleSearch};
use crate::{Error, Result};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::info;

const PAGE_SIZE: usize = 2000;

/// Granule discovery against a CMR-style search endpoint
/// (`GET {endpoint}/search/granules.json`).
#[derive(Debug, Clone)]
pub struct CmrClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    feed: Feed,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    links: Option<Vec<Link>>,
}

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    href: String,
}

impl CmrClient {
    pub fn new<E: Into<String>>(endpoint: E, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token,
        }
    }
}

#[async_trait]
impl GranuleSearch for CmrClient {
    async fn find_granules(&self, short_name: &str, window: &DateWindow) -> Result<Vec<String>> {
        let url = format!("{}/search/granules.json", self.endpoint.trim_end_matches('/'));
        let temporal = window.temporal();

        let mut paths: Vec<String> = vec![];
        let mut page_num = 1;

        loop {
            let mut request = self.http.get(&url).query(&[
                ("short_name", short_name),
                ("temporal", &temporal),
                ("page_size", &PAGE_SIZE.to_string()),
                ("page_num", &page_num.to_string()),
            ]);

            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .map_err(|err| Error::Search(err.to_string()))?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(Error::SearchUnauthorized(status.as_u16()));
            }
            if !status.is_success() {
                return Err(Error::Search(format!(
                    "granule search returned status {status}",
                )));
            }

            let body: SearchResponse = response
                .json()
                .await
                .map_err(|err| Error::Search(format!("bad search payload: {err}")))?;

            let page_entries = body.feed.entry.len();
            paths.extend(body.feed.entry.into_iter().filter_map(data_link));

            if page_entries < PAGE_SIZE {
                break;
            }
            page_num += 1;
        }

        info!("found {} granules of `{short_name}` for {temporal}", paths.len());
        Ok(paths)
    }
}

/// The entry's data link, preferring a direct `s3://` locator over HTTPS.
fn data_link(entry: Entry) -> Option<String> {
    let links = entry.links?;

    let data: Vec<&Link> = links
        .iter()
        .filter(|link| link.rel.ends_with("/data#"))
        .collect();

    data.iter()
        .find(|link| link.href.starts_with("s3://"))
        .or_else(|| data.first())
        .map(|link| link.href.clone())
}
