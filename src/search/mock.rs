use super::{DateWindow, GranuleSearch};
use crate::{Error, Result};

use async_trait::async_trait;

/// Canned search results for driver tests.
#[derive(Debug, Default)]
pub(crate) struct MockSearch {
    granules: Vec<String>,
    unauthorized: bool,
}

impl MockSearch {
    pub(crate) fn new<I, S>(granules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granules: granules.into_iter().map(Into::into).collect(),
            unauthorized: false,
        }
    }

    pub(crate) fn unauthorized() -> Self {
        Self {
            granules: vec![],
            unauthorized: true,
        }
    }
}

#[async_trait]
impl GranuleSearch for MockSearch {
    async fn find_granules(&self, _short_name: &str, _window: &DateWindow) -> Result<Vec<String>> {
        if self.unauthorized {
            return Err(Error::SearchUnauthorized(401));
        }

        Ok(self.granules.clone())
    }
}
