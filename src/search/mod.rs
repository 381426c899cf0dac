mod cmr;

#[cfg(test)]
pub(crate) mod mock;

pub use cmr::CmrClient;

use crate::Result;

use async_trait::async_trait;
use chrono::NaiveDate;

/// The `[start, end]` date window a discovery request covers, inclusive of
/// both whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The window in the discovery service's `temporal` parameter form.
    pub fn temporal(&self) -> String {
        format!("{}T00:00:00Z,{}T23:59:59Z", self.start, self.end)
    }
}

/// Finds granule locators for a collection within a date window.
#[async_trait]
pub trait GranuleSearch: Send + Sync {
    async fn find_granules(&self, short_name: &str, window: &DateWindow) -> Result<Vec<String>>;
}
