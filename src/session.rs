use crate::config::{deliveries_source, matches_source};
use crate::data::fetch::Fetcher;
use crate::data::loader::{http_fetcher, load_with, LoadError};
use crate::data::model::Table;
use crate::data::source::SourceDescriptor;

/// Both datasets, loaded. Only exists when every load succeeded.
#[derive(Debug, Clone)]
pub struct Session {
    pub matches: Table,
    pub deliveries: Table,
}

impl Session {
    /// Load the two fixed datasets over HTTP.
    pub fn load_http() -> Result<Self, LoadError> {
        let matches = matches_source();
        let fetcher = http_fetcher(&matches.url)?;
        Self::load_from(&fetcher, &matches, &deliveries_source())
    }

    /// Load the two fixed datasets.
    pub fn load(fetcher: &dyn Fetcher) -> Result<Self, LoadError> {
        Self::load_from(fetcher, &matches_source(), &deliveries_source())
    }

    /// Load matches then deliveries, in that order. The first failure ends
    /// the session; a later dataset is not fetched after an earlier one fails.
    pub fn load_from(
        fetcher: &dyn Fetcher,
        matches: &SourceDescriptor,
        deliveries: &SourceDescriptor,
    ) -> Result<Self, LoadError> {
        let matches = load_with(fetcher, matches).inspect_err(|e| {
            log::error!("matches dataset: {e}");
        })?;
        let deliveries = load_with(fetcher, deliveries).inspect_err(|e| {
            log::error!("deliveries dataset: {e}");
        })?;
        Ok(Self {
            matches,
            deliveries,
        })
    }
}
