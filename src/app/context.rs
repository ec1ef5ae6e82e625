use std::path::Path;
use std::sync::Arc;

use crate::app::error::{ChapelError, Result};
use crate::config::Config;
use crate::domain::event::CalendarDefaults;
use crate::fetcher::{ContentFetcher, SanityClient};

pub struct AppContext {
    pub config: Config,
    pub client: Arc<SanityClient>,
}

impl AppContext {
    /// Load configuration from `config_path`, or the default location, and
    /// build the content client from it.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
        .map_err(|e| ChapelError::Config(e.to_string()))?;

        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        if !config.cms.is_configured() {
            tracing::warn!("Content store is not configured; set SANITY_PROJECT_ID and SANITY_DATASET");
        }

        let client = Arc::new(SanityClient::new(config.cms.clone())?);
        Ok(Self { config, client })
    }

    pub fn fetcher(&self) -> Arc<dyn ContentFetcher + Send + Sync> {
        self.client.clone()
    }

    pub fn calendar_defaults(&self) -> CalendarDefaults<'_> {
        CalendarDefaults {
            organizer: &self.config.site.name,
            location: &self.config.site.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_default_config() {
        let ctx = AppContext::with_config(Config::default()).unwrap();
        assert!(!ctx.client.images().is_configured());
        assert_eq!(ctx.calendar_defaults().organizer, "King's Palace Parish");
    }
}
