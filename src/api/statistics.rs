//! Statistics API

use crate::api::{segment, Transifex};
use crate::error::Result;
use serde_json::Value;

/// Translation progress of resources
#[derive(Debug, Clone, Copy)]
pub struct Statistics<'a> {
    api: &'a Transifex,
}

impl<'a> Statistics<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Statistics for a resource, for every language or only `lang`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_statistics(
        &self,
        project: &str,
        resource: &str,
        lang: Option<&str>,
    ) -> Result<Value> {
        let path = format!(
            "/project/{}/resource/{}/stats/{}",
            segment(project),
            segment(resource),
            lang.map(segment).unwrap_or_default()
        );
        self.api.get(&path, 200).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::*;

    #[tokio::test]
    async fn test_get_statistics() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);
        transport.respond(200, SAMPLE_BODY);

        let stats = api.statistics();
        assert_eq!(stats.get_statistics("joomla", "joomla-platform", None).await?, sample());
        assert_eq!(last_path(&transport), "/project/joomla/resource/joomla-platform/stats/");

        let _ = stats
            .get_statistics("joomla", "joomla-platform", Some("en_GB"))
            .await?;
        assert_eq!(
            last_path(&transport),
            "/project/joomla/resource/joomla-platform/stats/en_GB"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_statistics_failure() {
        let (api, transport) = mock_api();
        transport.respond(500, ERROR_BODY);

        assert_generic_error(
            api.statistics()
                .get_statistics("joomla", "joomla-platform", None)
                .await,
        );
    }
}
