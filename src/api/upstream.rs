//! Upstream Client
//!
//! Thin wrapper over `reqwest::Client` that issues plain GETs to the
//! configured upstream origin.

use reqwest::{Client, Response};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client for `base_url` (scheme and host, no trailing slash).
    ///
    /// No request timeout is configured; transport defaults apply.
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, target: &str) -> String {
        format!("{}{}", self.base_url, target)
    }

    /// GETs `target` (path and query) from upstream.
    ///
    /// Any HTTP status is a successful fetch; only transport failures error.
    pub async fn fetch(&self, target: &str) -> Result<Response> {
        let url = self.url_for(target);
        debug!(%url, "fetching from upstream");
        Ok(self.client.get(url).send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_base_and_target() {
        let upstream = UpstreamClient::new("https://gis.example.com/").unwrap();
        assert_eq!(
            upstream.url_for("/arcgis/rest/services/Plow/tile/1/2/3?f=png"),
            "https://gis.example.com/arcgis/rest/services/Plow/tile/1/2/3?f=png"
        );
    }
}
