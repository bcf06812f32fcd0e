// Pi-hole HTTP API client
use crate::application::stats_api::StatsApi;
use crate::infrastructure::config::PiholeSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PiholeClient {
    api_url: String,
    api_key: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl PiholeClient {
    pub fn new(api_url: String, api_key: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_url,
            api_key: api_key.trim_end().to_string(),
            timeout,
            client,
        })
    }

    pub fn from_settings(settings: &PiholeSettings) -> Result<Self> {
        Self::new(
            settings.api_url.clone(),
            settings.api_key.clone(),
            settings.timeout_secs.map(Duration::from_secs),
        )
    }

    /// URL without credentials, safe to log
    fn display_url(&self, query: &str) -> String {
        format!("{}?{}", self.api_url, query)
    }

    fn build_query_url(&self, query: &str) -> String {
        format!(
            "{}&auth={}",
            self.display_url(query),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl StatsApi for PiholeClient {
    async fn get_raw(&self, query: &str) -> Result<String> {
        tracing::debug!("API request: {}", self.display_url(query));

        let response = self
            .client
            .get(self.build_query_url(query))
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| match self.timeout {
                Some(timeout) => format!("Failed to send request to Pi-hole (timeout {:?})", timeout),
                None => "Failed to send request to Pi-hole".to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Pi-hole query {} failed with status {}: {}", query, status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read Pi-hole response")?;

        tracing::debug!("API response: {}", body);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_url() {
        let client = PiholeClient::new(
            "http://pi.hole/admin/api.php".to_string(),
            "abc 123\n".to_string(),
            None,
        )
        .unwrap();

        assert_eq!(
            client.build_query_url("summaryRaw"),
            "http://pi.hole/admin/api.php?summaryRaw&auth=abc%20123"
        );
        assert_eq!(
            client.display_url("status"),
            "http://pi.hole/admin/api.php?status"
        );
    }

    #[test]
    fn test_from_settings_applies_timeout() {
        let settings = PiholeSettings {
            api_url: "http://pi.hole/admin/api.php".to_string(),
            api_key: "key\n".to_string(),
            api_key_file: "api-key.txt".into(),
            timeout_secs: Some(5),
        };
        let client = PiholeClient::from_settings(&settings).unwrap();
        assert_eq!(client.timeout, Some(Duration::from_secs(5)));
        assert_eq!(client.api_key, "key");

        let settings = PiholeSettings {
            timeout_secs: None,
            ..settings
        };
        assert_eq!(PiholeClient::from_settings(&settings).unwrap().timeout, None);
    }
}
