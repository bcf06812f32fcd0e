// Trait for raw Pi-hole API access
use async_trait::async_trait;

#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Run one API query (`status`, `summaryRaw`, ...) and return the raw body
    async fn get_raw(&self, query: &str) -> anyhow::Result<String>;
}
