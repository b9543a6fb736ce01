use std::time::Duration;

use pager_core::{Cursor, FetchError, Page, QueryKey};

#[derive(Debug, Clone)]
pub struct EndpointSettings {
    pub base_url: String,
    /// Sent as `language=` when set.
    pub language: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            language: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// A remote collection that can be read one page at a time.
#[async_trait::async_trait]
pub trait CollectionEndpoint<T>: Send + Sync {
    async fn fetch(&self, key: &QueryKey, cursor: &Cursor) -> Result<Page<T>, FetchError>;
}
