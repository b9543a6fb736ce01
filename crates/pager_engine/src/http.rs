use std::marker::PhantomData;
use std::sync::Arc;

use pager_core::{Cursor, FailureKind, FetchError, Page, QueryKey};
use pager_logging::pager_debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{CollectionEndpoint, CredentialProvider, EndpointSettings};

/// JSON collection endpoint in the movie-catalog shape:
/// `{ "page": 1, "results": [...], "total_pages": 500 }`, optionally with a
/// `"next"` continuation token.
pub struct HttpCollection<T> {
    settings: EndpointSettings,
    credentials: Arc<dyn CredentialProvider>,
    client: reqwest::Client,
    _record: PhantomData<fn() -> T>,
}

#[derive(Debug, Deserialize)]
struct PageEnvelope<T> {
    page: Option<u32>,
    results: Vec<T>,
    total_pages: Option<u32>,
    next: Option<String>,
}

impl<T> PageEnvelope<T> {
    fn into_page(self, requested: &Cursor) -> Page<T> {
        let next_cursor = match (self.next, self.page.or_else(|| requested.page_number())) {
            (Some(token), _) if !token.is_empty() => Some(Cursor::Token(token)),
            (_, Some(page)) => page.checked_add(1).and_then(|next| match self.total_pages {
                Some(total) => (next <= total).then_some(Cursor::Page(next)),
                // Without a total, an empty page is the only end marker.
                None => (!self.results.is_empty()).then_some(Cursor::Page(next)),
            }),
            _ => None,
        };
        Page::new(self.results, next_cursor, self.total_pages)
    }
}

impl<T> HttpCollection<T> {
    pub fn new(
        settings: EndpointSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            credentials,
            client,
            _record: PhantomData,
        })
    }

    fn page_url(&self, key: &QueryKey, cursor: &Cursor) -> Result<reqwest::Url, FetchError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let path = key.path.trim_start_matches('/');
        let mut url = reqwest::Url::parse(&format!("{base}/{path}"))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(language) = self.settings.language.as_deref() {
                query.append_pair("language", language);
            }
            if let Some(term) = key.search_term() {
                query.append_pair("query", term);
            }
            match cursor {
                Cursor::Page(page) => query.append_pair("page", &page.to_string()),
                Cursor::Token(token) => query.append_pair("cursor", token),
            };
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl<T> CollectionEndpoint<T> for HttpCollection<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, key: &QueryKey, cursor: &Cursor) -> Result<Page<T>, FetchError> {
        let url = self.page_url(key, cursor)?;
        pager_debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let envelope: PageEnvelope<T> = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        Ok(envelope.into_page(cursor))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(page: Option<u32>, len: usize, total: Option<u32>) -> PageEnvelope<u32> {
        PageEnvelope {
            page,
            results: (0..len as u32).collect(),
            total_pages: total,
            next: None,
        }
    }

    #[test]
    fn next_page_is_bounded_by_total() {
        let page = envelope(Some(2), 20, Some(3)).into_page(&Cursor::Page(2));
        assert_eq!(page.next_cursor, Some(Cursor::Page(3)));

        let page = envelope(Some(3), 20, Some(3)).into_page(&Cursor::Page(3));
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn missing_total_ends_on_empty_page() {
        let page = envelope(None, 4, None).into_page(&Cursor::Page(5));
        assert_eq!(page.next_cursor, Some(Cursor::Page(6)));

        let page = envelope(None, 0, None).into_page(&Cursor::Page(6));
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn token_wins_over_page_numbers() {
        let mut body = envelope(Some(1), 3, Some(10));
        body.next = Some("opaque".to_string());
        let page = body.into_page(&Cursor::Page(1));
        assert_eq!(page.next_cursor, Some(Cursor::Token("opaque".to_string())));
    }

    #[test]
    fn url_carries_language_search_and_cursor() {
        let settings = EndpointSettings {
            base_url: "https://api.example.com/3/".to_string(),
            language: Some("ko-KR".to_string()),
            ..EndpointSettings::default()
        };
        let endpoint: HttpCollection<u32> =
            HttpCollection::new(settings, Arc::new(crate::NoCredentials)).unwrap();

        let key = QueryKey::new("/search/movie").with_search("spirited away");
        let url = endpoint.page_url(&key, &Cursor::Page(2)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/3/search/movie?language=ko-KR&query=spirited+away&page=2"
        );

        let url = endpoint
            .page_url(&QueryKey::new("feed"), &Cursor::Token("t1".into()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/3/feed?language=ko-KR&cursor=t1"
        );
    }
}
