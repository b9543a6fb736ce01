use std::sync::Arc;
use std::time::Duration;

use pager_core::{Cursor, FailureKind, QueryKey};
use pager_engine::{
    CollectionEndpoint, CredentialProvider, EndpointSettings, HttpCollection, NoCredentials,
    StaticToken,
};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Movie {
    id: u64,
    title: String,
}

fn collection(
    server: &MockServer,
    credentials: Arc<dyn CredentialProvider>,
) -> HttpCollection<Movie> {
    let settings = EndpointSettings {
        base_url: server.uri(),
        ..EndpointSettings::default()
    };
    HttpCollection::new(settings, credentials).expect("client")
}

#[tokio::test]
async fn fetches_page_and_derives_next_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                { "id": 550, "title": "Fight Club" },
                { "id": 13, "title": "Forrest Gump", "vote_average": 8.5 }
            ],
            "total_pages": 3,
            "total_results": 42
        })))
        .mount(&server)
        .await;

    let endpoint = collection(&server, Arc::new(NoCredentials));
    let page = endpoint
        .fetch(&QueryKey::new("movie/popular"), &Cursor::first())
        .await
        .expect("fetch ok");

    assert_eq!(
        page.items,
        vec![
            Movie {
                id: 550,
                title: "Fight Club".to_string()
            },
            Movie {
                id: 13,
                title: "Forrest Gump".to_string()
            },
        ]
    );
    assert_eq!(page.next_cursor, Some(Cursor::Page(2)));
    assert_eq!(page.total_pages, Some(3));
}

#[tokio::test]
async fn last_page_has_no_next_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "dune"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [{ "id": 438631, "title": "Dune" }],
            "total_pages": 2
        })))
        .mount(&server)
        .await;

    let endpoint = collection(&server, Arc::new(NoCredentials));
    let key = QueryKey::new("search/movie").with_search("dune");
    let page = endpoint.fetch(&key, &Cursor::Page(2)).await.expect("fetch ok");

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn injected_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/todos"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = collection(&server, Arc::new(StaticToken::new("s3cret")));
    let page = endpoint
        .fetch(&QueryKey::new("user/todos"), &Cursor::first())
        .await
        .expect("fetch ok");

    assert!(page.items.is_empty());
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn server_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let endpoint = collection(&server, Arc::new(NoCredentials));
    let err = endpoint
        .fetch(&QueryKey::new("movie/popular"), &Cursor::first())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(401));
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let endpoint = collection(&server, Arc::new(NoCredentials));
    let err = endpoint
        .fetch(&QueryKey::new("movie/popular"), &Cursor::first())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "page": 1, "results": [], "total_pages": 1 })),
        )
        .mount(&server)
        .await;

    let settings = EndpointSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..EndpointSettings::default()
    };
    let endpoint: HttpCollection<Movie> =
        HttpCollection::new(settings, Arc::new(NoCredentials)).expect("client");
    let err = endpoint
        .fetch(&QueryKey::new("movie/popular"), &Cursor::first())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}
