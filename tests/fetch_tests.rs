// Transport-level tests for the retrying fetch client and the live Amazon
// connectors, backed by a local wiremock server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dealscout::config::FetcherConfig;
use dealscout::fetch::FetchClient;
use dealscout::models::Currency;
use dealscout::sites::{AmazonUsConnector, SiteConnector};

fn fast_config() -> FetcherConfig {
    FetcherConfig {
        request_timeout: 5,
        max_retries: 3,
        // Zero backoff keeps the retry tests fast.
        retry_base_secs: 0,
        user_agents: vec!["TestAgent/1.0".to_string()],
    }
}

fn html_response(body: &str) -> ResponseTemplate {
    // set_body_raw, not insert_header + set_body_string: wiremock's
    // set_body_string overwrites the content-type header with text/plain.
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_fetch_succeeds_first_try() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html_response("<html><body>ok</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(fast_config()).unwrap();
    let body = client.fetch_html(&format!("{}/page", server.uri())).await.unwrap();
    assert!(body.contains("ok"));
}

#[tokio::test]
async fn test_fetch_retries_after_server_error() {
    let server = MockServer::start().await;
    // First attempt gets a 503, the retry gets the page.
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html_response("<html><body>recovered</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(fast_config()).unwrap();
    let body = client.fetch_html(&format!("{}/page", server.uri())).await.unwrap();
    assert!(body.contains("recovered"));
}

#[tokio::test]
async fn test_fetch_retries_non_html_response_then_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("{}"),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = FetchClient::new(fast_config()).unwrap();
    let result = client.fetch_html(&format!("{}/page", server.uri())).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_fetch_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = FetchClient::new(fast_config()).unwrap();
    let result = client.fetch_html(&format!("{}/page", server.uri())).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_fetch_sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(wiremock::matchers::header("user-agent", "TestAgent/1.0"))
        .and(wiremock::matchers::header_exists("accept-language"))
        .respond_with(html_response("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(fast_config()).unwrap();
    client.fetch_html(&format!("{}/page", server.uri())).await.unwrap();
}

#[tokio::test]
async fn test_amazon_connector_end_to_end_against_mock() {
    let page = r#"
        <html><body>
            <div class="s-result-item" data-component-type="s-search-result">
                <h2><a href="/dp/B0IPHONE16"><span>Apple iPhone 16 Pro 128GB</span></a></h2>
                <span class="a-price"><span class="a-offscreen">$999.00</span></span>
            </div>
        </body></html>
    "#;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "iPhone 16 Pro, 128GB"))
        .respond_with(html_response(page))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = FetchClient::new(fast_config()).unwrap();
    let connector = AmazonUsConnector::with_base_url(fetcher, server.uri());

    let listings = connector.search("iPhone 16 Pro, 128GB").await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "Apple iPhone 16 Pro 128GB");
    assert_eq!(listings[0].price, "999.00");
    assert_eq!(listings[0].currency, Currency::Usd);
    assert_eq!(listings[0].url, format!("{}/dp/B0IPHONE16", server.uri()));
}

#[tokio::test]
async fn test_amazon_connector_blocked_page_errors() {
    let server = MockServer::start().await;
    // Bot walls answer with a non-success status; the connector surfaces
    // the exhausted fetch as an error for the aggregator to absorb.
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = FetchClient::new(fast_config()).unwrap();
    let connector = AmazonUsConnector::with_base_url(fetcher, server.uri());

    assert!(connector.search("anything").await.is_err());
}
