//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve a search-results page and product pages
//! and run the full discover / extract / drain cycle against them.

use product_harvest::config::Config;
use product_harvest::crawler::{Pipeline, PipelineState, ProductRecord};
use product_harvest::output::CsvSink;
use product_harvest::HarvestError;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_USER_AGENT: &str = "HarvestTest/1.0";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.crawler.site_origin = base_url.to_string();
    config.crawler.default_seed_url = format!("{}/s?k=ear+buds", base_url);
    config.crawler.launch_delay_ms = 1;
    config.crawler.max_concurrent_extractors = 4;
    config.crawler.request_timeout_secs = 5;
    config.headers.user_agents = vec![TEST_USER_AGENT.to_string()];
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// Search-results page with one listing thumbnail per href
fn search_page(hrefs: &[&str]) -> String {
    let listings: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="s-product-image-container"><a class="a-link-normal" href="{}"><img src="thumb.jpg"></a></div>"#,
                href
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", listings)
}

/// Product page using the default selectors
fn product_page(name: &str, price: &str, rating: &str, total: &str, image: &str) -> String {
    format!(
        r#"<html><body>
        <h1 id="title"><span id="productTitle">
            {name}
        </span></h1>
        <div class="imgTagWrapper"><img src="{image}"></div>
        <div class="a-section a-spacing-none aok-align-center aok-relative">
            <span class="a-price-whole">{price}</span>
        </div>
        <div id="averageCustomerReviews_feature_div"><div id="averageCustomerReviews">
            <span id="acrPopover"><a class="a-popover-trigger a-declarative">
                <span class="a-size-base a-color-base">{rating}</span>
            </a></span>
            <a id="acrCustomerReviewLink">{total}</a>
        </div></div>
        </body></html>"#
    )
}

async fn mount_search(server: &MockServer, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(html(search_page(hrefs)))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_product(server: &MockServer, product_path: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(product_path))
        .respond_with(html(body))
        .expect(times)
        .mount(server)
        .await;
}

fn names(records: &[ProductRecord]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.name().to_string()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_harvest_writes_csv() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search(&mock_server, &["/dp/1", "/dp/2", "/dp/3", "/dp/4"]).await;
    mount_product(
        &mock_server,
        "/dp/1",
        product_page("Airdopes 141", "1,299", "4.1", "12,345 ratings", "https://img.test/1.jpg"),
        1,
    )
    .await;
    // Captcha page: nothing matches, record is dropped
    mount_product(
        &mock_server,
        "/dp/2",
        "<html><body><p>Type the characters you see</p></body></html>".to_string(),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/dp/3"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_product(
        &mock_server,
        "/dp/4",
        r#"<div class="a-section a-spacing-none aok-align-center aok-relative"><span class="a-price-whole">2,499</span></div>"#.to_string(),
        1,
    )
    .await;

    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("output").join("products.csv");

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to build pipeline");
    let mut sink = CsvSink::new(&csv_path);
    let report = pipeline
        .run(&format!("{}/s?k=ear+buds", base_url), &mut sink)
        .await
        .expect("Harvest failed");

    assert_eq!(pipeline.state(), PipelineState::Draining);
    assert_eq!(report.links_discovered, 4);
    assert_eq!(report.tasks_launched, 4);
    assert_eq!(report.tasks_completed, 4);
    assert_eq!(report.records_collected, 2);
    assert_eq!(report.records_dropped, 1);
    assert_eq!(report.pages_failed, 1);

    let content = std::fs::read_to_string(&csv_path).expect("CSV not written");
    let mut lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Product Name,Product Price,Product Rating,Product Total Ratings,Product Image"
    );

    // Row order follows completion order.
    lines.remove(0);
    lines.sort();
    assert_eq!(
        lines,
        vec![
            ",2499,,,",
            "Airdopes 141,1299,4.1,12345,https://img.test/1.jpg"
        ]
    );
}

#[tokio::test]
async fn test_request_headers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(header("accept-language", "en-US;q=0.9"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(html(search_page(&["/dp/1"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dp/1"))
        .and(header("accept-language", "en-US;q=0.9"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(html(product_page("Lamp", "899", "4.0", "3 ratings", "x.jpg")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).unwrap();
    let (records, _) = pipeline.collect(&format!("{}/s", base_url)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "Lamp");
    assert_eq!(records[0].total_ratings(), "3");
}

#[tokio::test]
async fn test_empty_seed_uses_default() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search(&mock_server, &[]).await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).unwrap();
    let (records, report) = pipeline.collect("").await;

    assert!(records.is_empty());
    assert_eq!(report.seed_url, format!("{}/s?k=ear+buds", base_url));
    assert_eq!(report.links_discovered, 0);
    assert_eq!(report.tasks_launched, 0);
}

#[tokio::test]
async fn test_seed_failure_yields_empty_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).unwrap();
    let mut sink: Vec<ProductRecord> = Vec::new();
    let report = pipeline
        .run(&format!("{}/s", base_url), &mut sink)
        .await
        .expect("Seed failure must not fail the run");

    assert!(sink.is_empty());
    assert_eq!(report.links_discovered, 0);
    assert_eq!(report.tasks_completed, 0);
}

#[tokio::test]
async fn test_duplicate_links_are_each_visited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search(&mock_server, &["/dp/7", "/dp/7", "/dp/7"]).await;
    mount_product(
        &mock_server,
        "/dp/7",
        product_page("Speaker", "3,999", "4.4", "210 ratings", "s.jpg"),
        3,
    )
    .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).unwrap();
    let (records, report) = pipeline.collect(&format!("{}/s", base_url)).await;

    assert_eq!(report.tasks_launched, 3);
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.price() == "3999"));
}

#[tokio::test]
async fn test_single_worker_completes_every_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let hrefs: Vec<String> = (0..12).map(|i| format!("/dp/{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_search(&mock_server, &href_refs).await;

    for (i, href) in hrefs.iter().enumerate() {
        mount_product(
            &mock_server,
            href,
            product_page(&format!("Item {:02}", i), "100", "3.0", "1 ratings", "i.jpg"),
            1,
        )
        .await;
    }

    let mut config = create_test_config(&base_url);
    config.crawler.max_concurrent_extractors = 1;
    config.crawler.launch_delay_ms = 0;

    let mut pipeline = Pipeline::new(&config).unwrap();
    let (records, report) = pipeline.collect(&format!("{}/s", base_url)).await;

    assert_eq!(report.tasks_launched, 12);
    assert_eq!(report.tasks_completed, 12);
    let expected: Vec<String> = (0..12).map(|i| format!("Item {:02}", i)).collect();
    assert_eq!(names(&records), expected);
}

#[tokio::test]
async fn test_worker_limit_caps_in_flight_extractors() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let hrefs: Vec<String> = (0..6).map(|i| format!("/dp/slow{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_search(&mock_server, &href_refs).await;

    for (i, href) in hrefs.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(href.as_str()))
            .respond_with(
                html(product_page(&format!("Slow {}", i), "100", "3.0", "1 ratings", "s.jpg"))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(&base_url);
    config.crawler.max_concurrent_extractors = 2;
    config.crawler.launch_delay_ms = 0;

    let mut pipeline = Pipeline::new(&config).unwrap();
    let start = Instant::now();
    let (records, report) = pipeline.collect(&format!("{}/s", base_url)).await;
    let elapsed = start.elapsed();

    // Two workers over six 300 ms pages need at least three rounds.
    assert!(
        elapsed >= Duration::from_millis(900),
        "finished in {:?}, more than two pages were in flight",
        elapsed
    );
    assert_eq!(report.tasks_launched, 6);
    assert_eq!(report.tasks_completed, 6);
    assert_eq!(records.len(), 6);
}

#[tokio::test]
async fn test_redirect_within_depth_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search(&mock_server, &["/dp/old"]).await;
    Mock::given(method("GET"))
        .and(path("/dp/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/dp/new"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_product(
        &mock_server,
        "/dp/new",
        product_page("Moved Product", "50", "", "", ""),
        1,
    )
    .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).unwrap();
    let (records, _) = pipeline.collect(&format!("{}/s", base_url)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "Moved Product");
}

#[tokio::test]
async fn test_redirect_beyond_depth_fails_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search(&mock_server, &["/dp/loop"]).await;
    // Redirects to itself forever
    Mock::given(method("GET"))
        .and(path("/dp/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/dp/loop"))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.crawler.max_depth = 2;

    let mut pipeline = Pipeline::new(&config).unwrap();
    let (records, report) = pipeline.collect(&format!("{}/s", base_url)).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_failed, 1);

    // Original request plus two followed redirects
    let requests = mock_server.received_requests().await.unwrap();
    let loop_hits = requests
        .iter()
        .filter(|r| r.url.path() == "/dp/loop")
        .count();
    assert_eq!(loop_hits, 3);
}

#[tokio::test]
async fn test_off_domain_links_are_not_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search(
        &mock_server,
        &["https://elsewhere.example.org/dp/1", "/dp/2"],
    )
    .await;
    mount_product(
        &mock_server,
        "/dp/2",
        product_page("Local", "10", "1.0", "", ""),
        1,
    )
    .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).unwrap();
    let (records, report) = pipeline.collect(&format!("{}/s", base_url)).await;

    assert_eq!(report.tasks_launched, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(names(&records), vec!["Local".to_string()]);
}

#[tokio::test]
async fn test_unwritable_output_is_reported() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search(&mock_server, &[]).await;

    let dir = tempfile::TempDir::new().unwrap();
    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).unwrap();
    // A directory cannot be replaced by the CSV file
    let mut sink = CsvSink::new(dir.path());

    let result = pipeline.run(&format!("{}/s", base_url), &mut sink).await;
    assert!(matches!(result, Err(HarvestError::Output(_))));
}
