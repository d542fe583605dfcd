//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the real
//! reqwest fetcher and scraper extractor end-to-end.

use site_gleaner::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use site_gleaner::crawler::{crawl, CrawlController, HtmlExtractor, HttpFetcher};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given seeds
fn create_test_config(sites: Vec<String>, output_path: &str) -> Config {
    Config {
        sites,
        crawler: CrawlerConfig {
            max_depth: 2,
            max_pages_per_site: 20,
            max_threads: 5,
            request_delay: 0,
            request_timeout: 2_000,
            parallel_sites: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        output: OutputConfig {
            path: output_path.to_string(),
            summary_path: None,
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn run_controller(seed: &str, crawler: CrawlerConfig) -> site_gleaner::crawler::SiteCrawl {
    let ua = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: None,
    };
    let fetcher = HttpFetcher::from_config(&ua).expect("Failed to build client");

    CrawlController::new(seed, crawler, Arc::new(fetcher), Arc::new(HtmlExtractor))
        .run()
        .await
}

#[tokio::test]
async fn test_full_crawl_writes_document() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/", base_url);

    mount_page(
        &mock_server,
        "/",
        r#"<h1>Hello</h1><a href="/a">A</a> <a href="/b">B</a>
        <a href="https://elsewhere.test/x">away</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "<p>Page A</p><img alt=\"A chart\">").await;
    mount_page(&mock_server, "/b", "<p>Page B</p><script>var x = 1;</script>").await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = dir.path().join("api").join("index.json");
    let config = create_test_config(vec![seed.clone()], output_path.to_str().unwrap());

    let run = crawl(config).await.expect("Crawl failed");
    assert_eq!(run.statistics.total_pages(), 3);
    assert_eq!(run.statistics.total_failed(), 0);

    let raw = std::fs::read_to_string(&output_path).expect("Output not written");
    let document: serde_json::Value = serde_json::from_str(&raw).expect("Invalid JSON");
    let site = &document["website_info"][&seed];

    assert_eq!(site.as_object().unwrap().len(), 3);
    assert_eq!(site[&seed], "Hello A B away");
    assert_eq!(
        site[format!("{}/a", base_url)],
        "Page A Image description: A chart"
    );
    assert_eq!(site[format!("{}/b", base_url)], "Page B");
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/level1">next</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">next</a>"#).await;
    mount_page(&mock_server, "/level2", r#"<a href="/level3">next</a>"#).await;

    // Depth 3 must never be requested
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html("too deep"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawl = run_controller(
        &format!("{}/", base_url),
        create_test_config(vec![], "unused").crawler,
    )
    .await;

    assert_eq!(crawl.pages.len(), 3);
    assert_eq!(crawl.report.max_depth_reached, 2);
    assert!(!crawl.pages.contains(&format!("{}/level3", base_url)));
}

#[tokio::test]
async fn test_page_budget_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 0..10 {
        mount_page(&mock_server, &format!("/p{}", i), &format!("<p>page {}</p>", i)).await;
    }

    let crawler = CrawlerConfig {
        max_pages_per_site: 4,
        ..create_test_config(vec![], "unused").crawler
    };
    let crawl = run_controller(&format!("{}/", base_url), crawler).await;

    assert_eq!(crawl.pages.len(), 4);
    for i in 0..3 {
        assert!(crawl.pages.contains(&format!("{}/p{}", base_url, i)));
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_server_error_becomes_placeholder() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<p>Home</p><a href="/broken">broken</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawl = run_controller(
        &format!("{}/", base_url),
        create_test_config(vec![], "unused").crawler,
    )
    .await;

    let broken = format!("{}/broken", base_url);
    assert_eq!(crawl.pages.len(), 2);
    assert_eq!(crawl.report.pages_failed, 1);
    assert_eq!(
        crawl.pages.text(&broken),
        Some(format!("[Error: Could not retrieve content from {}]", broken))
    );
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("late").set_delay(std::time::Duration::from_millis(1_500)))
        .mount(&mock_server)
        .await;

    let crawler = CrawlerConfig {
        request_timeout: 200,
        ..create_test_config(vec![], "unused").crawler
    };
    let seed = format!("{}/", base_url);
    let crawl = run_controller(&seed, crawler).await;

    let record = crawl.pages.get(&seed).expect("Seed not recorded");
    assert_eq!(record.content.reason(), Some("request timed out"));
}

#[tokio::test]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html("<p>Welcome</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let crawl = run_controller(&seed, create_test_config(vec![], "unused").crawler).await;

    assert_eq!(crawl.pages.text(&seed).as_deref(), Some("Welcome"));
}

#[tokio::test]
async fn test_multiple_sites_in_one_document() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    mount_page(&first, "/", "<p>First</p>").await;
    mount_page(&second, "/", "<p>Second</p>").await;

    let first_seed = format!("{}/", first.uri());
    let second_seed = format!("{}/", second.uri());

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = dir.path().join("index.json");
    let mut config = create_test_config(
        vec![second_seed.clone(), first_seed.clone()],
        output_path.to_str().unwrap(),
    );
    config.crawler.parallel_sites = true;

    let run = crawl(config).await.expect("Crawl failed");

    let order: Vec<&str> = run.output.sites().map(|(site, _)| site).collect();
    assert_eq!(order, vec![second_seed.as_str(), first_seed.as_str()]);

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(document["website_info"][&first_seed][&first_seed], "First");
    assert_eq!(document["website_info"][&second_seed][&second_seed], "Second");
}
