//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and detail pages and run the full
//! pipeline end-to-end through the HTTP renderer and the CSV sink.

use dredge::config::{load_config, parse_config, Config};
use dredge::crawler::{crawl, Termination};
use dredge::output::{CsvSink, OutputSink};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches requests that do not carry the given query parameter
struct NoQueryParam(&'static str);

impl Match for NoQueryParam {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == self.0)
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, extra: &str) -> Config {
    let content = format!(
        r#"
{extra}

[listing]
start-url = "{base_url}/facilities"
ready-selectors = [".results"]
link-selectors = [".results a.item"]
settle-ms = 0

[detail]
ready-timeout-secs = 1
settle-ms = 0

[politeness]
page-delay-ms = 0
item-delay-ms = 0

[[field]]
name = "Name"
strategies = [{{ css = "h1" }}, {{ css = ".title" }}]

[[field]]
name = "Phone"
strategies = [
    {{ near-label = ["Main Phone"], regex = '\d{{3}}-\d{{3}}-\d{{4}}' }},
    {{ regex = '\d{{3}}-\d{{3}}-\d{{4}}' }},
]

[[field]]
name = "Brochure"
strategies = [{{ css = "a.brochure", attr = "href" }}]
"#
    );
    parse_config(&content).expect("test config should parse")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

fn listing(hrefs: &[&str]) -> ResponseTemplate {
    let anchors: String = hrefs
        .iter()
        .map(|h| format!(r#"<li><a class="item" href="{}">Item</a></li>"#, h))
        .collect();
    html(format!(
        r#"<html><body><ul class="results">{}</ul><a href="/about">About</a></body></html>"#,
        anchors
    ))
}

fn detail(name: &str, phone: &str) -> ResponseTemplate {
    html(format!(
        r#"<html><body>
            <h1>{name}</h1>
            <p>Switchboard 555-000-0000</p>
            <p>Main Phone: {phone}</p>
            <a class="brochure" href="/files/{name}.pdf">Brochure</a>
        </body></html>"#
    ))
}

/// Mounts listing page `page`; page 0 is served without the page parameter
async fn mount_listing(server: &MockServer, page: u32, hrefs: &[&str]) {
    let mock = Mock::given(method("GET")).and(path("/facilities"));
    let mock = if page == 0 {
        mock.and(NoQueryParam("page"))
    } else {
        mock.and(query_param("page", page.to_string()))
    };
    mock.respond_with(listing(hrefs))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_dedups_across_pages() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, 0, &["/facility/a", "/facility/shared"]).await;
    mount_listing(&server, 1, &["/facility/b", "/facility/shared?ref=p1"]).await;
    mount_listing(&server, 2, &[]).await;

    for (slug, phone) in [("a", "555-111-1111"), ("b", "555-222-2222"), ("shared", "555-333-3333")] {
        Mock::given(method("GET"))
            .and(path(format!("/facility/{}", slug)))
            .respond_with(detail(slug, phone))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&base_url, "");
    config.listing.strip_link_query = true;

    let outcome = crawl(config).await.expect("crawl should succeed");

    assert_eq!(outcome.termination, Termination::Exhausted { page: 2 });
    assert_eq!(outcome.pages_visited, 3);
    assert_eq!(outcome.urls_visited, 3);
    assert!(outcome.failures.is_empty());

    let names: Vec<_> = outcome
        .records
        .iter()
        .map(|r| r.get("Name").unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["a", "shared", "b"]);

    // The labelled phone wins over the first phone on the page.
    assert_eq!(outcome.records[0].get("Phone"), Some("555-111-1111"));
    assert_eq!(
        outcome.records[0].get("Brochure"),
        Some("/files/a.pdf")
    );
}

#[tokio::test]
async fn test_failed_detail_is_skipped_and_written_table_is_complete() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, 0, &["/facility/broken", "/facility/ok"]).await;
    mount_listing(&server, 1, &[]).await;

    Mock::given(method("GET"))
        .and(path("/facility/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/facility/ok"))
        .respond_with(html(
            "<html><body><div class=\"title\">Only Title</div></body></html>".to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&base_url, "");
    let columns = config.output_columns();
    let outcome = crawl(config).await.expect("crawl should succeed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].url.ends_with("/facility/broken"));

    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("facilities.csv");
    CsvSink::new(&out)
        .write_records(&columns, &outcome.records)
        .unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content, "Name,Phone,Brochure\nOnly Title,,\n");
}

#[tokio::test]
async fn test_item_limit_stops_before_next_link() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, 0, &["/facility/a", "/facility/b", "/facility/c"]).await;

    for slug in ["a", "b"] {
        Mock::given(method("GET"))
            .and(path(format!("/facility/{}", slug)))
            .respond_with(detail(slug, "555-111-1111"))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/facility/c"))
        .respond_with(detail("c", "555-111-1111"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&base_url, "item-limit = 2");
    let outcome = crawl(config).await.expect("crawl should succeed");

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.termination, Termination::LimitReached { limit: 2 });
}

#[tokio::test]
async fn test_missing_listing_page_ends_crawl() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, 0, &["/facility/a"]).await;
    Mock::given(method("GET"))
        .and(path("/facilities"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/facility/a"))
        .respond_with(detail("a", "555-111-1111"))
        .mount(&server)
        .await;

    let config = create_test_config(&base_url, "");
    let outcome = crawl(config).await.expect("crawl should succeed");

    assert_eq!(outcome.termination, Termination::Exhausted { page: 1 });
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_listing_without_ready_container_is_fetched_once() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, 0, &["/facility/a"]).await;
    Mock::given(method("GET"))
        .and(path("/facilities"))
        .and(query_param("page", "1"))
        .respond_with(html("<html><body><p>No results</p></body></html>".to_string()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/facility/a"))
        .respond_with(detail("a", "555-111-1111"))
        .mount(&server)
        .await;

    let mut config = create_test_config(&base_url, "");
    config.listing.ready_timeout_secs = 2;

    let outcome = crawl(config).await.expect("crawl should succeed");
    assert_eq!(outcome.termination, Termination::Exhausted { page: 1 });

    let page1_fetches = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.query_pairs().any(|(k, v)| k == "page" && v == "1"))
        .count();
    assert_eq!(page1_fetches, 1);
}

#[tokio::test]
async fn test_listing_server_error_keeps_records() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, 0, &["/facility/a"]).await;
    Mock::given(method("GET"))
        .and(path("/facilities"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/facility/a"))
        .respond_with(detail("a", "555-111-1111"))
        .mount(&server)
        .await;

    let config = create_test_config(&base_url, "");
    let outcome = crawl(config).await.expect("crawl should succeed");

    assert!(matches!(
        outcome.termination,
        Termination::ListingFailed { page: 1, .. }
    ));
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_page_cap_stops_traversal() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_listing(&server, 0, &["/facility/a"]).await;
    mount_listing(&server, 1, &["/facility/b"]).await;
    Mock::given(method("GET"))
        .and(path("/facilities"))
        .and(query_param("page", "2"))
        .respond_with(listing(&["/facility/c"]))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/facility/[a-z]+$"))
        .respond_with(detail("x", "555-111-1111"))
        .mount(&server)
        .await;

    let mut config = create_test_config(&base_url, "");
    config.listing.max_pages = 2;
    let outcome = crawl(config).await.expect("crawl should succeed");

    assert_eq!(outcome.termination, Termination::Capped { page: 1 });
    assert_eq!(outcome.records.len(), 2);
}

#[test]
fn test_demo_configs_parse() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");

    let facilities = load_config(&root.join("facility_directory.toml")).unwrap();
    assert_eq!(
        facilities.field_names(),
        vec![
            "Facility Name",
            "Field Office Name",
            "Facility Address",
            "State",
            "Facility Phone Number",
            "Facility Email",
            "Field Office Phone Number",
        ]
    );
    assert_eq!(facilities.listing.link_must_contain.as_deref(), Some("/detention"));

    let template = load_config(&root.join("template.toml")).unwrap();
    assert_eq!(
        template.output_columns(),
        vec!["Title", "Address", "Phone", "Email"]
    );
}
