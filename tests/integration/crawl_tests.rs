//! Integration tests for the crawler
//!
//! These tests use wiremock to serve IPT home pages and resource pages and
//! run the full crawl cycle end-to-end, down to the CSV output.

use ipt_report::config::{Config, HttpConfig, IptEntry, Source};
use ipt_report::crawler::{run_crawl, Coordinator, CountExtractor, Enricher, PartialCounts};
use ipt_report::output::{write_report_to_path, COLUMNS};
use reqwest::Client;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration from (alias, url) pairs
fn create_test_config(ipts: &[(&str, String)]) -> Config {
    Config {
        http: HttpConfig {
            timeout_secs: Some(10),
            connect_timeout_secs: Some(5),
            user_agent: Some("ipt-report-tests".to_string()),
        },
        ipts: ipts
            .iter()
            .map(|(alias, url)| (alias.to_string(), IptEntry { url: url.clone() }))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Renders rows the way an IPT home page does: a single-quoted JS literal,
/// one field per line
fn ipt_home_page(rows: &[Vec<String>]) -> String {
    let literal = rows
        .iter()
        .map(|row| {
            let fields: Vec<String> = row.iter().map(|f| format!("'{}'", f)).collect();
            format!("[{}]", fields.join(",\n"))
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"<html><head><title>IPT</title></head><body>
<table id="rtable"></table>
<script type="text/javascript">
$(document).ready(function() {{
var aDataSet = [
{}
];
$('#rtable').dataTable({{"aaData": aDataSet}});
}});
</script>
</body></html>"#,
        literal
    )
}

/// A home page row; `occurrences` goes into the occurrence cell as is
fn row(name: &str, link: &str, occurrences: &str) -> Vec<String> {
    vec![
        format!(
            r#"<img class="resourceminilogo" src="http://ipt.example.org/logo.do?r={}" />"#,
            name
        ),
        format!(r#"<a href="{}"><if>{}</a>"#, link, name),
        "Not registered".to_string(),
        "Occurrence".to_string(),
        "--".to_string(),
        occurrences.to_string(),
        "2017-08-07".to_string(),
        "2017-08-07".to_string(),
        "--".to_string(),
        "--".to_string(),
        "Public".to_string(),
    ]
}

const RESOURCE_PAGE: &str = r#"<html><body>
<div class="grey_box">
  <ul class="no_bullets">
    <li><span>Event</span> <div class="grey_bar">474</div></li>
    <li><span>MeasurementOrFact</span> <div class="grey_bar">4019</div></li>
    <li><span>Occurrence</span> <div class="grey_bar">4019</div></li>
  </ul>
</div>
</body></html>"#;

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_with_enrichment() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let resource_link = format!("{}/resource?r=bamba", base_url);

    mount_page(
        &mock_server,
        "/goeldi/",
        ipt_home_page(&[
            row("Plain", "http://ipt.example.org/resource?r=plain", "3,537,502"),
            row(
                "Linked",
                &resource_link,
                &format!(r#"<a href="{}">4,000</a>"#, resource_link),
            ),
            row("Broken", "http://ipt.example.org/resource?r=broken", "12 ERROR"),
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/resource"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESOURCE_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&[("goeldi", format!("{}/goeldi/", base_url))]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.len(), 1);
    let outcome = report.get("goeldi").expect("goeldi missing from report");
    assert!(outcome.is_success());
    assert_eq!(outcome.rows_received, 3);
    assert_eq!(outcome.rows_dropped, 1);
    assert_eq!(outcome.resources.len(), 2);

    let plain = &outcome.resources[0];
    assert_eq!(plain.name, "Plain");
    assert_eq!(plain.link, "http://ipt.example.org/resource?r=plain");
    assert_eq!(plain.logo, "http://ipt.example.org/logo.do?r=Plain");
    assert_eq!(plain.occurrences, 3_537_502);
    assert_eq!(plain.events, 0);

    let linked = &outcome.resources[1];
    assert_eq!(linked.name, "Linked");
    assert_eq!(linked.events, 474);
    assert_eq!(linked.measurements, 4019);
    assert_eq!(linked.occurrences, 4019);
}

#[tokio::test]
async fn test_plain_counts_never_fetch_resource_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let resource_link = format!("{}/resource?r=x", base_url);

    mount_page(
        &mock_server,
        "/",
        ipt_home_page(&[
            row("One", &resource_link, "1,000"),
            row("Two", &resource_link, "25"),
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/resource"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESOURCE_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&[("plain", format!("{}/", base_url))]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    let outcome = report.get("plain").unwrap();
    assert_eq!(outcome.resources.len(), 2);
    assert_eq!(outcome.resources[0].occurrences, 1000);
    assert_eq!(outcome.resources[1].occurrences, 25);
}

#[tokio::test]
async fn test_page_without_data_literal_fails_source() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Should error".to_string()).await;

    let url = format!("{}/", base_url);
    let config = create_test_config(&[("empty", url.clone())]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    let outcome = report.get("empty").unwrap();
    assert!(outcome.resources.is_empty());
    assert_eq!(
        outcome.error.as_deref(),
        Some(format!("No json found at {}", url).as_str())
    );
}

#[tokio::test]
async fn test_undecodable_literal_fails_source() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "<script>var aDataSet = [['a', 1], ['b', 2]];</script>".to_string(),
    )
    .await;

    let config = create_test_config(&[("numbers", format!("{}/", base_url))]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    let outcome = report.get("numbers").unwrap();
    assert!(!outcome.is_success());
    assert!(outcome
        .error
        .as_deref()
        .unwrap()
        .starts_with("Failed to decode data table"));
}

#[tokio::test]
async fn test_http_status_is_not_checked() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_string(ipt_home_page(&[row("Stale", "http://x/r", "7")])),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&[("maintenance", format!("{}/", base_url))]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    let outcome = report.get("maintenance").unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.resources[0].occurrences, 7);
}

#[tokio::test]
async fn test_enrichment_failure_drops_only_that_row() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dead_link = "http://127.0.0.1:9/resource?r=gone";

    mount_page(
        &mock_server,
        "/",
        ipt_home_page(&[
            row("Gone", dead_link, &format!(r#"<a href="{}">5</a>"#, dead_link)),
            row("Kept", "http://x/r", "5"),
        ]),
    )
    .await;

    let config = create_test_config(&[("mixed", format!("{}/", base_url))]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    let outcome = report.get("mixed").unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.rows_dropped, 1);
    assert_eq!(outcome.resources.len(), 1);
    assert_eq!(outcome.resources[0].name, "Kept");
}

#[tokio::test]
async fn test_unreadable_counters_keep_home_page_value() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let link = format!("{}/resource?r=odd", base_url);

    mount_page(
        &mock_server,
        "/",
        ipt_home_page(&[row("Odd", &link, &format!(r#"<a href="{}">1,234</a>"#, link))]),
    )
    .await;
    mount_page(
        &mock_server,
        "/resource",
        r#"<ul class="no_bullets">
            <li><span>Occurrence</span> <div class="grey_bar">loading...</div></li>
        </ul>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&[("odd", format!("{}/", base_url))]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    let resource = &report.get("odd").unwrap().resources[0];
    assert_eq!(resource.occurrences, 1234);
    assert_eq!(resource.events, 0);
    assert_eq!(resource.measurements, 0);
}

#[tokio::test]
async fn test_one_outcome_per_source_regardless_of_arrival() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/ok/",
        ipt_home_page(&[row("Only", "http://x/r", "1")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("no table here")
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&[
        ("fails", format!("{}/slow/", base_url)),
        ("succeeds", format!("{}/ok/", base_url)),
        ("", "not crawled".to_string()),
    ]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.len(), 2);
    assert_eq!(report.get("succeeds").unwrap().resources.len(), 1);
    assert!(report.get("fails").unwrap().error.is_some());
    assert!(report.get("").is_none());
}

#[tokio::test]
async fn test_many_sources_each_reported_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/ok/",
        ipt_home_page(&[row("Only", "http://x/r", "1")]),
    )
    .await;

    let sources: Vec<Source> = (0..20)
        .map(|i| Source {
            alias: format!("ipt-{}", i),
            url: if i % 3 == 0 {
                "http://127.0.0.1:9/".to_string()
            } else {
                format!("{}/ok/", base_url)
            },
        })
        .collect();

    let coordinator = Coordinator::with_client(sources.clone(), Client::new());
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.len(), sources.len());
    let reported: BTreeSet<&str> = report.iter().map(|o| o.alias.as_str()).collect();
    let expected: BTreeSet<&str> = sources.iter().map(|s| s.alias.as_str()).collect();
    assert_eq!(reported, expected);
    assert_eq!(report.iter().filter(|o| !o.is_success()).count(), 7);
}

/// Reads only the occurrence count, from a `data-occurrences` attribute
struct OccurrenceAttribute;

impl CountExtractor for OccurrenceAttribute {
    fn extract_counts(&self, html: &str) -> PartialCounts {
        let occurrences = html
            .split("data-occurrences=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .and_then(|value| value.parse().ok());
        PartialCounts {
            occurrences,
            ..PartialCounts::default()
        }
    }
}

#[tokio::test]
async fn test_coordinator_uses_custom_enricher() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let resource_link = format!("{}/resource?r=custom", base_url);

    mount_page(
        &mock_server,
        "/home/",
        ipt_home_page(&[row(
            "Custom",
            &resource_link,
            &format!(r#"<a href="{}">4,000</a>"#, resource_link),
        )]),
    )
    .await;
    mount_page(
        &mock_server,
        "/resource",
        r#"<html><body><div data-occurrences="4123"></div></body></html>"#.to_string(),
    )
    .await;

    let client = Client::new();
    let coordinator = Coordinator::with_client(
        vec![Source {
            alias: "custom".to_string(),
            url: format!("{}/home/", base_url),
        }],
        client.clone(),
    )
    .with_enricher(Enricher::with_extractor(client, Arc::new(OccurrenceAttribute)));

    let report = coordinator.run().await.expect("Crawl failed");
    let resources = &report.get("custom").unwrap().resources;
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].occurrences, 4123);
    assert_eq!(resources[0].events, 0);
}

#[tokio::test]
async fn test_report_csv_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/ok/",
        ipt_home_page(&[row("Only", "http://x/r", "3,537,502")]),
    )
    .await;
    mount_page(&mock_server, "/down/", "maintenance".to_string()).await;

    let down_url = format!("{}/down/", base_url);
    let config = create_test_config(&[
        ("down", down_url.clone()),
        ("up", format!("{}/ok/", base_url)),
    ]);
    let report = run_crawl(&config).await.expect("Crawl failed");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("report.csv");
    write_report_to_path(&report, &csv_path).expect("Failed to write report");

    let mut reader = csv::Reader::from_path(&csv_path).expect("Failed to open report");
    let headers: Vec<String> = reader
        .headers()
        .expect("Missing header")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, COLUMNS);

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("Malformed CSV");
    assert_eq!(records.len(), 2);

    let down = records.iter().find(|r| &r[0] == "down").unwrap();
    assert_eq!(&down[15], format!("No json found at {}", down_url));
    assert!((1..15).all(|i| down[i].is_empty()));

    let up = records.iter().find(|r| &r[0] == "up").unwrap();
    assert_eq!(&up[1], "Only");
    assert_eq!(&up[9], "3537502");
    assert_eq!(&up[10], "2017-08-07 00:00:00 +0000 UTC");
    assert_eq!(&up[12], "");
    assert_eq!(&up[15], "");
}
