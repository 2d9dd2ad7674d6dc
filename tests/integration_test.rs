use paper_statistics::infrastructure::shutdown;
use paper_statistics::orchestrator::ChannelObserver;
use paper_statistics::{App, Config, RunOptions, RunStatus, Shutdown};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEMPLATES: &str = r#"
[[templates]]
key = "demo"
statistic_id = "demo-statistics"
description = "测试模板"
query = "SELECT ?paper WHERE { ?paper a <http://orkg.org/orkg/class/Paper> }"
"#;

fn bundle(resources: &[&str], literal: &str, predicate: &str) -> serde_json::Value {
    let statements: Vec<_> = resources
        .iter()
        .map(|r| {
            json!({
                "subject": { "id": r, "_class": "resource" },
                "predicate": { "id": predicate },
                "object": { "id": literal, "_class": "literal" }
            })
        })
        .collect();
    json!({ "statements": statements })
}

async fn mount_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            json!({
                "results": { "bindings": [
                    { "paper": { "value": "http://orkg.org/orkg/resource/R1" } },
                    { "paper": { "value": "http://orkg.org/orkg/resource/R2" } }
                ]}
            })
            .to_string(),
            "application/sparql-results+json",
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/statements/R1/bundle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["A", "B"], "L1", "P1")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/statements/R2/bundle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["B", "C"], "L1", "P1")))
        .mount(server)
        .await;
}

fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let templates_file = dir.path().join("templates.toml");
    std::fs::write(&templates_file, TEMPLATES).unwrap();

    Config {
        sparql_endpoint: format!("{}/sparql", server.uri()),
        api_base_url: format!("{}/api", server.uri()),
        store_dir: dir.path().join("store"),
        fetch_max_attempts: 2,
        fetch_base_delay_ms: 5,
        http_timeout_secs: 5,
        templates_file: Some(templates_file),
        verbose_logging: true,
    }
}

#[tokio::test]
async fn test_run_publish_status_purge() {
    let server = MockServer::start().await;
    mount_endpoints(&server).await;
    let dir = TempDir::new().unwrap();

    let app = App::initialize(test_config(&server, &dir), Shutdown::never())
        .await
        .unwrap();
    assert!(app.templates().get("demo").is_ok());
    assert!(app.templates().get("empire").is_ok());

    let (observer, mut events) = ChannelObserver::channel();
    let report = app
        .run_template(
            "demo",
            RunOptions::default().with_observer(Arc::new(observer)),
            true,
        )
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    let stats = report.global_stats;
    assert_eq!(stats.paper_count, 2);
    assert_eq!(stats.total_statements, 4);
    // 每条语句：一个资源主语、一个字面量宾语
    assert_eq!(stats.total_resources, 4);
    assert_eq!(stats.total_literals, 4);
    assert_eq!(stats.total_predicates, 4);
    assert_eq!(stats.global_distinct_resources, 3);
    assert_eq!(stats.global_distinct_literals, 1);
    assert_eq!(stats.global_distinct_predicates, 1);

    let mut last = None;
    while let Ok(event) = events.try_recv() {
        last = Some(event);
    }
    assert_eq!(last.unwrap().status, RunStatus::Completed);

    let progress = app.status("demo").await.unwrap().unwrap();
    assert_eq!(progress.status, RunStatus::Completed);
    assert_eq!(progress.global_stats, Some(stats));

    let published = app.published("demo").await.unwrap().unwrap();
    assert_eq!(published.statistic_id, "demo-statistics");
    assert_eq!(published.global_stats, stats);

    // 第二次运行全部命中缓存，不再请求语句包
    let requests_before = server.received_requests().await.unwrap().len();
    let again = app
        .run_template("demo", RunOptions::default(), false)
        .await
        .unwrap();
    let bundle_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .skip(requests_before)
        .filter(|r| r.url.path().ends_with("/bundle"))
        .count();
    assert_eq!(bundle_requests, 0);
    assert_eq!(again.global_stats, stats);

    app.purge("demo").await.unwrap();
    assert!(app.status("demo").await.unwrap().is_none());
    assert!(app.published("demo").await.unwrap().is_some());
}

#[tokio::test]
async fn test_unknown_template_is_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = App::initialize(test_config(&server, &dir), Shutdown::never())
        .await
        .unwrap();

    assert!(app
        .run_template("missing", RunOptions::default(), true)
        .await
        .is_err());
    assert!(app.status("missing").await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_query_failure_is_not_published() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let app = App::initialize(test_config(&server, &dir), Shutdown::never())
        .await
        .unwrap();

    let report = app
        .run_template("demo", RunOptions::default(), true)
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Failed);
    assert!(report.error.is_some());
    assert!(app.status("demo").await.unwrap().is_none());
    assert!(app.published("demo").await.unwrap().is_none());
}

#[tokio::test]
async fn test_interrupted_run_resumes() {
    let server = MockServer::start().await;
    mount_endpoints(&server).await;
    let dir = TempDir::new().unwrap();

    let (trigger, stop) = shutdown::channel();
    trigger.trigger();
    let interrupted = App::initialize(test_config(&server, &dir), stop)
        .await
        .unwrap()
        .run_template("demo", RunOptions::default(), true)
        .await
        .unwrap();
    assert!(interrupted.interrupted);

    let app = App::initialize(test_config(&server, &dir), Shutdown::never())
        .await
        .unwrap();
    assert_eq!(
        app.status("demo").await.unwrap().unwrap().status,
        RunStatus::Running
    );
    assert!(app.published("demo").await.unwrap().is_none());

    let resumed = app
        .run_template("demo", RunOptions::default(), true)
        .await
        .unwrap();
    assert_eq!(resumed.status, RunStatus::Completed);
    assert_eq!(resumed.global_stats.paper_count, 2);
}
