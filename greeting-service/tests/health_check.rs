mod common;

use common::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "greeting-service-test");
}

#[tokio::test]
async fn readiness_check_works() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/ready")).send().await.unwrap();

    assert!(response.status().is_success());
}

async fn scrape(app: &common::TestApp) -> String {
    app.client
        .get(app.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

/// Value of an unlabelled sample in Prometheus text output.
fn sample(body: &str, name: &str) -> f64 {
    body.lines()
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(' '))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_else(|| panic!("{} missing from metrics:\n{}", name, body))
}

#[tokio::test]
async fn metrics_count_served_greetings() {
    let app = spawn_app().await;

    let before = sample(&scrape(&app).await, "greeting_served_total");
    for _ in 0..3 {
        app.client.get(app.url("/api/hello")).send().await.unwrap();
    }
    let after = sample(&scrape(&app).await, "greeting_served_total");

    assert!(after >= before + 3.0, "before {} after {}", before, after);
}

#[tokio::test]
async fn metrics_include_http_request_counter() {
    let app = spawn_app().await;

    for _ in 0..3 {
        app.client.get(app.url("/api/hello")).send().await.unwrap();
    }
    let body = scrape(&app).await;

    assert!(
        body.lines().any(|line| line.starts_with("http_requests_total{")
            && line.contains("path=\"/api/hello\"")
            && line.contains("status=\"200\"")),
        "{}",
        body
    );
    assert!(body.contains("http_request_duration_seconds"));
}
