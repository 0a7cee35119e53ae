//! Failure injection tests: unreachable backends and error passthrough.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_unreachable_backend_is_502() {
    let cdn = common::start_mock_backend(200, "cdn").await;
    let dead_api = common::closed_addr().await;
    let (proxy_addr, shutdown) =
        common::start_proxy(&cdn.url(), &format!("http://{}", dead_api), "").await;

    let client = common::client();
    let res = client
        .get(format!("http://{}/v1/import", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(cdn.hits(), 0, "No fallback to the other backend");

    // The healthy backend keeps working.
    let res = client
        .get(format!("http://{}/v1/projects", proxy_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(cdn.hits(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_backend_errors_pass_through() {
    let cdn = common::start_mock_backend(503, "cdn overloaded").await;
    let api = common::start_mock_backend(400, "bad batch").await;
    let (proxy_addr, shutdown) = common::start_proxy(&cdn.url(), &api.url(), "").await;

    let client = common::client();

    let res = client
        .get(format!("http://{}/analytics.js/v1", proxy_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.text().await.unwrap(), "cdn overloaded");

    let res = client
        .post(format!("http://{}/v1/import", proxy_addr))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "bad batch");

    // Passed through once each, never retried.
    assert_eq!(cdn.hits(), 1);
    assert_eq!(api.hits(), 1);

    shutdown.trigger();
}
