#![cfg(feature = "web")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use navstack::SessionStore;
use navstack::app::{AppState, SESSION_COOKIE, router};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<AppState>) {
    app_with_store(SessionStore::default())
}

fn app_with_store(sessions: SessionStore) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState { sessions });
    (router(state.clone()), state)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form_request(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn session_cookie(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("new session sets a cookie")
        .to_str()
        .unwrap();
    let pair = set_cookie.split(';').next().unwrap();
    assert!(pair.starts_with(SESSION_COOKIE));
    pair.to_string()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn start_add_back_flow() {
    let (app, state) = test_app();

    let response = app
        .clone()
        .oneshot(form_request(
            "/nav/start",
            None,
            "url=https%3A%2F%2Fx%2Fa&text=Home&icon=fa-home",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert_eq!(state.sessions.len(), 1);

    let response = app
        .clone()
        .oneshot(form_request("/nav/add", Some(&cookie), "url=https%3A%2F%2Fx%2Fb&text=Detail"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["count"], 2);

    let response = app
        .clone()
        .oneshot(form_request("/nav/add", Some(&cookie), "url=https%3A%2F%2Fx%2Fb&text=Detail"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["changed"], false);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/nav/previous", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "https://x/a");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/nav", &cookie))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["entries"][0]["icon"], "fa-home");
    assert_eq!(body["entries"][1]["url"], "https://x/b");

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/nav/back", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "https://x/a");

    let response = app
        .oneshot(empty_request("GET", "/nav/entry/1", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.sessions.len(), 1);
}

#[tokio::test]
async fn invalid_url_is_a_bad_request() {
    let (app, _) = test_app();

    let response = app
        .oneshot(form_request("/nav/add", None, "url=https%3A%2F%2Fx%2F%3Cscript%3E"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("https://x/<script>"));
}

#[tokio::test]
async fn empty_stack_conflicts_and_clear_empties() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(form_request("/nav/start", None, "url=%2Flist.php"))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/nav/current", &cookie))
        .await
        .unwrap();
    assert_eq!(location(&response), "/list.php");

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/nav/clear", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", "/nav/current", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_cookie_gets_a_fresh_session() {
    let (app, state) = test_app();

    let response = app
        .oneshot(empty_request("GET", "/nav", "nav_session=not-a-session"))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    assert_ne!(cookie, "nav_session=not-a-session");
    assert_eq!(json_body(response).await["count"], 0);
    assert_eq!(state.sessions.len(), 1);
}

#[tokio::test]
async fn cookieless_clients_do_not_pile_up_sessions() {
    let (app, state) = app_with_store(SessionStore::new(Duration::from_millis(1)));

    for _ in 0..200 {
        let response = app.clone().oneshot(get_request("/nav")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    tokio::time::sleep(Duration::from_millis(20)).await;
    app.oneshot(get_request("/nav")).await.unwrap();

    assert_eq!(state.sessions.len(), 1);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let (app, state) = test_app();

    let response = app
        .clone()
        .oneshot(get_request("/nav/entry/-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert!(!body["message"].as_str().unwrap().is_empty());

    let response = app
        .oneshot(form_request("/nav/add", None, "text=No+url"))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");

    // rejected before a session is opened
    assert!(state.sessions.is_empty());
}
