#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use commitday::{Analyzer, Args, Config};
use clap::Parser;

pub const API_KEY: &str = "sk-test";
pub const TAGLINE: &str = "You are a midweek machine! Wednesday is when the magic happens.";

/// Counts {Mon:5, Tue:0, Wed:12, Thu:3, Fri:7, Sat:1, Sun:0}. 2024-01-01 was a Monday.
pub const ANN_CELLS: &str = r#"
  <rect class="ContributionCalendar-day" data-date="2024-01-01" data-level="2">5 contributions on Monday, January 1, 2024</rect>
  <rect class="ContributionCalendar-day" data-date="2024-01-02" data-level="0">No contributions on Tuesday, January 2, 2024</rect>
  <rect class="ContributionCalendar-day" data-date="2024-01-03" data-level="4">10 contributions on Wednesday, January 3, 2024</rect>
  <rect class="ContributionCalendar-day" data-date="2024-01-04" data-level="1">3 contributions on Thursday, January 4, 2024</rect>
  <rect class="ContributionCalendar-day" data-date="2024-01-05" data-level="3">7 contributions on Friday, January 5, 2024</rect>
  <rect class="ContributionCalendar-day" data-date="2024-01-06" data-level="1">1 contribution on Saturday, January 6, 2024</rect>
  <rect class="ContributionCalendar-day" data-date="2024-01-07" data-level="0">No contributions on Sunday, January 7, 2024</rect>
  <rect class="ContributionCalendar-day" data-date="2024-01-10" data-level="1">2 contributions on Wednesday, January 10, 2024</rect>
"#;

pub fn profile_page(cells: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body>
        <svg aria-hidden="true" height="16" viewBox="0 0 16 16" width="16" class="octicon octicon-mark-github"><path d="M8 0"></path></svg>
        <div class="js-yearly-contributions">
          <svg width="717" height="112" class="js-calendar-graph-svg">
            <g transform="translate(10, 20)" data-hydro-click="">{}</g>
          </svg>
        </div></body></html>"#,
        cells
    )
}

#[derive(Clone, Default)]
pub struct Upstream {
    pub chat_calls: Arc<AtomicUsize>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl Upstream {
    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }
}

async fn profile(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "ann" => Html(profile_page(ANN_CELLS)).into_response(),
        "quiet" => Html(profile_page("")).into_response(),
        "redesigned" => Html("<html><body><table class=\"calendar\"></table></body></html>").into_response(),
        "broken" => Html(profile_page(
            r#"<rect class="ContributionCalendar-day" data-date="yesterday">4 contributions</rect>"#,
        ))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn chat(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    upstream.chat_calls.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if auth != format!("Bearer {}", API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": {"message": "Incorrect API key provided"}})),
        )
            .into_response();
    }

    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default().to_string();
    upstream.prompts.lock().unwrap().push(prompt);
    reply(TAGLINE)
}

fn reply(content: &str) -> Response {
    Json(serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    }))
    .into_response()
}

async fn rate_limited(State(upstream): State<Upstream>) -> Response {
    upstream.chat_calls.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(serde_json::json!({"error": {"message": "Rate limit reached"}})),
    )
        .into_response()
}

async fn garbled(State(upstream): State<Upstream>) -> Response {
    upstream.chat_calls.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, "<html>upstream hiccup</html>").into_response()
}

async fn no_choices(State(upstream): State<Upstream>) -> Response {
    upstream.chat_calls.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({"id": "chatcmpl-2", "choices": []})).into_response()
}

async fn slow(State(upstream): State<Upstream>) -> Response {
    upstream.chat_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(3)).await;
    reply(TAGLINE)
}

/// Serves fake profile pages under `/users/:name` and a fake chat API under `/v1`.
///
/// Misbehaving chat APIs live under `/rate-limited`, `/garbled`, `/empty` and `/slow`.
pub async fn spawn_upstream() -> (SocketAddr, Upstream) {
    let upstream = Upstream::default();
    let app = Router::new()
        .route("/users/:name", get(profile))
        .route("/v1/chat/completions", post(chat))
        .route("/rate-limited/chat/completions", post(rate_limited))
        .route("/garbled/chat/completions", post(garbled))
        .route("/empty/chat/completions", post(no_choices))
        .route("/slow/chat/completions", post(slow))
        .with_state(upstream.clone());
    let addr = spawn(app).await;
    (addr, upstream)
}

pub async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_with(
    upstream: SocketAddr,
    api_key: Option<&str>,
    api_root: &str,
    timeout: u64,
) -> Config {
    let profile_url = format!("http://{}/users/{{username}}", upstream);
    let api_base = format!("http://{}/{}", upstream, api_root);
    let timeout = timeout.to_string();
    let args = Args::parse_from([
        "commitday",
        "--profile-url",
        profile_url.as_str(),
        "--api-base",
        api_base.as_str(),
        "--timeout",
        timeout.as_str(),
    ]);
    let mut config = Config::from_args(&args);
    config.api_key = api_key.map(str::to_string);
    config
}

pub fn config_for(upstream: SocketAddr, api_key: Option<&str>) -> Config {
    config_with(upstream, api_key, "v1", 10)
}

pub fn analyzer_for(upstream: SocketAddr, api_key: Option<&str>) -> Analyzer {
    config_for(upstream, api_key).build_analyzer().unwrap()
}

/// Analyzer whose chat API is one of the misbehaving fixture roots.
pub fn analyzer_with_api(upstream: SocketAddr, api_root: &str, timeout_secs: u64) -> Analyzer {
    config_with(upstream, Some(API_KEY), api_root, timeout_secs)
        .build_analyzer()
        .unwrap()
}
