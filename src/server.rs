use anyhow::{Context, Result};
use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::analysis::Analyzer;
use crate::error::CommitdayError;
use crate::stats::{weekday_name, Analysis};
use crate::utils::format_number;

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub username: String,
}

/// Values shown under the form once an analysis succeeded.
pub struct ResultView {
    pub username: String,
    pub chart: String,
    pub most_active: &'static str,
    pub least_active: &'static str,
    pub tagline: String,
    pub total: String,
    pub span: Option<String>,
}

impl From<Analysis> for ResultView {
    fn from(analysis: Analysis) -> Self {
        let span = analysis.report.span.map(|s| {
            format!(
                "{} to {}",
                s.first.format("%B %-d, %Y"),
                s.last.format("%B %-d, %Y")
            )
        });
        Self {
            total: format_number(analysis.report.counts.total()),
            username: analysis.report.username,
            chart: analysis.chart,
            most_active: weekday_name(analysis.most_active),
            least_active: weekday_name(analysis.least_active),
            tagline: analysis.tagline,
            span,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: String,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

impl IndexTemplate {
    fn idle(username: &str, error: Option<String>) -> Self {
        Self {
            username: username.to_string(),
            error,
            result: None,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn index() -> Response {
    render(StatusCode::OK, &IndexTemplate::idle("", None))
}

async fn submit(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Response {
    match state.analyzer.analyze(&form.username).await {
        Ok(analysis) => {
            let view = ResultView::from(analysis);
            let page = IndexTemplate {
                username: view.username.clone(),
                error: None,
                result: Some(view),
            };
            render(StatusCode::OK, &page)
        }
        Err(e) => render(
            status_for(&e),
            &IndexTemplate::idle(form.username.trim(), Some(e.to_string())),
        ),
    }
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn status_for(err: &CommitdayError) -> StatusCode {
    if err.is_user_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    }
}

fn render(status: StatusCode, page: &IndexTemplate) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(action = "render", component = "template", error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

pub async fn serve(bind: SocketAddr, analyzer: Analyzer) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let local = listener.local_addr()?;
    info!(action = "listen", component = "server", addr = %local, "Serving on http://{}", local);
    println!("Listening on http://{}", local);

    axum::serve(listener, router(AppState::new(analyzer)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!(action = "shutdown", component = "server", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(action = "signal", component = "server", error = %e, "Failed to listen for ctrl-c");
    }
}
