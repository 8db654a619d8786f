//! HTTP request handlers.

use super::page::render_page;
use crate::runner::StockAssistant;
use axum::extract::State;
use axum::response::Html;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    assistant: Arc<dyn StockAssistant>,
    // One agent run at a time.
    permit: Arc<Semaphore>,
}

impl AppState {
    pub fn new(assistant: Arc<dyn StockAssistant>) -> Self {
        Self {
            assistant,
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    /// Text for the output box; failures become `Error: ...`
    pub async fn answer(&self, query: &str) -> String {
        let _permit = match self.permit.acquire().await {
            Ok(permit) => permit,
            Err(e) => return format!("Error: {}", e),
        };

        match self.assistant.ask(query).await {
            Ok(run) => {
                info!(steps = run.steps, duration_ms = run.duration_ms, "Answered: {}", query);
                run.output.form_text()
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}

/// Form body and JSON request share one shape.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub output: String,
}

/// GET / - Empty form.
pub async fn index() -> Html<String> {
    Html(render_page("", ""))
}

/// POST / - Run the query and re-render the form.
pub async fn submit(State(state): State<AppState>, Form(req): Form<AskRequest>) -> Html<String> {
    let output = state.answer(&req.query).await;
    Html(render_page(&req.query, &output))
}

/// POST /api/ask - Run the query and return the output text.
pub async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Json<AskResponse> {
    let output = state.answer(&req.query).await;
    Json(AskResponse { output })
}
