//! API route handlers for the gateway.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use docgate_core::error::DocGateError;
use docgate_core::types::{ChatDebug, ChatRequest, ChatResponse};
use docgate_synthesis::{AnswerModel, greeting, synthesize};
use serde::Deserialize;
use serde_json::{Value, json};

use super::server::AppState;

/// Static root probe, used by uptime checks and deploy smoke tests.
pub async fn root() -> &'static str {
    "DocGate backend is running!"
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "docgate-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Main chat endpoint.
///
/// Body: `{ "query": "..." }`.
/// Returns `{ answer, sources: [{title, url}], debug }` — or a 500 body that
/// still carries a renderable `answer` field, so the calling UI always has
/// something to show.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> (StatusCode, Json<Value>) {
    let query = body.query.trim();

    // Pre-filter stage: canned replies never reach retrieval or the model.
    if let Some(reply) = canned_reply(query) {
        return (
            StatusCode::OK,
            Json(json!({ "answer": reply, "sources": [] })),
        );
    }

    match handle_chat(&state, query).await {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::to_value(response).unwrap_or_default()),
        ),
        Err(e) => {
            tracing::error!("Chat request failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error_body(&e)))
        }
    }
}

/// Empty queries and greetings are answered locally, with no sources.
fn canned_reply(query: &str) -> Option<&'static str> {
    if query.trim().is_empty() {
        return Some(greeting::EMPTY_QUERY);
    }
    greeting::greeting_reply(query)
}

/// Retrieve, then synthesize. The two outbound calls are sequential because
/// generation consumes retrieval's output.
async fn handle_chat(state: &AppState, query: &str) -> docgate_core::error::Result<ChatResponse> {
    let outcome = state
        .search
        .search(query, state.config.retrieval.page_size)
        .await?;

    let model = state.model.as_ref().map(|m| m as &dyn AnswerModel);
    let answer = synthesize(query, &outcome, model).await?;
    let sources = outcome.source_links();

    Ok(ChatResponse {
        answer,
        sources,
        debug: Some(ChatDebug {
            serving_config_used: outcome.serving_config_used.clone(),
            retrieved_count: outcome.items.len(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }),
    })
}

/// 500 payload: a renderable `answer`, plus whatever code and detail the
/// transport supplied.
fn error_body(err: &DocGateError) -> Value {
    let mut body = json!({ "answer": "Backend error", "message": err.to_string() });
    if let DocGateError::Retrieval { code, details, .. } = err {
        if let Some(code) = code {
            body["code"] = json!(code);
        }
        if let Some(details) = details {
            body["details"] = json!(details);
        }
    }
    body
}

#[derive(Debug, Deserialize)]
pub struct DebugRetrieveParams {
    pub q: Option<String>,
}

/// Debug retrieval only (development): `/debug-retrieve?q=Contact%20Change%20Log`.
pub async fn debug_retrieve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DebugRetrieveParams>,
) -> (StatusCode, Json<Value>) {
    let q = params.q.as_deref().unwrap_or("contact").trim();
    match state.search.search(q, state.config.retrieval.page_size).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "servingConfigUsed": outcome.serving_config_used,
                "count": outcome.items.len(),
                "results": outcome.items,
                "summary": outcome.summary_text,
            })),
        ),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(error_body(&e))),
    }
}

/// Effective configuration, sanitized — no credentials (development only).
pub async fn configs(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cfg = &state.config;
    Json(json!({
        "retrieval": {
            "project": cfg.retrieval.project,
            "location": cfg.retrieval.location,
            "collection": cfg.retrieval.collection,
            "data_store": cfg.retrieval.data_store,
            "engine": cfg.retrieval.engine,
            "serving_configs": cfg.retrieval.serving_configs,
            "serving_config_path": cfg.retrieval.serving_config_path,
            "candidates": state.search.candidate_count(),
            "page_size": cfg.retrieval.page_size,
            "return_summary": cfg.retrieval.return_summary,
            "extractive_answers": cfg.retrieval.extractive_answers,
        },
        "generation": {
            "enabled": state.model.is_some(),
            "model": cfg.generation.model,
            "location": cfg.generation.location,
            "temperature": cfg.generation.temperature,
            "max_output_tokens": cfg.generation.max_output_tokens,
        },
        "gateway": {
            "host": cfg.gateway.host,
            "port": cfg.gateway.port,
            "allowed_origin": cfg.gateway.allowed_origin,
        },
        "credentials_set": !cfg.google_key.is_empty(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_reply_for_empty_query() {
        assert_eq!(canned_reply(""), Some("Ask me something."));
        assert_eq!(canned_reply("   "), Some("Ask me something."));
    }

    #[test]
    fn test_canned_reply_for_greetings() {
        assert!(canned_reply("hello").is_some());
        assert!(canned_reply("Good morning!").is_some());
    }

    #[test]
    fn test_real_queries_not_canned() {
        assert_eq!(canned_reply("Contact Change Log"), None);
    }

    #[test]
    fn test_error_body_retrieval_carries_code_and_details() {
        let err = DocGateError::Retrieval {
            code: Some(403),
            message: "Permission denied".into(),
            details: Some("{\"error\":{\"status\":\"PERMISSION_DENIED\"}}".into()),
        };
        let body = error_body(&err);
        assert_eq!(body["answer"], "Backend error");
        assert_eq!(body["code"], 403);
        assert!(body["message"].as_str().unwrap().contains("Permission denied"));
        assert!(body["details"].as_str().unwrap().contains("PERMISSION_DENIED"));
    }

    #[test]
    fn test_error_body_other_errors_have_message_only() {
        let err = DocGateError::Generation("model timed out".into());
        let body = error_body(&err);
        assert_eq!(body["answer"], "Backend error");
        assert!(body["message"].as_str().unwrap().contains("model timed out"));
        assert!(body.get("code").is_none());
        assert!(body.get("details").is_none());
    }
}
