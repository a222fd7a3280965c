//! Search handlers
//!
//! `POST /products_agent_search` answers a free-text product question;
//! `POST /v1/plan` returns the plan that question would run without
//! touching any backend.

use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shopscout_common::errors::{AppError, Result};
use shopscout_common::planner::{QueryIntent, QueryPlan};
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AgentSearchRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AgentSearchResponse {
    pub result: String,
    pub intent: QueryIntent,
    pub deep_reasoning: bool,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: QueryPlan,
    pub deep_reasoning: bool,
}

/// Reject blank or oversized query text
fn validated_text(request: &AgentSearchRequest) -> Result<&str> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("text".to_string()),
    })?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation {
            message: "Query text must not be blank".to_string(),
            field: Some("text".to_string()),
        });
    }
    Ok(text)
}

/// Plan, execute and render a product question
pub async fn products_agent_search(
    State(state): State<AppState>,
    Json(request): Json<AgentSearchRequest>,
) -> Result<Json<AgentSearchResponse>> {
    let text = validated_text(&request)?;

    let answer = state.search.answer(text).await;
    let intent = answer.plan.intent();

    info!(
        intent = %intent,
        products = answer.outcome.product_count(),
        graph = answer.report.graph.label(),
        vector = answer.report.vector.label(),
        elapsed_ms = answer.report.elapsed.as_millis() as u64,
        "Product search answered"
    );

    Ok(Json(AgentSearchResponse {
        result: answer.text,
        intent,
        deep_reasoning: intent != QueryIntent::Simple,
    }))
}

/// Build the plan for a question without executing it
pub async fn plan(
    State(state): State<AppState>,
    Json(request): Json<AgentSearchRequest>,
) -> Result<Json<PlanResponse>> {
    let text = validated_text(&request)?;

    let plan = state.search.plan(text);
    let deep_reasoning = plan.intent() != QueryIntent::Simple;

    Ok(Json(PlanResponse {
        plan,
        deep_reasoning,
    }))
}
