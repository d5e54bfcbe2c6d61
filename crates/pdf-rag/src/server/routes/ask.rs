//! Question answering endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{validate_question, AskRequest, QueryResult};

/// POST /ask - answer a question about the indexed document
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<QueryResult>> {
    validate_question(&request.question).inspect_err(|_| {
        tracing::debug!("Rejected empty question");
    })?;

    tracing::info!("Question: {}", request.question.trim());

    let result = state
        .lifecycle()
        .answer(&request.question)
        .await
        .map_err(Error::into_answer_failure)?;

    tracing::info!("Answered with {} sources", result.sources.len());
    Ok(Json(result))
}
