use axum::{extract::State, Json};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::pipeline::Pipeline;
use shared::api::ProcessEmailsResponse;

pub async fn process_emails(
    State(pipeline): State<Arc<Pipeline>>,
) -> ApiResult<Json<ProcessEmailsResponse>> {
    let summary = pipeline.process_emails().await?;
    tracing::info!(
        "Email run complete: {} messages, {} groups, {} notifications",
        summary.messages,
        summary.groups,
        summary.notifications.len()
    );

    Ok(Json(ProcessEmailsResponse::success()))
}
