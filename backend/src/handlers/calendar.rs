use axum::{extract::State, Json};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::pipeline::Pipeline;
use shared::api::ProcessCalendarResponse;

pub async fn process_calendar_events(
    State(pipeline): State<Arc<Pipeline>>,
) -> ApiResult<Json<ProcessCalendarResponse>> {
    let events = pipeline.process_calendar_events().await?;

    Ok(Json(ProcessCalendarResponse::success(events)))
}
