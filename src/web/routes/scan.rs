use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::ScanRecord;
use crate::services::checkin_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScanResultBody {
    pub qr_code: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResultResponse {
    pub message: &'static str,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sno: Option<i64>,
    pub ticket: ScanRecord,
}

pub async fn scan_result_handler(
    State(state): State<AppState>,
    Json(body): Json<ScanResultBody>,
) -> Result<Json<ScanResultResponse>, AppError> {
    let check_in =
        checkin_service::check_in(state.store.as_ref(), &state.ticket_log, &body.qr_code).await?;

    Ok(Json(ScanResultResponse {
        message: check_in.outcome.message(),
        outcome: check_in.outcome.kind(),
        sno: check_in.outcome.sno(),
        ticket: check_in.ticket,
    }))
}
