use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::AppError;
use crate::services::attendee_service::{self, AttendeeRowView};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "registered_users.html")]
pub struct RegisteredUsersTemplate {
    pub entries: Vec<AttendeeRowView>,
    pub present_count: i64,
    pub total_count: usize,
    pub error: String,
}

pub async fn registered_users_handler(
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let template = match attendee_service::load_registered_page(state.store.as_ref()).await {
        Ok(data) => RegisteredUsersTemplate {
            entries: data.attendees,
            present_count: data.present_count,
            total_count: data.total_count,
            error: String::new(),
        },
        Err(e) => {
            warn!("Registered attendee list unavailable: {}", e);
            RegisteredUsersTemplate {
                entries: vec![],
                present_count: 0,
                total_count: 0,
                error: "Attendance store unavailable".to_string(),
            }
        }
    };

    Ok(Html(template.render()?))
}

pub async fn download_csv_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let attendees = state.store.list_all().await?;
    let Some(csv) = attendee_service::build_attendees_csv(&attendees) else {
        info!("CSV export requested with no attendees");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=entries.csv"),
    );
    Ok((StatusCode::OK, headers, csv).into_response())
}

pub async fn attendance_count_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let present_count = state.store.count_present().await?;
    Ok(Json(json!({ "present_count": present_count })))
}
