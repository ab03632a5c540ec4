use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::AppError;
use crate::services::attendee_service::{self, DashboardCounts};
use crate::services::checkin_service;
use crate::state::AppState;
use crate::web::middleware::auth::SessionUser;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: String,
    pub counts: DashboardCounts,
    pub notice: String,
    pub error: String,
    pub build_id: &'static str,
}

impl DashboardTemplate {
    fn new(user: &SessionUser, counts: DashboardCounts) -> Self {
        Self {
            user: user.username.clone(),
            counts,
            notice: String::new(),
            error: String::new(),
            build_id: env!("SCANNER_BUILD_ID"),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    pub notice: Option<String>, // reset_ok|dedupe_ok|dedupe_error
    pub removed: Option<usize>,
}

pub async fn dashboard_handler(
    Extension(user): Extension<SessionUser>,
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let mut template = match attendee_service::load_dashboard_counts(state.store.as_ref()).await {
        Ok(counts) => DashboardTemplate::new(&user, counts),
        Err(e) => {
            warn!("Dashboard counts unavailable: {}", e);
            let mut template = DashboardTemplate::new(&user, DashboardCounts::default());
            template.error = "Attendance store unavailable".to_string();
            template
        }
    };

    match query.notice.as_deref() {
        Some("reset_ok") => template.notice = "Attendance has been reset.".to_string(),
        Some("dedupe_ok") => {
            template.notice = format!(
                "Removed {} duplicate records.",
                query.removed.unwrap_or(0)
            )
        }
        Some("dedupe_error") => template.error = "Failed to remove duplicates".to_string(),
        _ => {}
    }

    Ok(Html(template.render()?))
}

pub async fn reset_attendance_handler(
    Extension(user): Extension<SessionUser>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match checkin_service::reset_attendance(state.store.as_ref(), &state.ticket_log).await {
        Ok(_) => Ok(Redirect::to("/dashboard?notice=reset_ok").into_response()),
        Err(e) => {
            error!("Error resetting attendance: {}", e);
            let counts = attendee_service::load_dashboard_counts(state.store.as_ref())
                .await
                .unwrap_or_default();
            let mut template = DashboardTemplate::new(&user, counts);
            template.error = "Failed to reset attendance".to_string();
            Ok(Html(template.render()?).into_response())
        }
    }
}

pub async fn dedupe_handler(State(state): State<AppState>) -> Response {
    match state.store.dedupe().await {
        Ok(report) => Redirect::to(&format!(
            "/dashboard?notice=dedupe_ok&removed={}",
            report.removed
        ))
        .into_response(),
        Err(e) => {
            error!("Failed to remove duplicate attendees: {}", e);
            Redirect::to("/dashboard?notice=dedupe_error").into_response()
        }
    }
}
