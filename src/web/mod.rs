pub mod middleware;
pub mod routes;

use std::path::Path;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, get_service, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use middleware::auth as auth_middleware;
use routes::{attendees, auth, dashboard, health, scan};

pub fn router(state: AppState, assets_dir: impl AsRef<Path>) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(dashboard::dashboard_handler))
        .route("/reset-attendance", post(dashboard::reset_attendance_handler))
        .route("/dedupe-attendees", post(dashboard::dedupe_handler))
        .route("/logout", post(auth::logout_handler))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth_middleware::require_session,
        ));

    Router::new()
        // Public routes
        .route("/", get(auth::login_page))
        .route("/login", post(auth::login_handler))
        .route("/registered-user", get(attendees::registered_users_handler))
        .route("/download-csv", get(attendees::download_csv_handler))
        .route("/api/attendance-count", get(attendees::attendance_count_handler))
        .route("/scan-result", post(scan::scan_result_handler))
        .route("/health", get(health::health_handler))
        // Protected routes
        .merge(protected_routes)
        // Static files
        .nest_service("/assets", get_service(ServeDir::new(assets_dir.as_ref())))
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
