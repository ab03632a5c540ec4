#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use cookie::Key;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use scanner::config::AdminCredentials;
use scanner::database::{self, attendee_repo, attendee_repo::NewAttendee};
use scanner::services::attendance_store::SqliteAttendanceStore;
use scanner::services::ticket_log::TicketLog;
use scanner::state::AppState;
use scanner::web;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "onam-2025";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteAttendanceStore>,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = database::connect_in_memory().await.expect("in-memory db");
        let store = Arc::new(SqliteAttendanceStore::new(pool));
        let dir = TempDir::new().expect("temp dir");
        let ticket_log = TicketLog::new(dir.path().join("scanned_tickets.json"));

        let state = AppState::new(
            store.clone(),
            ticket_log,
            AdminCredentials {
                username: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
            Key::generate(),
        );
        let router = web::router(state.clone(), dir.path().join("assets"));

        Self {
            router,
            store,
            state,
            _dir: dir,
        }
    }

    pub async fn seed(&self, id: &str, sno: i64, name: &str, details: Option<&str>) {
        attendee_repo::insert_attendee(
            self.store.pool(),
            NewAttendee {
                id,
                sno: Some(sno),
                name: Some(name),
                details,
                attendance: Some(false),
                attendance_time: None,
                ticket_shared_status: Some(false),
            },
        )
        .await
        .expect("seed attendee");
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn scan(&self, qr_code: &str) -> (u16, Value) {
        let request = Request::post("/scan-result")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "qr_code": qr_code }).to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status().as_u16();
        (status, body_json(response).await)
    }

    /// Logs in through `/login` and returns the `name=value` cookie pair.
    pub async fn login(&self) -> String {
        let request = Request::post("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "email={}&password={}",
                ADMIN_EMAIL.replace('@', "%40"),
                ADMIN_PASSWORD
            )))
            .unwrap();
        let response = self.send(request).await;
        assert_eq!(response.status().as_u16(), 303);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
