mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use scanner::models::ScanStatus;
use scanner::services::attendance_store::AttendanceStore;

use common::{body_json, body_text, TestApp};

#[tokio::test]
async fn matched_scan_marks_attendee_present() {
    let app = TestApp::new().await;
    app.seed("doc-1", 42, "Asha", None).await;

    let (status, body) = app.scan("Name: Asha\nSNo: 42\nEvent: Onam").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Scan and update success");
    assert_eq!(body["outcome"], "matched");
    assert_eq!(body["sno"], 42);
    assert_eq!(body["ticket"]["status"], "scanned");
    assert_eq!(body["ticket"]["qr_code"], "Name: Asha\nSNo: 42\nEvent: Onam");

    let attendees = app.store.list_all().await.unwrap();
    assert!(attendees[0].attendance);
    assert!(attendees[0].attendance_time.is_some());
    assert!(attendees[0].ticket_shared_status);
}

#[tokio::test]
async fn unknown_ticket_is_distinguishable() {
    let app = TestApp::new().await;
    app.seed("doc-1", 42, "Asha", None).await;

    let (status, body) = app.scan("SNo: 77").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Scan success");
    assert_eq!(body["outcome"], "unknown_ticket");
    assert_eq!(body["sno"], 77);
    assert_eq!(app.store.count_present().await.unwrap(), 0);
}

#[tokio::test]
async fn scan_without_serial_is_still_logged() {
    let app = TestApp::new().await;

    let (status, body) = app.scan("https://example.com/ticket").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Serial number not found in the data");
    assert_eq!(body["outcome"], "serial_not_found");
    assert!(body.get("sno").is_none());

    let entries = app.state.ticket_log.load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].qr_code, "https://example.com/ticket");
    assert_eq!(entries[0].status, ScanStatus::Scanned);
}

#[tokio::test]
async fn attendance_count_tracks_scans() {
    let app = TestApp::new().await;
    app.seed("doc-1", 1, "Asha", None).await;
    app.seed("doc-2", 2, "Ben", None).await;

    app.scan("SNo: 1").await;
    app.scan("SNo: 1").await;
    app.scan("SNo: 2").await;

    let response = app
        .send(Request::get("/api/attendance-count").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["present_count"], 2);
    assert_eq!(app.state.ticket_log.load().unwrap().len(), 3);
}

#[tokio::test]
async fn malformed_scan_body_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .send(
            Request::post("/scan-result")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"code":"SNo: 1"}"#))
                .unwrap(),
        )
        .await;
    assert!(response.status().is_client_error());
    assert!(app.state.ticket_log.load().unwrap().is_empty());
}

#[tokio::test]
async fn registered_list_hides_duplicates() {
    let app = TestApp::new().await;
    app.seed("doc-1", 1, "Asha", None).await;
    app.seed("doc-2", 1, "Asha (copy)", None).await;
    app.seed("doc-3", 2, "Ben", None).await;
    app.scan("SNo: 2").await;

    let response = app
        .send(Request::get("/registered-user").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("1 of 2 present"));
    assert!(html.contains("Asha"));
    assert!(!html.contains("Asha (copy)"));
    assert!(html.contains("Ben"));
}

#[tokio::test]
async fn csv_export_lists_attendees() {
    let app = TestApp::new().await;
    app.seed("doc-1", 1, "Asha", Some(r#"{"phone":"0123"}"#)).await;
    app.seed("doc-2", 2, "Nair, Ben", Some(r#"{"phone":"0456"}"#)).await;
    app.scan("SNo: 1").await;

    let response = app
        .send(Request::get("/download-csv").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=entries.csv"
    );

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "sno,name,attendance,attendance_time,ticket_shared_status,phone"
    );
    assert!(lines[1].starts_with("1,Asha,true,"));
    assert!(lines[1].ends_with(",true,0123"));
    assert_eq!(lines[2], "2,\"Nair, Ben\",false,,false,0456");
}

#[tokio::test]
async fn csv_export_of_empty_store_has_no_content() {
    let app = TestApp::new().await;

    let response = app
        .send(Request::get("/download-csv").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn health_reports_store_state() {
    let app = TestApp::new().await;

    let response = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["has_records"], false);
    assert!(!body["build"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn store_failure_is_not_reported_as_success() {
    let app = TestApp::new().await;
    app.seed("doc-1", 1, "Asha", None).await;
    app.store.pool().close().await;

    let (status, body) = app.scan("SNo: 1").await;
    assert_eq!(status, 503);
    assert_eq!(body["outcome"], "error");
    // The raw scan is recorded before the store is touched.
    assert_eq!(app.state.ticket_log.load().unwrap().len(), 1);

    let response = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
