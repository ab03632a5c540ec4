use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::web::middleware::auth::{removal_cookie, session_cookie};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

pub async fn login_page() -> Result<Html<String>, AppError> {
    Ok(Html(LoginTemplate.render()?))
}

pub async fn login_handler(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let username = form.email.trim();
    if !state.admin.matches(username, &form.password) {
        warn!(username, "Rejected login attempt");
        return Redirect::to("/").into_response();
    }

    let cookie = session_cookie(username, &state.session_key)
        .and_then(|c| HeaderValue::from_str(&c.to_string()).ok());
    let Some(cookie) = cookie else {
        error!(username, "Could not build session cookie");
        return Redirect::to("/").into_response();
    };

    info!(username, "Admin logged in");
    let mut response = Redirect::to("/dashboard").into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    response
}

pub async fn logout_handler() -> Response {
    let mut response = Redirect::to("/").into_response();
    if let Ok(value) = HeaderValue::from_str(&removal_cookie().to_string()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
