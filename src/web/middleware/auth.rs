use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, CookieJar, Key, SameSite};
use tracing::debug;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "scanner_session";

#[derive(Clone, Debug)]
pub struct SessionUser {
    pub username: String,
}

/// Reads the signed session cookie; tampered or foreign cookies are ignored.
pub fn session_user(headers: &HeaderMap, key: &Key) -> Option<SessionUser> {
    let mut jar = CookieJar::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(cookies) = value.to_str() else {
            continue;
        };
        for pair in cookies.split(';') {
            if let Ok(cookie) = Cookie::parse(pair.trim().to_string()) {
                jar.add_original(cookie);
            }
        }
    }

    jar.signed(key).get(SESSION_COOKIE).map(|c| SessionUser {
        username: c.value().to_string(),
    })
}

/// Signed session cookie for `username`.
pub fn session_cookie(username: &str, key: &Key) -> Option<Cookie<'static>> {
    let mut cookie = Cookie::new(SESSION_COOKIE, username.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);

    let mut jar = CookieJar::new();
    jar.signed_mut(key).add(cookie);
    jar.get(SESSION_COOKIE).cloned()
}

/// Cookie that makes the browser drop the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.make_removal();
    cookie
}

/// Pages behind the login send anonymous visitors back to the login page.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = session_user(request.headers(), &state.session_key) {
        request.extensions_mut().insert(user);
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "No valid session, redirecting to login");
    Redirect::to("/").into_response()
}
