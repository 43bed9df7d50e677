//! Session cookie handling and the login-required middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Duration;
use tracing::{debug, error};

use super::responses::redirect_to;
use crate::domain::models::Driver;
use crate::AppState;

pub const SESSION_COOKIE: &str = "sessionid";
pub const LOGIN_PATH: &str = "/accounts/login/";

/// The logged-in driver, inserted into request extensions by [`require_login`]
#[derive(Debug, Clone)]
pub struct CurrentDriver {
    pub session_key: String,
    pub driver: Driver,
}

/// Let the request through only with a live session; otherwise redirect to the login page
pub async fn require_login(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    let Some(key) = session_key(request.headers()) else {
        debug!("No session cookie on {}", path);
        return redirect_to_login(&path);
    };

    match state.auth_service.authenticate(&key).await {
        Ok(Some((session, driver))) => {
            request.extensions_mut().insert(CurrentDriver {
                session_key: session.key,
                driver,
            });
            next.run(request).await
        }
        Ok(None) => {
            debug!("Stale session cookie on {}", path);
            redirect_to_login(&path)
        }
        Err(e) => {
            error!("Failed to resolve session: {}", e);
            super::responses::error_response(e, "resolve session")
        }
    }
}

/// Read the session key from the `Cookie` headers
pub fn session_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(key: &str, ttl: Duration) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        key,
        ttl.num_seconds()
    )
}

pub fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Attach a `Set-Cookie` header to a response
pub fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
            response
        }
        Err(e) => {
            error!("Invalid cookie value: {}", e);
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// `next` targets are honored only when they stay on this site
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => "/",
    }
}

fn redirect_to_login(path: &str) -> Response {
    redirect_to(&format!("{}?next={}", LOGIN_PATH, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("csrftoken=abc; sessionid=k3y; theme=dark"),
        );

        assert_eq!(session_key(&headers), Some("k3y".to_string()));
        assert_eq!(session_key(&HeaderMap::new()), None);
    }

    #[test]
    fn test_empty_session_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sessionid="));

        assert_eq!(session_key(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("k3y", Duration::hours(1));

        assert_eq!(cookie, "sessionid=k3y; HttpOnly; SameSite=Lax; Path=/; Max-Age=3600");
        assert!(expired_session_cookie().ends_with("Max-Age=0"));
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/cars/")), "/cars/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
