//! # REST API for Login and Logout

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use super::auth::{expired_session_cookie, safe_next, session_cookie, with_cookie, CurrentDriver, LOGIN_PATH};
use super::mappers::DriverMapper;
use super::responses::{error_response, redirect_to, redirect_with};
use crate::AppState;
use shared::{LoginQuery, LoginRequest, LoginResponse};

/// Log in and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /accounts/login/ - username: {}", request.username);

    match state.auth_service.login(DriverMapper::to_login_command(request)).await {
        Ok((session, driver)) => {
            let body = LoginResponse {
                success_message: format!("Logged in as {}", driver.username),
                driver: DriverMapper::to_dto(driver),
            };
            let response = redirect_with(safe_next(query.next.as_deref()), body);
            with_cookie(response, &session_cookie(&session.key, state.auth_service.session_ttl()))
        }
        Err(e) => error_response(e, "log in"),
    }
}

/// Close the current session and clear the cookie
pub async fn logout(State(state): State<AppState>, Extension(current): Extension<CurrentDriver>) -> impl IntoResponse {
    info!("POST /accounts/logout/ - driver: {}", current.driver.username);

    match state.auth_service.logout(&current.session_key).await {
        Ok(()) => with_cookie(redirect_to(LOGIN_PATH), &expired_session_cookie()),
        Err(e) => error_response(e, "log out"),
    }
}
