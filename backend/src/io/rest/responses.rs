//! Response helpers shared by all handlers.
//!
//! Domain errors are turned into HTTP responses here and nowhere else.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use shared::FormErrorResponse;
use tracing::{error, warn};

use crate::domain::ServiceError;

/// `302 Found` to `location` with the affected record as body
pub fn redirect_with<T: Serialize>(location: &str, body: T) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())], Json(body)).into_response()
}

/// `302 Found` to `location` with an empty body
pub fn redirect_to(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Map a service error to its response. `action` names the failed operation in the log.
pub fn error_response(error: ServiceError, action: &str) -> Response {
    match error {
        ServiceError::Validation(errors) => {
            warn!("Failed to {}: {}", action, errors);
            (
                StatusCode::BAD_REQUEST,
                Json(FormErrorResponse {
                    errors: errors.into_map(),
                }),
            )
                .into_response()
        }
        ServiceError::NotFound { .. } => {
            warn!("Failed to {}: {}", action, error);
            (StatusCode::NOT_FOUND, error.to_string()).into_response()
        }
        ServiceError::Storage(e) => {
            error!("Failed to {}: {:#}", action, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FormErrors;

    #[test]
    fn test_error_statuses() {
        let mut errors = FormErrors::new();
        errors.add("name", "This field is required.");

        assert_eq!(
            error_response(ServiceError::Validation(errors), "create").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(ServiceError::not_found("Car", 1), "get").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(ServiceError::Storage(anyhow::anyhow!("disk full")), "list").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect_to("/cars/");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/cars/");
    }
}
