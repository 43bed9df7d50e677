use super::validation::FormErrors;

/// Errors returned by the domain services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid form submission: {0}")]
    Validation(FormErrors),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
