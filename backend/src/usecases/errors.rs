use axum::http::StatusCode;
use membership_core::domain::value_objects::money::MoneyError;
use thiserror::Error;

use super::discount::DiscountError;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0} not found")]
    DataNotFound(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            UseCaseError::DataNotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Forbidden(_) => StatusCode::FORBIDDEN,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MoneyError> for UseCaseError {
    fn from(err: MoneyError) -> Self {
        if err.is_invalid_argument() {
            UseCaseError::InvalidArgument(err.to_string())
        } else {
            UseCaseError::Internal(err.into())
        }
    }
}

impl From<DiscountError> for UseCaseError {
    fn from(err: DiscountError) -> Self {
        if err.is_invalid_argument() {
            UseCaseError::InvalidArgument(err.to_string())
        } else {
            UseCaseError::Internal(err.into())
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
