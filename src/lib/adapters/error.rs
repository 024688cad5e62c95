use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::TodoError;

#[cfg(feature = "tracing")]
use tracing::{debug, error};

/// JSON body sent with every non-2xx answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl TodoError {
    pub fn status(&self) -> StatusCode {
        match self {
            TodoError::Validation(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TodoError::Validation(_) => "VALIDATION_ERROR",
            TodoError::NotFound(_) => "NOT_FOUND",
            TodoError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status();
        #[cfg(feature = "tracing")]
        {
            if status.is_server_error() {
                error!(error = %self, "Store operation failed");
            } else {
                debug!(error = %self, status = %status, "Request rejected");
            }
        }
        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for TodoError {
    fn from(rejection: JsonRejection) -> Self {
        TodoError::Validation(rejection.body_text())
    }
}
