//! Mapping of service errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mouse_cat_rules::MoveError;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::GameServiceError;

/// Error body: `{"error": "<kind>", "message": "<text>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl GameServiceError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Rules(e) => match e {
                MoveError::InvalidCell(_) | MoveError::InvalidMove { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                MoveError::NotAParticipant(_) => StatusCode::FORBIDDEN,
                MoveError::GameNotAvailable
                | MoveError::GameNotActive
                | MoveError::NotYourTurn(_)
                | MoveError::NotYourPiece(_) => StatusCode::CONFLICT,
                MoveError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::GameNotFound(_) | Self::PlayerNotFound(_) | Self::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::UsernameTaken(_) | Self::ReplayUnavailable(_) => StatusCode::CONFLICT,
            Self::Db(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mouse_cat_rules::Role;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                GameServiceError::from(MoveError::InvalidMove {
                    origin: 0,
                    target: 18,
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                GameServiceError::from(MoveError::NotYourTurn(Role::Cat)),
                StatusCode::CONFLICT,
            ),
            (
                GameServiceError::from(MoveError::NotAParticipant(7)),
                StatusCode::FORBIDDEN,
            ),
            (GameServiceError::GameNotFound(3), StatusCode::NOT_FOUND),
            (
                GameServiceError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{err}");
        }
    }
}
