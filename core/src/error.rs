//! Error types for the todo API client.
//!
//! # Design
//! Each remote operation fails with its own variant so callers can react per
//! operation (banner for a failed load, silent fallback for a failed toggle)
//! without inspecting the request that produced the error. The `Cause`
//! underneath says what actually went wrong.

use std::fmt;

use thiserror::Error;

/// The four remote operations the client performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Wrap `cause` in the error variant belonging to this operation.
    pub fn fail(self, cause: Cause) -> ApiError {
        match self {
            Operation::List => ApiError::FetchFailed(cause),
            Operation::Create => ApiError::CreateFailed(cause),
            Operation::Update => ApiError::UpdateFailed(cause),
            Operation::Delete => ApiError::DeleteFailed(cause),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Why a remote operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Cause {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("failed to fetch todos: {0}")]
    FetchFailed(#[source] Cause),

    #[error("failed to create todo: {0}")]
    CreateFailed(#[source] Cause),

    #[error("failed to update todo: {0}")]
    UpdateFailed(#[source] Cause),

    /// Carries the response status and body text when the server answered.
    #[error("failed to delete todo: {0}")]
    DeleteFailed(#[source] Cause),
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::FetchFailed(_) => Operation::List,
            ApiError::CreateFailed(_) => Operation::Create,
            ApiError::UpdateFailed(_) => Operation::Update,
            ApiError::DeleteFailed(_) => Operation::Delete,
        }
    }

    pub fn cause(&self) -> &Cause {
        match self {
            ApiError::FetchFailed(cause)
            | ApiError::CreateFailed(cause)
            | ApiError::UpdateFailed(cause)
            | ApiError::DeleteFailed(cause) => cause,
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self.cause() {
            Cause::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body text of the failed response, if any.
    pub fn body(&self) -> Option<&str> {
        match self.cause() {
            Cause::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_maps_to_its_variant() {
        let cause = Cause::Transport("refused".to_string());
        assert!(matches!(Operation::List.fail(cause.clone()), ApiError::FetchFailed(_)));
        assert!(matches!(Operation::Create.fail(cause.clone()), ApiError::CreateFailed(_)));
        assert!(matches!(Operation::Update.fail(cause.clone()), ApiError::UpdateFailed(_)));
        assert!(matches!(Operation::Delete.fail(cause), ApiError::DeleteFailed(_)));
    }

    #[test]
    fn delete_failure_exposes_status_and_body() {
        let err = Operation::Delete.fail(Cause::Status {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(err.operation(), Operation::Delete);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("boom"));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "failed to delete todo: HTTP 500: boom");
    }

    #[test]
    fn transport_failure_has_no_status() {
        let err = Operation::List.fail(Cause::Transport("connection refused".to_string()));
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }
}
