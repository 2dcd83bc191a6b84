use thiserror::Error;

pub const UNAUTHENTICATED_MESSAGE: &str = "Não autenticado";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthenticated,
    RequestFailed,
    NetworkFailure,
    Decode,
    Storage,
}

impl ApiErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::RequestFailed => "request_failed",
            Self::NetworkFailure => "network_failure",
            Self::Decode => "decode",
            Self::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A protected route was called with no cached token.
    #[error("{}", UNAUTHENTICATED_MESSAGE)]
    Unauthenticated,
    /// Non-2xx response. `message` is the server's `detail` when
    /// `server_detail` is set, else the per-operation fallback.
    #[error("{message}")]
    RequestFailed {
        status: u16,
        message: String,
        server_detail: bool,
    },
    #[error("{message}")]
    NetworkFailure { message: String },
    #[error("failed to decode response: {message}")]
    Decode { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Unauthenticated => ApiErrorKind::Unauthenticated,
            Self::RequestFailed { .. } => ApiErrorKind::RequestFailed,
            Self::NetworkFailure { .. } => ApiErrorKind::NetworkFailure,
            Self::Decode { .. } => ApiErrorKind::Decode,
            Self::Storage { .. } => ApiErrorKind::Storage,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Builds the failure for a non-2xx response from its (possibly empty) body.
/// A string `detail` is kept verbatim; only an empty one falls back.
#[must_use]
pub fn request_failed(status: u16, body: Option<&serde_json::Value>, fallback: &str) -> ApiError {
    let detail = body
        .and_then(|body| body.get("detail"))
        .and_then(serde_json::Value::as_str)
        .filter(|detail| !detail.is_empty());

    match detail {
        Some(detail) => ApiError::RequestFailed {
            status,
            message: detail.to_string(),
            server_detail: true,
        },
        None => ApiError::RequestFailed {
            status,
            message: fallback.to_string(),
            server_detail: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_failed_prefers_server_detail() {
        let body = json!({ "detail": "Usuário ou senha incorretos" });
        let error = request_failed(401, Some(&body), "fallback");
        assert_eq!(error.to_string(), "Usuário ou senha incorretos");
        assert_eq!(error.status(), Some(401));
        assert!(matches!(
            error,
            ApiError::RequestFailed {
                server_detail: true,
                ..
            }
        ));
    }

    #[test]
    fn request_failed_keeps_detail_whitespace() {
        let body = json!({ "detail": "  Usuário ou senha incorretos\n" });
        let error = request_failed(401, Some(&body), "fallback");
        assert_eq!(error.to_string(), "  Usuário ou senha incorretos\n");

        let body = json!({ "detail": "" });
        let error = request_failed(401, Some(&body), "fallback");
        assert_eq!(error.to_string(), "fallback");
    }

    #[test]
    fn request_failed_uses_fallback_for_non_string_detail() {
        // FastAPI validation errors carry a list under `detail`.
        let body = json!({ "detail": [{ "loc": ["body", "username"], "msg": "field required" }] });
        let error = request_failed(422, Some(&body), "Erro ao registrar");
        assert_eq!(error.to_string(), "Erro ao registrar");

        let error = request_failed(500, None, "Erro ao buscar eventos");
        assert_eq!(error.to_string(), "Erro ao buscar eventos");
        assert_eq!(error.kind(), ApiErrorKind::RequestFailed);
    }

    #[test]
    fn unauthenticated_has_stable_message_and_kind() {
        assert_eq!(ApiError::Unauthenticated.to_string(), UNAUTHENTICATED_MESSAGE);
        assert_eq!(ApiError::Unauthenticated.kind().as_str(), "unauthenticated");
        assert_eq!(ApiError::Unauthenticated.status(), None);
    }
}
