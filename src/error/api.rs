//! API-style failure helpers.
//!
//! Sugar over `fail_with({code: "HTTP-xxx", message, status})`.

use serde_json::{Map, Value};

use super::codes;
use super::payload::ErrorPayload;
use super::unified::UnifiedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailure {
    NotFound,
    BadRequest,
    Forbidden,
    Unauthorized,
    Conflict,
    ServerError,
}

impl ApiFailure {
    pub fn code(&self) -> &'static str {
        match self {
            ApiFailure::NotFound => codes::HTTP_NOT_FOUND,
            ApiFailure::BadRequest => codes::HTTP_BAD_REQUEST,
            ApiFailure::Forbidden => codes::HTTP_FORBIDDEN,
            ApiFailure::Unauthorized => codes::HTTP_UNAUTHORIZED,
            ApiFailure::Conflict => codes::HTTP_CONFLICT,
            ApiFailure::ServerError => codes::HTTP_SERVER_ERROR,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiFailure::NotFound => 404,
            ApiFailure::BadRequest => 400,
            ApiFailure::Forbidden => 403,
            ApiFailure::Unauthorized => 401,
            ApiFailure::Conflict => 409,
            ApiFailure::ServerError => 500,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ApiFailure::NotFound => "Not found",
            ApiFailure::BadRequest => "Bad request",
            ApiFailure::Forbidden => "Forbidden",
            ApiFailure::Unauthorized => "Unauthorized",
            ApiFailure::Conflict => "Conflict",
            ApiFailure::ServerError => "Internal server error",
        }
    }

    /// Builds the error; an empty message falls back to the default.
    pub fn raise(&self, message: impl Into<String>) -> UnifiedError {
        let mut message = message.into();
        if message.is_empty() {
            message = self.default_message().to_string();
        }

        let mut map = Map::new();
        map.insert("code".to_string(), Value::String(self.code().to_string()));
        map.insert("message".to_string(), Value::String(message));
        map.insert("status".to_string(), Value::from(self.status()));
        UnifiedError::from_payload(ErrorPayload::new(map))
    }
}

pub fn not_found(message: impl Into<String>) -> UnifiedError {
    ApiFailure::NotFound.raise(message)
}

pub fn bad_request(message: impl Into<String>) -> UnifiedError {
    ApiFailure::BadRequest.raise(message)
}

pub fn forbidden(message: impl Into<String>) -> UnifiedError {
    ApiFailure::Forbidden.raise(message)
}

pub fn unauthorized(message: impl Into<String>) -> UnifiedError {
    ApiFailure::Unauthorized.raise(message)
}

pub fn conflict(message: impl Into<String>) -> UnifiedError {
    ApiFailure::Conflict.raise(message)
}

pub fn server_error(message: impl Into<String>) -> UnifiedError {
    ApiFailure::ServerError.raise(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use serde_json::json;

    #[test]
    fn test_helpers_fix_code_and_status() {
        let cases = [
            (not_found("gone"), "HTTP-404", 404),
            (bad_request("bad"), "HTTP-400", 400),
            (forbidden("no"), "HTTP-403", 403),
            (unauthorized("who"), "HTTP-401", 401),
            (conflict("dup"), "HTTP-409", 409),
            (server_error("oops"), "HTTP-500", 500),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.http_status(), status);
            assert_eq!(err.class(), ErrorClass::Value);
            assert_eq!(err.payload().unwrap().message(), err.message());
        }
    }

    #[test]
    fn test_payload_shape() {
        let err = not_found("User not found");
        assert_eq!(
            err.payload().unwrap().to_json(),
            json!({"code": "HTTP-404", "message": "User not found", "status": 404})
        );
    }

    #[test]
    fn test_empty_message_uses_default() {
        assert_eq!(server_error("").message(), "Internal server error");
        assert_eq!(ApiFailure::Unauthorized.raise("").message(), "Unauthorized");
    }
}
