//! API error types for the relay HTTP API.
//!
//! Every rejection produced by request validation is one of the variants of
//! [`APIError`]. Validation failures surface as 4xx responses carrying a
//! human-readable message and, where known, the offending parameter path.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
	/// Path of the request parameter that caused the failure
	#[serde(skip_serializing_if = "Option::is_none")]
	pub param: Option<String>,
	/// Additional error context
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
	/// Suggested retry delay in seconds
	#[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
	pub retry_after: Option<u64>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum APIError {
	/// Malformed or semantically inconsistent input (400).
	InvalidParam {
		message: String,
		param: Option<String>,
	},
	/// Caller is not authorized for the operation (403).
	Forbidden { message: String },
	/// A downstream collaborator is unavailable (503).
	ServiceUnavailable {
		error_type: String,
		message: String,
		retry_after: Option<u64>,
	},
	/// Internal server error (500).
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Creates an invalid-parameter error tied to a request field path.
	pub fn invalid_param(message: impl Into<String>, param: impl Into<String>) -> Self {
		APIError::InvalidParam {
			message: message.into(),
			param: Some(param.into()),
		}
	}

	/// Creates an invalid-parameter error that is not tied to one field.
	pub fn invalid_input(message: impl Into<String>) -> Self {
		APIError::InvalidParam {
			message: message.into(),
			param: None,
		}
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		APIError::Forbidden {
			message: message.into(),
		}
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::InvalidParam { .. } => 400,
			APIError::Forbidden { .. } => 403,
			APIError::ServiceUnavailable { .. } => 503,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Returns the parameter path attached to an invalid-parameter error.
	pub fn param(&self) -> Option<&str> {
		match self {
			APIError::InvalidParam { param, .. } => param.as_deref(),
			_ => None,
		}
	}

	/// Returns the human-readable message of the error.
	pub fn message(&self) -> &str {
		match self {
			APIError::InvalidParam { message, .. }
			| APIError::Forbidden { message }
			| APIError::ServiceUnavailable { message, .. }
			| APIError::InternalServerError { message, .. } => message,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			APIError::InvalidParam { message, param } => ErrorResponse {
				error: "INVALID_PARAM".to_string(),
				message: message.clone(),
				param: param.clone(),
				details: None,
				retry_after: None,
			},
			APIError::Forbidden { message } => ErrorResponse {
				error: "FORBIDDEN".to_string(),
				message: message.clone(),
				param: None,
				details: None,
				retry_after: None,
			},
			APIError::ServiceUnavailable {
				error_type,
				message,
				retry_after,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				param: None,
				details: None,
				retry_after: *retry_after,
			},
			APIError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				param: None,
				details: None,
				retry_after: None,
			},
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::InvalidParam {
				message,
				param: Some(param),
			} => write!(f, "Invalid parameter '{}': {}", param, message),
			APIError::InvalidParam {
				message,
				param: None,
			} => write!(f, "Invalid parameter: {}", message),
			APIError::Forbidden { message } => write!(f, "Forbidden: {}", message),
			APIError::ServiceUnavailable { message, .. } => {
				write!(f, "Service Unavailable: {}", message)
			},
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl IntoResponse for APIError {
	fn into_response(self) -> Response {
		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_error_response())).into_response()
	}
}
