// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Sentry adapter.

use thiserror::Error;

/// Result type alias for Sentry adapter operations.
pub type Result<T> = std::result::Result<T, SentryError>;

/// Errors that can occur while talking to Sentry.
#[derive(Debug, Error)]
pub enum SentryError {
	/// The DSN could not be parsed into key, host and project id.
	#[error("invalid DSN: {0}")]
	InvalidDsn(String),

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Sentry rejected the event.
	#[error("server error (status {status}): {message}")]
	ServerError {
		/// HTTP status code.
		status: u16,
		/// Error message from the server.
		message: String,
	},

	/// Rate limited by the server.
	#[error("rate limited, retry after {retry_after_secs:?} seconds")]
	RateLimited {
		/// Optional Retry-After header value.
		retry_after_secs: Option<u64>,
	},

	/// Failed to serialize the event payload.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}
