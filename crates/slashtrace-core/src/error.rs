// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error type surfaced by event handlers to the dispatcher.

use std::error::Error;
use thiserror::Error;

/// A backend failure wrapped for the dispatcher.
///
/// Preserves the original failure's message, an optional numeric code
/// (an HTTP status for wire backends), and the failure itself as the
/// error source, so callers can inspect or downcast the cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EventHandlerError {
	message: String,
	code: Option<u16>,
	#[source]
	cause: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl EventHandlerError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			code: None,
			cause: None,
		}
	}

	/// Wraps a backend failure, taking its display form as the message.
	pub fn from_cause(cause: impl Error + Send + Sync + 'static) -> Self {
		Self {
			message: cause.to_string(),
			code: None,
			cause: Some(Box::new(cause)),
		}
	}

	pub fn with_code(mut self, code: u16) -> Self {
		self.code = Some(code);
		self
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn code(&self) -> Option<u16> {
		self.code
	}

	/// The original backend failure, if any. Downcastable to its concrete
	/// type.
	pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
		self.cause.as_deref()
	}
}
