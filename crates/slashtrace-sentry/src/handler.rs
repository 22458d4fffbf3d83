// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The Sentry event handler registered with the dispatcher.

use serde_json::{Map, Value};
use std::error::Error;
use std::path::Path;

use slashtrace_core::{merge_title, EventHandler, EventHandlerError, HandlerSignal, User};

use crate::client::SentryClient;
use crate::error::{Result, SentryError};
use crate::session::SentrySession;

/// Forwards dispatcher calls to a Sentry client.
///
/// Holds exactly one client handle for its lifetime. Construct either by
/// injecting a handle ([`new`](Self::new)) or from a DSN
/// ([`from_dsn`](Self::from_dsn)), which builds a [`SentrySession`]
/// internally with default integrations disabled so the handler behaves
/// deterministically under a dispatcher.
pub struct SentryHandler {
	sentry: Box<dyn SentryClient>,
}

impl SentryHandler {
	/// Wraps an already-constructed client or session handle.
	pub fn new(client: impl SentryClient + 'static) -> Self {
		Self {
			sentry: Box::new(client),
		}
	}

	/// Builds a session from a DSN and wraps it.
	pub fn from_dsn(dsn: &str) -> Result<Self> {
		let session = SentrySession::builder()
			.dsn(dsn)
			.default_integrations(false)
			.build()?;
		Ok(Self::new(session))
	}
}

impl EventHandler for SentryHandler {
	fn handle_exception(
		&self,
		exception: &(dyn Error + 'static),
	) -> std::result::Result<HandlerSignal, EventHandlerError> {
		self.sentry.capture_exception(exception).map_err(|err| {
			let code = match &err {
				SentryError::ServerError { status, .. } => Some(*status),
				_ => None,
			};
			let wrapped = EventHandlerError::from_cause(err);
			match code {
				Some(code) => wrapped.with_code(code),
				None => wrapped,
			}
		})?;

		Ok(HandlerSignal::Continue)
	}

	fn set_user(&self, user: &User) {
		let mut fields = Map::new();
		if let Some(id) = &user.id {
			fields.insert("id".to_string(), Value::String(id.clone()));
		}
		if let Some(email) = &user.email {
			fields.insert("email".to_string(), Value::String(email.clone()));
		}
		if let Some(name) = &user.name {
			fields.insert("name".to_string(), Value::String(name.clone()));
		}
		self.sentry.set_user_context(fields);
	}

	fn record_breadcrumb(&self, title: &str, data: Map<String, Value>) {
		self.sentry.record_breadcrumb(merge_title(title, data));
	}

	fn set_release(&self, release: &str) {
		self.sentry.set_release(release);
	}

	fn set_application_path(&self, path: &Path) {
		self.sentry.set_application_root(path);
	}
}
