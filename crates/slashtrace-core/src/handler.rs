// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The event handler contract implemented by backend adapters.

use serde_json::{Map, Value};
use std::error::Error;
use std::path::Path;

use crate::error::EventHandlerError;
use crate::user::User;

/// Flow control signal returned by [`EventHandler::handle_exception`].
///
/// The dispatcher invokes registered handlers in order; each handler tells
/// it whether to keep going or stop processing the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSignal {
	/// Proceed to the next registered handler.
	Continue,
	/// Stop processing; no further handlers see this event.
	Exit,
}

/// Contract between the dispatcher and a backend adapter.
///
/// Only [`handle_exception`](Self::handle_exception) is fallible. The four
/// context setters are fire-and-forget: they mutate backend-local scope
/// state and any failure there propagates unmodified rather than being
/// wrapped. Exception capture is the one call expected to run in contexts
/// where a secondary failure must be caught and reported cleanly.
pub trait EventHandler {
	/// Forwards an exception to the backend for capture.
	fn handle_exception(
		&self,
		exception: &(dyn Error + 'static),
	) -> Result<HandlerSignal, EventHandlerError>;

	/// Installs `user` as the backend's current user context, replacing any
	/// previously set context wholesale.
	fn set_user(&self, user: &User);

	/// Records a contextual breadcrumb. `title` is merged into `data` under
	/// the reserved [`MESSAGE_KEY`](crate::breadcrumb::MESSAGE_KEY) and the
	/// combined mapping is forwarded to the backend.
	fn record_breadcrumb(&self, title: &str, data: Map<String, Value>);

	/// Sets the release identifier attached to subsequent reports.
	fn set_release(&self, release: &str);

	/// Sets the application root path the backend uses to classify in-app
	/// vs third-party stack frames.
	fn set_application_path(&self, path: &Path);
}
