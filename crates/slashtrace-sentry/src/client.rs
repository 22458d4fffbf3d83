// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The outbound contract consumed by [`SentryHandler`](crate::SentryHandler).

use serde_json::{Map, Value};
use std::error::Error;
use std::path::Path;

use crate::error::Result;

/// A Sentry client or session handle.
///
/// [`SentrySession`](crate::SentrySession) is the shipped implementation;
/// tests inject their own. Only [`capture_exception`](Self::capture_exception)
/// performs transport and may fail. The setters mutate backend-local scope
/// state that is attached to later captures.
pub trait SentryClient: Send + Sync {
	/// Captures an exception event and delivers it to Sentry.
	fn capture_exception(&self, exception: &(dyn Error + 'static)) -> Result<()>;

	/// Replaces the current user context with `user`.
	fn set_user_context(&self, user: Map<String, Value>);

	/// Records a breadcrumb from its data mapping.
	fn record_breadcrumb(&self, data: Map<String, Value>);

	/// Sets the release attached to subsequent events.
	fn set_release(&self, release: &str);

	/// Sets the application root used to classify in-app stack frames.
	fn set_application_root(&self, path: &Path);
}
