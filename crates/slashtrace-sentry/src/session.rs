// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Synchronous Sentry session: scope state plus store-endpoint transport.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::backtrace::{capture_backtrace, classify_frames, Stacktrace};
use crate::client::SentryClient;
use crate::dsn::Dsn;
use crate::error::{Result, SentryError};

/// SDK name for identification.
const SDK_NAME: &str = "slashtrace-sentry";
/// SDK version for identification.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Category attached to breadcrumbs recorded through the handler.
const BREADCRUMB_CATEGORY: &str = "error_reporting";

/// Maximum number of breadcrumbs to keep.
const MAX_BREADCRUMBS: usize = 100;

/// Timeout for reports sent from inside a panic hook.
const PANIC_REPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for constructing a [`SentrySession`].
pub struct SentrySessionBuilder {
	dsn: Option<String>,
	release: Option<String>,
	environment: Option<String>,
	application_path: Option<PathBuf>,
	max_breadcrumbs: usize,
	request_timeout: Duration,
	default_integrations: bool,
}

impl SentrySessionBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			dsn: None,
			release: None,
			environment: None,
			application_path: None,
			max_breadcrumbs: MAX_BREADCRUMBS,
			request_timeout: Duration::from_secs(30),
			default_integrations: true,
		}
	}

	/// Sets the DSN identifying the Sentry project.
	///
	/// Example: `https://public_key@sentry.example.com/42`
	pub fn dsn(mut self, dsn: impl Into<String>) -> Self {
		self.dsn = Some(dsn.into());
		self
	}

	/// Sets the release version attached to events.
	pub fn release(mut self, release: impl Into<String>) -> Self {
		self.release = Some(release.into());
		self
	}

	/// Sets the environment name.
	///
	/// Example: `production`, `staging`, `development`
	pub fn environment(mut self, environment: impl Into<String>) -> Self {
		self.environment = Some(environment.into());
		self
	}

	/// Sets the application root path for in-app frame classification.
	pub fn application_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.application_path = Some(path.into());
		self
	}

	/// Sets the maximum number of breadcrumbs to keep.
	pub fn max_breadcrumbs(mut self, max: usize) -> Self {
		self.max_breadcrumbs = max;
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	/// Enables or disables default integrations.
	///
	/// The one default integration is a chaining panic hook that reports
	/// unhandled panics through this session. Disable it when the session
	/// is driven by an outer dispatcher that already owns exception flow,
	/// or in tests that need deterministic behavior.
	pub fn default_integrations(mut self, enabled: bool) -> Self {
		self.default_integrations = enabled;
		self
	}

	/// Builds the session, validating the DSN and constructing the HTTP
	/// client.
	pub fn build(self) -> Result<SentrySession> {
		let dsn: Dsn = self
			.dsn
			.ok_or_else(|| SentryError::InvalidDsn("DSN is required".to_string()))?
			.parse()?;

		let http = reqwest::blocking::Client::builder()
			.user_agent(format!("{}/{}", SDK_NAME, SDK_VERSION))
			.timeout(self.request_timeout)
			.build()?;

		let inner = Arc::new(SessionInner {
			dsn,
			http,
			max_breadcrumbs: self.max_breadcrumbs,
			scope: Mutex::new(Scope {
				user: None,
				breadcrumbs: Vec::new(),
				release: self.release,
				environment: self.environment,
				application_path: self.application_path,
			}),
		});

		if self.default_integrations {
			crate::panic::install_panic_hook(Arc::clone(&inner));
		}

		info!(
			host = %inner.dsn.host(),
			project_id = %inner.dsn.project_id(),
			"Sentry session initialized"
		);

		Ok(SentrySession { inner })
	}
}

impl Default for SentrySessionBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Scope state attached to every captured event.
struct Scope {
	user: Option<Map<String, Value>>,
	breadcrumbs: Vec<WireBreadcrumb>,
	release: Option<String>,
	environment: Option<String>,
	application_path: Option<PathBuf>,
}

/// Internal session state shared with the panic hook.
pub(crate) struct SessionInner {
	dsn: Dsn,
	http: reqwest::blocking::Client,
	max_breadcrumbs: usize,
	scope: Mutex<Scope>,
}

impl SessionInner {
	fn scope(&self) -> MutexGuard<'_, Scope> {
		// A panic while the scope is held should not disable reporting.
		self.scope.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Snapshot the scope into a store payload for one exception.
	fn build_event(
		&self,
		exception_type: &str,
		exception_value: &str,
		mut stacktrace: Stacktrace,
	) -> StoreRequest {
		let (user, breadcrumbs, release, environment, application_path) = {
			let scope = self.scope();
			(
				scope.user.clone(),
				scope.breadcrumbs.clone(),
				scope.release.clone(),
				scope.environment.clone(),
				scope.application_path.clone(),
			)
		};

		if let Some(root) = &application_path {
			classify_frames(&mut stacktrace, root);
		}
		// Sentry wants the outermost frame first.
		stacktrace.frames.reverse();

		StoreRequest {
			event_id: Uuid::new_v4().simple().to_string(),
			timestamp: Utc::now().to_rfc3339(),
			platform: "native",
			sdk: SdkInfo {
				name: SDK_NAME,
				version: SDK_VERSION,
			},
			release,
			environment,
			user,
			breadcrumbs: Breadcrumbs {
				values: breadcrumbs,
			},
			exception: ExceptionValues {
				values: vec![WireException {
					ty: exception_type.to_string(),
					value: exception_value.to_string(),
					stacktrace: if stacktrace.frames.is_empty() {
						None
					} else {
						Some(stacktrace)
					},
				}],
			},
		}
	}

	fn send(&self, request: &StoreRequest, http: &reqwest::blocking::Client) -> Result<()> {
		let url = self.dsn.store_url();
		debug!(url = %url, event_id = %request.event_id, "sending event");

		let response = http
			.post(&url)
			.header(
				"X-Sentry-Auth",
				self.dsn.auth_header(&format!("{}/{}", SDK_NAME, SDK_VERSION)),
			)
			.json(request)
			.send()?;

		if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
			let retry_after = response
				.headers()
				.get("Retry-After")
				.and_then(|v| v.to_str().ok())
				.and_then(|s| s.parse().ok());
			return Err(SentryError::RateLimited {
				retry_after_secs: retry_after,
			});
		}

		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().unwrap_or_default();
			error!(status, message = %message, "event rejected");
			return Err(SentryError::ServerError { status, message });
		}

		debug!(event_id = %request.event_id, "event accepted");
		Ok(())
	}

	/// Report a panic. Runs inside the panic hook, so transport uses a
	/// fresh short-timeout client rather than the session one.
	pub(crate) fn capture_panic(&self, message: &str, stacktrace: Stacktrace) -> Result<()> {
		let request = self.build_event("panic", message, stacktrace);
		let http = reqwest::blocking::Client::builder()
			.user_agent(format!("{}/{}", SDK_NAME, SDK_VERSION))
			.timeout(PANIC_REPORT_TIMEOUT)
			.build()?;
		self.send(&request, &http)
	}
}

/// A synchronous Sentry client bound to one DSN.
///
/// Scope state (user context, breadcrumbs, release, application path) is
/// buffered locally and attached to every captured event; only capture
/// performs transport.
///
/// # Example
///
/// ```ignore
/// use slashtrace_sentry::SentrySession;
///
/// let session = SentrySession::builder()
///     .dsn("https://public_key@sentry.example.com/42")
///     .release(env!("CARGO_PKG_VERSION"))
///     .environment("production")
///     .build()?;
/// ```
#[derive(Clone)]
pub struct SentrySession {
	inner: Arc<SessionInner>,
}

impl SentrySession {
	/// Creates a new builder for constructing a session.
	pub fn builder() -> SentrySessionBuilder {
		SentrySessionBuilder::new()
	}
}

impl SentryClient for SentrySession {
	fn capture_exception(&self, exception: &(dyn Error + 'static)) -> Result<()> {
		let request = self.inner.build_event(
			std::any::type_name_of_val(exception),
			&exception.to_string(),
			capture_backtrace(),
		);
		self.inner.send(&request, &self.inner.http)
	}

	fn set_user_context(&self, user: Map<String, Value>) {
		self.inner.scope().user = Some(user);
	}

	fn record_breadcrumb(&self, data: Map<String, Value>) {
		let mut data = data;
		let message = data.remove(slashtrace_core::MESSAGE_KEY).map(|v| match v {
			Value::String(s) => s,
			other => other.to_string(),
		});

		let mut scope = self.inner.scope();
		scope.breadcrumbs.push(WireBreadcrumb {
			timestamp: Utc::now().to_rfc3339(),
			category: BREADCRUMB_CATEGORY,
			message,
			data,
		});

		// Trim to max size, dropping the oldest first.
		while scope.breadcrumbs.len() > self.inner.max_breadcrumbs {
			scope.breadcrumbs.remove(0);
		}
	}

	fn set_release(&self, release: &str) {
		self.inner.scope().release = Some(release.to_string());
	}

	fn set_application_root(&self, path: &Path) {
		self.inner.scope().application_path = Some(path.to_path_buf());
	}
}

/// Store endpoint payload.
#[derive(Debug, Serialize)]
struct StoreRequest {
	event_id: String,
	timestamp: String,
	platform: &'static str,
	sdk: SdkInfo,
	#[serde(skip_serializing_if = "Option::is_none")]
	release: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	environment: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	user: Option<Map<String, Value>>,
	#[serde(skip_serializing_if = "Breadcrumbs::is_empty")]
	breadcrumbs: Breadcrumbs,
	exception: ExceptionValues,
}

#[derive(Debug, Serialize)]
struct SdkInfo {
	name: &'static str,
	version: &'static str,
}

#[derive(Debug, Serialize)]
struct Breadcrumbs {
	values: Vec<WireBreadcrumb>,
}

impl Breadcrumbs {
	fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[derive(Debug, Clone, Serialize)]
struct WireBreadcrumb {
	timestamp: String,
	category: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<String>,
	#[serde(skip_serializing_if = "Map::is_empty")]
	data: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct ExceptionValues {
	values: Vec<WireException>,
}

#[derive(Debug, Serialize)]
struct WireException {
	#[serde(rename = "type")]
	ty: String,
	value: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	stacktrace: Option<Stacktrace>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn test_session() -> SentrySession {
		SentrySession::builder()
			.dsn("https://abc123@sentry.example.com/42")
			.default_integrations(false)
			.build()
			.unwrap()
	}

	#[test]
	fn builder_requires_dsn() {
		let result = SentrySession::builder().build();
		assert!(matches!(result, Err(SentryError::InvalidDsn(_))));
	}

	#[test]
	fn builder_rejects_malformed_dsn() {
		let result = SentrySession::builder()
			.dsn("not a dsn")
			.default_integrations(false)
			.build();
		assert!(matches!(result, Err(SentryError::InvalidDsn(_))));
	}

	#[test]
	fn user_context_is_replaced_not_merged() {
		let session = test_session();

		let mut first = Map::new();
		first.insert("id".to_string(), json!("1"));
		first.insert("email".to_string(), json!("old@example.com"));
		session.set_user_context(first);

		let mut second = Map::new();
		second.insert("email".to_string(), json!("new@example.com"));
		session.set_user_context(second);

		let scope = session.inner.scope();
		let user = scope.user.as_ref().unwrap();
		assert_eq!(user.len(), 1);
		assert_eq!(user["email"], json!("new@example.com"));
	}

	#[test]
	fn breadcrumb_message_is_extracted_from_data() {
		let session = test_session();

		let mut data = Map::new();
		data.insert("message".to_string(), json!("Something happened!"));
		data.insert("foo".to_string(), json!("bar"));
		session.record_breadcrumb(data);

		let scope = session.inner.scope();
		let crumb = &scope.breadcrumbs[0];
		assert_eq!(crumb.message.as_deref(), Some("Something happened!"));
		assert_eq!(crumb.category, BREADCRUMB_CATEGORY);
		assert_eq!(crumb.data["foo"], json!("bar"));
		assert!(!crumb.data.contains_key("message"));
	}

	#[test]
	fn breadcrumbs_are_capped_oldest_first() {
		let session = SentrySession::builder()
			.dsn("https://abc123@sentry.example.com/42")
			.default_integrations(false)
			.max_breadcrumbs(3)
			.build()
			.unwrap();

		for i in 0..5 {
			let mut data = Map::new();
			data.insert("message".to_string(), json!(format!("crumb {}", i)));
			session.record_breadcrumb(data);
		}

		let scope = session.inner.scope();
		assert_eq!(scope.breadcrumbs.len(), 3);
		assert_eq!(scope.breadcrumbs[0].message.as_deref(), Some("crumb 2"));
		assert_eq!(scope.breadcrumbs[2].message.as_deref(), Some("crumb 4"));
	}

	#[test]
	fn release_and_application_root_land_in_scope() {
		let session = test_session();

		session.set_release("1.0.0");
		session.set_application_root(Path::new("/srv/my_app"));

		let scope = session.inner.scope();
		assert_eq!(scope.release.as_deref(), Some("1.0.0"));
		assert_eq!(
			scope.application_path.as_deref(),
			Some(Path::new("/srv/my_app"))
		);
	}

	#[test]
	fn event_payload_omits_absent_fields() {
		let session = test_session();

		let request = session
			.inner
			.build_event("error", "boom", Stacktrace::default());
		let payload = serde_json::to_value(&request).unwrap();

		assert!(payload.get("release").is_none());
		assert!(payload.get("environment").is_none());
		assert!(payload.get("user").is_none());
		assert!(payload.get("breadcrumbs").is_none());
		assert_eq!(payload["platform"], json!("native"));
		assert_eq!(payload["exception"]["values"][0]["value"], json!("boom"));
		assert!(payload["exception"]["values"][0].get("stacktrace").is_none());
	}

	#[test]
	fn event_payload_carries_scope_state() {
		let session = SentrySession::builder()
			.dsn("https://abc123@sentry.example.com/42")
			.default_integrations(false)
			.release("1.0.0")
			.environment("staging")
			.build()
			.unwrap();

		let mut user = Map::new();
		user.insert("email".to_string(), json!("pfry@planetexpress.com"));
		session.set_user_context(user);

		let mut data = Map::new();
		data.insert("message".to_string(), json!("checkout started"));
		session.record_breadcrumb(data);

		let request = session
			.inner
			.build_event("error", "boom", Stacktrace::default());
		let payload = serde_json::to_value(&request).unwrap();

		assert_eq!(payload["release"], json!("1.0.0"));
		assert_eq!(payload["environment"], json!("staging"));
		assert_eq!(payload["user"]["email"], json!("pfry@planetexpress.com"));
		assert_eq!(
			payload["breadcrumbs"]["values"][0]["message"],
			json!("checkout started")
		);
	}

	#[test]
	fn event_id_is_dashless() {
		let session = test_session();
		let request = session
			.inner
			.build_event("error", "boom", Stacktrace::default());
		assert_eq!(request.event_id.len(), 32);
		assert!(!request.event_id.contains('-'));
	}
}
