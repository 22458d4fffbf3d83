// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! DSN parsing and derived endpoint/auth values.

use reqwest::Url;
use std::fmt;
use std::str::FromStr;

use crate::error::SentryError;

const SENTRY_PROTOCOL_VERSION: u8 = 7;

/// A parsed Sentry DSN of the form `{scheme}://{public_key}@{host}/{project_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
	scheme: String,
	public_key: String,
	host: String,
	port: Option<u16>,
	project_id: String,
}

impl Dsn {
	pub fn public_key(&self) -> &str {
		&self.public_key
	}

	pub fn host(&self) -> &str {
		&self.host
	}

	pub fn project_id(&self) -> &str {
		&self.project_id
	}

	/// The store endpoint events are POSTed to.
	pub fn store_url(&self) -> String {
		format!(
			"{}://{}/api/{}/store/",
			self.scheme,
			self.authority(),
			self.project_id
		)
	}

	/// The `X-Sentry-Auth` header value identifying this client.
	pub fn auth_header(&self, client: &str) -> String {
		format!(
			"Sentry sentry_version={}, sentry_client={}, sentry_key={}",
			SENTRY_PROTOCOL_VERSION, client, self.public_key
		)
	}

	fn authority(&self) -> String {
		match self.port {
			Some(port) => format!("{}:{}", self.host, port),
			None => self.host.clone(),
		}
	}
}

impl fmt::Display for Dsn {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}://{}@{}/{}",
			self.scheme,
			self.public_key,
			self.authority(),
			self.project_id
		)
	}
}

impl FromStr for Dsn {
	type Err = SentryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let url = Url::parse(s).map_err(|e| SentryError::InvalidDsn(e.to_string()))?;

		let scheme = url.scheme();
		if scheme != "http" && scheme != "https" {
			return Err(SentryError::InvalidDsn(format!(
				"unsupported scheme: {scheme}"
			)));
		}

		let public_key = url.username();
		if public_key.is_empty() {
			return Err(SentryError::InvalidDsn("missing public key".to_string()));
		}

		let host = url
			.host_str()
			.ok_or_else(|| SentryError::InvalidDsn("missing host".to_string()))?;

		let project_id = url
			.path_segments()
			.and_then(|mut segments| segments.next_back())
			.filter(|segment| !segment.is_empty())
			.ok_or_else(|| SentryError::InvalidDsn("missing project id".to_string()))?;

		Ok(Self {
			scheme: scheme.to_string(),
			public_key: public_key.to_string(),
			host: host.to_string(),
			port: url.port(),
			project_id: project_id.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_a_full_dsn() {
		let dsn: Dsn = "https://abc123@sentry.example.com/42".parse().unwrap();
		assert_eq!(dsn.public_key(), "abc123");
		assert_eq!(dsn.host(), "sentry.example.com");
		assert_eq!(dsn.project_id(), "42");
	}

	#[test]
	fn store_url_targets_the_project() {
		let dsn: Dsn = "https://abc123@sentry.example.com/42".parse().unwrap();
		assert_eq!(dsn.store_url(), "https://sentry.example.com/api/42/store/");
	}

	#[test]
	fn port_is_preserved() {
		let dsn: Dsn = "http://abc123@localhost:9000/1".parse().unwrap();
		assert_eq!(dsn.store_url(), "http://localhost:9000/api/1/store/");
	}

	#[test]
	fn auth_header_carries_key_and_client() {
		let dsn: Dsn = "https://abc123@sentry.example.com/42".parse().unwrap();
		let header = dsn.auth_header("slashtrace-sentry/0.1.0");
		assert_eq!(
			header,
			"Sentry sentry_version=7, sentry_client=slashtrace-sentry/0.1.0, sentry_key=abc123"
		);
	}

	#[test]
	fn rejects_missing_public_key() {
		let result: Result<Dsn, _> = "https://sentry.example.com/42".parse();
		assert!(matches!(result, Err(SentryError::InvalidDsn(_))));
	}

	#[test]
	fn rejects_missing_project_id() {
		let result: Result<Dsn, _> = "https://abc123@sentry.example.com".parse();
		assert!(matches!(result, Err(SentryError::InvalidDsn(_))));
	}

	#[test]
	fn rejects_non_http_schemes() {
		let result: Result<Dsn, _> = "ftp://abc123@sentry.example.com/42".parse();
		assert!(matches!(result, Err(SentryError::InvalidDsn(_))));
	}

	#[test]
	fn rejects_garbage() {
		let result: Result<Dsn, _> = "not a dsn".parse();
		assert!(matches!(result, Err(SentryError::InvalidDsn(_))));
	}

	#[test]
	fn display_roundtrips() {
		let raw = "https://abc123@sentry.example.com/42";
		let dsn: Dsn = raw.parse().unwrap();
		assert_eq!(dsn.to_string(), raw);
	}

	proptest::proptest! {
		#[test]
		fn parse_display_roundtrip(key in "[a-f0-9]{8,32}", project in "[0-9]{1,6}") {
			let raw = format!("https://{}@sentry.example.com/{}", key, project);
			let dsn: Dsn = raw.parse().unwrap();
			proptest::prop_assert_eq!(dsn.to_string(), raw);
		}
	}
}
