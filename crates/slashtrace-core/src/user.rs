// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User context attached to error reports.

use serde::{Deserialize, Serialize};

/// The user on whose behalf the application was running when an error
/// occurred.
///
/// All fields are optional. Absent fields stay `None` and are omitted when
/// forwarded to a backend, so the backend only receives the subset of
/// identifying fields actually known. `None` and empty string are distinct
/// on purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: Option<String>,
	pub email: Option<String>,
	pub name: Option<String>,
}

impl User {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
}
