// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumb merge rule shared by backend adapters.

use serde_json::{Map, Value};

/// Reserved key under which a breadcrumb's title is stored in its data
/// mapping.
pub const MESSAGE_KEY: &str = "message";

/// Merges `title` into `data` under [`MESSAGE_KEY`].
///
/// The title is applied after the caller's data, so an existing `message`
/// entry is silently overridden by the explicit title.
pub fn merge_title(title: &str, mut data: Map<String, Value>) -> Map<String, Value> {
	data.insert(MESSAGE_KEY.to_string(), Value::String(title.to_string()));
	data
}
