// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: report an error to Sentry through the SlashTrace handler.
//!
//! Run with:
//!   cargo run --example capture -p slashtrace-sentry

use serde_json::{json, Map};
use slashtrace_core::{EventHandler, User};
use slashtrace_sentry::SentryHandler;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let dsn = std::env::var("SENTRY_DSN").expect("SENTRY_DSN environment variable required");

	println!("Initializing Sentry handler...");
	let handler = SentryHandler::from_dsn(&dsn)?;

	// Context attached to every subsequent report
	handler.set_release("0.1.0-example");
	handler.set_application_path(Path::new(env!("CARGO_MANIFEST_DIR")));
	handler.set_user(
		&User::new()
			.with_id("user_example_123")
			.with_email("example@example.com"),
	);

	let mut data = Map::new();
	data.insert("step".to_string(), json!("checkout"));
	handler.record_breadcrumb("Something happened!", data);

	// Simulate a failure and report it
	let error = std::io::Error::new(std::io::ErrorKind::Other, "payment service unreachable");
	let signal = handler.handle_exception(&error)?;
	println!("Captured, dispatcher signal: {:?}", signal);

	Ok(())
}
