// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panic hook integration for automatic crash reporting.

use std::any::Any;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use tracing::{error, info};

use crate::backtrace::capture_backtrace;
use crate::session::SessionInner;

/// Installs a chaining panic hook that reports panics through `session`.
///
/// The previous hook still runs afterwards, so default panic output is
/// preserved.
pub(crate) fn install_panic_hook(session: Arc<SessionInner>) {
	let previous = panic::take_hook();

	panic::set_hook(Box::new(move |info| {
		let message = panic_message(info);
		let stacktrace = capture_backtrace();

		if let Err(err) = session.capture_panic(&message, stacktrace) {
			error!(error = %err, "failed to report panic");
		}

		previous(info);
	}));

	info!("panic hook installed");
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
	let message = payload_message(info.payload());
	match info.location() {
		Some(location) => format!("{} at {}:{}", message, location.file(), location.line()),
		None => message.to_string(),
	}
}

fn payload_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s
	} else {
		"unknown panic payload"
	}
}
