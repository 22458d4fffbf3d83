// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backtrace capture and parsing for exception and panic events.

use rustc_demangle::demangle;
use serde::Serialize;
use std::backtrace::Backtrace;
use std::path::Path;

/// A single stack frame in Sentry's wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub function: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filename: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lineno: Option<u32>,
	pub in_app: bool,
}

/// An ordered list of frames, innermost first as captured.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stacktrace {
	pub frames: Vec<Frame>,
}

/// Capture a fresh backtrace and parse it.
pub fn capture_backtrace() -> Stacktrace {
	let backtrace = Backtrace::force_capture();
	parse_backtrace(&backtrace)
}

/// Parse a Rust backtrace into a Stacktrace.
pub fn parse_backtrace(backtrace: &Backtrace) -> Stacktrace {
	let bt_string = format!("{:#}", backtrace);
	Stacktrace {
		frames: parse_backtrace_string(&bt_string),
	}
}

/// Re-classify frames once an application root is known.
///
/// Frames whose source file lives under `app_root` are in-app; frames with
/// a source file elsewhere (registry checkouts, the rust toolchain) are
/// not. Frames without file information keep their symbol-based
/// classification.
pub fn classify_frames(stacktrace: &mut Stacktrace, app_root: &Path) {
	for frame in &mut stacktrace.frames {
		if let Some(filename) = &frame.filename {
			frame.in_app = Path::new(filename).starts_with(app_root);
		}
	}
}

fn parse_backtrace_string(bt_string: &str) -> Vec<Frame> {
	let mut frames: Vec<Frame> = Vec::new();

	for line in bt_string.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		// Location lines ("at src/main.rs:10:5") belong to the frame above.
		if let Some(location) = line.strip_prefix("at ") {
			if let Some(frame) = frames.last_mut() {
				let (filename, lineno) = parse_location(location);
				frame.filename = filename;
				frame.lineno = lineno;
			}
			continue;
		}

		if let Some(frame) = parse_frame_line(line) {
			frames.push(frame);
		}
	}

	frames
}

/// Parse a single symbol line into a Frame.
///
/// Lines are typically `N: function_name` or a bare `function_name`.
fn parse_frame_line(line: &str) -> Option<Frame> {
	let function_part = match line.find(':') {
		Some(idx) if line[..idx].trim().parse::<u32>().is_ok() => line[idx + 1..].trim(),
		_ => line,
	};

	if function_part.is_empty() {
		return None;
	}

	let demangled = demangle(function_part).to_string();
	let module = demangled.rfind("::").map(|idx| demangled[..idx].to_string());
	let in_app = is_in_app_symbol(&demangled);

	Some(Frame {
		function: Some(demangled),
		module,
		filename: None,
		lineno: None,
		in_app,
	})
}

/// Split `src/main.rs:10:5` into a filename and line number.
fn parse_location(location: &str) -> (Option<String>, Option<u32>) {
	let mut parts = location.rsplitn(3, ':');
	let _col = parts.next();
	let lineno = parts.next().and_then(|s| s.parse().ok());
	match parts.next() {
		Some(filename) if !filename.is_empty() => (Some(filename.to_string()), lineno),
		_ => (Some(location.to_string()), None),
	}
}

/// Symbol-based in-app heuristic used when no application root is set.
fn is_in_app_symbol(function: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"backtrace::",
		"<backtrace::",
		"panic_unwind::",
		"<panic_unwind::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
	];

	const SYSTEM_CONTAINS: &[&str] = &[
		"::panic::",
		"::panicking::",
		"::thread::",
		"::rt::",
		"::sys_common::",
	];

	for prefix in SYSTEM_PREFIXES {
		if function.starts_with(prefix) {
			return false;
		}
	}

	for contains in SYSTEM_CONTAINS {
		if function.contains(contains) {
			return false;
		}
	}

	true
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "\
   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:313:13
   1: my_app::orders::submit
             at /srv/my_app/src/orders.rs:88:9
   2: my_app::main
             at /srv/my_app/src/main.rs:12:5
   3: core::ops::function::FnOnce::call_once
             at /rustc/abc/library/core/src/ops/function.rs:250:5
";

	#[test]
	fn parses_symbols_and_locations() {
		let frames = parse_backtrace_string(SAMPLE);
		assert_eq!(frames.len(), 4);

		let submit = &frames[1];
		assert_eq!(submit.function.as_deref(), Some("my_app::orders::submit"));
		assert_eq!(submit.module.as_deref(), Some("my_app::orders"));
		assert_eq!(submit.filename.as_deref(), Some("/srv/my_app/src/orders.rs"));
		assert_eq!(submit.lineno, Some(88));
	}

	#[test]
	fn symbol_heuristic_excludes_std() {
		assert!(!is_in_app_symbol("std::panic::panic_any"));
		assert!(!is_in_app_symbol("core::panicking::panic"));
		assert!(!is_in_app_symbol("alloc::vec::Vec::push"));
	}

	#[test]
	fn symbol_heuristic_includes_user_code() {
		assert!(is_in_app_symbol("my_app::main"));
		assert!(is_in_app_symbol("slashtrace_sentry::session::capture"));
	}

	#[test]
	fn app_root_reclassifies_frames_with_files() {
		let mut stacktrace = Stacktrace {
			frames: parse_backtrace_string(SAMPLE),
		};
		classify_frames(&mut stacktrace, Path::new("/srv/my_app"));

		let in_app: Vec<bool> = stacktrace.frames.iter().map(|f| f.in_app).collect();
		assert_eq!(in_app, vec![false, true, true, false]);
	}

	#[test]
	fn frame_numbers_are_stripped() {
		let frame = parse_frame_line("  5: my_app::main").unwrap();
		assert_eq!(frame.function.as_deref(), Some("my_app::main"));
	}

	#[test]
	fn location_splits_filename_and_line() {
		let (filename, lineno) = parse_location("src/main.rs:10:5");
		assert_eq!(filename.as_deref(), Some("src/main.rs"));
		assert_eq!(lineno, Some(10));
	}

	#[test]
	fn capture_does_not_panic() {
		// Frame content depends on compilation mode and debug info.
		let _stacktrace = capture_backtrace();
	}
}
