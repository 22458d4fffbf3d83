// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sentry backend adapter for the SlashTrace error reporting dispatcher.
//!
//! [`SentryHandler`] implements the [`EventHandler`](slashtrace_core::EventHandler)
//! contract by translating dispatcher calls into Sentry client calls:
//! exception capture, user context, breadcrumbs, release and application
//! path. The shipped client, [`SentrySession`], is a synchronous store-API
//! client built from a DSN; tests and embedders can inject any
//! [`SentryClient`] instead.
//!
//! # Example
//!
//! ```ignore
//! use slashtrace_core::{EventHandler, User};
//! use slashtrace_sentry::SentryHandler;
//!
//! let handler = SentryHandler::from_dsn("https://public_key@sentry.example.com/42")?;
//! handler.set_release("1.0.0");
//! handler.set_user(&User::new().with_email("pfry@planetexpress.com"));
//!
//! if let Err(e) = run() {
//!     handler.handle_exception(&e)?;
//! }
//! ```

pub mod backtrace;
mod client;
mod dsn;
mod error;
mod handler;
mod panic;
mod session;

pub use client::SentryClient;
pub use dsn::Dsn;
pub use error::{Result, SentryError};
pub use handler::SentryHandler;
pub use session::{SentrySession, SentrySessionBuilder};
