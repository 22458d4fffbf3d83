// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core contract for the SlashTrace error reporting dispatcher.
//!
//! This crate provides the shared types that tie the dispatcher and its
//! backend adapters together:
//! - The [`EventHandler`] trait that every backend adapter implements
//! - [`HandlerSignal`] return values that drive dispatcher flow control
//! - The [`User`] context value object attached to error reports
//! - [`EventHandlerError`] for surfacing backend failures to the dispatcher
//!
//! The dispatcher owns a collection of registered handlers and invokes them
//! uniformly. Adapters (for example `slashtrace-sentry`) translate these
//! calls into their backend SDK's vocabulary.

pub mod breadcrumb;
pub mod error;
pub mod handler;
pub mod user;

pub use breadcrumb::{merge_title, MESSAGE_KEY};
pub use error::EventHandlerError;
pub use handler::{EventHandler, HandlerSignal};
pub use user::User;
