//! Capsule Care Core - Shared types library.
//!
//! This crate provides common types used across all Capsule Care components:
//! - `storefront` - Navigation, carousel and home page state orchestration
//! - `cli` - Headless preview and configuration tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no timers, no collaborator
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Route paths, viewport classes, identities, cart lines and
//!   notification severities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
