//! Capsule Care storefront UI-state core.
//!
//! Headless state and orchestration for the storefront header, home page
//! and promo carousel. Rendering is left to the host; this crate decides
//! what is shown and reacts to customer intents.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod ui;
