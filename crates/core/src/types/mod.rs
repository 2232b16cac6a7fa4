//! Core types for Capsule Care.
//!
//! This module provides type-safe wrappers for the values the storefront UI
//! reads from its collaborators.

pub mod cart;
pub mod identity;
pub mod route;
pub mod severity;
pub mod viewport;

pub use cart::CartLine;
pub use identity::Identity;
pub use route::{RoutePath, RoutePathError};
pub use severity::Severity;
pub use viewport::{MOBILE_BREAKPOINT_PX, ViewportClass};
