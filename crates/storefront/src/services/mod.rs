//! Collaborator contracts consumed by the storefront UI core.
//!
//! The UI never owns session, cart, routing or notification state. It reads
//! and commands these subsystems through the narrow traits below, injected as
//! `Arc<dyn Trait>` at construction time.
//!
//! # Collaborators
//!
//! - [`SessionProvider`] - Signed-in identity and sign-out
//! - [`CartStore`] - Cart line items (read-only from the UI's point of view)
//! - [`Router`] - URL-to-view navigation
//! - [`ViewportSignal`] - Current responsive mode
//! - [`Notifier`] - Toast delivery
//!
//! [`memory`] provides in-process implementations used by the CLI preview
//! and the test suites.

mod error;
pub mod memory;

pub use error::ServiceError;

use async_trait::async_trait;
use capsule_care_core::{CartLine, Identity, RoutePath, Severity, ViewportClass};
use serde::Serialize;

/// Session / identity provider.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The signed-in identity, or `None` when signed out.
    fn current_identity(&self) -> Option<Identity>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), ServiceError>;
}

/// Cart store. Mutated only by collaborators outside the UI core.
pub trait CartStore: Send + Sync {
    /// Current cart lines, in display order.
    fn line_items(&self) -> Vec<CartLine>;
}

/// Client-side router.
pub trait Router: Send + Sync {
    /// Switch to the view for `request.path`.
    fn navigate(&self, request: &NavigationRequest) -> Result<(), ServiceError>;

    /// The path of the view currently shown.
    fn current_path(&self) -> RoutePath;
}

/// Source of the current viewport class, updated on resize.
pub trait ViewportSignal: Send + Sync {
    fn current_viewport_class(&self) -> ViewportClass;
}

/// Fire-and-forget toast delivery.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// A navigation command handed to the [`Router`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    /// Destination path.
    pub path: RoutePath,
    /// Destination the user originally asked for, when redirected to sign in.
    ///
    /// The auth flow resumes navigation to this path on success.
    pub from: Option<RoutePath>,
}

impl NavigationRequest {
    /// Plain navigation with no resume intent.
    #[must_use]
    pub const fn to(path: RoutePath) -> Self {
        Self { path, from: None }
    }

    /// Redirect to the auth flow, remembering where the user wanted to go.
    #[must_use]
    pub const fn sign_in_then(intended: RoutePath) -> Self {
        Self {
            path: RoutePath::AUTH,
            from: Some(intended),
        }
    }
}

/// A user-visible toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    /// Create a notification.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}
