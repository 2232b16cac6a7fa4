//! In-process collaborator implementations.
//!
//! These back the CLI preview and the tests. Each one keeps its state behind
//! a `std::sync` lock so it can be shared as `Arc<dyn Trait>` and inspected
//! from the outside while the UI core is driving it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use capsule_care_core::{CartLine, Identity, RoutePath, ViewportClass};

use crate::config::StorefrontConfig;
use crate::state::{Collaborators, UiContext};

use super::{
    CartStore, NavigationRequest, Notification, Notifier, Router, ServiceError, SessionProvider,
    ViewportSignal,
};

// =============================================================================
// Session
// =============================================================================

/// Session held in memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    identity: RwLock<Option<Identity>>,
    sign_out_failure: RwLock<Option<ServiceError>>,
    sign_out_delay: RwLock<Duration>,
}

impl MemorySession {
    /// A signed-out session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A session signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: RwLock::new(Some(identity)),
            ..Self::default()
        }
    }

    /// Replace the current identity.
    pub fn set_identity(&self, identity: Option<Identity>) {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = identity;
    }

    /// Make subsequent sign-out calls fail with `error` (or succeed with `None`).
    pub fn fail_sign_out(&self, error: Option<ServiceError>) {
        *self
            .sign_out_failure
            .write()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Suspend each sign-out call for `delay` before it resolves.
    pub fn set_sign_out_delay(&self, delay: Duration) {
        *self
            .sign_out_delay
            .write()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }
}

#[async_trait]
impl SessionProvider for MemorySession {
    fn current_identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        let delay = *self
            .sign_out_delay
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .sign_out_failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(error) = failure {
            return Err(error);
        }

        self.set_identity(None);
        Ok(())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Cart held in memory.
#[derive(Debug, Default)]
pub struct MemoryCart {
    lines: RwLock<Vec<CartLine>>,
}

impl MemoryCart {
    /// A cart pre-filled with `lines`.
    #[must_use]
    pub const fn with_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines: RwLock::new(lines),
        }
    }

    /// Add a line, merging quantities with an existing line for the same handle.
    pub fn add(&self, line: CartLine) {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = lines.iter_mut().find(|l| l.handle == line.handle) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            lines.push(line);
        }
    }

    /// Set the quantity for `handle`. A quantity of zero removes the line.
    pub fn set_quantity(&self, handle: &str, quantity: u32) {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        if quantity == 0 {
            lines.retain(|l| l.handle != handle);
        } else if let Some(existing) = lines.iter_mut().find(|l| l.handle == handle) {
            existing.quantity = quantity;
        }
    }

    /// Remove every line.
    pub fn clear(&self) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl CartStore for MemoryCart {
    fn line_items(&self) -> Vec<CartLine> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// =============================================================================
// Router
// =============================================================================

/// Router that records every successful navigation.
#[derive(Debug)]
pub struct MemoryRouter {
    current: RwLock<RoutePath>,
    history: RwLock<Vec<NavigationRequest>>,
    failure: RwLock<Option<ServiceError>>,
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::at(RoutePath::HOME)
    }
}

impl MemoryRouter {
    /// A router currently showing `path`.
    #[must_use]
    pub const fn at(path: RoutePath) -> Self {
        Self {
            current: RwLock::new(path),
            history: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }

    /// Every navigation that succeeded, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<NavigationRequest> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent successful navigation.
    #[must_use]
    pub fn last_request(&self) -> Option<NavigationRequest> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Make subsequent navigations fail with `error` (or succeed with `None`).
    pub fn fail_navigation(&self, error: Option<ServiceError>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = error;
    }
}

impl Router for MemoryRouter {
    fn navigate(&self, request: &NavigationRequest) -> Result<(), ServiceError> {
        if let Some(error) = self
            .failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = request.path.clone();
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        Ok(())
    }

    fn current_path(&self) -> RoutePath {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// =============================================================================
// Viewport
// =============================================================================

/// Viewport driven by an explicit width.
#[derive(Debug)]
pub struct MemoryViewport {
    width: AtomicU32,
    breakpoint: u32,
}

impl MemoryViewport {
    /// A viewport of `width` px classified against `breakpoint`.
    #[must_use]
    pub const fn new(width: u32, breakpoint: u32) -> Self {
        Self {
            width: AtomicU32::new(width),
            breakpoint,
        }
    }

    /// Simulate a window resize.
    pub fn resize(&self, width: u32) {
        self.width.store(width, Ordering::Relaxed);
    }

    /// Current width in px.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width.load(Ordering::Relaxed)
    }
}

impl ViewportSignal for MemoryViewport {
    fn current_viewport_class(&self) -> ViewportClass {
        ViewportClass::from_width(self.width(), self.breakpoint)
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Notifier that keeps every toast it was asked to show.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: RwLock<Vec<Notification>>,
}

impl MemoryNotifier {
    /// Notifications delivered so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.sent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain and return delivered notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.sent.write().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            severity = %notification.severity,
            message = %notification.message,
            "Toast"
        );
        self.sent
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// One of each in-memory collaborator, kept as concrete types so callers can
/// drive and inspect them.
#[derive(Debug, Clone)]
pub struct MemoryCollaborators {
    pub session: Arc<MemorySession>,
    pub cart: Arc<MemoryCart>,
    pub router: Arc<MemoryRouter>,
    pub viewport: Arc<MemoryViewport>,
    pub notifier: Arc<MemoryNotifier>,
}

impl MemoryCollaborators {
    /// Signed out, empty cart, on the home page, `width` px wide.
    #[must_use]
    pub fn new(width: u32, breakpoint: u32) -> Self {
        Self {
            session: Arc::new(MemorySession::signed_out()),
            cart: Arc::new(MemoryCart::default()),
            router: Arc::new(MemoryRouter::default()),
            viewport: Arc::new(MemoryViewport::new(width, breakpoint)),
            notifier: Arc::new(MemoryNotifier::default()),
        }
    }

    /// Build a [`UiContext`] over these collaborators.
    #[must_use]
    pub fn context(&self, config: StorefrontConfig) -> UiContext {
        UiContext::new(
            config,
            Collaborators {
                session: self.session.clone(),
                cart: self.cart.clone(),
                router: self.router.clone(),
                viewport: self.viewport.clone(),
                notifier: self.notifier.clone(),
            },
        )
    }
}
