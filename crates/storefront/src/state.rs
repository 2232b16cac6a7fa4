//! Context shared by every UI component of a page view.

use std::sync::Arc;

use capsule_care_core::{Identity, Severity};

use crate::config::StorefrontConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{
    CartStore, NavigationRequest, Notification, Notifier, Router, SessionProvider, ViewportSignal,
};

/// The collaborators a page view is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub session: Arc<dyn SessionProvider>,
    pub cart: Arc<dyn CartStore>,
    pub router: Arc<dyn Router>,
    pub viewport: Arc<dyn ViewportSignal>,
    pub notifier: Arc<dyn Notifier>,
}

/// Configuration and collaborators shared across UI components.
///
/// This struct is cheaply cloneable via `Arc`. Components hold a clone and
/// read collaborator state through it on every query; nothing read from a
/// collaborator is cached here.
#[derive(Clone)]
pub struct UiContext {
    inner: Arc<UiContextInner>,
}

struct UiContextInner {
    config: StorefrontConfig,
    collaborators: Collaborators,
}

impl UiContext {
    /// Create a new UI context.
    #[must_use]
    pub fn new(config: StorefrontConfig, collaborators: Collaborators) -> Self {
        Self {
            inner: Arc::new(UiContextInner {
                config,
                collaborators,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &dyn SessionProvider {
        self.inner.collaborators.session.as_ref()
    }

    #[must_use]
    pub fn cart(&self) -> &dyn CartStore {
        self.inner.collaborators.cart.as_ref()
    }

    #[must_use]
    pub fn router(&self) -> &dyn Router {
        self.inner.collaborators.router.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> &dyn ViewportSignal {
        self.inner.collaborators.viewport.as_ref()
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.collaborators.notifier.as_ref()
    }

    /// Current signed-in identity, read fresh from the session.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.session().current_identity()
    }

    /// Hand `request` to the router.
    ///
    /// A router failure is turned into a toast and returned.
    pub(crate) fn route(&self, request: &NavigationRequest) -> Result<()> {
        add_breadcrumb(
            "navigation",
            "Navigate",
            Some(&[
                ("path", request.path.as_str()),
                ("from", request.from.as_ref().map_or("", |from| from.as_str())),
            ]),
        );

        self.router().navigate(request).map_err(|source| {
            let err = AppError::Navigation {
                path: request.path.clone(),
                source,
            };
            self.surface(&err);
            err
        })
    }

    /// Show `err` to the customer and report it.
    pub(crate) fn surface(&self, err: &AppError) {
        err.report();
        self.notifier()
            .notify(Notification::new(err.user_message(), Severity::Error));
    }
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
