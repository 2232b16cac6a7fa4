//! Header navigation presenter.
//!
//! Reconciles three external signals (route, identity, viewport class) with
//! the one piece of state the header owns: whether the mobile drawer is open.
//!
//! Drawer rules:
//! - it can only be open while the viewport is mobile
//! - every navigation closes it, successful or not
//! - sign-out closes it, successful or not
//! - resizing to desktop closes it

use capsule_care_core::{Identity, RoutePath, ViewportClass};
use serde::Serialize;
use tokio::sync::watch;
use tracing::instrument;

use super::derived;
use crate::error::{AppError, Result, clear_sentry_user};
use crate::services::NavigationRequest;
use crate::state::UiContext;

/// A primary navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    pub path: RoutePath,
}

impl NavEntry {
    #[must_use]
    pub fn new(label: impl Into<String>, path: RoutePath) -> Self {
        Self {
            label: label.into(),
            path,
        }
    }

    /// The storefront's primary entries, in display order.
    #[must_use]
    pub fn primary() -> Vec<Self> {
        vec![
            Self::new("Home", RoutePath::HOME),
            Self::new("Shop", RoutePath::SHOP),
            Self::new("About Us", RoutePath::ABOUT_US),
            Self::new("Contact", RoutePath::CONTACT_US),
        ]
    }
}

/// A rendered navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub path: RoutePath,
    pub active: bool,
}

/// Identity-dependent header actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum IdentityAction {
    /// Open the profile page. `dismissible` is set while the profile page is
    /// already shown, offering a way back home.
    Profile { dismissible: bool },
    SignOut,
    SignIn,
}

/// Open/closed state of the mobile drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NavMenuState {
    pub is_open: bool,
}

/// State owned by the presenter and published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NavigationState {
    pub viewport: ViewportClass,
    pub menu: NavMenuState,
}

/// Everything the header needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    pub viewport: ViewportClass,
    pub menu_open: bool,
    pub current_path: RoutePath,
    pub links: Vec<NavLink>,
    pub actions: Vec<IdentityAction>,
    pub cart_badge: u64,
    pub welcome: Option<String>,
}

/// Header navigation presenter. One per page view.
pub struct NavigationPresenter {
    ctx: UiContext,
    entries: Vec<NavEntry>,
    state: watch::Sender<NavigationState>,
}

impl NavigationPresenter {
    /// Create a presenter with the primary entries.
    #[must_use]
    pub fn new(ctx: UiContext) -> Self {
        Self::with_entries(ctx, NavEntry::primary())
    }

    /// Create a presenter with a custom entry list.
    #[must_use]
    pub fn with_entries(ctx: UiContext, entries: Vec<NavEntry>) -> Self {
        let viewport = ctx.viewport().current_viewport_class();
        let (state, _) = watch::channel(NavigationState {
            viewport,
            menu: NavMenuState::default(),
        });
        Self {
            ctx,
            entries,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> NavigationState {
        *self.state.borrow()
    }

    /// Subscribe to drawer and viewport changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.state.borrow().menu.is_open
    }

    /// Primary links with the current route highlighted.
    #[must_use]
    pub fn visible_links(&self) -> Vec<NavLink> {
        let current = self.ctx.router().current_path();
        self.entries
            .iter()
            .map(|entry| NavLink {
                label: entry.label.clone(),
                path: entry.path.clone(),
                active: derived::is_active_route(&entry.path, &current),
            })
            .collect()
    }

    /// Header actions for the current identity.
    #[must_use]
    pub fn identity_actions(&self) -> Vec<IdentityAction> {
        let identity = self.ctx.identity();
        let current = self.ctx.router().current_path();
        actions_for(identity.as_ref(), &current)
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> NavigationView {
        let state = self.state();
        let identity = self.ctx.identity();
        let current_path = self.ctx.router().current_path();

        NavigationView {
            viewport: state.viewport,
            menu_open: state.menu.is_open,
            links: self.visible_links(),
            actions: actions_for(identity.as_ref(), &current_path),
            current_path,
            cart_badge: derived::cart_badge_count(self.ctx.cart()),
            welcome: derived::welcome_text(identity.as_ref()),
        }
    }

    /// Navigate to `path` and close the drawer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails. The drawer is
    /// closed and a toast is shown either way.
    pub fn navigate(&self, path: RoutePath) -> Result<()> {
        self.navigate_with(&NavigationRequest::to(path))
    }

    /// Navigate with a full request and close the drawer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    #[instrument(skip(self), fields(path = %request.path))]
    pub fn navigate_with(&self, request: &NavigationRequest) -> Result<()> {
        let result = self.ctx.route(request);
        self.close_menu();
        result
    }

    /// Follow a raw href taken from rendered content.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidRoute` for a malformed href (shown as a
    /// toast, drawer left alone) or `AppError::Navigation` if the router
    /// fails.
    pub fn follow_link(&self, href: &str) -> Result<()> {
        match RoutePath::parse(href) {
            Ok(path) => self.navigate(path),
            Err(source) => {
                let err = AppError::from(source);
                self.ctx.surface(&err);
                Err(err)
            }
        }
    }

    /// Logo click.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn go_home(&self) -> Result<()> {
        self.navigate(RoutePath::HOME)
    }

    /// Header cart icon.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn open_cart(&self) -> Result<()> {
        self.navigate(RoutePath::CART)
    }

    /// Flip the drawer. Has no effect on desktop.
    ///
    /// Returns whether the drawer is open afterwards.
    pub fn toggle_menu(&self) -> bool {
        let mut open = false;
        self.state.send_if_modified(|state| {
            if state.viewport.is_mobile() {
                state.menu.is_open = !state.menu.is_open;
                open = state.menu.is_open;
                true
            } else {
                false
            }
        });
        tracing::debug!(open, "Toggle menu");
        open
    }

    /// Apply a new viewport class. Leaving mobile closes the drawer.
    pub fn handle_viewport_change(&self, viewport: ViewportClass) {
        self.state.send_if_modified(|state| {
            let mut changed = state.viewport != viewport;
            state.viewport = viewport;
            if !viewport.is_mobile() && state.menu.is_open {
                state.menu.is_open = false;
                changed = true;
            }
            changed
        });
    }

    /// Re-read the viewport collaborator (call on resize).
    pub fn refresh_viewport(&self) {
        self.handle_viewport_change(self.ctx.viewport().current_viewport_class());
    }

    /// Run an identity action.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying navigation or sign-out.
    pub async fn activate(&self, action: IdentityAction) -> Result<()> {
        match action {
            IdentityAction::Profile { .. } => self.navigate(RoutePath::PROFILE),
            IdentityAction::SignIn => self.navigate(RoutePath::AUTH),
            IdentityAction::SignOut => self.sign_out().await,
        }
    }

    /// Leave the profile page. No-op on any other page.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn dismiss_profile(&self) -> Result<()> {
        if self.ctx.router().current_path() == RoutePath::PROFILE {
            self.navigate(RoutePath::HOME)
        } else {
            Ok(())
        }
    }

    /// Sign out, then go home.
    ///
    /// The drawer ends up closed whatever the outcome. On failure a toast is
    /// shown, no navigation happens, and the session error is returned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SignOut` if the session refuses, or
    /// `AppError::Navigation` if the post-sign-out navigation fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<()> {
        match self.ctx.session().sign_out().await {
            Ok(()) => {
                clear_sentry_user();
                tracing::info!("Signed out");
                self.navigate(RoutePath::HOME)
            }
            Err(source) => {
                self.close_menu();
                let err = AppError::SignOut(source);
                self.ctx.surface(&err);
                Err(err)
            }
        }
    }

    fn close_menu(&self) {
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.menu.is_open, false));
    }
}

impl std::fmt::Debug for NavigationPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationPresenter")
            .field("entries", &self.entries)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn actions_for(identity: Option<&Identity>, current: &RoutePath) -> Vec<IdentityAction> {
    if identity.is_some() {
        vec![
            IdentityAction::Profile {
                dismissible: *current == RoutePath::PROFILE,
            },
            IdentityAction::SignOut,
        ]
    } else {
        vec![IdentityAction::SignIn]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use capsule_care_core::{CartLine, Severity};

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::services::memory::{MemoryCollaborators, MemorySession};
    use crate::services::{Router, ServiceError, SessionProvider};

    const MOBILE: u32 = 390;
    const DESKTOP: u32 = 1280;

    fn setup(width: u32) -> (NavigationPresenter, MemoryCollaborators) {
        let mem = MemoryCollaborators::new(width, 768);
        let presenter = NavigationPresenter::new(mem.context(StorefrontConfig::default()));
        (presenter, mem)
    }

    fn signed_in(width: u32) -> (NavigationPresenter, MemoryCollaborators) {
        let mut mem = MemoryCollaborators::new(width, 768);
        mem.session = Arc::new(MemorySession::signed_in(Identity::with_email(
            "asha@example.com",
        )));
        let presenter = NavigationPresenter::new(mem.context(StorefrontConfig::default()));
        (presenter, mem)
    }

    // =========================================================================
    // Links and actions
    // =========================================================================

    #[test]
    fn test_links_highlight_exact_route() {
        let (presenter, mem) = setup(DESKTOP);
        mem.router
            .navigate(&NavigationRequest::to(RoutePath::SHOP))
            .unwrap();

        let links = presenter.visible_links();
        let labels: Vec<_> = links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["Home", "Shop", "About Us", "Contact"]);

        let active: Vec<_> = links.iter().filter(|l| l.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active.first().unwrap().path, RoutePath::SHOP);
    }

    #[test]
    fn test_links_no_prefix_match() {
        let (presenter, mem) = setup(DESKTOP);
        mem.router
            .navigate(&NavigationRequest::to(
                RoutePath::parse("/shop/vitamins").unwrap(),
            ))
            .unwrap();

        assert!(presenter.visible_links().iter().all(|l| !l.active));
    }

    #[test]
    fn test_signed_out_actions() {
        let (presenter, _mem) = setup(DESKTOP);
        assert_eq!(presenter.identity_actions(), [IdentityAction::SignIn]);
    }

    #[test]
    fn test_signed_in_actions_dismissible_only_on_profile() {
        let (presenter, mem) = signed_in(DESKTOP);
        assert_eq!(
            presenter.identity_actions(),
            [
                IdentityAction::Profile { dismissible: false },
                IdentityAction::SignOut
            ]
        );

        mem.router
            .navigate(&NavigationRequest::to(RoutePath::PROFILE))
            .unwrap();
        assert_eq!(
            presenter.identity_actions().first(),
            Some(&IdentityAction::Profile { dismissible: true })
        );
    }

    #[test]
    fn test_view_reads_fresh_collaborator_state() {
        let (presenter, mem) = signed_in(DESKTOP);
        assert_eq!(presenter.view().cart_badge, 0);
        assert_eq!(presenter.view().welcome.as_deref(), Some("Welcome, asha"));

        mem.cart.add(CartLine::new("vitamin-c", 2));
        mem.cart.add(CartLine::new("zinc", 1));
        assert_eq!(presenter.view().cart_badge, 3);

        mem.cart.clear();
        mem.session.set_identity(None);
        let view = presenter.view();
        assert_eq!(view.cart_badge, 0);
        assert_eq!(view.welcome, None);
        assert_eq!(view.actions, [IdentityAction::SignIn]);
    }

    // =========================================================================
    // Drawer
    // =========================================================================

    #[test]
    fn test_toggle_on_mobile() {
        let (presenter, _mem) = setup(MOBILE);
        assert!(presenter.toggle_menu());
        assert!(presenter.is_menu_open());
        assert!(!presenter.toggle_menu());
        assert!(!presenter.is_menu_open());
    }

    #[test]
    fn test_toggle_on_desktop_is_noop() {
        let (presenter, _mem) = setup(DESKTOP);
        let rx = presenter.subscribe();

        assert!(!presenter.toggle_menu());
        assert!(!presenter.is_menu_open());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_resize_to_desktop_closes_drawer() {
        let (presenter, mem) = setup(MOBILE);
        presenter.toggle_menu();

        mem.viewport.resize(DESKTOP);
        presenter.refresh_viewport();

        let state = presenter.state();
        assert_eq!(state.viewport, ViewportClass::Desktop);
        assert!(!state.menu.is_open);
    }

    #[test]
    fn test_resize_within_mobile_keeps_drawer() {
        let (presenter, mem) = setup(MOBILE);
        presenter.toggle_menu();

        mem.viewport.resize(500);
        presenter.refresh_viewport();
        assert!(presenter.is_menu_open());
    }

    #[test]
    fn test_navigate_always_closes_drawer() {
        let (presenter, mem) = setup(MOBILE);

        presenter.toggle_menu();
        presenter.navigate(RoutePath::ABOUT_US).unwrap();
        assert!(!presenter.is_menu_open());
        assert_eq!(mem.router.current_path(), RoutePath::ABOUT_US);

        presenter.navigate(RoutePath::SHOP).unwrap();
        assert!(!presenter.is_menu_open());
    }

    #[test]
    fn test_navigate_failure_closes_drawer_and_notifies() {
        let (presenter, mem) = setup(MOBILE);
        mem.router
            .fail_navigation(Some(ServiceError::Unavailable("offline".to_string())));

        presenter.toggle_menu();
        let err = presenter.open_cart().unwrap_err();

        assert!(matches!(err, AppError::Navigation { ref path, .. } if *path == RoutePath::CART));
        assert!(!presenter.is_menu_open());
        let toasts = mem.notifier.notifications();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.first().unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_follow_link() {
        let (presenter, mem) = setup(MOBILE);
        presenter.toggle_menu();

        let err = presenter.follow_link("about us").unwrap_err();
        assert!(matches!(err, AppError::InvalidRoute(_)));
        assert!(presenter.is_menu_open());
        assert_eq!(mem.notifier.notifications().len(), 1);

        presenter.follow_link("/about-us").unwrap();
        assert_eq!(mem.router.current_path(), RoutePath::ABOUT_US);
        assert!(!presenter.is_menu_open());
    }

    #[tokio::test]
    async fn test_dismiss_profile_only_on_profile() {
        let (presenter, mem) = signed_in(DESKTOP);
        presenter.dismiss_profile().unwrap();
        assert!(mem.router.history().is_empty());

        presenter
            .activate(IdentityAction::Profile { dismissible: false })
            .await
            .unwrap();
        assert_eq!(mem.router.current_path(), RoutePath::PROFILE);

        presenter.dismiss_profile().unwrap();
        assert_eq!(mem.router.current_path(), RoutePath::HOME);
    }

    #[tokio::test]
    async fn test_sign_in_action_goes_to_auth() {
        let (presenter, mem) = setup(MOBILE);
        presenter.toggle_menu();

        presenter.activate(IdentityAction::SignIn).await.unwrap();
        assert_eq!(mem.router.current_path(), RoutePath::AUTH);
        assert!(!presenter.is_menu_open());
    }

    // =========================================================================
    // Sign-out
    // =========================================================================

    #[tokio::test]
    async fn test_sign_out_success_goes_home_and_closes() {
        let (presenter, mem) = signed_in(MOBILE);
        mem.router
            .navigate(&NavigationRequest::to(RoutePath::PROFILE))
            .unwrap();
        presenter.toggle_menu();

        presenter.sign_out().await.unwrap();

        assert!(!presenter.is_menu_open());
        assert_eq!(mem.router.current_path(), RoutePath::HOME);
        assert_eq!(presenter.identity_actions(), [IdentityAction::SignIn]);
        assert!(mem.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_failure_notifies_without_navigating() {
        let (presenter, mem) = signed_in(MOBILE);
        mem.session
            .fail_sign_out(Some(ServiceError::Rejected("token revoked".to_string())));
        presenter.toggle_menu();

        let err = presenter
            .activate(IdentityAction::SignOut)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::SignOut(ServiceError::Rejected(ref msg)) if msg == "token revoked"
        ));
        assert!(!presenter.is_menu_open());
        assert!(mem.router.history().is_empty());
        assert!(mem.session.current_identity().is_some());
        let toasts = mem.notifier.notifications();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.first().unwrap().severity, Severity::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_interleaves_with_pending_sign_out() {
        let (presenter, mem) = signed_in(MOBILE);
        mem.session.set_sign_out_delay(Duration::from_millis(500));
        presenter.toggle_menu();

        let presenter = Arc::new(presenter);
        let pending = tokio::spawn({
            let presenter = Arc::clone(&presenter);
            async move { presenter.sign_out().await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        mem.viewport.resize(DESKTOP);
        presenter.refresh_viewport();
        assert!(!presenter.is_menu_open());
        assert_eq!(presenter.state().viewport, ViewportClass::Desktop);

        pending.await.unwrap().unwrap();
        assert_eq!(mem.router.current_path(), RoutePath::HOME);
        assert!(!presenter.is_menu_open());
    }
}
