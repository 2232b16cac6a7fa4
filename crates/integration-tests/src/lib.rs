//! Integration tests for the Capsule Care storefront UI core.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p capsule-care-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `navigation` - Header links, drawer and sign-out flows
//! - `carousel` - Promo carousel timing and teardown
//! - `home_page` - Home page actions, gating and snapshots
//!
//! Everything runs against the in-memory collaborators; timer tests use
//! Tokio's paused clock.

use capsule_care_core::Identity;
use capsule_care_storefront::config::StorefrontConfig;
use capsule_care_storefront::services::memory::MemoryCollaborators;
use capsule_care_storefront::state::UiContext;
use capsule_care_storefront::ui::{HomePage, NavigationPresenter};

/// Phone-sized viewport width.
pub const MOBILE_WIDTH: u32 = 390;
/// Laptop-sized viewport width.
pub const DESKTOP_WIDTH: u32 = 1280;

/// In-memory collaborators plus a context built over them.
pub struct TestContext {
    pub mem: MemoryCollaborators,
    pub ctx: UiContext,
}

impl TestContext {
    /// Signed out, empty cart, on `/`, at `width` px.
    #[must_use]
    pub fn new(width: u32) -> Self {
        let config = StorefrontConfig::default();
        let mem = MemoryCollaborators::new(width, config.mobile_breakpoint_px);
        let ctx = mem.context(config);
        Self { mem, ctx }
    }

    #[must_use]
    pub fn mobile() -> Self {
        Self::new(MOBILE_WIDTH)
    }

    #[must_use]
    pub fn desktop() -> Self {
        Self::new(DESKTOP_WIDTH)
    }

    /// Sign in as `email`.
    pub fn sign_in(&self, email: &str) {
        self.mem
            .session
            .set_identity(Some(Identity::with_email(email)));
    }

    /// Resize the viewport and let both components observe it.
    pub fn resize(&self, width: u32, navigation: &NavigationPresenter, home: &HomePage) {
        self.mem.viewport.resize(width);
        navigation.refresh_viewport();
        home.refresh_viewport();
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationPresenter {
        NavigationPresenter::new(self.ctx.clone())
    }

    #[must_use]
    pub fn home(&self) -> HomePage {
        HomePage::new(self.ctx.clone())
    }
}
