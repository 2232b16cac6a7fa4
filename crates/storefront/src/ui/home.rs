//! Home page state.
//!
//! Owns the promo carousel and the page's transient UI flags (categories
//! dropdown, help modal, last search term). Session, cart and route are read
//! through the shared [`UiContext`].

use capsule_care_core::{RoutePath, Severity, ViewportClass};
use serde::Serialize;
use tokio::sync::watch;

use super::carousel::{CarouselController, CarouselState};
use super::derived;
use crate::error::Result;
use crate::services::{NavigationRequest, Notification};
use crate::state::UiContext;

/// A promo carousel slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub headline: &'static str,
    pub cta_label: &'static str,
}

/// Home page promo slides, in display order.
pub const SLIDES: [Slide; 3] = [
    Slide {
        headline: "Stay Healthy with Capsule Care",
        cta_label: "Shop Now",
    },
    Slide {
        headline: "Wellness Essentials Sale – Up to 25% Off",
        cta_label: "Shop Sale Items",
    },
    Slide {
        headline: "Free Same-Day Delivery on Orders Over ₹1,000",
        cta_label: "Learn More",
    },
];

/// Product categories offered in the dropdown (desktop) or chips (mobile).
pub const CATEGORIES: [&str; 4] = [
    "Prescription",
    "OTC & Wellness",
    "Vitamins & Supplements",
    "Medical Devices",
];

/// A feature highlight card. Activating it shows `message` as a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureHighlight {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub message: &'static str,
}

pub const FEATURES: [FeatureHighlight; 6] = [
    FeatureHighlight {
        title: "Quick Refill",
        subtitle: "Auto-refill on meds",
        message: "Auto-refill setup coming soon!",
    },
    FeatureHighlight {
        title: "Verified Pharma",
        subtitle: "Genuine Brands",
        message: "All products are 100% genuine",
    },
    FeatureHighlight {
        title: "Fast Delivery",
        subtitle: "Within 48 Hours",
        message: "Free delivery on orders over ₹500",
    },
    FeatureHighlight {
        title: "24/7 Pharmacist Chat",
        subtitle: "Expert Help Anytime",
        message: "Chat support coming soon!",
    },
    FeatureHighlight {
        title: "Secure Payment",
        subtitle: "Encrypted & Safe",
        message: "Your payments are 100% secure",
    },
    FeatureHighlight {
        title: "Easy Returns",
        subtitle: "14-Day Policy",
        message: "14-day hassle-free returns",
    },
];

/// Where the search bar renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPlacement {
    Header,
    BelowCarousel,
}

impl SearchPlacement {
    #[must_use]
    pub const fn for_viewport(viewport: ViewportClass) -> Self {
        match viewport {
            ViewportClass::Mobile => Self::BelowCarousel,
            ViewportClass::Desktop => Self::Header,
        }
    }
}

/// Transient state owned by the home page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HomeState {
    pub viewport: ViewportClass,
    pub categories_open: bool,
    pub help_open: bool,
    /// Last non-empty search term submitted from this page.
    pub active_search: Option<String>,
}

/// Everything the home page needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    pub slide: Slide,
    pub carousel: CarouselState,
    pub cart_badge: u64,
    pub welcome: Option<String>,
    pub signed_in: bool,
    pub categories: &'static [&'static str],
    pub categories_open: bool,
    pub features: &'static [FeatureHighlight],
    pub help_open: bool,
    pub active_search: Option<String>,
    pub search_placement: SearchPlacement,
    pub show_secondary_nav: bool,
}

/// The home page.
pub struct HomePage {
    ctx: UiContext,
    carousel: CarouselController,
    state: watch::Sender<HomeState>,
}

impl HomePage {
    /// Build the page. The carousel timer is not started; call
    /// [`start`](Self::start) once the page is mounted.
    #[must_use]
    pub fn new(ctx: UiContext) -> Self {
        let carousel = CarouselController::new(SLIDES.len(), ctx.config().carousel);
        let (state, _) = watch::channel(HomeState {
            viewport: ctx.viewport().current_viewport_class(),
            ..HomeState::default()
        });
        Self {
            ctx,
            carousel,
            state,
        }
    }

    /// Start the carousel's auto-advance timer.
    pub fn start(&self) -> bool {
        self.carousel.start()
    }

    /// Tear the page down, stopping the carousel.
    pub fn shutdown(&self) {
        self.carousel.shutdown();
    }

    #[must_use]
    pub const fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    #[must_use]
    pub fn state(&self) -> HomeState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> HomeView {
        let state = self.state();
        let carousel = self.carousel.state();
        let identity = self.ctx.identity();

        HomeView {
            slide: SLIDES
                .get(carousel.index())
                .copied()
                .unwrap_or(SLIDES[0]),
            carousel,
            cart_badge: derived::gated_cart_badge_count(identity.as_ref(), self.ctx.cart()),
            welcome: derived::welcome_text(identity.as_ref()),
            signed_in: identity.is_some(),
            categories: &CATEGORIES,
            categories_open: state.categories_open,
            features: &FEATURES,
            help_open: state.help_open,
            active_search: state.active_search,
            search_placement: SearchPlacement::for_viewport(state.viewport),
            show_secondary_nav: !state.viewport.is_mobile(),
        }
    }

    /// Apply a new viewport class. Switching to mobile closes the dropdown.
    pub fn handle_viewport_change(&self, viewport: ViewportClass) {
        self.state.send_if_modified(|state| {
            let mut changed = state.viewport != viewport;
            state.viewport = viewport;
            if viewport.is_mobile() && state.categories_open {
                state.categories_open = false;
                changed = true;
            }
            changed
        });
    }

    /// Re-read the viewport collaborator (call on resize).
    pub fn refresh_viewport(&self) {
        self.handle_viewport_change(self.ctx.viewport().current_viewport_class());
    }

    // -------------------------------------------------------------------------
    // Carousel
    // -------------------------------------------------------------------------

    pub fn next_slide(&self) -> CarouselState {
        self.carousel.advance()
    }

    pub fn previous_slide(&self) -> CarouselState {
        self.carousel.retreat()
    }

    pub fn go_to_slide(&self, index: usize) -> CarouselState {
        self.carousel.jump_to(index)
    }

    /// The current slide's call to action.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn activate_slide_cta(&self) -> Result<()> {
        self.ctx.route(&NavigationRequest::to(RoutePath::SHOP))
    }

    // -------------------------------------------------------------------------
    // Categories and features
    // -------------------------------------------------------------------------

    /// Flip the categories dropdown. Desktop only.
    ///
    /// Returns whether the dropdown is open afterwards.
    pub fn toggle_categories(&self) -> bool {
        let mut open = false;
        self.state.send_if_modified(|state| {
            if state.viewport.is_mobile() {
                return false;
            }
            state.categories_open = !state.categories_open;
            open = state.categories_open;
            true
        });
        open
    }

    /// Browse category `index`. Unknown indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn select_category(&self, index: usize) -> Result<()> {
        let Some(category) = CATEGORIES.get(index) else {
            tracing::debug!(index, "Ignoring unknown category");
            return Ok(());
        };

        tracing::debug!(category, "Category selected");
        let result = self.ctx.route(&NavigationRequest::to(RoutePath::SHOP));
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.categories_open, false));
        result
    }

    /// Show the feature card's message. Unknown indices are ignored.
    pub fn activate_feature(&self, index: usize) {
        if let Some(feature) = FEATURES.get(index) {
            self.ctx
                .notifier()
                .notify(Notification::new(feature.message, Severity::Info));
        }
    }

    // -------------------------------------------------------------------------
    // Help modal
    // -------------------------------------------------------------------------

    pub fn open_help(&self) {
        self.state
            .send_if_modified(|state| !std::mem::replace(&mut state.help_open, true));
    }

    pub fn close_help(&self) {
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.help_open, false));
    }

    // -------------------------------------------------------------------------
    // Search and header
    // -------------------------------------------------------------------------

    /// Submit a search.
    ///
    /// Empty or whitespace-only queries change nothing. Otherwise the term is
    /// recorded and the catalog is opened. Returns whether navigation
    /// happened.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails. The term is still
    /// recorded.
    pub fn submit_search(&self, query: &str) -> Result<bool> {
        let Some(term) = derived::search_submission(query) else {
            return Ok(false);
        };

        tracing::info!(term = %term, "Search submitted");
        self.state.send_modify(|state| state.active_search = Some(term));
        self.ctx.route(&NavigationRequest::to(RoutePath::SHOP))?;
        Ok(true)
    }

    /// Header cart icon. Signed out, goes to sign-in first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn open_cart(&self) -> Result<()> {
        self.gated(RoutePath::CART)
    }

    /// Header profile icon. Signed out, goes to sign-in first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn open_profile(&self) -> Result<()> {
        self.gated(RoutePath::PROFILE)
    }

    /// Header sign-in button.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn log_in(&self) -> Result<()> {
        self.ctx.route(&NavigationRequest::to(RoutePath::AUTH))
    }

    /// Secondary nav "Top Deals" link.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the router fails.
    pub fn open_top_deals(&self) -> Result<()> {
        self.ctx.route(&NavigationRequest::to(RoutePath::SHOP))
    }

    fn gated(&self, target: RoutePath) -> Result<()> {
        let identity = self.ctx.identity();
        self.ctx
            .route(&derived::gated_request(target, identity.as_ref()))
    }
}

impl std::fmt::Debug for HomePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomePage")
            .field("state", &self.state())
            .field("carousel", &self.carousel)
            .finish_non_exhaustive()
    }
}
