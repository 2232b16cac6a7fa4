//! Integration tests for the home page.
//!
//! Covers the gated header, search, categories and the combined view that
//! renderers consume.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use capsule_care_core::{CartLine, RoutePath, Severity};
use capsule_care_integration_tests::{DESKTOP_WIDTH, MOBILE_WIDTH, TestContext};
use capsule_care_storefront::services::{NavigationRequest, Router, ServiceError};
use capsule_care_storefront::ui::home::{CATEGORIES, FEATURES, SLIDES, SearchPlacement};

#[test]
fn test_signed_out_cart_goes_through_sign_in() {
    let t = TestContext::desktop();
    t.mem.cart.add(CartLine::new("thermometer", 1));
    let home = t.home();

    assert_eq!(home.view().cart_badge, 0);
    home.open_cart().unwrap();
    assert_eq!(
        t.mem.router.last_request(),
        Some(NavigationRequest::sign_in_then(RoutePath::CART))
    );

    t.sign_in("kiran@example.com");
    assert_eq!(home.view().cart_badge, 1);
    home.open_cart().unwrap();
    assert_eq!(
        t.mem.router.last_request(),
        Some(NavigationRequest::to(RoutePath::CART))
    );
}

#[test]
fn test_header_and_home_badges_differ_only_when_signed_out() {
    let t = TestContext::desktop();
    t.mem.cart.add(CartLine::new("bandages", 2));
    let nav = t.navigation();
    let home = t.home();

    assert_eq!(nav.view().cart_badge, 2);
    assert_eq!(home.view().cart_badge, 0);

    t.sign_in("kiran@example.com");
    assert_eq!(nav.view().cart_badge, home.view().cart_badge);
}

#[test]
fn test_search_flow() {
    let t = TestContext::desktop();
    let home = t.home();

    assert!(!home.submit_search("  ").unwrap());
    assert!(t.mem.router.history().is_empty());
    assert_eq!(home.view().active_search, None);

    assert!(home.submit_search("cough syrup").unwrap());
    assert_eq!(t.mem.router.current_path(), RoutePath::SHOP);
    assert_eq!(home.view().active_search.as_deref(), Some("cough syrup"));

    assert!(!home.submit_search("").unwrap());
    assert_eq!(home.view().active_search.as_deref(), Some("cough syrup"));
    assert_eq!(t.mem.router.history().len(), 1);
}

#[test]
fn test_categories_close_when_switching_to_mobile() {
    let t = TestContext::desktop();
    let nav = t.navigation();
    let home = t.home();

    assert!(home.toggle_categories());
    t.resize(MOBILE_WIDTH, &nav, &home);
    let view = home.view();
    assert!(!view.categories_open);
    assert_eq!(view.search_placement, SearchPlacement::BelowCarousel);

    assert!(!home.toggle_categories());
    t.resize(DESKTOP_WIDTH, &nav, &home);
    assert!(!home.view().categories_open);
}

#[test]
fn test_category_and_cta_navigation() {
    let t = TestContext::desktop();
    let home = t.home();

    home.select_category(CATEGORIES.len() - 1).unwrap();
    home.activate_slide_cta().unwrap();
    home.open_top_deals().unwrap();

    let paths: Vec<_> = t
        .mem
        .router
        .history()
        .into_iter()
        .map(|request| request.path)
        .collect();
    assert_eq!(paths, [RoutePath::SHOP, RoutePath::SHOP, RoutePath::SHOP]);
}

#[test]
fn test_feature_cards_toast_their_message() {
    let t = TestContext::mobile();
    let home = t.home();

    for i in 0..FEATURES.len() {
        home.activate_feature(i);
    }

    let toasts = t.mem.notifier.take();
    assert_eq!(toasts.len(), FEATURES.len());
    for (toast, feature) in toasts.iter().zip(FEATURES.iter()) {
        assert_eq!(toast.message, feature.message);
        assert_eq!(toast.severity, Severity::Info);
    }
}

#[test]
fn test_router_failure_reaches_notifier() {
    let t = TestContext::desktop();
    let home = t.home();
    t.mem
        .router
        .fail_navigation(Some(ServiceError::Rejected("blocked".to_string())));

    assert!(home.log_in().is_err());
    assert!(home.select_category(0).is_err());

    let toasts = t.mem.notifier.take();
    assert_eq!(toasts.len(), 2);
    assert!(toasts.iter().all(|toast| toast.severity == Severity::Error));
}

#[tokio::test(start_paused = true)]
async fn test_view_tracks_carousel_slide() {
    let t = TestContext::desktop();
    let home = t.home();
    home.start();

    tokio::time::sleep(Duration::from_millis(5151)).await;
    let json = serde_json::to_value(home.view()).unwrap();
    assert_eq!(json["slide"]["headline"], SLIDES[1].headline);
    assert_eq!(json["carousel"]["phase"], "idle");
    assert_eq!(json["carousel"]["index"], 1);
    assert_eq!(json["search_placement"], "header");

    home.shutdown();
}
