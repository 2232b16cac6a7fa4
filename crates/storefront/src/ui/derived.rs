//! Values derived from collaborator state.
//!
//! Nothing here is cached. Every function reads its inputs at call time, so a
//! view that re-queries after a collaborator change always sees fresh values.

use capsule_care_core::{CartLine, Identity, RoutePath};

use crate::services::{CartStore, NavigationRequest};

/// Header cart badge: total units across all cart lines.
///
/// The badge always renders, showing `0` for an empty cart.
#[must_use]
pub fn cart_badge_count(cart: &dyn CartStore) -> u64 {
    total_quantity(&cart.line_items())
}

/// Home page header badge: the cart total when signed in, `0` when signed out.
#[must_use]
pub fn gated_cart_badge_count(identity: Option<&Identity>, cart: &dyn CartStore) -> u64 {
    identity.map_or(0, |_| cart_badge_count(cart))
}

/// Sum of quantities over `lines`.
#[must_use]
pub fn total_quantity(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

/// Header greeting for a signed-in customer.
///
/// `None` when signed out.
#[must_use]
pub fn welcome_text(identity: Option<&Identity>) -> Option<String> {
    identity.map(|identity| {
        identity
            .display_label()
            .map_or_else(|| "Welcome".to_string(), |label| format!("Welcome, {label}"))
    })
}

/// Whether a navigation entry for `path` is highlighted while `current` is shown.
///
/// Matching is exact; `/shop` is not active on `/shop/vitamins`.
#[must_use]
pub fn is_active_route(path: &RoutePath, current: &RoutePath) -> bool {
    path == current
}

/// Navigation for an action that needs a signed-in customer.
///
/// Signed out, the customer is sent to the auth flow with `target` recorded
/// so the flow can resume there after sign-in.
#[must_use]
pub fn gated_request(target: RoutePath, identity: Option<&Identity>) -> NavigationRequest {
    if identity.is_some() {
        NavigationRequest::to(target)
    } else {
        NavigationRequest::sign_in_then(target)
    }
}

/// The search term to record for a submitted query.
///
/// Returns `None` for empty or whitespace-only input, which must neither
/// navigate nor replace an existing catalog filter.
#[must_use]
pub fn search_submission(query: &str) -> Option<String> {
    let term = query.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}
