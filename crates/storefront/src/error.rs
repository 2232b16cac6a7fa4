//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for every UI gesture that reaches a
//! collaborator. Gestures return `Result<T, AppError>`; the same error is
//! also turned into a toast via [`AppError::user_message`].

use capsule_care_core::{RoutePath, RoutePathError};
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the storefront UI.
#[derive(Debug, Error)]
pub enum AppError {
    /// The session collaborator refused or failed to sign out.
    #[error("Sign-out failed: {0}")]
    SignOut(#[source] ServiceError),

    /// The router could not switch views.
    #[error("Navigation to {path} failed: {source}")]
    Navigation {
        path: RoutePath,
        #[source]
        source: ServiceError,
    },

    /// A route path supplied at runtime was malformed.
    #[error("Invalid route: {0}")]
    InvalidRoute(#[from] RoutePathError),
}

impl AppError {
    /// Text shown to the customer in a toast.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::SignOut(_) => "We couldn't sign you out. Please try again.".to_string(),
            Self::Navigation { .. } => "That page couldn't be opened. Please try again.".to_string(),
            Self::InvalidRoute(_) => "That link looks broken.".to_string(),
        }
    }

    /// Log the error and capture unexpected failures to Sentry.
    pub fn report(&self) {
        if matches!(self, Self::Navigation { .. }) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "UI action error"
            );
        } else {
            tracing::warn!(error = %self, "UI action failed");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user identifier.
///
/// Call this after the session reports a signed-in identity to associate
/// errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("navigation", "Opened cart", Some(&[("path", "/cart")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::SignOut(ServiceError::Unavailable("timeout".to_string()));
        assert_eq!(
            err.to_string(),
            "Sign-out failed: service unavailable: timeout"
        );

        let err = AppError::Navigation {
            path: RoutePath::CART,
            source: ServiceError::Rejected("blocked".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Navigation to /cart failed: request rejected: blocked"
        );
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::SignOut(ServiceError::Unavailable("db pool exhausted".to_string()));
        assert!(!err.user_message().contains("db pool"));

        let err = AppError::Navigation {
            path: RoutePath::SHOP,
            source: ServiceError::Unavailable("router task panicked".to_string()),
        };
        assert!(!err.user_message().contains("panicked"));
    }

    #[test]
    fn test_invalid_route_from() {
        let err: AppError = RoutePathError::Empty.into();
        assert!(matches!(err, AppError::InvalidRoute(RoutePathError::Empty)));
    }

    #[test]
    fn test_report_without_sentry_client_is_harmless() {
        AppError::Navigation {
            path: RoutePath::HOME,
            source: ServiceError::Unavailable("test".to_string()),
        }
        .report();
        AppError::SignOut(ServiceError::Rejected("test".to_string())).report();
    }
}
