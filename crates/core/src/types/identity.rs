//! Authenticated identity as seen by the UI.

use serde::{Deserialize, Serialize};

/// The signed-in customer, as exposed by the session collaborator.
///
/// The storefront never inspects credentials; it only needs enough to pick
/// between the signed-in and signed-out action sets and to greet the user.
/// Absence of an identity is modelled as `Option<Identity>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Identity {
    email: Option<String>,
}

impl Identity {
    /// Create an identity with the given email address.
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    /// Create an identity for a session that carries no email.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { email: None }
    }

    /// Returns the email address, if the session provided one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Short label shown in the header greeting.
    ///
    /// This is the part of the email before `@`. Returns `None` when the
    /// identity has no email or the local part is empty.
    ///
    /// ```
    /// use capsule_care_core::Identity;
    ///
    /// let identity = Identity::with_email("priya.sharma@example.com");
    /// assert_eq!(identity.display_label(), Some("priya.sharma"));
    /// assert_eq!(Identity::anonymous().display_label(), None);
    /// ```
    #[must_use]
    pub fn display_label(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|label| !label.is_empty())
    }
}
