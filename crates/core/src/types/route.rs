//! Route path type.

use core::fmt;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RoutePath`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutePathError {
    /// The input string is empty.
    #[error("route path cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("route path must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not start with `/`.
    #[error("route path must start with '/'")]
    MissingLeadingSlash,
    /// The input contains whitespace.
    #[error("route path cannot contain whitespace")]
    ContainsWhitespace,
}

/// A logical location inside the storefront, e.g. `/shop`.
///
/// The UI core only ever compares route paths; it never rewrites them.
/// Comparison is exact: `/shop` and `/shop/` are different routes.
///
/// ## Constraints
///
/// - Length: 1-2048 characters
/// - Must start with `/`
/// - Must not contain whitespace
///
/// ## Examples
///
/// ```
/// use capsule_care_core::RoutePath;
///
/// assert!(RoutePath::parse("/shop").is_ok());
/// assert!(RoutePath::parse("/products/vitamin-c").is_ok());
///
/// assert!(RoutePath::parse("").is_err());         // empty
/// assert!(RoutePath::parse("shop").is_err());     // missing leading slash
/// assert!(RoutePath::parse("/my cart").is_err()); // whitespace
///
/// assert_eq!(RoutePath::parse("/shop").unwrap(), RoutePath::SHOP);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(Cow<'static, str>);

impl RoutePath {
    /// Maximum length of a route path.
    pub const MAX_LENGTH: usize = 2048;

    /// Home page.
    pub const HOME: Self = Self(Cow::Borrowed("/"));
    /// Product catalog.
    pub const SHOP: Self = Self(Cow::Borrowed("/shop"));
    /// About page.
    pub const ABOUT_US: Self = Self(Cow::Borrowed("/about-us"));
    /// Contact page.
    pub const CONTACT_US: Self = Self(Cow::Borrowed("/contact-us"));
    /// Cart page.
    pub const CART: Self = Self(Cow::Borrowed("/cart"));
    /// Customer profile page.
    pub const PROFILE: Self = Self(Cow::Borrowed("/profile"));
    /// Sign-in / sign-up flow.
    pub const AUTH: Self = Self(Cow::Borrowed("/auth"));

    /// Parse a `RoutePath` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 2048 characters
    /// - Does not start with `/`
    /// - Contains whitespace
    pub fn parse(s: &str) -> Result<Self, RoutePathError> {
        Self::validate(s)?;
        Ok(Self(Cow::Owned(s.to_owned())))
    }

    fn validate(s: &str) -> Result<(), RoutePathError> {
        if s.is_empty() {
            return Err(RoutePathError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(RoutePathError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s.starts_with('/') {
            return Err(RoutePathError::MissingLeadingSlash);
        }

        if s.chars().any(char::is_whitespace) {
            return Err(RoutePathError::ContainsWhitespace);
        }

        Ok(())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `RoutePath` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0.into_owned()
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RoutePath {
    type Err = RoutePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoutePath {
    type Error = RoutePathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::validate(&s)?;
        Ok(Self(Cow::Owned(s)))
    }
}

impl From<RoutePath> for String {
    fn from(path: RoutePath) -> Self {
        path.into_inner()
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
