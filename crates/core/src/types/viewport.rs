//! Responsive viewport classification.

use serde::{Deserialize, Serialize};

/// Default width (in CSS pixels) below which the storefront uses the mobile layout.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Coarse responsive mode of the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    /// Narrow viewport: collapsible drawer navigation.
    Mobile,
    /// Wide viewport: inline navigation bar.
    #[default]
    Desktop,
}

impl ViewportClass {
    /// Classify a viewport width against a breakpoint.
    ///
    /// Widths strictly below `breakpoint` are [`ViewportClass::Mobile`].
    #[must_use]
    pub const fn from_width(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Returns true for [`ViewportClass::Mobile`].
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }
}
