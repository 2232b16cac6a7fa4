//! Storefront UI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_MOBILE_BREAKPOINT` - Width in px below which the mobile layout is used (default: 768)
//! - `STOREFRONT_CAROUSEL_INTERVAL_MS` - Auto-advance period of the promo carousel (default: 5000)
//! - `STOREFRONT_CAROUSEL_SETTLE_MS` - Fade window around each slide change (default: 150)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::time::Duration;

use capsule_care_core::MOBILE_BREAKPOINT_PX;
use thiserror::Error;

const DEFAULT_CAROUSEL_INTERVAL_MS: u64 = 5000;
const DEFAULT_CAROUSEL_SETTLE_MS: u64 = 150;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront UI configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Width in CSS pixels below which the viewport counts as mobile
    pub mobile_breakpoint_px: u32,
    /// Promo carousel timing
    pub carousel: CarouselTiming,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Timing of the promotional carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTiming {
    /// Period of the auto-advance timer
    pub interval: Duration,
    /// Length of the fade window around each slide change
    pub settle_delay: Duration,
}

impl Default for CarouselTiming {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_CAROUSEL_INTERVAL_MS),
            settle_delay: Duration::from_millis(DEFAULT_CAROUSEL_SETTLE_MS),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            carousel: CarouselTiming::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed or
    /// is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or is out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mobile_breakpoint_px: u32 = parse_or_default(
            &lookup,
            "STOREFRONT_MOBILE_BREAKPOINT",
            MOBILE_BREAKPOINT_PX,
        )?;
        if mobile_breakpoint_px == 0 {
            return Err(invalid("STOREFRONT_MOBILE_BREAKPOINT", "must be positive"));
        }

        let interval_ms: u64 = parse_or_default(
            &lookup,
            "STOREFRONT_CAROUSEL_INTERVAL_MS",
            DEFAULT_CAROUSEL_INTERVAL_MS,
        )?;
        let settle_ms: u64 = parse_or_default(
            &lookup,
            "STOREFRONT_CAROUSEL_SETTLE_MS",
            DEFAULT_CAROUSEL_SETTLE_MS,
        )?;
        if interval_ms == 0 {
            return Err(invalid("STOREFRONT_CAROUSEL_INTERVAL_MS", "must be positive"));
        }
        if settle_ms == 0 || settle_ms >= interval_ms {
            return Err(invalid(
                "STOREFRONT_CAROUSEL_SETTLE_MS",
                &format!("must be between 1 and {} (got {settle_ms})", interval_ms - 1),
            ));
        }

        let sentry_sample_rate = parse_rate(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            mobile_breakpoint_px,
            carousel: CarouselTiming {
                interval: Duration::from_millis(interval_ms),
                settle_delay: Duration::from_millis(settle_ms),
            },
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| invalid(key, &e.to_string()))
    })
}

/// Parse a sampling rate and check it lies in `[0, 1]`.
fn parse_rate<F>(lookup: &F, key: &str, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let rate: f32 = parse_or_default(lookup, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(invalid(key, &format!("must be between 0.0 and 1.0 (got {rate})")))
    }
}
