//! Print the effective configuration.
//!
//! The Sentry DSN is reported as set or unset, never printed.

use std::io::Write;

use capsule_care_storefront::config::StorefrontConfig;
use serde_json::json;

use super::CommandError;

/// Write the configuration to stdout as pretty JSON.
pub fn show(config: &StorefrontConfig) -> Result<(), CommandError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &describe(config))?;
    writeln!(out)?;
    Ok(())
}

fn describe(config: &StorefrontConfig) -> serde_json::Value {
    json!({
        "mobile_breakpoint_px": config.mobile_breakpoint_px,
        "carousel": {
            "interval_ms": u64::try_from(config.carousel.interval.as_millis()).unwrap_or(u64::MAX),
            "settle_delay_ms": u64::try_from(config.carousel.settle_delay.as_millis()).unwrap_or(u64::MAX),
        },
        "sentry": {
            "dsn": if config.sentry_dsn.is_some() { "set" } else { "unset" },
            "environment": config.sentry_environment,
            "sample_rate": config.sentry_sample_rate,
            "traces_sample_rate": config.sentry_traces_sample_rate,
        },
    })
}
