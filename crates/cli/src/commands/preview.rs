//! Headless page session.
//!
//! Mounts the header and home page over in-memory collaborators, starts the
//! promo carousel and prints a JSON snapshot of both views whenever either
//! publishes a change. Runs until `--seconds` elapse or Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! cc-cli preview --width 390 --signed-in asha@example.com --cart 2,1 --seconds 12
//! ```

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use capsule_care_core::{CartLine, Identity, RoutePath};
use capsule_care_storefront::config::StorefrontConfig;
use capsule_care_storefront::error::set_sentry_user;
use capsule_care_storefront::services::memory::{MemoryCollaborators, MemoryRouter};
use capsule_care_storefront::ui::{HomePage, HomeView, NavigationPresenter, NavigationView};
use clap::Args;
use serde::Serialize;

use super::CommandError;

/// Arguments for `cc-cli preview`.
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Viewport width in CSS pixels
    #[arg(short, long, default_value_t = 1280)]
    pub width: u32,

    /// Start signed in with this email address
    #[arg(long, value_name = "EMAIL")]
    pub signed_in: Option<String>,

    /// Cart line quantities, comma separated
    #[arg(long, value_name = "Q,Q,...", value_delimiter = ',')]
    pub cart: Vec<u32>,

    /// Stop after this many seconds
    #[arg(short, long, default_value_t = 30)]
    pub seconds: u64,

    /// Route shown when the session starts
    #[arg(long, default_value = "/")]
    pub route: RoutePath,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    source: &'a str,
    elapsed_ms: u64,
    navigation: NavigationView,
    home: HomeView,
}

/// Run the preview session.
pub async fn run(args: PreviewArgs, config: StorefrontConfig) -> Result<(), CommandError> {
    let mut mem = MemoryCollaborators::new(args.width, config.mobile_breakpoint_px);
    mem.router = Arc::new(MemoryRouter::at(args.route));

    if let Some(email) = args.signed_in {
        set_sentry_user(&email, Some(email.as_str()));
        mem.session.set_identity(Some(Identity::with_email(email)));
    }
    for (i, quantity) in args.cart.into_iter().enumerate() {
        mem.cart.add(CartLine::new(format!("item-{}", i + 1), quantity));
    }

    let ctx = mem.context(config);
    let navigation = NavigationPresenter::new(ctx.clone());
    let home = HomePage::new(ctx);

    let mut nav_rx = navigation.subscribe();
    let mut home_rx = home.subscribe();
    let mut carousel_rx = home.carousel().subscribe();

    let started = tokio::time::Instant::now();
    let mut out = std::io::stdout().lock();
    let mut emit = |source: &str| -> Result<(), CommandError> {
        let snapshot = Snapshot {
            source,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            navigation: navigation.view(),
            home: home.view(),
        };
        serde_json::to_writer(&mut out, &snapshot)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    };

    home.start();
    tracing::info!(seconds = args.seconds, width = args.width, "Preview started");
    emit("initial")?;

    let deadline = tokio::time::sleep(Duration::from_secs(args.seconds));
    tokio::pin!(deadline);

    loop {
        let source = tokio::select! {
            () = &mut deadline => break,
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Interrupted");
                break;
            }
            Ok(()) = carousel_rx.changed() => "carousel",
            Ok(()) = nav_rx.changed() => "navigation",
            Ok(()) = home_rx.changed() => "home",
        };
        emit(source)?;
    }

    home.shutdown();
    emit("shutdown")?;
    tracing::info!("Preview finished");
    Ok(())
}
