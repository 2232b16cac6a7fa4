//! UI-state components.
//!
//! # Components
//!
//! ```text
//! NavigationPresenter  - header links, identity actions, mobile drawer
//! HomePage             - home page flags, search, gated header actions
//!   └─ CarouselController - promo slides, auto-advance, fade transition
//! ```
//!
//! Components publish their own state through `tokio::sync::watch` channels
//! and read everything else (identity, cart, route, viewport) from the
//! collaborators on each query.

pub mod carousel;
pub mod derived;
pub mod home;
pub mod navigation;
pub mod scheduler;

pub use carousel::{CarouselController, CarouselPhase, CarouselState};
pub use home::{HomePage, HomeView};
pub use navigation::{IdentityAction, NavEntry, NavigationPresenter, NavigationView};
