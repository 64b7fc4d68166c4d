//! tokensnap - token lists by network
//!
//! Browse the token lists published per blockchain network: pick a network,
//! filter by symbol or chain id, hover a tile for its details. The URL path
//! (`/category/search`) mirrors what is on screen.
//!
//! ## Architecture
//!
//! The core (`App`) is headless and renderer-agnostic. It asks its host for
//! async work through [`types::Effect`]s and receives results as
//! [`types::AppEvent`]s. Two hosts drive it:
//! - **Native**: terminal UI using crossterm and ratatui (`tokensnap`)
//! - **Web**: DOM front end over a JSON snapshot/action boundary (`tokensnap-web-dom`)
//!
//! ## Usage
//!
//! For native builds:
//! ```bash
//! cargo run -- /Arbitrum/usdc
//! ```
//!
//! For web builds:
//! ```bash
//! cargo build --bin tokensnap-web-dom --target wasm32-unknown-unknown --no-default-features --features dom-web
//! ```

// Core modules (available on all platforms)
pub mod config;
pub mod constants;
pub mod types;

pub mod categories;
pub mod feed;
pub mod filter;
pub mod grid;

// Theme system (ratatui colors + CSS custom properties)
pub mod theme;

// Deep link router and history
pub mod nav;
pub mod router;

pub mod app;
pub mod effects;
pub mod ui;

// UI snapshot types for DOM-based rendering (all platforms)
pub mod ui_snapshot;

// Platform abstraction layer
pub mod platform;

// Re-export commonly used types
pub use app::{App, AppOptions, InputMode};
pub use config::Config;
pub use feed::{FeedError, FeedOutcome, HttpFeed, TokenSource};
pub use types::{AppEvent, Effect, Token};
