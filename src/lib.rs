//! # Roost 🪺
//!
//! A terminal client for the Delcom social platform.
//!
//! ## Overview
//!
//! Roost talks to the Delcom REST backend: log in or register, manage your
//! profile (with a device-local phone number that never leaves the machine),
//! and read, create, edit, and delete posts with image covers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │   Observable state + command/event channels to the worker   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     Config      │ │       API       │ │     Images      │
//! │                 │ │                 │ │                 │
//! │ • Load/Save     │ │ • Auth          │ │ • Decode        │
//! │ • API base      │ │ • Profile       │ │ • Resize        │
//! │ • Feed scope    │ │ • Posts         │ │ • Re-encode     │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          └───────────────────┴───────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │      Store      │ │      Error      │ │     Models      │
//! │                 │ │                 │ │                 │
//! │ • Phone         │ │ • Preconditions │ │ • ProfileUser   │
//! │   override      │ │ • Status table  │ │ • Post          │
//! │                 │ │ • Transport     │ │ • Comment       │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — HTTP client for the backend (auth, profile, posts)
//! - [`app`] — observable state, commands/events, the async worker
//! - [`config`] — configuration management
//! - [`connectivity`] — reachability probe seam
//! - [`error`] — shared error taxonomy
//! - [`images`] — upload image preparation
//! - [`models`] — data models mirroring the backend JSON contract
//! - [`store`] — device-local override storage (phone)
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use roost::app::{App, Command};
//! use roost::connectivity::AlwaysOnline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = roost::Config::load()?;
//!     let client = roost::Client::from_config(&config);
//!     let store = roost::Store::open()?;
//!
//!     let mut app = App::new(client, store, Arc::new(AlwaysOnline), config.feed_mine);
//!     app.dispatch(Command::LoadPosts).await;
//!     app.dispatch(Command::Shutdown).await;
//!     while let Some(event) = app.next_event().await {
//!         app.apply(event);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Notes
//!
//! - **Memory-only session** — the bearer token is never written to disk;
//!   a new process means a new login
//! - **Local override** — the profile phone number is stored only on this
//!   device and merged into every loaded profile
//! - **No retries** — every operation is loading → success | failure,
//!   surfaced straight to the user

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod app;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod images;
pub mod models;
pub mod paths;
pub mod store;

// Re-export main types for convenience
pub use api::Client;
pub use app::AppState;
pub use config::Config;
pub use error::{Error, Operation};
pub use models::{Comment, DetailedPost, Post, ProfileUser, User};
pub use store::Store;

/// ASCII logo for the application
pub const LOGO: &str = r"
                      __
   _______  ___  ___ / /_
  / __/ _ \/ _ \(_-</ __/
 /_/  \___/\___/___/\__/
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL
pub const REPO_URL: &str = "https://github.com/roost-client/roost";
