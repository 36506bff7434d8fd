//! Browser-side behaviour for the diet recommendation pages.
//!
//! The server renders every page; this crate only adjusts what is already
//! there. Session-dependent navigation, client-side form checks, loading
//! buttons, logout confirmation, toasts and recommendation heading icons.
//!
//! All of it is written against the [`dom::Dom`] and [`schedule::Scheduler`]
//! capabilities so the same code runs in the browser (see the `diet_web`
//! crate) and under `cargo test` with [`dom::memory::MemoryDom`].

pub mod app;
pub mod boot;
pub mod config;
pub mod decorate;
pub mod dom;
pub mod error;
pub mod nav;
pub mod notify;
pub mod query;
pub mod schedule;
pub mod session;
pub mod validate;

pub use app::{DietApp, SubmitOutcome, Toast};
pub use boot::boot;
pub use config::UiConfig;
pub use error::UiError;
