//! Browser entrypoint for the diet recommendation pages.
//!
//! This crate is a no-op by default so the workspace builds and tests on native
//! targets without a wasm toolchain.
//!
//! Enable the real entrypoint with: `--features web` (and a wasm32 target).

pub mod pending;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{start, BrowserDom, WindowScheduler};
