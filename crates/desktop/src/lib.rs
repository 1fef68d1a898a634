//! `stockroom-desktop`
//!
//! **Responsibility:** inventory list view with an add-product form.
//!
//! This crate provides:
//! - The view state record and its pure transitions (`state`)
//! - Image preview data URLs (`preview`)
//! - The backend HTTP client and the submission pipeline (`api`, `submit`)
//! - A controller that runs the async work and owns cancellation (`controller`)
//! - The Tauri shell and the Leptos frontend
//!
//! The desktop client is a **thin shell** around the inventory backend API.

pub mod preview;
pub mod state;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub mod api;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod controller;
#[cfg(not(target_arch = "wasm32"))]
pub mod submit;

#[cfg(all(feature = "tauri", not(target_arch = "wasm32")))]
pub mod commands;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod testing;

pub use state::{InventoryListView, ViewCommand, ViewEvent};
pub use types::{ReselectPolicy, SelectedFile, ViewSnapshot};

#[cfg(not(target_arch = "wasm32"))]
pub use api::{ApiError, HttpInventoryApi, InventoryApi};
#[cfg(not(target_arch = "wasm32"))]
pub use config::ClientConfig;
#[cfg(not(target_arch = "wasm32"))]
pub use controller::{InventoryListController, RefreshCallback, ViewListener};
#[cfg(not(target_arch = "wasm32"))]
pub use submit::{SubmissionReport, SubmissionRequest, SubmitError, submit_product};
