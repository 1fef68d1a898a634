//! Tauri commands for frontend integration.

use std::sync::Arc;

use anyhow::Context;
use stockroom_inventory::{DraftField, InventoryItem};
use tauri::{AppHandle, Emitter, State};
use tokio::task::JoinHandle;

use crate::api::{HttpInventoryApi, InventoryApi};
use crate::config::ClientConfig;
use crate::controller::{InventoryListController, RefreshCallback, ViewListener};
use crate::types::{SelectedFile, ViewSnapshot};

/// Event emitted when the inventory list should be re-fetched.
pub const REFRESH_EVENT: &str = "inventory://refresh";

/// Event carrying a [`ViewSnapshot`] after background work changed the view.
pub const VIEW_EVENT: &str = "inventory://view";

/// Application state shared across Tauri commands.
pub struct AppState {
    pub controller: InventoryListController<HttpInventoryApi>,
}

impl AppState {
    /// Build the API client and a controller that emits [`REFRESH_EVENT`]
    /// and [`VIEW_EVENT`] to the frontend.
    pub fn new(config: ClientConfig, app_handle: AppHandle) -> anyhow::Result<Self> {
        let policy = config.reselect_policy;
        let api = HttpInventoryApi::new(config).context("failed to build inventory API client")?;

        let handle = app_handle.clone();
        let refresh: RefreshCallback = Arc::new(move || {
            if let Err(e) = handle.emit(REFRESH_EVENT, ()) {
                tracing::warn!("failed to emit {}: {}", REFRESH_EVENT, e);
            }
        });
        let listener: ViewListener = Arc::new(move |snapshot: ViewSnapshot| {
            if let Err(e) = app_handle.emit(VIEW_EVENT, snapshot) {
                tracing::warn!("failed to emit {}: {}", VIEW_EVENT, e);
            }
        });

        Ok(Self {
            controller: InventoryListController::new(Arc::new(api), policy, refresh)
                .with_view_listener(listener),
        })
    }
}

/// Wait for a controller task; cancellation is not an error for the caller.
async fn settle(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        if !e.is_cancelled() {
            tracing::error!("view task failed: {}", e);
        }
    }
}

// Commands that only touch the view state are synchronous so Tauri runs them
// in the order they were invoked.

/// Current view state.
#[tauri::command]
pub fn view_state(state: State<'_, AppState>) -> Result<ViewSnapshot, String> {
    Ok(state.controller.snapshot())
}

/// Mount the view and wait for the supplier list.
#[tauri::command]
pub async fn mount_inventory_view(state: State<'_, AppState>) -> Result<ViewSnapshot, String> {
    let handle = state.controller.mount().map_err(|e| e.to_string())?;
    settle(handle).await;
    Ok(state.controller.snapshot())
}

/// Unmount the view, cancelling in-flight work.
#[tauri::command]
pub fn unmount_inventory_view(state: State<'_, AppState>) -> Result<ViewSnapshot, String> {
    state.controller.unmount();
    Ok(state.controller.snapshot())
}

/// Fetch the authoritative inventory list.
#[tauri::command]
pub async fn list_inventory(state: State<'_, AppState>) -> Result<Vec<InventoryItem>, String> {
    state
        .controller
        .api()
        .list_inventory()
        .await
        .map_err(|e| format!("Failed to load inventory: {}", e))
}

#[tauri::command]
pub fn open_add_product(state: State<'_, AppState>) -> Result<ViewSnapshot, String> {
    state.controller.open_modal().map_err(|e| e.to_string())?;
    Ok(state.controller.snapshot())
}

#[tauri::command]
pub fn close_add_product(state: State<'_, AppState>) -> Result<ViewSnapshot, String> {
    state.controller.close_modal().map_err(|e| e.to_string())?;
    Ok(state.controller.snapshot())
}

/// Write raw input text into a draft field.
#[tauri::command(rename_all = "snake_case")]
pub fn edit_product_field(
    field: String,
    value: String,
    state: State<'_, AppState>,
) -> Result<ViewSnapshot, String> {
    let field = DraftField::from_name(&field).map_err(|e| e.to_string())?;
    state
        .controller
        .edit_field(field, value)
        .map_err(|e| e.to_string())?;
    Ok(state.controller.snapshot())
}

/// Attach an image and wait for its preview.
#[tauri::command(rename_all = "snake_case")]
pub async fn attach_image(
    name: String,
    mime: Option<String>,
    bytes: Vec<u8>,
    state: State<'_, AppState>,
) -> Result<ViewSnapshot, String> {
    tracing::info!("Attaching image {} ({} bytes)", name, bytes.len());

    let mut file = SelectedFile::new(name, bytes);
    if let Some(mime) = mime.filter(|m| !m.is_empty()) {
        file = file.with_mime(mime);
    }

    let handle = state.controller.select_file(file).map_err(|e| e.to_string())?;
    settle(handle).await;
    Ok(state.controller.snapshot())
}

/// Start a submission and return the pending state.
///
/// The outcome arrives as a [`VIEW_EVENT`]; failures are reported through
/// `ViewSnapshot::error`, not as a command error.
#[tauri::command]
pub async fn submit_product(state: State<'_, AppState>) -> Result<ViewSnapshot, String> {
    state.controller.submit().map_err(|e| e.to_string())?;
    Ok(state.controller.snapshot())
}
