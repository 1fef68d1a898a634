//! Tauri application entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(feature = "tauri")]
use stockroom_desktop::commands::*;
#[cfg(feature = "tauri")]
use tauri::Manager;

#[cfg(feature = "tauri")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;

    stockroom_observability::init();

    // Share this runtime with Tauri so controller tasks and commands agree.
    tauri::async_runtime::set(tokio::runtime::Handle::current());

    let config = stockroom_desktop::ClientConfig::from_env();
    tracing::info!("Using inventory API at {}", config.api_url);

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .invoke_handler(tauri::generate_handler![
            view_state,
            mount_inventory_view,
            unmount_inventory_view,
            list_inventory,
            open_add_product,
            close_add_product,
            edit_product_field,
            attach_image,
            submit_product,
        ])
        .setup(move |app| {
            let state = AppState::new(config.clone(), app.handle().clone())?;
            app.manage(state);
            tracing::info!("Inventory view state ready");
            Ok(())
        })
        .run(tauri::generate_context!())
        .context("error while running tauri application")
}

#[cfg(not(feature = "tauri"))]
fn main() {
    eprintln!("This binary requires the 'tauri' feature to be enabled.");
    eprintln!("Build with: cargo build --features tauri");
    std::process::exit(1);
}
