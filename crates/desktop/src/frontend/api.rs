//! Tauri command bindings via `window.__TAURI__`.

use serde::Serialize;
use stockroom_inventory::InventoryItem;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use crate::types::ViewSnapshot;

/// Event the desktop shell emits after a product was added.
pub const REFRESH_EVENT: &str = "inventory://refresh";

/// Event carrying a view snapshot pushed by background work.
pub const VIEW_EVENT: &str = "inventory://view";

/// Look up `window.__TAURI__.<namespace>`.
fn tauri_namespace(namespace: &str) -> Result<JsValue, String> {
    let window = window().ok_or_else(|| "No window object".to_string())?;
    let tauri_obj = js_sys::Reflect::get(&window, &JsValue::from_str("__TAURI__"))
        .map_err(|e| format!("Failed to get __TAURI__: {:?}", e))?;
    js_sys::Reflect::get(&tauri_obj, &JsValue::from_str(namespace))
        .map_err(|e| format!("Failed to get {}: {:?}", namespace, e))
}

/// Invoke a Tauri command and deserialize its result.
async fn invoke_tauri<T>(cmd: &str, args: serde_json::Value) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    let core = tauri_namespace("core")?;
    let invoke_fn = js_sys::Reflect::get(&core, &JsValue::from_str("invoke"))
        .map_err(|e| format!("Failed to get invoke: {:?}", e))?;

    // Plain JS objects, not `Map`s, so Tauri can read the arguments.
    let args = args
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize args: {:?}", e))?;

    let promise = js_sys::Function::from(invoke_fn)
        .call2(&core, &JsValue::from_str(cmd), &args)
        .map_err(|e| format!("Failed to call invoke: {:?}", e))?;

    // Commands reject with their error string.
    let result = JsFuture::from(js_sys::Promise::from(promise))
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)))?;

    serde_wasm_bindgen::from_value(result)
        .map_err(|e| format!("Failed to deserialize result: {:?}", e))
}

pub async fn view_state() -> Result<ViewSnapshot, String> {
    invoke_tauri("view_state", serde_json::json!({})).await
}

pub async fn mount_inventory_view() -> Result<ViewSnapshot, String> {
    invoke_tauri("mount_inventory_view", serde_json::json!({})).await
}

pub async fn unmount_inventory_view() -> Result<ViewSnapshot, String> {
    invoke_tauri("unmount_inventory_view", serde_json::json!({})).await
}

pub async fn list_inventory() -> Result<Vec<InventoryItem>, String> {
    invoke_tauri("list_inventory", serde_json::json!({})).await
}

pub async fn open_add_product() -> Result<ViewSnapshot, String> {
    invoke_tauri("open_add_product", serde_json::json!({})).await
}

pub async fn close_add_product() -> Result<ViewSnapshot, String> {
    invoke_tauri("close_add_product", serde_json::json!({})).await
}

pub async fn edit_product_field(field: String, value: String) -> Result<ViewSnapshot, String> {
    invoke_tauri(
        "edit_product_field",
        serde_json::json!({ "field": field, "value": value }),
    )
    .await
}

pub async fn attach_image(
    name: String,
    mime: Option<String>,
    bytes: Vec<u8>,
) -> Result<ViewSnapshot, String> {
    invoke_tauri(
        "attach_image",
        serde_json::json!({ "name": name, "mime": mime, "bytes": bytes }),
    )
    .await
}

pub async fn submit_product() -> Result<ViewSnapshot, String> {
    invoke_tauri("submit_product", serde_json::json!({})).await
}

/// Read the bytes of a picked file.
pub async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Subscribe to a shell event; `handler` gets the event's `payload`.
fn listen(name: &'static str, handler: impl Fn(JsValue) + 'static) -> Result<(), String> {
    let event = tauri_namespace("event")?;
    let listen_fn = js_sys::Reflect::get(&event, &JsValue::from_str("listen"))
        .map_err(|e| format!("Failed to get listen: {:?}", e))?;

    let callback = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
        let payload = js_sys::Reflect::get(&event, &JsValue::from_str("payload"))
            .unwrap_or(JsValue::NULL);
        handler(payload)
    });
    js_sys::Function::from(listen_fn)
        .call2(&event, &JsValue::from_str(name), callback.as_ref().unchecked_ref())
        .map_err(|e| format!("Failed to listen for {}: {:?}", name, e))?;

    // The listener lives as long as the window.
    callback.forget();
    Ok(())
}

/// Call `handler` whenever the shell emits [`REFRESH_EVENT`].
pub fn on_refresh(handler: impl Fn() + 'static) -> Result<(), String> {
    listen(REFRESH_EVENT, move |_| handler())
}

/// Call `handler` with every snapshot pushed through [`VIEW_EVENT`].
pub fn on_view_update(handler: impl Fn(ViewSnapshot) + 'static) -> Result<(), String> {
    listen(VIEW_EVENT, move |payload| match serde_wasm_bindgen::from_value(payload) {
        Ok(snapshot) => handler(snapshot),
        Err(e) => leptos::logging::warn!("Malformed {} payload: {:?}", VIEW_EVENT, e),
    })
}
