//! Leptos components: inventory page, list, rows and the add-product modal.

use leptos::*;
use stockroom_inventory::InventoryItem;

use crate::frontend::api;
use crate::types::ViewSnapshot;

/// Main application component.
///
/// Owns the authoritative inventory list and re-fetches it when the shell
/// signals a refresh.
#[component]
pub fn App() -> impl IntoView {
    let inventory = create_resource(
        || (),
        |_| async move {
            match api::list_inventory().await {
                Ok(items) => items,
                Err(e) => {
                    logging::warn!("Failed to load inventory: {}", e);
                    Vec::new()
                }
            }
        },
    );

    if let Err(e) = api::on_refresh(move || inventory.refetch()) {
        logging::warn!("Refresh listener unavailable: {}", e);
    }

    // Owned here so pushed updates never outlive the signal they write to.
    let snapshot = create_rw_signal(None::<ViewSnapshot>);
    if let Err(e) = api::on_view_update(move |next| store(snapshot, next)) {
        logging::warn!("View update listener unavailable: {}", e);
    }

    view! {
        <div class="app">
            <InventoryList
                inventory=Signal::derive(move || inventory.get().unwrap_or_default())
                snapshot=snapshot
            />
        </div>
    }
}

/// Keep the newest snapshot; replies and pushed updates may arrive out of order.
fn store(snapshot: RwSignal<Option<ViewSnapshot>>, next: ViewSnapshot) {
    snapshot.update(|current| {
        if next.supersedes(current.as_ref()) {
            *current = Some(next);
        }
    });
}

/// Store a command's snapshot; on error, log it and re-read the view state.
fn apply_result(snapshot: RwSignal<Option<ViewSnapshot>>, result: Result<ViewSnapshot, String>) {
    match result {
        Ok(next) => store(snapshot, next),
        Err(e) => {
            logging::error!("Error: {}", e);
            spawn_local(async move {
                if let Ok(current) = api::view_state().await {
                    store(snapshot, current);
                }
            });
        }
    }
}

#[component]
pub fn InventoryList(
    #[prop(into)] inventory: Signal<Vec<InventoryItem>>,
    snapshot: RwSignal<Option<ViewSnapshot>>,
) -> impl IntoView {
    spawn_local(async move { apply_result(snapshot, api::mount_inventory_view().await) });
    on_cleanup(|| {
        spawn_local(async {
            let _ = api::unmount_inventory_view().await;
        })
    });

    let modal_open = move || snapshot.with(|s| s.as_ref().is_some_and(|s| s.modal_open));

    view! {
        <div class="inventory-list">
            <div class="inventory-header">
                <h2>"Inventory List"</h2>
                <button
                    class="add-product"
                    on:click=move |_| {
                        spawn_local(async move {
                            apply_result(snapshot, api::open_add_product().await)
                        })
                    }
                >
                    "+ Add Product"
                </button>
            </div>

            <div class="inventory-items">
                <For
                    each=move || inventory.get()
                    key=|item| item.id
                    children=move |item| view! { <InventoryItemRow item=item/> }
                />
            </div>

            <Show when=modal_open>
                <AddProductModal snapshot=snapshot/>
            </Show>
        </div>
    }
}

/// One inventory row.
#[component]
pub fn InventoryItemRow(item: InventoryItem) -> impl IntoView {
    let low_stock = item.needs_reorder();
    let image = (!item.image_url.is_empty()).then(|| {
        view! { <img class="item-image" src=item.image_url.clone() alt=item.name.clone()/> }
    });

    view! {
        <div class="inventory-item" class:low-stock=low_stock>
            {image}
            <div class="item-details">
                <h3>{item.name.clone()}</h3>
                <p class="category">{item.category.clone()}</p>
                <p class="stock">
                    {format!("Stock: {} (reorder at {})", item.stock_level, item.reorder_threshold)}
                </p>
                <p class="batch">{format!("Batch: {}", item.batch_info)}</p>
                <p class="supplier">{format!("Supplier: {}", item.supplier)}</p>
            </div>
        </div>
    }
}

#[component]
fn AddProductModal(snapshot: RwSignal<Option<ViewSnapshot>>) -> impl IntoView {
    let file_input = create_node_ref::<html::Input>();

    // Inputs own their text while the modal is open; the draft only seeds them.
    let initial = move |f: fn(&ViewSnapshot) -> String| {
        snapshot.with_untracked(|s| s.as_ref().map(f).unwrap_or_default())
    };
    let read = move |f: fn(&ViewSnapshot) -> String| {
        move || snapshot.with(|s| s.as_ref().map(f).unwrap_or_default())
    };
    let edit = move |field: &'static str| {
        move |ev: ev::Event| {
            let value = event_target_value(&ev);
            spawn_local(async move {
                apply_result(snapshot, api::edit_product_field(field.to_string(), value).await)
            });
        }
    };

    let on_file = move |ev: ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        spawn_local(async move {
            match api::read_file(&file).await {
                Ok(bytes) => {
                    let mime = Some(file.type_()).filter(|t| !t.is_empty());
                    apply_result(snapshot, api::attach_image(file.name(), mime, bytes).await)
                }
                Err(e) => logging::error!("Error: {}", e),
            }
        });
    };

    let options = move || {
        snapshot.with(|s| {
            s.as_ref()
                .map(|s| s.supplier_options.clone())
                .unwrap_or_default()
        })
    };
    let preview = move || snapshot.with(|s| s.as_ref().and_then(|s| s.preview_url.clone()));
    let error = move || snapshot.with(|s| s.as_ref().and_then(|s| s.error.clone()));
    // Set on click so a second click is ignored before the reply arrives.
    let clicked = create_rw_signal(false);
    let submitting =
        move || clicked.get() || snapshot.with(|s| s.as_ref().is_some_and(|s| s.submitting));

    view! {
        <div class="modal-backdrop">
            <div class="modal">
                <h2>"Add New Product"</h2>
                <div class="form-fields">
                    <input type="text" name="name" placeholder="Product Name"
                        value=initial(|s| s.draft.name.clone()) on:input=edit("name")/>
                    <input type="text" name="category" placeholder="Category"
                        value=initial(|s| s.draft.category.clone()) on:input=edit("category")/>
                    <input type="number" name="stock_level" placeholder="Stock Level"
                        value=initial(|s| s.draft.stock_level.to_string()) on:input=edit("stock_level")/>
                    <input type="number" name="price" placeholder="Price"
                        value=initial(|s| s.draft.price.to_string()) on:input=edit("price")/>
                    <input type="number" name="cost_price" placeholder="Cost Price"
                        value=initial(|s| s.draft.cost_price.to_string()) on:input=edit("cost_price")/>
                    <input type="number" name="reorder_threshold" placeholder="Reorder Threshold"
                        value=initial(|s| s.draft.reorder_threshold.to_string())
                        on:input=edit("reorder_threshold")/>
                    <select name="supplier_id" on:change=edit("supplier_id")>
                        {move || {
                            let selected = snapshot.with(|s| {
                                s.as_ref()
                                    .and_then(|s| s.draft.supplier_id)
                                    .map(|id| id.to_string())
                                    .unwrap_or_default()
                            });
                            options()
                                .into_iter()
                                .map(|o| {
                                    let is_selected = o.value == selected;
                                    view! {
                                        <option value=o.value selected=is_selected>{o.label}</option>
                                    }
                                })
                                .collect_view()
                        }}
                    </select>
                    <div class="attach">
                        <input type="text" name="image_url" placeholder="No file selected" readonly
                            prop:value=read(|s| s.file_name.clone().unwrap_or_default())/>
                        <button
                            type="button"
                            on:click=move |_| {
                                if let Some(input) = file_input.get() {
                                    input.click();
                                }
                            }
                        >
                            "Attach"
                        </button>
                        <input type="file" accept="image/*" class="hidden"
                            node_ref=file_input on:change=on_file/>
                    </div>
                    {move || preview().map(|url| view! {
                        <div class="preview">
                            <img src=url alt="Preview"/>
                        </div>
                    })}
                    {move || error().map(|message| view! { <p class="error">{message}</p> })}
                </div>
                <div class="modal-actions">
                    <button
                        type="button"
                        on:click=move |_| {
                            spawn_local(async move {
                                apply_result(snapshot, api::close_add_product().await)
                            })
                        }
                    >
                        "Cancel"
                    </button>
                    <button
                        type="button"
                        class="primary"
                        disabled=submitting
                        on:click=move |_| {
                            if submitting() {
                                return;
                            }
                            clicked.set(true);
                            spawn_local(async move {
                                apply_result(snapshot, api::submit_product().await);
                                let _ = clicked.try_set(false);
                            })
                        }
                    >
                        {move || if submitting() { "Submitting..." } else { "Submit" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
