//! Inventory domain records.
//!
//! Read models for the inventory list and suppliers, and the draft record the
//! add-product form edits. Pure data and validation (no IO, no HTTP).

pub mod item;
pub mod product;
pub mod supplier;

pub use item::InventoryItem;
pub use product::{DraftEdit, DraftField, ImageUploaded, NewProduct, ProductDraft};
pub use supplier::{PLACEHOLDER_LABEL, Supplier, SupplierOption, supplier_options};
