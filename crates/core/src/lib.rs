//! `stockroom-core`: shared building blocks for the inventory client.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no UI).

pub mod error;
pub mod id;
pub mod state;

pub use error::{DomainError, DomainResult};
pub use id::{InventoryItemId, SupplierId, Ticket};
pub use state::StateMachine;
