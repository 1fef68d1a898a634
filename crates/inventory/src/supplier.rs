use serde::{Deserialize, Serialize};

use stockroom_core::SupplierId;

/// Label of the empty selector option.
pub const PLACEHOLDER_LABEL: &str = "Select a Supplier";

/// Supplier as returned by `GET /suppliers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
}

/// One entry of the supplier selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierOption {
    /// Form value; empty for the placeholder.
    pub value: String,
    pub label: String,
}

impl SupplierOption {
    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: PLACEHOLDER_LABEL.to_string(),
        }
    }
}

impl From<&Supplier> for SupplierOption {
    fn from(supplier: &Supplier) -> Self {
        Self {
            value: supplier.id.to_string(),
            label: supplier.name.clone(),
        }
    }
}

/// Selector contents: the placeholder followed by the suppliers in order.
pub fn supplier_options(suppliers: &[Supplier]) -> Vec<SupplierOption> {
    core::iter::once(SupplierOption::placeholder())
        .chain(suppliers.iter().map(SupplierOption::from))
        .collect()
}
