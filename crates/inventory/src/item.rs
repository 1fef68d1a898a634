use serde::{Deserialize, Serialize};

use stockroom_core::InventoryItemId;

/// One row of the inventory list (matches the API response shape).
///
/// Owned by the parent view; the list only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    pub category: String,
    pub stock_level: i64,
    pub reorder_threshold: i64,
    #[serde(rename = "batchInfo", default)]
    pub batch_info: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub image_url: String,
}

impl InventoryItem {
    /// Stock is at or below the reorder threshold.
    pub fn needs_reorder(&self) -> bool {
        self.stock_level <= self.reorder_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_batch_info() {
        let item: InventoryItem = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Oat milk",
            "category": "Dairy alternatives",
            "stock_level": 12,
            "reorder_threshold": 20,
            "batchInfo": "B-2024-11",
            "supplier": "Green Farms",
            "image_url": "http://localhost:8000/static/oat.png"
        }))
        .unwrap();

        assert_eq!(item.id, InventoryItemId::new(3));
        assert_eq!(item.batch_info, "B-2024-11");
        assert!(item.needs_reorder());
    }

    #[test]
    fn missing_descriptors_default_to_empty() {
        let item: InventoryItem = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Flour",
            "category": "Baking",
            "stock_level": 50,
            "reorder_threshold": 10
        }))
        .unwrap();

        assert!(item.batch_info.is_empty());
        assert!(item.image_url.is_empty());
        assert!(!item.needs_reorder());
    }

    #[test]
    fn threshold_boundary_needs_reorder() {
        let item = InventoryItem {
            id: InventoryItemId::new(9),
            name: "Salt".to_string(),
            category: "Baking".to_string(),
            stock_level: 5,
            reorder_threshold: 5,
            batch_info: String::new(),
            supplier: String::new(),
            image_url: String::new(),
        };
        assert!(item.needs_reorder());
    }
}
