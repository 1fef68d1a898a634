use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, SupplierId};

/// The in-progress, unsaved product fields collected by the add-product form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub stock_level: i64,
    pub reserved_stock: i64,
    pub reorder_threshold: i64,
    pub cost_price: f64,
    pub price: f64,
    pub supplier_id: Option<SupplierId>,
    /// Typed image reference; used only when no file is attached.
    pub image_url: String,
}

/// Editable fields of a [`ProductDraft`], named as the form inputs are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Name,
    Category,
    StockLevel,
    ReservedStock,
    ReorderThreshold,
    CostPrice,
    Price,
    SupplierId,
    ImageUrl,
}

/// A parsed edit of one draft field.
///
/// Each variant carries the value type of its field, so applying an edit
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DraftEdit {
    Name(String),
    Category(String),
    StockLevel(i64),
    ReservedStock(i64),
    ReorderThreshold(i64),
    CostPrice(f64),
    Price(f64),
    SupplierId(Option<SupplierId>),
    ImageUrl(String),
}

impl DraftEdit {
    pub fn field(&self) -> DraftField {
        match self {
            DraftEdit::Name(_) => DraftField::Name,
            DraftEdit::Category(_) => DraftField::Category,
            DraftEdit::StockLevel(_) => DraftField::StockLevel,
            DraftEdit::ReservedStock(_) => DraftField::ReservedStock,
            DraftEdit::ReorderThreshold(_) => DraftField::ReorderThreshold,
            DraftEdit::CostPrice(_) => DraftField::CostPrice,
            DraftEdit::Price(_) => DraftField::Price,
            DraftEdit::SupplierId(_) => DraftField::SupplierId,
            DraftEdit::ImageUrl(_) => DraftField::ImageUrl,
        }
    }
}

impl DraftField {
    pub const ALL: [DraftField; 9] = [
        DraftField::Name,
        DraftField::Category,
        DraftField::StockLevel,
        DraftField::ReservedStock,
        DraftField::ReorderThreshold,
        DraftField::CostPrice,
        DraftField::Price,
        DraftField::SupplierId,
        DraftField::ImageUrl,
    ];

    /// Input name used by the form and the JSON body.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Category => "category",
            DraftField::StockLevel => "stock_level",
            DraftField::ReservedStock => "reserved_stock",
            DraftField::ReorderThreshold => "reorder_threshold",
            DraftField::CostPrice => "cost_price",
            DraftField::Price => "price",
            DraftField::SupplierId => "supplier_id",
            DraftField::ImageUrl => "image_url",
        }
    }

    pub fn from_name(name: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == name)
            .ok_or_else(|| DomainError::validation(format!("unknown field '{name}'")))
    }

    /// Parse raw input text the way the matching HTML input type would.
    ///
    /// Numeric fields treat empty text as zero and reject anything that is
    /// not a (finite) number. The supplier field treats empty text as the
    /// placeholder (no supplier).
    pub fn parse(&self, raw: &str) -> DomainResult<DraftEdit> {
        Ok(match self {
            DraftField::Name => DraftEdit::Name(raw.to_string()),
            DraftField::Category => DraftEdit::Category(raw.to_string()),
            DraftField::ImageUrl => DraftEdit::ImageUrl(raw.to_string()),
            DraftField::StockLevel => DraftEdit::StockLevel(self.whole_number(raw)?),
            DraftField::ReservedStock => DraftEdit::ReservedStock(self.whole_number(raw)?),
            DraftField::ReorderThreshold => DraftEdit::ReorderThreshold(self.whole_number(raw)?),
            DraftField::CostPrice => DraftEdit::CostPrice(self.decimal(raw)?),
            DraftField::Price => DraftEdit::Price(self.decimal(raw)?),
            DraftField::SupplierId => {
                let raw = raw.trim();
                if raw.is_empty() {
                    DraftEdit::SupplierId(None)
                } else {
                    DraftEdit::SupplierId(Some(raw.parse::<SupplierId>()?))
                }
            }
        })
    }

    fn whole_number(&self, raw: &str) -> DomainResult<i64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse::<i64>()
            .map_err(|_| DomainError::validation(format!("{}: '{raw}' is not a whole number", self.as_str())))
    }

    fn decimal(&self, raw: &str) -> DomainResult<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(0.0);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(DomainError::validation(format!(
                "{}: '{raw}' is not a number",
                self.as_str()
            ))),
        }
    }
}

impl core::fmt::Display for DraftField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProductDraft {
    /// Write a parsed edit into the draft.
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Name(v) => self.name = v,
            DraftEdit::Category(v) => self.category = v,
            DraftEdit::ImageUrl(v) => self.image_url = v,
            DraftEdit::StockLevel(v) => self.stock_level = v,
            DraftEdit::ReservedStock(v) => self.reserved_stock = v,
            DraftEdit::ReorderThreshold(v) => self.reorder_threshold = v,
            DraftEdit::CostPrice(v) => self.cost_price = v,
            DraftEdit::Price(v) => self.price = v,
            DraftEdit::SupplierId(v) => self.supplier_id = v,
        }
    }

    /// Parse raw input and write it; the draft is unchanged on error.
    pub fn set_raw(&mut self, field: DraftField, raw: &str) -> DomainResult<()> {
        self.apply(field.parse(raw)?);
        Ok(())
    }

    /// Build the create-product request body with the resolved image reference.
    pub fn to_new_product(&self, image_url: impl Into<String>) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            category: self.category.clone(),
            stock_level: self.stock_level,
            reserved_stock: self.reserved_stock,
            reorder_threshold: self.reorder_threshold,
            cost_price: self.cost_price,
            price: self.price,
            supplier_id: self.supplier_id,
            image_url: image_url.into(),
        }
    }
}

/// Body of `POST /products/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub stock_level: i64,
    pub reserved_stock: i64,
    pub reorder_threshold: i64,
    pub cost_price: f64,
    pub price: f64,
    pub supplier_id: Option<SupplierId>,
    pub image_url: String,
}

/// Response of `POST /products/upload-image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUploaded {
    pub image_url: String,
}
