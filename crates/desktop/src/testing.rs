//! In-memory [`InventoryApi`] for controller and pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;
use stockroom_inventory::{ImageUploaded, InventoryItem, NewProduct, Supplier};
use tokio::sync::Semaphore;

use crate::api::{ApiError, InventoryApi};
use crate::types::SelectedFile;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListSuppliers,
    UploadImage(String),
    AddProduct(NewProduct),
    ListInventory,
}

/// Records every call; each endpoint answers with a canned response.
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    suppliers: Result<Vec<Supplier>, u16>,
    upload: Result<String, u16>,
    create: Result<(), u16>,
    /// When set, `add_product` waits for a permit before answering.
    gate: Option<Semaphore>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            suppliers: Ok(Vec::new()),
            upload: Ok("http://localhost:8000/static/upload.png".to_string()),
            create: Ok(()),
            gate: None,
        }
    }
}

impl FakeApi {
    pub fn with_suppliers(mut self, suppliers: Vec<Supplier>) -> Self {
        self.suppliers = Ok(suppliers);
        self
    }

    pub fn failing_suppliers(mut self, status: u16) -> Self {
        self.suppliers = Err(status);
        self
    }

    pub fn with_upload_url(mut self, url: &str) -> Self {
        self.upload = Ok(url.to_string());
        self
    }

    pub fn failing_upload(mut self, status: u16) -> Self {
        self.upload = Err(status);
        self
    }

    pub fn failing_create(mut self, status: u16) -> Self {
        self.create = Err(status);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Let one gated `add_product` call through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Api(status, "rejected by fake".to_string())
}

#[async_trait]
impl InventoryApi for FakeApi {
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        self.record(Call::ListSuppliers);
        self.suppliers.clone().map_err(status_error)
    }

    async fn upload_image(&self, file: &SelectedFile) -> Result<ImageUploaded, ApiError> {
        self.record(Call::UploadImage(file.name.clone()));
        self.upload
            .clone()
            .map(|image_url| ImageUploaded { image_url })
            .map_err(status_error)
    }

    async fn add_product(&self, product: &NewProduct) -> Result<(), ApiError> {
        self.record(Call::AddProduct(product.clone()));
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?
                .forget();
        }
        self.create.map_err(status_error)
    }

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.record(Call::ListInventory);
        Ok(Vec::new())
    }
}
