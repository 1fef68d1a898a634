//! HTTP bindings for the inventory backend.

use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use stockroom_inventory::{ImageUploaded, InventoryItem, NewProduct, Supplier};

use crate::config::ClientConfig;
use crate::types::SelectedFile;

pub const SUPPLIERS_PATH: &str = "/suppliers";
pub const UPLOAD_IMAGE_PATH: &str = "/products/upload-image";
pub const ADD_PRODUCT_PATH: &str = "/products/add";

/// Multipart field carrying the image file.
pub const UPLOAD_FIELD: &str = "uploaded_file";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Backend operations used by the inventory list view.
#[async_trait]
pub trait InventoryApi: Send + Sync + 'static {
    /// `GET /suppliers`.
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError>;

    /// `POST /products/upload-image` (multipart).
    async fn upload_image(&self, file: &SelectedFile) -> Result<ImageUploaded, ApiError>;

    /// `POST /products/add`; the response body is not used.
    async fn add_product(&self, product: &NewProduct) -> Result<(), ApiError>;

    /// Authoritative inventory list, fetched by the parent on refresh.
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError>;
}

/// `reqwest`-backed [`InventoryApi`].
#[derive(Debug, Clone)]
pub struct HttpInventoryApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpInventoryApi {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fail with `ApiError::Api` unless the status is 2xx.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        Err(ApiError::Api(status, resp.text().await.unwrap_or_default()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        tracing::debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        self.get_json(SUPPLIERS_PATH).await
    }

    async fn upload_image(&self, file: &SelectedFile) -> Result<ImageUploaded, ApiError> {
        let url = self.config.endpoint(UPLOAD_IMAGE_PATH);
        tracing::debug!("POST {} ({}, {} bytes)", url, file.name, file.bytes.len());

        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime_type())
            .map_err(|e| ApiError::Client(format!("invalid MIME type: {e}")))?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse upload response: {}", e)))
    }

    async fn add_product(&self, product: &NewProduct) -> Result<(), ApiError> {
        let url = self.config.endpoint(ADD_PRODUCT_PATH);
        tracing::debug!("POST {} ({})", url, product.name);

        let resp = self
            .client
            .post(&url)
            .json(product)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check(resp).await.map(|_| ())
    }

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.get_json(&self.config.inventory_path).await
    }
}
