//! Add-product submission pipeline: optional image upload, then create.

use chrono::{DateTime, Utc};
use stockroom_core::Ticket;
use stockroom_inventory::ProductDraft;

use crate::api::{ApiError, InventoryApi};
use crate::types::SelectedFile;

/// Inputs captured when the user pressed Submit.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub ticket: Ticket,
    pub draft: ProductDraft,
    pub file: Option<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub ticket: Ticket,
    /// Image reference sent in the create request.
    pub image_url: String,
    pub uploaded: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("image upload failed: {0}")]
    Upload(#[source] ApiError),
    #[error("failed to add product: {0}")]
    Create(#[source] ApiError),
}

/// Run the submission steps in order; each step gates the next.
///
/// With a file attached, the upload's `image_url` replaces the typed one.
/// An upload failure stops before any product is created.
#[tracing::instrument(skip_all, fields(ticket = %request.ticket, product = %request.draft.name))]
pub async fn submit_product<A>(api: &A, request: &SubmissionRequest) -> Result<SubmissionReport, SubmitError>
where
    A: InventoryApi + ?Sized,
{
    let (image_url, uploaded) = match &request.file {
        Some(file) => {
            let uploaded = api.upload_image(file).await.map_err(SubmitError::Upload)?;
            tracing::debug!("image uploaded to {}", uploaded.image_url);
            (uploaded.image_url, true)
        }
        None => (request.draft.image_url.clone(), false),
    };

    let product = request.draft.to_new_product(image_url.clone());
    api.add_product(&product).await.map_err(SubmitError::Create)?;

    tracing::debug!("product created");

    Ok(SubmissionReport {
        ticket: request.ticket,
        image_url,
        uploaded,
        completed_at: Utc::now(),
    })
}
