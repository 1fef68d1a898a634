//! Inventory list view state (pure, WASM-compatible).
//!
//! All UI state of the list view lives in [`InventoryListView`] and changes
//! only through [`StateMachine::handle`] / [`StateMachine::apply`]. Async
//! work (supplier load, preview encode, submission) is identified by a
//! [`Ticket`]; a completion carrying a ticket that is no longer current is
//! dropped without emitting events.

use serde::{Deserialize, Serialize};
use stockroom_core::{DomainError, StateMachine, Ticket};
use stockroom_inventory::{DraftEdit, DraftField, ProductDraft, Supplier, supplier_options};

use crate::types::{SelectedFile, ViewSnapshot};

/// Input to the view: user actions and async completions.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    Mount { ticket: Ticket },
    Unmount,
    /// `None` means the fetch failed.
    CompleteSupplierLoad { ticket: Ticket, suppliers: Option<Vec<Supplier>> },
    OpenModal,
    CloseModal,
    EditField { field: DraftField, raw: String },
    SelectFile { ticket: Ticket, file: SelectedFile },
    /// `None` means the encode failed or was aborted.
    CompletePreview { ticket: Ticket, data_url: Option<String> },
    Submit { ticket: Ticket },
    CompleteSubmission { ticket: Ticket, outcome: Result<(), String> },
    AbortSubmission,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    Mounted { ticket: Ticket },
    Unmounted,
    SuppliersLoaded { suppliers: Vec<Supplier> },
    SupplierLoadFailed,
    ModalOpened,
    ModalClosed,
    FieldEdited { edit: DraftEdit },
    FileSelected { ticket: Ticket, file: SelectedFile },
    PreviewReady { data_url: String },
    PreviewFailed,
    SubmissionStarted { ticket: Ticket },
    SubmissionSucceeded,
    SubmissionFailed { message: String },
    SubmissionAborted,
}

/// State record of the inventory list view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryListView {
    revision: u64,
    mounted: bool,
    suppliers: Vec<Supplier>,
    supplier_load: Option<Ticket>,
    modal_open: bool,
    draft: ProductDraft,
    file: Option<SelectedFile>,
    file_ticket: Option<Ticket>,
    preview: Option<String>,
    submission: Option<Ticket>,
    error: Option<String>,
}

impl InventoryListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            revision: self.revision,
            mounted: self.mounted,
            modal_open: self.modal_open,
            draft: self.draft.clone(),
            supplier_options: supplier_options(&self.suppliers),
            file_name: self.file.as_ref().map(|f| f.name.clone()),
            preview_url: self.preview.clone(),
            submitting: self.is_submitting(),
            error: self.error.clone(),
        }
    }

    fn require_mounted(&self) -> Result<(), DomainError> {
        if self.mounted {
            Ok(())
        } else {
            Err(DomainError::invalid_state("view is not mounted"))
        }
    }

    fn require_modal(&self) -> Result<(), DomainError> {
        self.require_mounted()?;
        if self.modal_open {
            Ok(())
        } else {
            Err(DomainError::invalid_state("add-product form is closed"))
        }
    }
}

impl StateMachine for InventoryListView {
    type Command = ViewCommand;
    type Event = ViewEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        self.revision += 1;
        match event {
            ViewEvent::Mounted { ticket } => {
                self.mounted = true;
                self.supplier_load = Some(*ticket);
            }
            ViewEvent::Unmounted => {
                // Transient state does not survive a remount.
                *self = Self {
                    revision: self.revision,
                    ..Self::default()
                };
            }
            ViewEvent::SuppliersLoaded { suppliers } => {
                self.suppliers = suppliers.clone();
                self.supplier_load = None;
            }
            ViewEvent::SupplierLoadFailed => {
                self.supplier_load = None;
            }
            ViewEvent::ModalOpened => self.modal_open = true,
            ViewEvent::ModalClosed => self.modal_open = false,
            ViewEvent::FieldEdited { edit } => self.draft.apply(edit.clone()),
            ViewEvent::FileSelected { ticket, file } => {
                self.file = Some(file.clone());
                self.file_ticket = Some(*ticket);
            }
            ViewEvent::PreviewReady { data_url } => {
                self.preview = Some(data_url.clone());
            }
            ViewEvent::PreviewFailed => self.preview = None,
            ViewEvent::SubmissionStarted { ticket } => {
                self.submission = Some(*ticket);
                self.error = None;
            }
            ViewEvent::SubmissionSucceeded => {
                self.submission = None;
                self.modal_open = false;
                self.draft = ProductDraft::default();
                self.file = None;
                self.file_ticket = None;
                self.preview = None;
                self.error = None;
            }
            ViewEvent::SubmissionFailed { message } => {
                self.submission = None;
                self.error = Some(message.clone());
            }
            ViewEvent::SubmissionAborted => self.submission = None,
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ViewCommand::Mount { ticket } => {
                if self.mounted {
                    return Err(DomainError::conflict("view is already mounted"));
                }
                Ok(vec![ViewEvent::Mounted { ticket: *ticket }])
            }
            ViewCommand::Unmount => {
                if !self.mounted {
                    return Ok(vec![]);
                }
                Ok(vec![ViewEvent::Unmounted])
            }
            ViewCommand::CompleteSupplierLoad { ticket, suppliers } => {
                if self.supplier_load != Some(*ticket) {
                    return Ok(vec![]);
                }
                Ok(vec![match suppliers {
                    Some(suppliers) => ViewEvent::SuppliersLoaded {
                        suppliers: suppliers.clone(),
                    },
                    None => ViewEvent::SupplierLoadFailed,
                }])
            }
            ViewCommand::OpenModal => {
                self.require_mounted()?;
                if self.modal_open {
                    return Ok(vec![]);
                }
                Ok(vec![ViewEvent::ModalOpened])
            }
            ViewCommand::CloseModal => {
                if !self.modal_open {
                    return Ok(vec![]);
                }
                Ok(vec![ViewEvent::ModalClosed])
            }
            ViewCommand::EditField { field, raw } => {
                self.require_modal()?;
                let edit = field.parse(raw)?;
                Ok(vec![ViewEvent::FieldEdited { edit }])
            }
            ViewCommand::SelectFile { ticket, file } => {
                self.require_modal()?;
                Ok(vec![ViewEvent::FileSelected {
                    ticket: *ticket,
                    file: file.clone(),
                }])
            }
            ViewCommand::CompletePreview { ticket, data_url } => {
                if self.file_ticket != Some(*ticket) {
                    return Ok(vec![]);
                }
                Ok(vec![match data_url {
                    Some(url) => ViewEvent::PreviewReady {
                        data_url: url.clone(),
                    },
                    None => ViewEvent::PreviewFailed,
                }])
            }
            ViewCommand::Submit { ticket } => {
                self.require_modal()?;
                if self.submission.is_some() {
                    return Err(DomainError::conflict("a submission is already pending"));
                }
                Ok(vec![ViewEvent::SubmissionStarted { ticket: *ticket }])
            }
            ViewCommand::CompleteSubmission { ticket, outcome } => {
                if self.submission != Some(*ticket) {
                    return Ok(vec![]);
                }
                Ok(vec![match outcome {
                    Ok(()) => ViewEvent::SubmissionSucceeded,
                    Err(message) => ViewEvent::SubmissionFailed {
                        message: message.clone(),
                    },
                }])
            }
            ViewCommand::AbortSubmission => {
                if self.submission.is_none() {
                    return Ok(vec![]);
                }
                Ok(vec![ViewEvent::SubmissionAborted])
            }
        }
    }
}
