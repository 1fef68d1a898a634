//! Drives the inventory list view: applies commands to the state record and
//! runs the async work they start.
//!
//! The state lock is only held for a single transition, never across an
//! `.await`. Every task is tracked by an abort handle so `unmount` (and the
//! reselect policy) can cancel it; completions of cancelled or superseded
//! tasks are dropped by ticket check in the state machine.

use std::sync::{Arc, Mutex, MutexGuard};

use stockroom_core::{DomainResult, StateMachine, Ticket};
use stockroom_inventory::DraftField;
use tokio::task::{AbortHandle, JoinHandle};

use crate::api::InventoryApi;
use crate::preview;
use crate::state::{InventoryListView, ViewCommand, ViewEvent};
use crate::submit::{SubmissionRequest, submit_product};
use crate::types::{ReselectPolicy, SelectedFile, ViewSnapshot};

/// Parent-owned callback that re-fetches the authoritative inventory list.
pub type RefreshCallback = Arc<dyn Fn() + Send + Sync>;

/// Receives the view state after background work changed it.
pub type ViewListener = Arc<dyn Fn(ViewSnapshot) + Send + Sync>;

/// One tracked task and the ticket it was started with.
#[derive(Debug, Default)]
struct Slot(Option<(Ticket, AbortHandle)>);

impl Slot {
    fn track(&mut self, ticket: Ticket, handle: &JoinHandle<()>) {
        self.0 = Some((ticket, handle.abort_handle()));
    }

    /// Forget the task if the slot still holds `ticket`.
    fn release(&mut self, ticket: Ticket) {
        if self.0.as_ref().is_some_and(|(current, _)| *current == ticket) {
            self.0 = None;
        }
    }

    /// Abort the tracked task; returns whether there was one.
    fn abort(&mut self) -> bool {
        match self.0.take() {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn is_tracking(&self, ticket: Ticket) -> bool {
        self.0.as_ref().is_some_and(|(current, _)| *current == ticket)
    }
}

#[derive(Debug, Default)]
struct InFlight {
    suppliers: Slot,
    preview: Slot,
    submission: Slot,
}

impl InFlight {
    fn abort_all(&mut self) {
        self.suppliers.abort();
        self.preview.abort();
        self.submission.abort();
    }
}

pub struct InventoryListController<A: InventoryApi> {
    api: Arc<A>,
    policy: ReselectPolicy,
    view: Arc<Mutex<InventoryListView>>,
    in_flight: Arc<Mutex<InFlight>>,
    refresh: RefreshCallback,
    listener: Option<ViewListener>,
}

impl<A: InventoryApi> Clone for InventoryListController<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            policy: self.policy,
            view: self.view.clone(),
            in_flight: self.in_flight.clone(),
            refresh: self.refresh.clone(),
            listener: self.listener.clone(),
        }
    }
}

/// Lock, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A: InventoryApi> InventoryListController<A> {
    pub fn new(api: Arc<A>, policy: ReselectPolicy, refresh: RefreshCallback) -> Self {
        Self {
            api,
            policy,
            view: Arc::new(Mutex::new(InventoryListView::new())),
            in_flight: Arc::new(Mutex::new(InFlight::default())),
            refresh,
            listener: None,
        }
    }

    /// Push a snapshot to `listener` whenever a background task changes the view.
    pub fn with_view_listener(mut self, listener: ViewListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        lock(&self.view).snapshot()
    }

    fn dispatch(&self, command: &ViewCommand) -> DomainResult<Vec<ViewEvent>> {
        let events = lock(&self.view).execute(command)?;
        if !events.is_empty() {
            tracing::debug!(?events, "view updated");
        }
        Ok(events)
    }

    /// Apply a task completion and tell the listener if anything changed.
    fn complete(&self, command: &ViewCommand) -> Vec<ViewEvent> {
        let events = match self.dispatch(command) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("completion rejected: {}", e);
                Vec::new()
            }
        };
        if !events.is_empty() {
            if let Some(listener) = &self.listener {
                listener(self.snapshot());
            }
        }
        events
    }

    /// Mount the view and start loading suppliers.
    ///
    /// A failed load is logged and leaves the supplier list as it was.
    pub fn mount(&self) -> DomainResult<JoinHandle<()>> {
        let ticket = Ticket::new();
        self.dispatch(&ViewCommand::Mount { ticket })?;
        tracing::info!("inventory view mounted");

        let mut in_flight = lock(&self.in_flight);
        let this = self.clone();
        let handle = tokio::spawn(async move {
            let suppliers = match this.api.list_suppliers().await {
                Ok(suppliers) => {
                    tracing::debug!("loaded {} suppliers", suppliers.len());
                    Some(suppliers)
                }
                Err(e) => {
                    tracing::warn!("failed to load suppliers: {}", e);
                    None
                }
            };
            this.complete(&ViewCommand::CompleteSupplierLoad { ticket, suppliers });
            lock(&this.in_flight).suppliers.release(ticket);
        });
        in_flight.suppliers.track(ticket, &handle);
        Ok(handle)
    }

    /// Abort all in-flight work and drop transient state.
    pub fn unmount(&self) {
        lock(&self.in_flight).abort_all();
        let _ = self.dispatch(&ViewCommand::Unmount);
        tracing::info!("inventory view unmounted");
    }

    pub fn open_modal(&self) -> DomainResult<()> {
        self.dispatch(&ViewCommand::OpenModal).map(|_| ())
    }

    pub fn close_modal(&self) -> DomainResult<()> {
        self.dispatch(&ViewCommand::CloseModal).map(|_| ())
    }

    pub fn edit_field(&self, field: DraftField, raw: impl Into<String>) -> DomainResult<()> {
        self.dispatch(&ViewCommand::EditField {
            field,
            raw: raw.into(),
        })
        .map(|_| ())
    }

    /// Attach a file and start encoding its preview.
    ///
    /// The file is stored immediately; the preview follows when the encode
    /// finishes. What happens to earlier in-flight work depends on the
    /// reselect policy.
    pub fn select_file(&self, file: SelectedFile) -> DomainResult<JoinHandle<()>> {
        let ticket = Ticket::new();
        self.dispatch(&ViewCommand::SelectFile {
            ticket,
            file: file.clone(),
        })?;

        let mut in_flight = lock(&self.in_flight);
        if self.policy.aborts_preview() && in_flight.preview.abort() {
            tracing::debug!("aborted previous preview encode");
        }
        if self.policy.aborts_submission() && in_flight.submission.abort() {
            let _ = self.dispatch(&ViewCommand::AbortSubmission);
            tracing::info!("aborted pending submission after file reselection");
        }

        let this = self.clone();
        let handle = tokio::spawn(async move {
            let name = file.name.clone();
            let data_url = match tokio::task::spawn_blocking(move || preview::preview_url(&file)).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("failed to encode preview for {}: {}", name, e);
                    None
                }
            };
            this.complete(&ViewCommand::CompletePreview { ticket, data_url });
            lock(&this.in_flight).preview.release(ticket);
        });
        in_flight.preview.track(ticket, &handle);
        Ok(handle)
    }

    /// Start a submission.
    ///
    /// Rejected with a conflict while another submission is pending. On
    /// success the modal closes and the refresh callback runs once; on
    /// failure the error is logged and recorded for the modal.
    pub fn submit(&self) -> DomainResult<JoinHandle<()>> {
        let ticket = Ticket::new();
        let request = {
            let mut view = lock(&self.view);
            view.execute(&ViewCommand::Submit { ticket })?;
            SubmissionRequest {
                ticket,
                draft: view.draft().clone(),
                file: view.selected_file().cloned(),
            }
        };

        let mut in_flight = lock(&self.in_flight);
        let this = self.clone();
        let handle = tokio::spawn(async move {
            let outcome = match submit_product(this.api.as_ref(), &request).await {
                Ok(report) => {
                    tracing::info!(
                        ticket = %report.ticket,
                        uploaded = report.uploaded,
                        image_url = %report.image_url,
                        completed_at = %report.completed_at,
                        "product submitted"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(ticket = %ticket, "Error: {}", e);
                    Err(e.to_string())
                }
            };

            let events = this.complete(&ViewCommand::CompleteSubmission { ticket, outcome });
            lock(&this.in_flight).submission.release(ticket);

            if events.contains(&ViewEvent::SubmissionSucceeded) {
                (this.refresh)();
            }
        });
        in_flight.submission.track(ticket, &handle);
        Ok(handle)
    }
}
