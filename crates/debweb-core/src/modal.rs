//! Edit and delete modal state
//!
//! Both modals guard their record id: a blank id fails with
//! [`CoreError::MissingIdentifier`] before any request is built.

use crate::error::{CoreError, CoreResult};
use std::future::Future;

/// Pre-populated edit form for one record
#[derive(Debug, Clone)]
pub struct EditModal<D> {
    resource: &'static str,
    state: Option<EditState<D>>,
}

#[derive(Debug, Clone)]
struct EditState<D> {
    id: String,
    original: D,
    draft: D,
}

impl<D: Clone + PartialEq> EditModal<D> {
    /// `resource` names the record kind in messages, e.g. "customer"
    pub fn new(resource: &'static str) -> Self {
        Self { resource, state: None }
    }

    /// Open for record `id`, pre-filled with its current values
    pub fn open(&mut self, id: impl Into<String>, current: D) {
        self.state = Some(EditState {
            id: id.into(),
            original: current.clone(),
            draft: current,
        });
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.id.as_str())
    }

    pub fn draft(&self) -> Option<&D> {
        self.state.as_ref().map(|s| &s.draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        self.state.as_mut().map(|s| &mut s.draft)
    }

    /// True when the draft differs from the values it was opened with
    pub fn is_dirty(&self) -> bool {
        self.state
            .as_ref()
            .map(|s| s.draft != s.original)
            .unwrap_or(false)
    }

    /// Close and discard edits; issues nothing
    pub fn cancel(&mut self) {
        self.state = None;
    }

    /// Send the draft with `send(id, draft)`; closes on success
    ///
    /// On failure the modal stays open with the edits intact.
    pub async fn submit<F, Fut>(&mut self, send: F) -> CoreResult<()>
    where
        F: FnOnce(String, D) -> Fut,
        Fut: Future<Output = CoreResult<()>>,
    {
        let state = self.state.as_ref().ok_or_else(|| CoreError::MissingIdentifier {
            resource: self.resource.to_string(),
        })?;
        if state.id.trim().is_empty() {
            return Err(CoreError::MissingIdentifier {
                resource: self.resource.to_string(),
            });
        }

        send(state.id.clone(), state.draft.clone()).await?;
        self.state = None;
        Ok(())
    }
}

/// Two-step delete confirmation
#[derive(Debug, Clone, Default)]
pub struct DeleteModal {
    resource: &'static str,
    target: Option<DeleteTarget>,
}

#[derive(Debug, Clone)]
struct DeleteTarget {
    id: Option<String>,
    label: String,
    confirmed: bool,
}

impl DeleteModal {
    pub fn new(resource: &'static str) -> Self {
        Self { resource, target: None }
    }

    /// Open for the row labelled `label`; `id` may be missing on partial records
    pub fn open(&mut self, id: Option<&str>, label: impl Into<String>) {
        let id = id.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        self.target = Some(DeleteTarget {
            id,
            label: label.into(),
            confirmed: false,
        });
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn label(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.label.as_str())
    }

    pub fn confirm(&mut self) {
        if let Some(target) = self.target.as_mut() {
            target.confirmed = true;
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.target.as_ref().map(|t| t.confirmed).unwrap_or(false)
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Delete with `send(id)` once confirmed; closes on success
    pub async fn submit<F, Fut>(&mut self, send: F) -> CoreResult<()>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = CoreResult<()>>,
    {
        let missing = || CoreError::MissingIdentifier {
            resource: self.resource.to_string(),
        };
        let target = self.target.as_ref().ok_or_else(missing)?;
        let id = target.id.clone().ok_or_else(missing)?;
        if !target.confirmed {
            return Err(CoreError::invalid("confirm", "Confirm the deletion first"));
        }

        send(id).await?;
        self.target = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendApi;
    use crate::list::{ListController, RefreshOutcome};
    use crate::models::{Customer, CustomerDraft};
    use crate::query::ListQuery;
    use crate::transport::testing::RecordingTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_delete_with_missing_id_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let api = BackendApi::new(transport.clone());
        let mut modal = DeleteModal::new("customer");
        modal.open(None, "Rahim");
        modal.confirm();

        let result = modal.submit(|id| async move { api.delete_customer(&id).await }).await;
        assert!(matches!(result, Err(CoreError::MissingIdentifier { .. })));
        assert_eq!(transport.request_count(), 0);
        assert!(modal.is_open());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let transport = Arc::new(RecordingTransport::new());
        let api = BackendApi::new(transport.clone());
        let mut modal = DeleteModal::new("customer");
        modal.open(Some("c1"), "Rahim");

        let result = modal.submit(|id| async move { api.delete_customer(&id).await }).await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmed_delete_then_refetch() {
        let transport = Arc::new(RecordingTransport::new());
        transport
            .respond(
                "GET /api/customers",
                serde_json::json!({ "data": [{ "_id": "c1" }, { "_id": "c2" }] }),
            )
            .respond("GET /api/customers", serde_json::json!({ "data": [{ "_id": "c2" }] }));
        let api = BackendApi::new(transport.clone());
        let mut list: ListController<Customer> = ListController::new("customers", ListQuery::new());
        let api_ref = &api;
        list.refresh(ListQuery::new(), |q| async move { api_ref.list_customers(&q).await })
            .await;
        let before = transport.request_count();

        let mut modal = DeleteModal::new("customer");
        modal.open(Some("c1"), "Rahim");
        modal.confirm();
        modal
            .submit(|id| async move { api_ref.delete_customer(&id).await })
            .await
            .unwrap();
        let outcome = list.reload(|q| async move { api_ref.list_customers(&q).await }).await;

        assert_eq!(outcome, RefreshOutcome::Applied);
        let issued = transport.log()[before..].to_vec();
        assert_eq!(issued, vec!["DELETE /api/customers/c1", "GET /api/customers?page=1"]);
        assert_eq!(list.rows().len(), 1);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_edit_cancel_issues_nothing() {
        let mut modal = EditModal::new("customer");
        modal.open(
            "c1",
            CustomerDraft { customer_name: "Rahim".to_string(), mobile_number: "01711111111".to_string() },
        );
        if let Some(draft) = modal.draft_mut() {
            draft.customer_name = "Karim".to_string();
        }
        assert!(modal.is_dirty());
        modal.cancel();
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn test_edit_submits_put_with_draft() {
        let transport = Arc::new(RecordingTransport::new());
        let api = BackendApi::new(transport.clone());
        let mut modal = EditModal::new("customer");
        modal.open(
            "c1",
            CustomerDraft { customer_name: "Rahim".to_string(), mobile_number: "01711111111".to_string() },
        );
        if let Some(draft) = modal.draft_mut() {
            draft.customer_name = "Karim".to_string();
        }

        let api_ref = &api;
        modal
            .submit(|id, draft| async move { api_ref.update_customer(&id, &draft).await })
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].to_string(), "PUT /api/customers/c1");
        assert_eq!(requests[0].body.as_ref().unwrap()["customerName"], "Karim");
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn test_edit_failure_keeps_modal_open() {
        let transport = Arc::new(RecordingTransport::new());
        transport.fail(
            "PUT /api/customers/c1",
            CoreError::Backend { status: 500, message: "boom".to_string() },
        );
        let api = BackendApi::new(transport.clone());
        let mut modal = EditModal::new("customer");
        modal.open("c1", CustomerDraft::default());

        let api_ref = &api;
        let result = modal
            .submit(|id, draft| async move { api_ref.update_customer(&id, &draft).await })
            .await;
        assert!(result.is_err());
        assert!(modal.is_open());
    }

    #[tokio::test]
    async fn test_edit_blank_id_is_guarded() {
        let transport = Arc::new(RecordingTransport::new());
        let api = BackendApi::new(transport.clone());
        let mut modal = EditModal::new("customer");
        modal.open(" ", CustomerDraft::default());

        let api_ref = &api;
        let result = modal
            .submit(|id, draft| async move { api_ref.update_customer(&id, &draft).await })
            .await;
        assert!(matches!(result, Err(CoreError::MissingIdentifier { .. })));
        assert_eq!(transport.request_count(), 0);
    }
}
