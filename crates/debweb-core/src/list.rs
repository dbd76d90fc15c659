//! List controller: one explicit `refresh(query)` per fetch
//!
//! Each fetch is stamped with a [`RequestToken`] from a monotonic
//! sequence. A response is applied only when its token is still the
//! latest one issued, so a slow, superseded fetch can never overwrite
//! newer rows. A failed fetch leaves the rows in place and raises a
//! notice.

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::Page;
use crate::notice::Notice;
use crate::pager::{Pager, RowExpansion};
use crate::query::{FilterDraft, ListQuery};
use std::future::Future;

/// Stamp of one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic source of request tokens
#[derive(Debug, Default)]
pub struct RequestSequence {
    last_issued: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> RequestToken {
        self.last_issued += 1;
        RequestToken(self.last_issued)
    }

    /// True only for the most recently issued token
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.last_issued
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }
}

/// What became of a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Rows and pager replaced
    Applied,
    /// A newer fetch was issued meanwhile; response dropped
    Stale,
    /// Fetch failed; previous rows kept
    Failed(Notice),
}

/// State of one list page
#[derive(Debug)]
pub struct ListController<T> {
    name: String,
    query: ListQuery,
    rows: Vec<T>,
    pager: Pager,
    total_items: usize,
    loaded: bool,
    sequence: RequestSequence,
    expansion: RowExpansion,
    notice: Option<Notice>,
}

impl<T> ListController<T> {
    /// `name` identifies the page in logs, e.g. "customers"
    pub fn new(name: impl Into<String>, query: ListQuery) -> Self {
        Self {
            name: name.into(),
            query,
            rows: Vec::new(),
            pager: Pager::default(),
            total_items: 0,
            loaded: false,
            sequence: RequestSequence::new(),
            expansion: RowExpansion::new(),
            notice: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Query of the most recently issued fetch
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Loaded and no rows: render the empty state
    pub fn is_empty(&self) -> bool {
        self.loaded && self.rows.is_empty()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn expansion(&self) -> &RowExpansion {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut RowExpansion {
        &mut self.expansion
    }

    /// Query that applying `draft` would fetch (always page 1)
    pub fn apply_filters(&self, draft: &FilterDraft) -> CoreResult<ListQuery> {
        draft.apply()
    }

    /// Query for `page`, clamped to the known page count
    pub fn page_query(&self, page: usize) -> ListQuery {
        self.query.at_page(self.pager.clamp(page))
    }

    pub fn next_page_query(&self) -> Option<ListQuery> {
        if self.pager.next_disabled() {
            None
        } else {
            Some(self.query.at_page(self.pager.next_page()))
        }
    }

    pub fn prev_page_query(&self) -> Option<ListQuery> {
        if self.pager.prev_disabled() {
            None
        } else {
            Some(self.query.at_page(self.pager.prev_page()))
        }
    }

    /// Issue a fetch for `query`; pair with [`ListController::complete`]
    pub fn begin(&mut self, query: ListQuery) -> RequestToken {
        self.query = query;
        self.sequence.next()
    }

    /// Apply the result of the fetch stamped `token`
    pub fn complete(&mut self, token: RequestToken, result: CoreResult<Page<T>>) -> RefreshOutcome {
        if !self.sequence.is_current(token) {
            log::debug!(
                target: "debweb::list",
                "{}: dropping stale response {} (latest {})",
                self.name,
                token.value(),
                self.sequence.last_issued()
            );
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.pager = Pager::from_pagination(&page.pagination);
                self.total_items = page.pagination.total_items;
                self.rows = page.records;
                self.loaded = true;
                self.notice = None;
                RefreshOutcome::Applied
            }
            Err(error) => {
                let context = ErrorContext::new(format!("{}.refresh", self.name)).with_token(token.value());
                DefaultErrorLogger.log_error(&error, &context);
                let notice = error.to_notice();
                self.notice = Some(notice.clone());
                RefreshOutcome::Failed(notice)
            }
        }
    }

    /// Fetch `query` with `fetch` and apply the result
    pub async fn refresh<F, Fut>(&mut self, query: ListQuery, fetch: F) -> RefreshOutcome
    where
        F: FnOnce(ListQuery) -> Fut,
        Fut: Future<Output = CoreResult<Page<T>>>,
    {
        let token = self.begin(query.clone());
        let result = fetch(query).await;
        self.complete(token, result)
    }

    /// Re-issue the current query, e.g. after an update or delete
    pub async fn reload<F, Fut>(&mut self, fetch: F) -> RefreshOutcome
    where
        F: FnOnce(ListQuery) -> Fut,
        Fut: Future<Output = CoreResult<Page<T>>>,
    {
        let query = self.query.clone();
        self.refresh(query, fetch).await
    }

    /// Raise a notice without touching the rows
    pub fn fail(&mut self, error: &CoreError) -> Notice {
        let notice = error.to_notice();
        self.notice = Some(notice.clone());
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendApi;
    use crate::models::{Customer, Pagination};
    use crate::transport::testing::RecordingTransport;
    use std::sync::Arc;

    fn page_of(names: &[&str], current: usize, total: usize) -> Page<String> {
        Page {
            records: names.iter().map(|s| s.to_string()).collect(),
            pagination: Pagination { current_page: current, total_pages: total, total_items: names.len() },
        }
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut list: ListController<String> = ListController::new("customers", ListQuery::new());
        let first = list.begin(ListQuery::new().with_search("Ka"));
        let second = list.begin(ListQuery::new().with_search("Karim"));

        assert_eq!(list.complete(second, Ok(page_of(&["Karim"], 1, 1))), RefreshOutcome::Applied);
        assert_eq!(list.complete(first, Ok(page_of(&["Kamal", "Karim"], 1, 1))), RefreshOutcome::Stale);
        assert_eq!(list.rows(), &["Karim".to_string()]);
        assert_eq!(list.query().search.as_deref(), Some("Karim"));
    }

    #[test]
    fn test_failure_keeps_previous_rows() {
        let mut list: ListController<String> = ListController::new("accounts", ListQuery::new());
        let token = list.begin(ListQuery::new());
        list.complete(token, Ok(page_of(&["a", "b"], 1, 2)));

        let token = list.begin(ListQuery::new().at_page(2));
        let outcome = list.complete(token, Err(CoreError::Network { message: "refused".to_string() }));
        assert!(matches!(outcome, RefreshOutcome::Failed(_)));
        assert_eq!(list.rows().len(), 2);
        assert!(list.notice().is_some());
        assert_eq!(list.pager().current(), 1);
    }

    #[test]
    fn test_empty_state_only_after_load() {
        let mut list: ListController<String> = ListController::new("balance", ListQuery::new());
        assert!(!list.is_empty());
        let token = list.begin(ListQuery::new());
        list.complete(token, Ok(page_of(&[], 1, 0)));
        assert!(list.is_empty());
        assert!(list.next_page_query().is_none());
        assert!(list.prev_page_query().is_none());
    }

    #[test]
    fn test_page_navigation_queries() {
        let mut list: ListController<String> =
            ListController::new("customers", ListQuery::new().with_search("Rahim"));
        let token = list.begin(ListQuery::new().with_search("Rahim").at_page(2));
        list.complete(token, Ok(page_of(&["x"], 2, 3)));

        assert_eq!(list.next_page_query().unwrap().page, 3);
        assert_eq!(list.prev_page_query().unwrap().page, 1);
        assert_eq!(list.page_query(99).page, 3);
        assert_eq!(list.page_query(99).search.as_deref(), Some("Rahim"));
    }

    #[tokio::test]
    async fn test_refresh_through_backend() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(
            "GET /api/customers",
            serde_json::json!({ "data": [{ "_id": "1", "customerName": "Rahim" }] }),
        );
        let api = BackendApi::new(transport.clone());
        let mut list: ListController<Customer> = ListController::new("customers", ListQuery::new());

        let query = list
            .apply_filters(&FilterDraft { search: "Rahim".to_string(), ..Default::default() })
            .unwrap();
        let outcome = list.refresh(query, |q| async move { api.list_customers(&q).await }).await;

        assert_eq!(outcome, RefreshOutcome::Applied);
        assert_eq!(transport.log(), vec!["GET /api/customers?search=Rahim&page=1"]);
        assert_eq!(list.rows()[0].customer_name, "Rahim");
    }

    #[tokio::test]
    async fn test_changing_search_resets_page() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(
            "GET /api/customers",
            serde_json::json!({ "data": [], "pagination": { "currentPage": 3, "totalPages": 5 } }),
        );
        let api = BackendApi::new(transport.clone());
        let mut list: ListController<Customer> = ListController::new("customers", ListQuery::new());

        let api_ref = &api;
        list.refresh(ListQuery::new().at_page(3), |q| async move { api_ref.list_customers(&q).await })
            .await;
        assert_eq!(list.pager().current(), 3);

        let mut draft = list.query().to_draft();
        draft.search = "Rahim".to_string();
        let query = list.apply_filters(&draft).unwrap();
        assert_eq!(query.page, 1);
        list.refresh(query, |q| async move { api_ref.list_customers(&q).await }).await;
        assert_eq!(
            transport.log().last().unwrap(),
            "GET /api/customers?search=Rahim&page=1"
        );
    }
}
