//! Typed backend API
//!
//! One method per backend endpoint. Each builds an [`ApiRequest`],
//! sends it through the shared [`Transport`] and decodes the
//! `{ success, data, pagination?, summary? }` envelope. Responses are
//! trusted as-is; nothing is cached.

use crate::error::{CoreError, CoreResult};
use crate::models::{
    Account, AccountDraft, CreditDraft, CreditTransaction, Customer, CustomerDraft, DailyLogEntry,
    DebitDraft, DueDraft, DueEntry, Envelope, LogPage, LogSummary, Page, Pagination, StatementEntry,
};
use crate::query::ListQuery;
use crate::transport::{ApiRequest, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Backend paths, relative to the configured base URL
pub mod paths {
    pub const MOBILE_ACCOUNTS: &str = "/api/mobileAccounts";
    pub const ACCOUNT_DATAS: &str = "/api/mobileAccounts/account-datas";
    pub const ACCOUNTS_BY_COMPANY: &str = "/api/mobileAccounts/company";
    pub const TODAY_LOG: &str = "/api/mobileAccounts/today-log";
    pub const CUSTOMERS: &str = "/api/customers";
    pub const CUSTOMER_SEARCH: &str = "/api/customers/search";
    pub const CREDIT: &str = "/api/credit";
    pub const CREDIT_PERSONAL: &str = "/api/credit/personal";
    pub const CREDIT_DOWNLOAD: &str = "/api/credit/download-pdf";
    pub const CREDIT_ACCOUNT_DATAS: &str = "/api/credit/account-datas";
    pub const STATEMENT_DELETE: &str = "/api/credit/statement-delete";
    pub const DEBIT: &str = "/api/debit";
    pub const DUE_LEDGER: &str = "/api/transactions";
    pub const DUE_GIVE: &str = "/api/transactions/give";
    pub const DUE_TAKE: &str = "/api/transactions/take";
    pub const USER_VERIFY: &str = "/api/user/verify";
    pub const USER_RESET_PASSWORD: &str = "/api/user/reset-password";
}

/// Typed access to every backend endpoint
#[derive(Clone)]
pub struct BackendApi {
    transport: Arc<dyn Transport>,
    export_limit: usize,
}

impl BackendApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            export_limit: 10000,
        }
    }

    /// `limit` sent to unpaginated endpoints
    pub fn with_export_limit(mut self, limit: usize) -> Self {
        self.export_limit = limit.max(1);
        self
    }

    pub fn export_limit(&self) -> usize {
        self.export_limit
    }

    // ==================== Accounts ====================

    pub async fn list_accounts(&self, query: &ListQuery) -> CoreResult<Page<Account>> {
        // The accounts list filters by date only
        let mut query = query.clone();
        query.search = None;
        query.entry_by = None;
        self.fetch_page(paths::MOBILE_ACCOUNTS, &query).await
    }

    /// Unpaginated balance search by number or company
    pub async fn search_account_balances(&self, search: &str) -> CoreResult<Vec<Account>> {
        let mut params = Vec::new();
        let search = search.trim();
        if !search.is_empty() {
            params.push(("search".to_string(), search.to_string()));
        }
        params.push(("limit".to_string(), self.export_limit.to_string()));
        self.fetch_list(ApiRequest::get(paths::ACCOUNT_DATAS, params)).await
    }

    /// Accounts of one company, for the dependent number selector
    pub async fn accounts_by_company(&self, company: &str) -> CoreResult<Vec<Account>> {
        let params = vec![("selectCompany".to_string(), company.to_string())];
        self.fetch_list(ApiRequest::get(paths::ACCOUNTS_BY_COMPANY, params)).await
    }

    pub async fn create_account(&self, draft: &AccountDraft) -> CoreResult<()> {
        self.mutate(ApiRequest::post(paths::MOBILE_ACCOUNTS, to_body(draft)?)).await
    }

    pub async fn update_account(&self, id: &str, draft: &AccountDraft) -> CoreResult<()> {
        let path = keyed(paths::MOBILE_ACCOUNTS, id, "account")?;
        self.mutate(ApiRequest::put(path, to_body(draft)?)).await
    }

    pub async fn delete_account(&self, id: &str) -> CoreResult<()> {
        let path = keyed(paths::MOBILE_ACCOUNTS, id, "account")?;
        self.mutate(ApiRequest::delete(path)).await
    }

    /// Combined credit/debit feed with totals
    pub async fn today_log(&self, query: &ListQuery) -> CoreResult<LogPage> {
        let request = ApiRequest::get(paths::TODAY_LOG, query.to_params());
        let envelope: Envelope<Vec<DailyLogEntry>> = self.send(request).await?;
        let summary = match envelope.summary.clone() {
            Some(value) => serde_json::from_value::<LogSummary>(value)?,
            None => LogSummary::default(),
        };
        Ok(LogPage {
            page: into_page(envelope, query.page),
            summary,
        })
    }

    // ==================== Customers ====================

    pub async fn list_customers(&self, query: &ListQuery) -> CoreResult<Page<Customer>> {
        self.fetch_page(paths::CUSTOMERS, query).await
    }

    /// Typeahead lookup by name or number
    pub async fn search_customers(&self, term: &str) -> CoreResult<Vec<Customer>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let params = vec![("search".to_string(), term.to_string())];
        self.fetch_list(ApiRequest::get(paths::CUSTOMER_SEARCH, params)).await
    }

    pub async fn create_customer(&self, draft: &CustomerDraft) -> CoreResult<()> {
        self.mutate(ApiRequest::post(paths::CUSTOMERS, to_body(draft)?)).await
    }

    pub async fn update_customer(&self, id: &str, draft: &CustomerDraft) -> CoreResult<()> {
        let path = keyed(paths::CUSTOMERS, id, "customer")?;
        self.mutate(ApiRequest::put(path, to_body(draft)?)).await
    }

    pub async fn delete_customer(&self, id: &str) -> CoreResult<()> {
        let path = keyed(paths::CUSTOMERS, id, "customer")?;
        self.mutate(ApiRequest::delete(path)).await
    }

    // ==================== Credit ====================

    pub async fn create_credit(&self, draft: &CreditDraft) -> CoreResult<()> {
        self.mutate(ApiRequest::post(paths::CREDIT, to_body(draft)?)).await
    }

    pub async fn update_credit(&self, id: &str, draft: &CreditDraft) -> CoreResult<()> {
        let path = keyed(paths::CREDIT, id, "transaction")?;
        self.mutate(ApiRequest::put(path, to_body(draft)?)).await
    }

    pub async fn delete_credit(&self, id: &str) -> CoreResult<()> {
        let path = keyed(paths::CREDIT, id, "transaction")?;
        self.mutate(ApiRequest::delete(path)).await
    }

    /// Paginated credit transactions for the daily transaction page
    pub async fn list_credits(&self, query: &ListQuery) -> CoreResult<Page<CreditTransaction>> {
        self.fetch_page(paths::CREDIT_PERSONAL, query).await
    }

    /// Every credit transaction matching the filters, for PDF export
    pub async fn export_credits(&self, query: &ListQuery) -> CoreResult<Vec<CreditTransaction>> {
        let request = ApiRequest::get(paths::CREDIT_DOWNLOAD, query.to_unpaged_params(self.export_limit));
        self.fetch_list(request).await
    }

    /// Paginated statement of one account; `search` carries the account number
    pub async fn account_statement(&self, query: &ListQuery) -> CoreResult<Page<StatementEntry>> {
        self.fetch_page(paths::CREDIT_ACCOUNT_DATAS, query).await
    }

    /// Full statement of one account, for PDF export
    pub async fn export_statement(&self, query: &ListQuery) -> CoreResult<Vec<StatementEntry>> {
        let request =
            ApiRequest::get(paths::CREDIT_ACCOUNT_DATAS, query.to_unpaged_params(self.export_limit));
        self.fetch_list(request).await
    }

    /// Bulk delete statement rows
    pub async fn delete_statement_entries(&self, ids: &[String]) -> CoreResult<()> {
        let ids: Vec<&str> = ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
        if ids.is_empty() {
            return Err(CoreError::MissingIdentifier {
                resource: "statement entry".to_string(),
            });
        }
        let body = serde_json::json!({ "ids": ids });
        self.mutate(ApiRequest::post(paths::STATEMENT_DELETE, body)).await
    }

    // ==================== Debit ====================

    pub async fn create_debit(&self, draft: &DebitDraft) -> CoreResult<()> {
        self.mutate(ApiRequest::post(paths::DEBIT, to_body(draft)?)).await
    }

    pub async fn update_debit(&self, id: &str, draft: &DebitDraft) -> CoreResult<()> {
        let path = keyed(paths::DEBIT, id, "transaction")?;
        self.mutate(ApiRequest::put(path, to_body(draft)?)).await
    }

    pub async fn delete_debit(&self, id: &str) -> CoreResult<()> {
        let path = keyed(paths::DEBIT, id, "transaction")?;
        self.mutate(ApiRequest::delete(path)).await
    }

    // ==================== Due ledger ====================

    pub async fn due_ledger(&self, mobile_number: &str) -> CoreResult<Vec<DueEntry>> {
        let path = keyed(paths::DUE_LEDGER, mobile_number, "mobile number")?;
        self.fetch_list(ApiRequest::get(path, Vec::new())).await
    }

    pub async fn give_due(&self, mobile_number: &str, draft: &DueDraft) -> CoreResult<()> {
        let path = keyed(paths::DUE_GIVE, mobile_number, "mobile number")?;
        self.mutate(ApiRequest::post(path, to_body(draft)?)).await
    }

    pub async fn take_due(&self, mobile_number: &str, draft: &DueDraft) -> CoreResult<()> {
        let path = keyed(paths::DUE_TAKE, mobile_number, "mobile number")?;
        self.mutate(ApiRequest::post(path, to_body(draft)?)).await
    }

    // ==================== Password recovery ====================

    pub async fn verify_user(&self, email: &str) -> CoreResult<()> {
        let body = serde_json::json!({ "email": email.trim() });
        self.mutate(ApiRequest::post(paths::USER_VERIFY, body)).await
    }

    pub async fn reset_password(&self, email: &str, password: &str) -> CoreResult<()> {
        let body = serde_json::json!({ "email": email.trim(), "password": password });
        self.mutate(ApiRequest::post(paths::USER_RESET_PASSWORD, body)).await
    }

    // ==================== Plumbing ====================

    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> CoreResult<Envelope<T>> {
        let value = self.transport.send(request).await?;
        let envelope: Envelope<T> = serde_json::from_value(value)?;
        if !envelope.success {
            return Err(CoreError::Backend {
                status: 200,
                message: envelope.message.unwrap_or_default(),
            });
        }
        Ok(envelope)
    }

    async fn fetch_page<T: DeserializeOwned>(&self, path: &str, query: &ListQuery) -> CoreResult<Page<T>> {
        let envelope: Envelope<Vec<T>> = self.send(ApiRequest::get(path, query.to_params())).await?;
        Ok(into_page(envelope, query.page))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, request: ApiRequest) -> CoreResult<Vec<T>> {
        let envelope: Envelope<Vec<T>> = self.send(request).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn mutate(&self, request: ApiRequest) -> CoreResult<()> {
        self.send::<serde_json::Value>(request).await.map(|_| ())
    }
}

/// Records plus pagination; a missing block means a single page
fn into_page<T>(envelope: Envelope<Vec<T>>, requested_page: usize) -> Page<T> {
    let records = envelope.data.unwrap_or_default();
    let pagination = envelope.pagination.unwrap_or(Pagination {
        current_page: requested_page,
        total_pages: 1,
        total_items: records.len(),
    });
    Page { records, pagination }
}

/// `base/<id>`; a blank id never reaches the wire
fn keyed(base: &str, id: &str, resource: &str) -> CoreResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CoreError::MissingIdentifier {
            resource: resource.to_string(),
        });
    }
    Ok(format!("{}/{}", base, urlencoding::encode(id)))
}

fn to_body<T: Serialize>(value: &T) -> CoreResult<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::transport::testing::RecordingTransport;
    use crate::transport::Method;

    fn api() -> (Arc<RecordingTransport>, BackendApi) {
        let transport = Arc::new(RecordingTransport::new());
        let api = BackendApi::new(transport.clone()).with_export_limit(500);
        (transport, api)
    }

    #[tokio::test]
    async fn test_list_customers_sends_filters_then_page() {
        let (transport, api) = api();
        transport.respond(
            "GET /api/customers",
            serde_json::json!({
                "success": true,
                "data": [{ "_id": "c1", "customerName": "Rahim", "mobileNumber": "01711111111" }],
                "pagination": { "currentPage": 1, "totalPages": 3, "totalItems": 21 }
            }),
        );
        let page = api.list_customers(&ListQuery::new().with_search("Rahim")).await.unwrap();
        assert_eq!(transport.log(), vec!["GET /api/customers?search=Rahim&page=1"]);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[tokio::test]
    async fn test_missing_pagination_is_single_page() {
        let (transport, api) = api();
        transport.respond("GET /api/mobileAccounts", serde_json::json!({ "data": [{}, {}] }));
        let page = api.list_accounts(&ListQuery::new().at_page(2)).await.unwrap();
        assert_eq!(page.pagination, Pagination { current_page: 2, total_pages: 1, total_items: 2 });
    }

    #[tokio::test]
    async fn test_accounts_list_ignores_search() {
        let (transport, api) = api();
        api.list_accounts(&ListQuery::new().with_search("017")).await.unwrap();
        assert_eq!(transport.log(), vec!["GET /api/mobileAccounts?page=1"]);
    }

    #[tokio::test]
    async fn test_success_false_is_backend_error() {
        let (transport, api) = api();
        transport.respond(
            "POST /api/debit",
            serde_json::json!({ "success": false, "message": "Insufficient balance" }),
        );
        let err = api.create_debit(&DebitDraft::default()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BackendError);
        assert_eq!(err.to_notice().message, "Insufficient balance");
    }

    #[tokio::test]
    async fn test_blank_id_sends_nothing() {
        let (transport, api) = api();
        let err = api.delete_customer("  ").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingIdentifier);
        assert!(api.update_account("", &AccountDraft::default()).await.is_err());
        assert!(api.delete_statement_entries(&[String::new()]).await.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_keyed_mutations() {
        let (transport, api) = api();
        api.update_credit("abc", &CreditDraft::default()).await.unwrap();
        api.delete_debit("d 1").await.unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].path, "/api/credit/abc");
        assert_eq!(requests[1].path, "/api/debit/d%201");
    }

    #[tokio::test]
    async fn test_today_log_summary() {
        let (transport, api) = api();
        transport.respond(
            "GET /api/mobileAccounts/today-log",
            serde_json::json!({
                "data": [{ "_id": "1", "isDebit": true, "amount": 40 }, { "_id": "2", "newAmount": 100 }],
                "summary": { "totalCredit": 100, "totalDebit": 40, "creditCount": 1, "debitCount": 1 },
                "pagination": { "currentPage": 1, "totalPages": 1 }
            }),
        );
        let log = api.today_log(&ListQuery::new()).await.unwrap();
        assert_eq!(log.page.records.len(), 2);
        assert_eq!(log.summary.total_debit, 40.0);
        assert_eq!(log.summary.credit_count, 1);
    }

    #[tokio::test]
    async fn test_export_uses_limit_not_page() {
        let (transport, api) = api();
        let query = ListQuery::new().with_entry_by("aditto").at_page(3);
        api.export_credits(&query).await.unwrap();
        assert_eq!(transport.log(), vec!["GET /api/credit/download-pdf?entryBy=aditto&limit=500"]);
    }

    #[tokio::test]
    async fn test_company_lookup_and_typeahead() {
        let (transport, api) = api();
        api.accounts_by_company("Nagad Personal").await.unwrap();
        assert!(api.search_customers(" ").await.unwrap().is_empty());
        api.search_customers("Rah").await.unwrap();
        assert_eq!(
            transport.log(),
            vec![
                "GET /api/mobileAccounts/company?selectCompany=Nagad%20Personal",
                "GET /api/customers/search?search=Rah",
            ]
        );
    }

    #[tokio::test]
    async fn test_due_endpoints() {
        let (transport, api) = api();
        api.due_ledger("01711111111").await.unwrap();
        api.give_due("01711111111", &DueDraft { amount: 50.0, ..Default::default() }).await.unwrap();
        api.take_due("01711111111", &DueDraft::default()).await.unwrap();
        assert_eq!(
            transport.log(),
            vec![
                "GET /api/transactions/01711111111",
                "POST /api/transactions/give/01711111111",
                "POST /api/transactions/take/01711111111",
            ]
        );
        assert_eq!(transport.requests()[1].body.as_ref().unwrap()["amount"], 50.0);
    }

    #[tokio::test]
    async fn test_statement_delete_body() {
        let (transport, api) = api();
        api.delete_statement_entries(&["a".to_string(), " ".to_string(), "b".to_string()])
            .await
            .unwrap();
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, serde_json::json!({ "ids": ["a", "b"] }));
    }
}
