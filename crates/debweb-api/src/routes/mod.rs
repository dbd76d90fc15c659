//! Route modules for the web server
//!
//! List pages follow one structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: HTMX fragments and mutations
//! - page.rs: Full page rendering
//!
//! The balance lookup and password recovery screens are small enough to
//! live in one file each.

pub mod accounts;
pub mod auth;
pub mod balance;
pub mod customers;
pub mod daily_log;
pub mod daily_transactions;
pub mod due;
pub mod entry;
pub mod statement;

use crate::error::ApiError;
use debweb_core::{CoreResult, DateRange, ListController, ListParams, ListQuery, Page, RefreshOutcome, RowExpansion};
use std::future::Future;

/// Active query of a list request; blank filters mean the page's default range
pub fn resolve_query(params: &ListParams, default_range: DateRange) -> CoreResult<ListQuery> {
    if params.is_blank() {
        Ok(ListQuery::new().with_range(default_range).at_page(params.page()))
    } else {
        params.to_query()
    }
}

/// Fetch one page of `query` through a fresh list controller
///
/// The controller lives for this one request, so it never sees a
/// superseded fetch and `Stale` cannot occur here. Out-of-order
/// responses are dropped in the browser: every list frame carries
/// `hx-sync='this:replace'`, which aborts the older request.
pub async fn load_list<T, F, Fut>(
    name: &str,
    query: ListQuery,
    expanded: Option<&str>,
    fetch: F,
) -> Result<ListController<T>, ApiError>
where
    F: FnOnce(ListQuery) -> Fut,
    Fut: Future<Output = CoreResult<Page<T>>>,
{
    let mut list = ListController::new(name, query.clone());
    *list.expansion_mut() = RowExpansion::with_expanded(expanded);
    match list.refresh(query, fetch).await {
        RefreshOutcome::Failed(notice) => Err(ApiError::Refresh {
            list: name.to_string(),
            notice,
        }),
        RefreshOutcome::Applied | RefreshOutcome::Stale => Ok(list),
    }
}
