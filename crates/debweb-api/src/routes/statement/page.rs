//! Statement page rendering - Full page endpoint

use super::api::{prompt, STATEMENT_VIEW};
use crate::components::{page_header, FilterFields};
use crate::page_response;
use axum::extract::Query;
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_core::{ListParams, ListQuery, RowExpansion};

/// `?search=` pre-selects an account, e.g. from the accounts list
pub async fn page_statement(headers: HeaderMap, Query(params): Query<ListParams>) -> Html<String> {
    let query = params.to_query().unwrap_or_else(|_| ListQuery::new());
    let filters = STATEMENT_VIEW.filter_form(
        &query.to_draft(),
        FilterFields {
            dates: true,
            search: Some("Account number"),
            ..Default::default()
        },
    );
    let list = if query.search.is_some() {
        STATEMENT_VIEW.placeholder(&query)
    } else {
        STATEMENT_VIEW.frame(&query, &RowExpansion::new(), &prompt())
    };
    let inner_content = format!(
        "{}{}{}",
        page_header("Account Statement", ""),
        filters,
        list
    );
    Html(page_response(&headers, "Statement", "/statement", &inner_content))
}
