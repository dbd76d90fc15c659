//! Accounts page rendering - Full page endpoint

use super::api::ACCOUNTS_VIEW;
use crate::components::{page_header, FilterFields};
use crate::page_response;
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_core::ListQuery;

pub async fn page_accounts(headers: HeaderMap) -> Html<String> {
    let query = ListQuery::new();
    let actions = "<button hx-get='/accounts/new' hx-target='#modal' hx-swap='innerHTML' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>New account</button>";
    let filters = ACCOUNTS_VIEW.filter_form(
        &query.to_draft(),
        FilterFields {
            dates: true,
            ..Default::default()
        },
    );
    let inner_content = format!(
        "{}{}{}",
        page_header("Accounts", actions),
        filters,
        ACCOUNTS_VIEW.placeholder(&query)
    );
    Html(page_response(&headers, "Accounts", "/accounts", &inner_content))
}
