//! Customers page rendering - Full page endpoint

use super::api::CUSTOMERS_VIEW;
use crate::components::{page_header, FilterFields};
use crate::page_response;
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_core::ListQuery;

/// Customer directory with search
pub async fn page_customers(headers: HeaderMap) -> Html<String> {
    let query = ListQuery::new();
    let actions = "<button hx-get='/customers/new' hx-target='#modal' hx-swap='innerHTML' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>New customer</button>";
    let filters = CUSTOMERS_VIEW.filter_form(
        &query.to_draft(),
        FilterFields {
            search: Some("Search by name or number"),
            ..Default::default()
        },
    );
    let inner_content = format!(
        "{}{}{}",
        page_header("Customers", actions),
        filters,
        CUSTOMERS_VIEW.placeholder(&query)
    );
    Html(page_response(&headers, "Customers", "/customers", &inner_content))
}
