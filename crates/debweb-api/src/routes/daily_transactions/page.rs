//! Daily transactions page rendering - Full page endpoint

use super::api::TRANSACTIONS_VIEW;
use crate::components::{page_header, FilterFields};
use crate::{page_response, today, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_core::{DateRange, ListQuery};

pub async fn page_daily_transactions(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let query = ListQuery::new().with_range(DateRange::from_preset(state.config.ui.default_range, today()));
    let filters = TRANSACTIONS_VIEW.filter_form(
        &query.to_draft(),
        FilterFields {
            dates: true,
            search: Some("Customer, number or account"),
            entry_by: Some(&state.config.ui.entry_by_options),
        },
    );
    let inner_content = format!(
        "{}{}{}",
        page_header("Daily Transactions", "<a href='/credit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>New credit</a>"),
        filters,
        TRANSACTIONS_VIEW.placeholder(&query)
    );
    Html(page_response(&headers, "Daily Transactions", "/daily-transactions", &inner_content))
}
