//! Daily log page rendering - Full page endpoint

use super::api::LOG_VIEW;
use crate::components::{page_header, FilterFields};
use crate::{page_response, today, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_core::{DateRange, ListQuery};

pub async fn page_daily_log(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let query = ListQuery::new().with_range(DateRange::from_preset(state.config.ui.daily_log_range, today()));
    let filters = LOG_VIEW.filter_form(
        &query.to_draft(),
        FilterFields {
            dates: true,
            entry_by: Some(&state.config.ui.entry_by_options),
            ..Default::default()
        },
    );
    let inner_content = format!(
        "{}{}{}",
        page_header("Daily Log", ""),
        filters,
        LOG_VIEW.placeholder(&query)
    );
    Html(page_response(&headers, "Daily Log", "/daily-log", &inner_content))
}
