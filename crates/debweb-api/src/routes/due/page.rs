//! Due page rendering - Full page endpoint

use super::api::{ledger_frame, prompt, DueParams};
use crate::components::page_header;
use crate::page_response;
use axum::extract::Query;
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_utils::escape_html;

/// `?mobileNumber=` opens that customer's ledger straight away
pub async fn page_due(headers: HeaderMap, Query(params): Query<DueParams>) -> Html<String> {
    let mobile = params.mobile_number.trim();
    let lookup = format!(
        r#"<form class='bg-white rounded-xl shadow-sm p-4 mb-4 flex items-center gap-3' hx-get='/due/ledger' hx-target='#due-ledger' hx-swap='outerHTML' hx-sync='#due-ledger:replace'>
            <input type='tel' name='mobileNumber' value='{}' placeholder='Customer mobile number' class='px-3 py-2 border rounded-lg flex-1'>
            <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Show ledger</button>
        </form>"#,
        escape_html(mobile)
    );
    let ledger = if mobile.is_empty() {
        ledger_frame("", &prompt())
    } else {
        format!(
            "<div id='due-ledger' hx-get='/due/ledger?mobileNumber={}' hx-trigger='load' hx-swap='outerHTML' hx-sync='this:replace'><div class='text-center py-12 text-gray-400'>Loading...</div></div>",
            escape_html(&urlencoding::encode(mobile))
        )
    };
    let inner_content = format!("{}{}{}", page_header("Due Ledger", ""), lookup, ledger);
    Html(page_response(&headers, "Due", "/due", &inner_content))
}
