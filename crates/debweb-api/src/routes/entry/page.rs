//! Credit and debit page rendering - Full page endpoints

use super::api::render_form;
use crate::components::page_header;
use crate::{page_response, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_core::{FormKind, TransactionForm};

fn entry_page(state: &AppState, headers: &HeaderMap, kind: FormKind, path: &str) -> Html<String> {
    let form = TransactionForm::new(kind, state.config.ui.default_entry_by.clone());
    let title = format!("New {}", kind.label());
    let inner_content = format!(
        "{}<div class='bg-white rounded-xl shadow-sm p-6 max-w-3xl'>{}</div>",
        page_header(&title, ""),
        render_form(&form, &state.config)
    );
    Html(page_response(headers, &title, path, &inner_content))
}

pub async fn page_credit(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    entry_page(&state, &headers, FormKind::Credit, "/credit")
}

pub async fn page_debit(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    entry_page(&state, &headers, FormKind::Debit, "/debit")
}
