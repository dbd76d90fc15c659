//! Statement HTMX endpoints, bulk delete and PDF export

use crate::components::{
    empty_state, export_button, modal, modal_buttons, money, notify, pdf_download, ListView,
    MODAL_CLOSE_EVENT,
};
use crate::error::{ApiError, ExportError};
use crate::routes::{load_list, resolve_query};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::{Html, Response};
use axum_extra::extract::Form;
use debweb_config::CurrencyConfig;
use debweb_core::{
    CoreError, DateRange, EntryKind, ListController, ListParams, ListQuery, Notice, RowExpansion,
    StatementEntry,
};
use debweb_utils::{date_part, escape_html};
use serde::Deserialize;

pub const STATEMENT_VIEW: ListView<'static> = ListView {
    id: "statement-list",
    url: "/statement/list",
    event: "statement:refresh",
};

const BASE: &str = "/statement";
const SELECTION_FORM: &str = "statement-select";

pub(super) fn prompt() -> String {
    empty_state("Enter an account number to see its statement.")
}

fn account_number(query: &ListQuery) -> Option<&str> {
    query.search.as_deref()
}

/// Statement of the searched account; no account, no request
pub async fn htmx_statement_list(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let query = resolve_query(&params, DateRange::all()).map_err(|e| ApiError::core("statement.list", e))?;
    if account_number(&query).is_none() {
        return Ok(Html(STATEMENT_VIEW.frame(&query, &RowExpansion::new(), &prompt())));
    }
    let api = &state.api;
    let list = load_list("statement", query, params.expanded(), |q| async move {
        api.account_statement(&q).await
    })
    .await?;
    Ok(Html(render_statement(&list, &state.config.currency)))
}

pub fn render_statement(list: &ListController<StatementEntry>, currency: &CurrencyConfig) -> String {
    let view = STATEMENT_VIEW;
    let query = list.query();
    let expansion = list.expansion();

    if list.is_empty() {
        return view.frame(query, expansion, &empty_state("No entries for this account in the selected period."));
    }

    let mut rows = String::new();
    let mut credited = 0.0;
    let mut debited = 0.0;
    for entry in list.rows() {
        let kind = entry.kind();
        let amount_class = match kind {
            EntryKind::Credit => {
                credited += entry.moved_amount();
                "text-green-700"
            }
            EntryKind::Debit => {
                debited += entry.moved_amount();
                "text-red-700"
            }
        };
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50 cursor-pointer' {toggle}>
                <td class='px-4 py-3' onclick='event.stopPropagation()'><input type='checkbox' name='ids' value='{id}' class='rounded'></td>
                <td class='px-4 py-3 text-gray-500'>{date}</td>
                <td class='px-4 py-3'>{kind}</td>
                <td class='px-4 py-3'>{customer}</td>
                <td class='px-4 py-3 text-right font-medium {amount_class}'>{amount}</td>
                <td class='px-4 py-3'>{entry_by}</td>
            </tr>"#,
            toggle = view.toggle_attrs(query, expansion, &entry.id),
            id = escape_html(&entry.id),
            date = escape_html(date_part(&entry.created_at)),
            kind = kind.label(),
            customer = escape_html(&entry.customer_name),
            amount_class = amount_class,
            amount = money(currency, entry.moved_amount()),
            entry_by = escape_html(&entry.entry_by),
        ));
        if expansion.is_expanded(&entry.id) {
            rows.push_str(&format!(
                "<tr class='bg-indigo-50'><td colspan='6' class='px-4 py-3 text-sm text-gray-700'><div class='grid grid-cols-3 gap-4'><div><span class='text-gray-500'>Company</span><p>{}</p></div><div><span class='text-gray-500'>Remarks</span><p>{}</p></div><div><span class='text-gray-500'>Statement</span><p>{}</p></div></div></td></tr>",
                escape_html(&entry.company),
                escape_html(&entry.remarks),
                escape_html(&entry.statement)
            ));
        }
    }

    let inner = format!(
        r#"<div class='flex items-center justify-between mb-3 gap-3 flex-wrap'>
            <p class='text-sm text-gray-600'>Credited <span class='font-semibold text-green-700'>{credited}</span>, debited <span class='font-semibold text-red-700'>{debited}</span> on this page</p>
            <div class='flex gap-2'>
                <button type='button' hx-post='{base}/confirm-delete' hx-include='#{form}' hx-target='#modal' hx-swap='innerHTML' class='px-4 py-2 border border-red-300 text-red-600 rounded-lg hover:bg-red-50'>Delete selected</button>
                {export}
            </div>
        </div>
        <form id='{form}' class='bg-white rounded-xl shadow-sm overflow-x-auto'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-sm text-gray-600'><tr><th class='px-4 py-3'></th><th class='px-4 py-3'>Date</th><th class='px-4 py-3'>Type</th><th class='px-4 py-3'>Customer</th><th class='px-4 py-3 text-right'>Amount</th><th class='px-4 py-3'>Entry By</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </form>{pagination}"#,
        credited = money(currency, credited),
        debited = money(currency, debited),
        base = BASE,
        form = SELECTION_FORM,
        export = export_button(&format!("{}/pdf", BASE), query),
        rows = rows,
        pagination = view.pagination(list.pager(), list.total_items(), query)
    );
    view.frame(query, expansion, &inner)
}

/// Checked rows of the statement; the checkbox group repeats `ids`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionForm {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub confirm: String,
}

impl SelectionForm {
    fn is_confirmed(&self) -> bool {
        self.confirm == "yes"
    }
}

fn selected_ids(form: &SelectionForm) -> Result<Vec<String>, ApiError> {
    let ids: Vec<String> = form
        .ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return Err(ApiError::core(
            "statement.delete",
            CoreError::MissingIdentifier {
                resource: "statement entry".to_string(),
            },
        ));
    }
    Ok(ids)
}

/// Confirmation listing how many rows are about to go
pub async fn htmx_statement_confirm_delete(
    Form(form): Form<SelectionForm>,
) -> Result<Html<String>, ApiError> {
    let ids = selected_ids(&form)?;
    let hidden: String = ids
        .iter()
        .map(|id| format!("<input type='hidden' name='ids' value='{}'>", escape_html(id)))
        .collect();
    let noun = if ids.len() == 1 { "entry" } else { "entries" };
    let form = format!(
        "<form hx-post='{base}/delete' hx-target='#modal' hx-swap='innerHTML'>{hidden}<input type='hidden' name='confirm' value='yes'><p class='text-gray-700'>Delete <span class='font-semibold'>{count}</span> statement {noun}? This cannot be undone.</p>{buttons}</form>",
        base = BASE,
        hidden = hidden,
        count = ids.len(),
        noun = noun,
        buttons = modal_buttons("Delete", true)
    );
    Ok(Html(modal("Delete statement entries", &form)))
}

pub async fn htmx_statement_delete(
    state: State<AppState>,
    Form(form): Form<SelectionForm>,
) -> Result<Response, ApiError> {
    let ids = selected_ids(&form)?;
    if !form.is_confirmed() {
        return Err(ApiError::BadRequest {
            message: "Confirm the delete first".to_string(),
        });
    }
    state
        .api
        .delete_statement_entries(&ids)
        .await
        .map_err(|e| ApiError::core("statement.delete", e))?;
    log::info!(target: "debweb::api", "{} statement entries deleted", ids.len());
    Ok(notify(
        &Notice::success(format!("{} statement entries deleted", ids.len())),
        &[STATEMENT_VIEW.event, MODAL_CLOSE_EVENT],
        String::new(),
    ))
}

/// PDF of the searched account over the active range
pub async fn export_statement_pdf(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ExportError> {
    let query = resolve_query(&params, DateRange::all())?;
    if account_number(&query).is_none() {
        return Err(CoreError::invalid("search", "Enter an account number first").into());
    }
    let records = state.api.export_statement(&query).await?;
    let report = state
        .reports
        .statement(&records, &query.range(), chrono::Local::now().naive_local())?;
    Ok(pdf_download(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use debweb_core::{Page, Pagination};

    fn loaded(rows: Vec<StatementEntry>) -> ListController<StatementEntry> {
        let query = ListQuery::new().with_search("01711111111");
        let mut list = ListController::new("statement", query.clone());
        let token = list.begin(query);
        list.complete(token, Ok(Page { records: rows, pagination: Pagination::default() }));
        list
    }

    #[test]
    fn test_rows_are_selectable() {
        let rows = vec![
            StatementEntry { id: "s1".to_string(), new_amount: 500.0, ..Default::default() },
            StatementEntry { id: "s2".to_string(), is_debit: true, amount: 120.0, ..Default::default() },
        ];
        let html = render_statement(&loaded(rows), &CurrencyConfig::default());
        assert!(html.contains("name='ids' value='s1'"));
        assert!(html.contains("name='ids' value='s2'"));
        assert!(html.contains("hx-include='#statement-select'"));
        assert!(html.contains("৳ 500.00"));
        assert!(html.contains("৳ 120.00"));
        assert!(html.contains("exportPdf('/statement/pdf?search=01711111111', this)"));
    }

    #[test]
    fn test_empty_selection_is_refused() {
        let blank = SelectionForm {
            ids: vec![String::new(), " ".to_string()],
            confirm: "yes".to_string(),
        };
        assert!(selected_ids(&blank).is_err());
        let form = SelectionForm {
            ids: vec!["a".to_string(), "".to_string(), "b".to_string()],
            ..Default::default()
        };
        assert_eq!(selected_ids(&form).unwrap(), vec!["a", "b"]);
        assert!(!form.is_confirmed());
    }

    #[tokio::test]
    async fn test_confirmation_carries_every_id() {
        let form = SelectionForm {
            ids: vec!["a1".to_string(), "b2".to_string()],
            ..Default::default()
        };
        let Html(html) = htmx_statement_confirm_delete(Form(form)).await.unwrap();
        assert!(html.contains("name='ids' value='a1'"));
        assert!(html.contains("name='ids' value='b2'"));
        assert!(html.contains("name='confirm' value='yes'"));
        assert!(html.contains("Delete <span class='font-semibold'>2</span> statement entries?"));
    }
}
