//! Shared HTML pieces and response helpers used by every page
//!
//! A list page is a filter form plus a list frame. The frame is swapped
//! as a whole (`outerHTML`) and always carries the URL of the query it
//! shows, so a `<page>:refresh` event re-fetches exactly that query.
//! Every request against a frame uses `hx-sync` replace, so a newer
//! request aborts an older one still in flight.

use crate::error::ApiError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use debweb_config::CurrencyConfig;
use debweb_core::query::encode_params;
use debweb_core::{
    Company, CoreResult, DeleteModal, EditModal, FieldError, FilterDraft, ListQuery, Notice, Pager,
    RowExpansion,
};
use debweb_report::Report;
use debweb_utils::{escape_html, format_amount};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Event that closes the modal and clears its container
pub const MODAL_CLOSE_EVENT: &str = "modal:close";

// ==================== Responses ====================

/// HTML body plus a toast, optionally firing extra browser events
pub fn notify(notice: &Notice, events: &[&str], body: String) -> Response {
    let mut response = Html(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&notice.trigger_json(events)) {
        response.headers_mut().insert("HX-Trigger", value);
    }
    response
}

/// Attachment response for a finished report
pub fn pdf_download(report: Report) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    let mut response = (StatusCode::OK, report.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

// ==================== Formatting ====================

pub fn money(currency: &CurrencyConfig, value: f64) -> String {
    format!(
        "{} {}",
        currency.symbol,
        format_amount(value, currency.decimal_places, &currency.thousands_separator)
    )
}

/// JSON for an `hx-vals` attribute, escaped for single-quoted HTML
pub fn hx_vals<T: Serialize>(value: &T) -> String {
    escape_html(&serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string()))
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn empty_state(message: &str) -> String {
    format!(
        "<div class='text-center py-12 text-gray-500'><p>{}</p></div>",
        escape_html(message)
    )
}

pub fn page_header(title: &str, actions: &str) -> String {
    format!(
        "<div class='mb-6 flex items-center justify-between flex-wrap gap-3'><h2 class='text-2xl font-bold'>{}</h2><div class='flex gap-2'>{}</div></div>",
        escape_html(title),
        actions
    )
}

// ==================== Form controls ====================

pub fn field_error(errors: &[FieldError], field: &str) -> String {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| format!("<p class='text-xs text-red-600 mt-1'>{}</p>", escape_html(&e.message)))
        .unwrap_or_default()
}

pub fn text_input(name: &str, label: &str, value: &str, kind: &str, errors: &[FieldError]) -> String {
    format!(
        r#"<div>
            <label class='block text-sm font-medium text-gray-700 mb-1'>{label}</label>
            <input type='{kind}' name='{name}' value='{value}' class='w-full px-3 py-2 border rounded-lg focus:ring-2 focus:ring-indigo-500'>
            {error}
        </div>"#,
        label = escape_html(label),
        kind = kind,
        name = name,
        value = escape_html(value),
        error = field_error(errors, name)
    )
}

/// `<option>` list; `placeholder` adds a leading empty option
pub fn options<'a>(values: impl IntoIterator<Item = &'a str>, selected: &str, placeholder: Option<&str>) -> String {
    let mut html = String::new();
    if let Some(text) = placeholder {
        html.push_str(&format!("<option value=''>{}</option>", escape_html(text)));
    }
    for value in values {
        html.push_str(&format!(
            "<option value='{v}' {s}>{v}</option>",
            v = escape_html(value),
            s = if value == selected { "selected" } else { "" }
        ));
    }
    html
}

/// Company `<option>`s; an unknown stored label stays selectable
pub fn company_options(selected: &str) -> String {
    let mut labels: Vec<&str> = Company::ALL.iter().map(Company::as_str).collect();
    if !selected.is_empty() && !labels.contains(&selected) {
        labels.push(selected);
    }
    options(labels, selected, Some("Select company"))
}

// ==================== List frame ====================

/// Which filter inputs a list page offers
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterFields<'a> {
    pub dates: bool,
    pub search: Option<&'a str>,
    pub entry_by: Option<&'a [String]>,
}

/// Addressing of one list region
#[derive(Debug, Clone, Copy)]
pub struct ListView<'a> {
    /// DOM id of the frame
    pub id: &'a str,
    /// Fragment route rendering the frame
    pub url: &'a str,
    /// Browser event that re-fetches the current query
    pub event: &'a str,
}

impl<'a> ListView<'a> {
    pub fn href(&self, query: &ListQuery, expanded: Option<&str>) -> String {
        let mut params = query.to_params();
        if let Some(id) = expanded {
            params.push(("expanded".to_string(), id.to_string()));
        }
        format!("{}?{}", self.url, encode_params(&params))
    }

    /// `hx-*` attributes that load `href` into this frame
    pub fn load_attrs(&self, href: &str) -> String {
        format!(
            "hx-get='{}' hx-target='#{}' hx-swap='outerHTML' hx-sync='#{}:replace'",
            escape_html(href),
            self.id,
            self.id
        )
    }

    /// Frame holding the rows of `query`
    pub fn frame(&self, query: &ListQuery, expansion: &RowExpansion, inner: &str) -> String {
        format!(
            "<div id='{id}' hx-get='{href}' hx-trigger='{event} from:body' hx-swap='outerHTML' hx-sync='this:replace' hx-disinherit='*'>{inner}</div>",
            id = self.id,
            href = escape_html(&self.href(query, expansion.expanded())),
            event = self.event,
            inner = inner
        )
    }

    /// Empty frame that loads `query` once the page is shown
    pub fn placeholder(&self, query: &ListQuery) -> String {
        format!(
            "<div id='{id}' hx-get='{href}' hx-trigger='load, {event} from:body' hx-swap='outerHTML' hx-sync='this:replace' hx-disinherit='*'><div class='text-center py-12 text-gray-400'>Loading...</div></div>",
            id = self.id,
            href = escape_html(&self.href(query, None)),
            event = self.event
        )
    }

    /// Attributes toggling the expansion of row `row_id`
    pub fn toggle_attrs(&self, query: &ListQuery, expansion: &RowExpansion, row_id: &str) -> String {
        let mut next = expansion.clone();
        next.toggle(row_id);
        self.load_attrs(&self.href(query, next.expanded()))
    }

    pub fn pagination(&self, pager: Pager, total_items: usize, query: &ListQuery) -> String {
        let button = |label: &str, page: usize, disabled: bool, active: bool| -> String {
            let style = if active {
                "bg-indigo-600 text-white"
            } else {
                "hover:bg-gray-100"
            };
            if disabled {
                format!(
                    "<button disabled class='px-3 py-1 border rounded opacity-50 cursor-not-allowed'>{}</button>",
                    label
                )
            } else {
                format!(
                    "<button {} class='px-3 py-1 border rounded {}'>{}</button>",
                    self.load_attrs(&self.href(&query.at_page(page), None)),
                    style,
                    label
                )
            }
        };

        let mut controls = button("Previous", pager.prev_page(), pager.prev_disabled(), false);
        for page in pager.window(5) {
            controls.push_str(&button(&page.to_string(), page, false, page == pager.current()));
        }
        controls.push_str(&button("Next", pager.next_page(), pager.next_disabled(), false));

        format!(
            "<div class='mt-6 flex items-center justify-between flex-wrap gap-4'><span class='text-sm text-gray-500'>{} records, page {} of {}</span><div class='flex items-center gap-2'>{}</div></div>",
            total_items,
            pager.current(),
            pager.total_pages(),
            controls
        )
    }

    /// Filter inputs; nothing is fetched until Apply (or Enter)
    pub fn filter_form(&self, draft: &FilterDraft, fields: FilterFields<'_>) -> String {
        let mut inputs = String::new();
        if fields.dates {
            inputs.push_str(&format!(
                "<input type='date' name='startDate' value='{}' class='px-3 py-2 border rounded-lg'><span class='text-gray-400'>to</span><input type='date' name='endDate' value='{}' class='px-3 py-2 border rounded-lg'>",
                escape_html(&draft.start_date),
                escape_html(&draft.end_date)
            ));
        }
        if let Some(placeholder) = fields.search {
            inputs.push_str(&format!(
                "<input type='search' name='search' value='{}' placeholder='{}' class='px-3 py-2 border rounded-lg flex-1 min-w-[12rem]'>",
                escape_html(&draft.search),
                escape_html(placeholder)
            ));
        }
        if let Some(choices) = fields.entry_by {
            inputs.push_str(&format!(
                "<select name='entryBy' class='px-3 py-2 border rounded-lg'>{}</select>",
                options(choices.iter().map(String::as_str), &draft.entry_by, Some("All staff"))
            ));
        }
        format!(
            r#"<form id='{id}-filters' class='bg-white rounded-xl shadow-sm p-4 mb-4 flex items-center gap-3 flex-wrap' {load}>
                {inputs}
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Apply</button>
                <button type='button' class='px-4 py-2 border rounded-lg hover:bg-gray-50' onclick="this.form.querySelectorAll('input,select').forEach(function(e){{e.value=''}})" {load}>Clear</button>
            </form>"#,
            id = self.id,
            load = self.load_attrs(self.url),
            inputs = inputs
        )
    }
}

// ==================== Modals ====================

pub fn modal(title: &str, body: &str) -> String {
    format!(
        r#"<div class='fixed inset-0 bg-black/40 flex items-center justify-center z-40' onclick="if(event.target===this)closeModal()">
            <div class='bg-white rounded-xl shadow-xl w-full max-w-lg p-6'>
                <div class='flex items-center justify-between mb-4'>
                    <h3 class='text-lg font-semibold'>{}</h3>
                    <button type='button' onclick='closeModal()' class='text-gray-400 hover:text-gray-600'>&times;</button>
                </div>
                {}
            </div>
        </div>"#,
        escape_html(title),
        body
    )
}

pub fn modal_buttons(submit_label: &str, danger: bool) -> String {
    let color = if danger {
        "bg-red-600 hover:bg-red-700"
    } else {
        "bg-indigo-600 hover:bg-indigo-700"
    };
    format!(
        "<div class='flex justify-end gap-3 mt-6'><button type='button' onclick='closeModal()' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Cancel</button><button type='submit' class='px-4 py-2 text-white rounded-lg {}'>{}</button></div>",
        color,
        escape_html(submit_label)
    )
}

/// Row buttons opening the edit and delete modals
///
/// The edit modal receives `values` plus the id; the delete modal the id,
/// the label and, for mixed feeds, the `kind` found in `values`.
pub fn row_actions<T: Serialize>(base: &str, id: &str, values: &T, label: &str) -> String {
    let mut edit_vals = serde_json::to_value(values).unwrap_or_default();
    let mut delete_vals = serde_json::json!({ "id": id, "label": label });
    if let Some(map) = edit_vals.as_object_mut() {
        map.insert("id".to_string(), serde_json::Value::String(id.to_string()));
        if let (Some(kind), Some(target)) = (map.get("kind"), delete_vals.as_object_mut()) {
            target.insert("kind".to_string(), kind.clone());
        }
    }
    format!(
        "<div class='flex gap-2' onclick='event.stopPropagation()'><button hx-get='{base}/edit' hx-vals='{edit}' hx-target='#modal' hx-swap='innerHTML' class='px-2 py-1 text-sm border rounded text-indigo-600 hover:bg-indigo-50'>Edit</button><button hx-get='{base}/confirm-delete' hx-vals='{delete}' hx-target='#modal' hx-swap='innerHTML' class='px-2 py-1 text-sm border rounded text-red-600 hover:bg-red-50'>Delete</button></div>",
        base = base,
        edit = hx_vals(&edit_vals),
        delete = hx_vals(&delete_vals),
    )
}

/// Query of the confirm-delete modal and body of the delete request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confirm: String,
    /// Record kind on pages listing more than one, e.g. "debit"
    #[serde(default)]
    pub kind: String,
}

/// First step of a delete: the confirmation dialog
pub fn confirm_delete(resource: &'static str, base: &str, params: &DeleteParams) -> String {
    let mut dialog = DeleteModal::new(resource);
    dialog.open(Some(&params.id), params.label.clone());
    let label = dialog.label().unwrap_or_default();
    let body = format!(
        "<form hx-post='{base}/delete' hx-target='#modal' hx-swap='innerHTML'><input type='hidden' name='id' value='{id}'><input type='hidden' name='label' value='{label}'><input type='hidden' name='confirm' value='yes'>{kind}<p class='text-gray-700'>Delete {resource} <span class='font-semibold'>{label}</span>? This cannot be undone.</p>{buttons}</form>",
        base = base,
        id = escape_html(&params.id),
        label = escape_html(label),
        kind = if params.kind.is_empty() {
            String::new()
        } else {
            format!("<input type='hidden' name='kind' value='{}'>", escape_html(&params.kind))
        },
        resource = resource,
        buttons = modal_buttons("Delete", true)
    );
    modal(&format!("Delete {}", resource), &body)
}

/// Second step: DELETE by id after confirmation, then refresh the list
///
/// A blank id is refused before any request is made.
pub async fn delete_record<F, Fut>(
    resource: &'static str,
    event: &str,
    params: &DeleteParams,
    send: F,
) -> Result<Response, ApiError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = CoreResult<()>>,
{
    let mut dialog = DeleteModal::new(resource);
    dialog.open(Some(&params.id), params.label.clone());
    if params.confirm == "yes" {
        dialog.confirm();
    }
    dialog
        .submit(send)
        .await
        .map_err(|e| ApiError::core(format!("{}.delete", resource), e))?;
    log::info!(target: "debweb::api", "{} {} deleted", resource, params.id);
    Ok(notify(
        &Notice::success(format!("{} deleted", capitalize(resource))),
        &[event, MODAL_CLOSE_EVENT],
        String::new(),
    ))
}

/// Edit dialog pre-filled with the record's current values
pub fn edit_dialog<D, R>(resource: &'static str, id: &str, current: D, render: R) -> String
where
    D: Clone + PartialEq,
    R: FnOnce(&str, &D) -> String,
{
    let mut dialog = EditModal::new(resource);
    dialog.open(id, current);
    match (dialog.id(), dialog.draft()) {
        (Some(id), Some(draft)) => modal(&format!("Edit {}", resource), &render(id, draft)),
        _ => String::new(),
    }
}

/// PUT the edited draft by id, then refresh the list
pub async fn update_record<D, F, Fut>(
    resource: &'static str,
    event: &str,
    id: &str,
    draft: D,
    send: F,
) -> Result<Response, ApiError>
where
    D: Clone + PartialEq,
    F: FnOnce(String, D) -> Fut,
    Fut: Future<Output = CoreResult<()>>,
{
    let mut dialog = EditModal::new(resource);
    dialog.open(id, draft);
    dialog
        .submit(send)
        .await
        .map_err(|e| ApiError::core(format!("{}.update", resource), e))?;
    log::info!(target: "debweb::api", "{} {} updated", resource, id);
    Ok(notify(
        &Notice::success(format!("{} updated", capitalize(resource))),
        &[event, MODAL_CLOSE_EVENT],
        String::new(),
    ))
}

/// Button downloading a PDF of the active query
pub fn export_button(url: &str, query: &ListQuery) -> String {
    let href = format!("{}?{}", url, encode_params(&query.filter_params()));
    format!(
        "<button type='button' onclick=\"exportPdf('{}', this)\" class='px-4 py-2 bg-emerald-600 text-white rounded-lg hover:bg-emerald-700'>Download PDF</button>",
        escape_html(&href)
    )
}
