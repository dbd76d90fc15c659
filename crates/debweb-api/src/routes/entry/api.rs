//! Credit and debit form endpoints

use crate::components::{company_options, field_error, notify, options, text_input};
use crate::error::ApiError;
use crate::routes::daily_log::LOG_VIEW;
use crate::routes::daily_transactions::TRANSACTIONS_VIEW;
use crate::AppState;
use axum::extract::{Form, Query, State};
use axum::response::{Html, Response};
use debweb_config::Config;
use debweb_core::{BackendApi, CoreError, FormKind, TransactionFields, TransactionForm};
use debweb_utils::escape_html;
use serde::Deserialize;

/// Which input triggered a form reload
#[derive(Debug, Default, Deserialize)]
pub struct FormChange {
    #[serde(default)]
    pub changed: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestParams {
    #[serde(default)]
    pub customer_name: String,
}

fn base(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Credit => "/credit",
        FormKind::Debit => "/debit",
    }
}

fn wrap_id(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Credit => "credit-form-wrap",
        FormKind::Debit => "debit-form-wrap",
    }
}

/// Attributes that re-render the form after a select changes
fn reload_attrs(kind: FormKind, changed: Option<&str>) -> String {
    let url = match changed {
        Some(field) => format!("{}/form?changed={}", base(kind), field),
        None => format!("{}/form", base(kind)),
    };
    format!(
        "hx-get='{}' hx-trigger='change' hx-include='closest form' hx-target='#{}' hx-swap='outerHTML' hx-sync='closest form:replace'",
        url,
        wrap_id(kind)
    )
}

fn select(name: &str, label: &str, choices: String, attrs: &str, errors_html: String) -> String {
    format!(
        r#"<div>
            <label class='block text-sm font-medium text-gray-700 mb-1'>{}</label>
            <select name='{}' class='w-full px-3 py-2 border rounded-lg' {}>{}</select>
            {}
        </div>"#,
        escape_html(label),
        name,
        attrs,
        choices,
        errors_html
    )
}

/// The whole form, wrapped so every reload or submit swaps it in place
pub fn render_form(form: &TransactionForm, config: &Config) -> String {
    let kind = form.kind();
    let fields = form.fields();
    let errors = form.errors();

    let customer = match kind {
        FormKind::Credit => format!(
            r#"<div class='relative'>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Customer Name</label>
                <input type='text' name='customerName' value='{name}' autocomplete='off' hx-get='/credit/customers' hx-trigger='keyup changed delay:300ms' hx-target='#customer-suggestions' hx-swap='innerHTML' class='w-full px-3 py-2 border rounded-lg focus:ring-2 focus:ring-indigo-500'>
                <div id='customer-suggestions' class='absolute z-10 w-full'></div>
            </div>{number}"#,
            name = escape_html(&fields.customer_name),
            number = text_input("customerNumber", "Customer Number", &fields.customer_number, "tel", errors),
        ),
        FormKind::Debit => String::new(),
    };

    let company = select(
        "company",
        "Company",
        company_options(&fields.company),
        &reload_attrs(kind, Some("company")),
        field_error(errors, "company"),
    );
    let numbers = form.numbers();
    let number_placeholder = if fields.company.is_empty() {
        "Select a company first"
    } else if numbers.is_empty() {
        "No accounts for this company"
    } else {
        "Select number"
    };
    let number = select(
        "selectedAccount",
        "Number",
        options(numbers, &fields.selected_account, Some(number_placeholder)),
        &reload_attrs(kind, None),
        field_error(errors, "selectedAccount"),
    );
    let balance = format!(
        "<div><label class='block text-sm font-medium text-gray-700 mb-1'>Balance</label><input type='text' value='{}' readonly class='w-full px-3 py-2 border rounded-lg bg-gray-50 text-gray-600'></div>",
        escape_html(&form.balance_display())
    );

    let (amount, submit) = match kind {
        FormKind::Credit => (
            text_input("amount", "Amount", &fields.amount, "text", errors),
            "<button type='submit' class='px-6 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save credit</button>".to_string(),
        ),
        FormKind::Debit => (
            format!(
                r#"<div>
                    <label class='block text-sm font-medium text-gray-700 mb-1'>Amount</label>
                    <input type='text' name='amount' value='{value}' data-balance='{balance}' oninput="var b=parseFloat(this.dataset.balance),a=parseFloat(this.value.replace(/,/g,''));document.getElementById('debit-submit').disabled=!isNaN(b)&&!isNaN(a)&&a>b" class='w-full px-3 py-2 border rounded-lg focus:ring-2 focus:ring-indigo-500'>
                    {error}
                </div>"#,
                value = escape_html(&fields.amount),
                balance = escape_html(&form.balance_display()),
                error = field_error(errors, "amount"),
            ),
            format!(
                "<button type='submit' id='debit-submit' {} class='px-6 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700 disabled:opacity-50 disabled:cursor-not-allowed'>Save debit</button>",
                if form.would_overdraw() { "disabled" } else { "" }
            ),
        ),
    };

    let entry_by = select(
        "entryBy",
        "Entry By",
        options(
            config.ui.entry_by_options.iter().map(String::as_str),
            &fields.entry_by,
            None,
        ),
        "",
        String::new(),
    );

    format!(
        r#"<div id='{wrap}'>
            <form hx-post='{base}' hx-target='#{wrap}' hx-swap='outerHTML' class='space-y-4'>
                <div class='grid grid-cols-1 md:grid-cols-2 gap-4'>
                    {customer}{company}{number}{balance}{amount}{remarks}{statement}{entry_by}
                </div>
                <div class='flex justify-end'>{submit}</div>
            </form>
        </div>"#,
        wrap = wrap_id(kind),
        base = base(kind),
        customer = customer,
        company = company,
        number = number,
        balance = balance,
        amount = amount,
        remarks = text_input("remarks", "Remarks", &fields.remarks, "text", errors),
        statement = text_input("statement", "Statement", &fields.statement, "text", errors),
        entry_by = entry_by,
        submit = submit,
    )
}

async fn reload(
    state: &AppState,
    kind: FormKind,
    mut fields: TransactionFields,
    change: &FormChange,
) -> Result<Html<String>, ApiError> {
    // A new company invalidates the chosen number
    if change.changed == "company" {
        fields.selected_account.clear();
    }
    let form = TransactionForm::restore(&state.api, kind, state.config.ui.default_entry_by.clone(), fields)
        .await
        .map_err(|e| ApiError::core(format!("{}.accounts", base(kind).trim_start_matches('/')), e))?;
    Ok(Html(render_form(&form, &state.config)))
}

async fn submit(
    api: &BackendApi,
    config: &Config,
    kind: FormKind,
    fields: TransactionFields,
) -> Result<Response, ApiError> {
    let operation = format!("{}.submit", base(kind).trim_start_matches('/'));
    let mut form = TransactionForm::restore(api, kind, config.ui.default_entry_by.clone(), fields)
        .await
        .map_err(|e| ApiError::core(operation.clone(), e))?;
    match form.submit(api).await {
        Ok(notice) => Ok(notify(
            &notice,
            &[TRANSACTIONS_VIEW.event, LOG_VIEW.event],
            render_form(&form, config),
        )),
        Err(e @ CoreError::Validation { .. }) => {
            log::debug!(target: "debweb::api", "{}: {}", operation, e);
            Ok(notify(&e.to_notice(), &[], render_form(&form, config)))
        }
        Err(e) => Err(ApiError::core(operation, e)),
    }
}

pub async fn htmx_credit_form(
    state: State<AppState>,
    Query(fields): Query<TransactionFields>,
    Query(change): Query<FormChange>,
) -> Result<Html<String>, ApiError> {
    reload(&state, FormKind::Credit, fields, &change).await
}

pub async fn htmx_debit_form(
    state: State<AppState>,
    Query(fields): Query<TransactionFields>,
    Query(change): Query<FormChange>,
) -> Result<Html<String>, ApiError> {
    reload(&state, FormKind::Debit, fields, &change).await
}

pub async fn htmx_credit_submit(
    state: State<AppState>,
    Form(fields): Form<TransactionFields>,
) -> Result<Response, ApiError> {
    submit(&state.api, &state.config, FormKind::Credit, fields).await
}

pub async fn htmx_debit_submit(
    state: State<AppState>,
    Form(fields): Form<TransactionFields>,
) -> Result<Response, ApiError> {
    submit(&state.api, &state.config, FormKind::Debit, fields).await
}

/// Typeahead matches for the credit form's customer name
pub async fn htmx_customer_suggest(
    state: State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Html<String>, ApiError> {
    let customers = state
        .api
        .search_customers(&params.customer_name)
        .await
        .map_err(|e| ApiError::core("customers.search", e))?;
    if customers.is_empty() {
        return Ok(Html(String::new()));
    }
    let items: String = customers
        .iter()
        .map(|c| {
            format!(
                r#"<button type='button' data-name='{name}' data-number='{number}' onclick="var f=this.closest('form');f.customerName.value=this.dataset.name;f.customerNumber.value=this.dataset.number;this.parentNode.innerHTML=''" class='block w-full text-left px-3 py-2 hover:bg-indigo-50'><span class='font-medium'>{name}</span> <span class='text-gray-500 font-mono text-sm'>{number}</span></button>"#,
                name = escape_html(&c.customer_name),
                number = escape_html(&c.mobile_number),
            )
        })
        .collect();
    Ok(Html(format!(
        "<div class='bg-white border rounded-lg shadow-lg mt-1 max-h-60 overflow-auto'>{}</div>",
        items
    )))
}
