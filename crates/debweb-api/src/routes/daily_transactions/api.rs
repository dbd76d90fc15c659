//! Daily transaction HTMX endpoints and PDF export

use crate::components::{
    company_options, confirm_delete, delete_record, edit_dialog, empty_state, export_button, modal_buttons,
    money, options, pdf_download, row_actions, text_input, update_record, DeleteParams, ListView,
};
use crate::error::{ApiError, ExportError};
use crate::routes::{load_list, resolve_query};
use crate::{today, AppState};
use axum::extract::{Form, Query, State};
use axum::response::{Html, Response};
use debweb_config::Config;
use debweb_core::validation::parse_amount;
use debweb_core::{CreditDraft, CreditTransaction, DateRange, ListController, ListParams, Validator};
use debweb_utils::{date_part, escape_html};
use serde::{Deserialize, Serialize};

pub const TRANSACTIONS_VIEW: ListView<'static> = ListView {
    id: "transactions-list",
    url: "/daily-transactions/list",
    event: "transactions:refresh",
};

const BASE: &str = "/daily-transactions";

/// Editable fields of a posted credit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditEditForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_number: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub selected_account: String,
    #[serde(default)]
    pub selected_number: String,
    #[serde(default)]
    pub new_amount: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub entry_by: String,
}

impl From<&CreditTransaction> for CreditEditForm {
    fn from(tx: &CreditTransaction) -> Self {
        Self {
            id: tx.id.clone(),
            customer_name: tx.customer_name.clone(),
            customer_number: tx.customer_number.clone(),
            company: tx.company.clone(),
            selected_account: tx.selected_account.clone(),
            selected_number: tx.selected_number.clone(),
            new_amount: tx.new_amount.to_string(),
            remarks: tx.remarks.clone(),
            statement: tx.statement.clone(),
            entry_by: tx.entry_by.clone(),
        }
    }
}

impl CreditEditForm {
    pub fn to_draft(&self) -> Result<CreditDraft, ApiError> {
        Validator::new()
            .required("company", &self.company, "Company")
            .required("selectedAccount", &self.selected_account, "Number")
            .positive_amount("newAmount", &self.new_amount)
            .mobile_number("customerNumber", &self.customer_number)
            .finish()
            .map_err(|e| ApiError::core("transaction.validate", e))?;
        Ok(CreditDraft {
            customer_name: self.customer_name.trim().to_string(),
            customer_number: self.customer_number.trim().to_string(),
            company: self.company.trim().to_string(),
            selected_account: self.selected_account.trim().to_string(),
            selected_number: self.selected_number.trim().to_string(),
            new_amount: parse_amount(&self.new_amount).unwrap_or_default(),
            remarks: self.remarks.trim().to_string(),
            statement: self.statement.trim().to_string(),
            entry_by: self.entry_by.trim().to_string(),
        })
    }
}

fn default_range(config: &Config) -> DateRange {
    DateRange::from_preset(config.ui.default_range, today())
}

/// Credit list fragment
pub async fn htmx_transactions_list(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let query = resolve_query(&params, default_range(&state.config))
        .map_err(|e| ApiError::core("transactions.list", e))?;
    let api = &state.api;
    let list = load_list("transactions", query, params.expanded(), |q| async move {
        api.list_credits(&q).await
    })
    .await?;
    Ok(Html(render_transactions(&list, &state.config)))
}

pub fn render_transactions(list: &ListController<CreditTransaction>, config: &Config) -> String {
    let view = TRANSACTIONS_VIEW;
    let query = list.query();
    let expansion = list.expansion();

    if list.is_empty() {
        return view.frame(query, expansion, &empty_state("No transactions match the selected filters."));
    }

    let mut rows = String::new();
    for tx in list.rows() {
        let label = format!("{} to {}", money(&config.currency, tx.new_amount), tx.selected_account);
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50 cursor-pointer' {toggle}>
                <td class='px-4 py-3 text-gray-500'>{date}</td>
                <td class='px-4 py-3'><p class='font-medium'>{name}</p><p class='text-xs text-gray-500 font-mono'>{number}</p></td>
                <td class='px-4 py-3'>{company}</td>
                <td class='px-4 py-3 font-mono'>{account}</td>
                <td class='px-4 py-3 text-right font-medium text-green-700'>{amount}</td>
                <td class='px-4 py-3'>{entry_by}</td>
                <td class='px-4 py-3'>{actions}</td>
            </tr>"#,
            toggle = view.toggle_attrs(query, expansion, &tx.id),
            date = escape_html(date_part(&tx.created_at)),
            name = escape_html(&tx.customer_name),
            number = escape_html(&tx.customer_number),
            company = escape_html(&tx.company),
            account = escape_html(&tx.selected_account),
            amount = money(&config.currency, tx.new_amount),
            entry_by = escape_html(&tx.entry_by),
            actions = row_actions(BASE, &tx.id, &CreditEditForm::from(tx), &label),
        ));
        if expansion.is_expanded(&tx.id) {
            rows.push_str(&format!(
                "<tr class='bg-indigo-50'><td colspan='7' class='px-4 py-3 text-sm text-gray-700'><div class='grid grid-cols-3 gap-4'><div><span class='text-gray-500'>Balance before</span><p>{}</p></div><div><span class='text-gray-500'>Remarks</span><p>{}</p></div><div><span class='text-gray-500'>Statement</span><p>{}</p></div></div></td></tr>",
                escape_html(&tx.selected_number),
                escape_html(&tx.remarks),
                escape_html(&tx.statement)
            ));
        }
    }

    let total: f64 = list.rows().iter().map(|tx| tx.new_amount).sum();
    let inner = format!(
        r#"<div class='flex items-center justify-between mb-3'><p class='text-sm text-gray-600'>Page total: <span class='font-semibold'>{total}</span></p>{export}</div>
        <div class='bg-white rounded-xl shadow-sm overflow-x-auto'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-sm text-gray-600'><tr><th class='px-4 py-3'>Date</th><th class='px-4 py-3'>Customer</th><th class='px-4 py-3'>Company</th><th class='px-4 py-3'>Account</th><th class='px-4 py-3 text-right'>Amount</th><th class='px-4 py-3'>Entry By</th><th class='px-4 py-3'></th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>{pagination}"#,
        total = money(&config.currency, total),
        export = export_button(&format!("{}/pdf", BASE), query),
        rows = rows,
        pagination = view.pagination(list.pager(), list.total_items(), query)
    );
    view.frame(query, expansion, &inner)
}

pub fn credit_fields(values: &CreditEditForm, entry_by_options: &[String]) -> String {
    format!(
        r#"<div class='grid grid-cols-2 gap-4'>
            {name}{number}
            <div>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Company</label>
                <select name='company' class='w-full px-3 py-2 border rounded-lg'>{companies}</select>
            </div>
            {account}{amount}{snapshot}{remarks}{statement}
            <div>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Entry By</label>
                <select name='entryBy' class='w-full px-3 py-2 border rounded-lg'>{staff}</select>
            </div>
        </div>"#,
        name = text_input("customerName", "Customer Name", &values.customer_name, "text", &[]),
        number = text_input("customerNumber", "Customer Number", &values.customer_number, "tel", &[]),
        companies = company_options(&values.company),
        account = text_input("selectedAccount", "Account Number", &values.selected_account, "text", &[]),
        amount = text_input("newAmount", "Amount", &values.new_amount, "text", &[]),
        snapshot = text_input("selectedNumber", "Balance Before", &values.selected_number, "text", &[]),
        remarks = text_input("remarks", "Remarks", &values.remarks, "text", &[]),
        statement = text_input("statement", "Statement", &values.statement, "text", &[]),
        staff = options(entry_by_options.iter().map(String::as_str), &values.entry_by, None),
    )
}

pub async fn htmx_transaction_edit(state: State<AppState>, Query(values): Query<CreditEditForm>) -> Html<String> {
    let id = values.id.clone();
    let staff = &state.config.ui.entry_by_options;
    Html(edit_dialog("transaction", &id, values, |id, draft| {
        format!(
            "<form hx-post='{}/update' hx-target='#modal' hx-swap='innerHTML'><input type='hidden' name='id' value='{}'>{}{}</form>",
            BASE,
            escape_html(id),
            credit_fields(draft, staff),
            modal_buttons("Update", false)
        )
    }))
}

pub async fn htmx_transaction_update(
    state: State<AppState>,
    Form(form): Form<CreditEditForm>,
) -> Result<Response, ApiError> {
    let draft = form.to_draft()?;
    let api = &state.api;
    update_record("transaction", TRANSACTIONS_VIEW.event, &form.id, draft, |id, draft| async move {
        api.update_credit(&id, &draft).await
    })
    .await
}

pub async fn htmx_transaction_confirm_delete(Query(params): Query<DeleteParams>) -> Html<String> {
    Html(confirm_delete("transaction", BASE, &params))
}

pub async fn htmx_transaction_delete(
    state: State<AppState>,
    Form(params): Form<DeleteParams>,
) -> Result<Response, ApiError> {
    let api = &state.api;
    delete_record("transaction", TRANSACTIONS_VIEW.event, &params, |id| async move {
        api.delete_credit(&id).await
    })
    .await
}

/// PDF of every credit matching the active filters
pub async fn export_transactions_pdf(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ExportError> {
    let query = resolve_query(&params, default_range(&state.config))?;
    let records = state.api.export_credits(&query).await?;
    let report = state
        .reports
        .credits(&records, &query.range(), chrono::Local::now().naive_local())?;
    Ok(pdf_download(report))
}
