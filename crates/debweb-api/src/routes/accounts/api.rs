//! Account HTMX endpoints

use crate::components::{
    company_options, confirm_delete, delete_record, edit_dialog, empty_state, modal, modal_buttons,
    money, notify, row_actions, text_input, update_record, DeleteParams, ListView,
    MODAL_CLOSE_EVENT,
};
use crate::error::ApiError;
use crate::routes::{load_list, resolve_query};
use crate::AppState;
use axum::extract::{Form, Query, State};
use axum::response::{Html, Response};
use debweb_config::CurrencyConfig;
use debweb_core::validation::parse_amount;
use debweb_core::{Account, AccountDraft, DateRange, ListController, ListParams, Notice, Validator};
use debweb_utils::{date_part, escape_html};
use serde::{Deserialize, Serialize};

pub const ACCOUNTS_VIEW: ListView<'static> = ListView {
    id: "accounts-list",
    url: "/accounts/list",
    event: "accounts:refresh",
};

const BASE: &str = "/accounts";

/// Account fields as posted by the create and edit modals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub select_company: String,
    #[serde(default)]
    pub mobile_number: String,
    /// Opening balance as typed
    #[serde(default)]
    pub total_amount: String,
}

impl AccountForm {
    fn to_draft(&self) -> Result<AccountDraft, ApiError> {
        let mut validator = Validator::new();
        validator
            .required("selectCompany", &self.select_company, "Company")
            .required("mobileNumber", &self.mobile_number, "Mobile number")
            .mobile_number("mobileNumber", &self.mobile_number);
        let total_amount = if self.total_amount.trim().is_empty() {
            0.0
        } else {
            match parse_amount(&self.total_amount) {
                Some(v) if v >= 0.0 => v,
                _ => {
                    validator.push("totalAmount", "Balance must be a number of 0 or more");
                    0.0
                }
            }
        };
        validator
            .finish()
            .map_err(|e| ApiError::core("account.validate", e))?;
        Ok(AccountDraft {
            select_company: self.select_company.trim().to_string(),
            mobile_number: self.mobile_number.trim().to_string(),
            total_amount,
        })
    }
}

impl From<&Account> for AccountForm {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            select_company: account.select_company.clone(),
            mobile_number: account.mobile_number.clone(),
            total_amount: account.total_amount.to_string(),
        }
    }
}

/// Account list fragment (date filters and pagination)
pub async fn htmx_accounts_list(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let query = resolve_query(&params, DateRange::all()).map_err(|e| ApiError::core("accounts.list", e))?;
    let api = &state.api;
    let list = load_list("accounts", query, params.expanded(), |q| async move {
        api.list_accounts(&q).await
    })
    .await?;
    Ok(Html(render_accounts(&list, &state.config.currency)))
}

pub fn render_accounts(list: &ListController<Account>, currency: &CurrencyConfig) -> String {
    let view = ACCOUNTS_VIEW;
    let query = list.query();
    let expansion = list.expansion();

    if list.is_empty() {
        return view.frame(query, expansion, &empty_state("No accounts found for this period."));
    }

    let mut rows = String::new();
    for account in list.rows() {
        let label = format!("{} {}", account.select_company, account.mobile_number);
        let provider = account
            .company()
            .map(|c| c.provider())
            .unwrap_or("Other");
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50 cursor-pointer' {toggle}>
                <td class='px-4 py-3'><span class='px-2 py-1 text-xs rounded bg-gray-100'>{provider}</span> {company}</td>
                <td class='px-4 py-3 font-mono'>{number}</td>
                <td class='px-4 py-3 text-right font-medium'>{balance}</td>
                <td class='px-4 py-3 text-gray-500'>{created}</td>
                <td class='px-4 py-3'>{actions}</td>
            </tr>"#,
            toggle = view.toggle_attrs(query, expansion, &account.id),
            provider = provider,
            company = escape_html(&account.select_company),
            number = escape_html(&account.mobile_number),
            balance = money(currency, account.total_amount),
            created = escape_html(date_part(&account.created_at)),
            actions = row_actions(BASE, &account.id, &AccountForm::from(account), &label),
        ));
        if expansion.is_expanded(&account.id) {
            rows.push_str(&format!(
                "<tr class='bg-indigo-50'><td colspan='5' class='px-4 py-3 text-sm text-gray-700'>Account <span class='font-mono'>{}</span> opened {}. <a href='/statement?search={}' class='text-indigo-600 hover:underline'>View statement</a></td></tr>",
                escape_html(&account.id),
                escape_html(&account.created_at),
                urlencoding::encode(&account.mobile_number)
            ));
        }
    }

    let inner = format!(
        r#"<div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-sm text-gray-600'><tr><th class='px-4 py-3'>Company</th><th class='px-4 py-3'>Number</th><th class='px-4 py-3 text-right'>Balance</th><th class='px-4 py-3'>Opened</th><th class='px-4 py-3'></th></tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>{}"#,
        rows,
        view.pagination(list.pager(), list.total_items(), query)
    );
    view.frame(query, expansion, &inner)
}

fn account_fields(values: &AccountForm) -> String {
    format!(
        r#"<div class='space-y-4'>
            <div>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Company</label>
                <select name='selectCompany' class='w-full px-3 py-2 border rounded-lg'>{}</select>
            </div>
            {}{}
        </div>"#,
        company_options(&values.select_company),
        text_input("mobileNumber", "Mobile Number", &values.mobile_number, "tel", &[]),
        text_input("totalAmount", "Balance", &values.total_amount, "text", &[])
    )
}

pub async fn htmx_account_new() -> Html<String> {
    let body = format!(
        "<form hx-post='{}/create' hx-target='#modal' hx-swap='innerHTML'>{}{}</form>",
        BASE,
        account_fields(&AccountForm::default()),
        modal_buttons("Save", false)
    );
    Html(modal("New account", &body))
}

pub async fn htmx_account_create(
    state: State<AppState>,
    Form(form): Form<AccountForm>,
) -> Result<Response, ApiError> {
    let draft = form.to_draft()?;
    state
        .api
        .create_account(&draft)
        .await
        .map_err(|e| ApiError::core("account.create", e))?;
    log::info!(target: "debweb::api", "account {} {} created", draft.select_company, draft.mobile_number);
    Ok(notify(
        &Notice::success("Account added"),
        &[ACCOUNTS_VIEW.event, MODAL_CLOSE_EVENT],
        String::new(),
    ))
}

pub async fn htmx_account_edit(Query(values): Query<AccountForm>) -> Html<String> {
    let id = values.id.clone();
    Html(edit_dialog("account", &id, values, |id, draft| {
        format!(
            "<form hx-post='{}/update' hx-target='#modal' hx-swap='innerHTML'><input type='hidden' name='id' value='{}'>{}{}</form>",
            BASE,
            escape_html(id),
            account_fields(draft),
            modal_buttons("Update", false)
        )
    }))
}

pub async fn htmx_account_update(
    state: State<AppState>,
    Form(form): Form<AccountForm>,
) -> Result<Response, ApiError> {
    let draft = form.to_draft()?;
    let api = &state.api;
    update_record("account", ACCOUNTS_VIEW.event, &form.id, draft, |id, draft| async move {
        api.update_account(&id, &draft).await
    })
    .await
}

pub async fn htmx_accounts_confirm_delete(Query(params): Query<DeleteParams>) -> Html<String> {
    Html(confirm_delete("account", BASE, &params))
}

pub async fn htmx_account_delete(
    state: State<AppState>,
    Form(params): Form<DeleteParams>,
) -> Result<Response, ApiError> {
    let api = &state.api;
    delete_record("account", ACCOUNTS_VIEW.event, &params, |id| async move {
        api.delete_account(&id).await
    })
    .await
}
