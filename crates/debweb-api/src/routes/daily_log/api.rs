//! Daily log HTMX endpoints

use crate::components::{
    company_options, confirm_delete, delete_record, edit_dialog, empty_state, modal_buttons, money,
    options, row_actions, text_input, update_record, DeleteParams, ListView,
};
use crate::error::ApiError;
use crate::routes::daily_transactions::{credit_fields, CreditEditForm};
use crate::routes::resolve_query;
use crate::{summary_cards, today, AppState};
use axum::extract::{Form, Query, State};
use axum::response::{Html, Response};
use debweb_config::Config;
use debweb_core::validation::parse_amount;
use debweb_core::{
    DailyLogEntry, DateRange, DebitDraft, EntryKind, ListController, ListParams, LogSummary,
    RefreshOutcome, RowExpansion, Validator,
};
use debweb_utils::{date_part, escape_html};
use serde::{Deserialize, Serialize};

pub const LOG_VIEW: ListView<'static> = ListView {
    id: "daily-log-list",
    url: "/daily-log/list",
    event: "daily-log:refresh",
};

const BASE: &str = "/daily-log";

/// Editable fields of either kind of log entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEditForm {
    #[serde(default)]
    pub id: String,
    /// "credit" or "debit"
    #[serde(default)]
    pub kind: String,
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
    /// Credit edits post this as `newAmount`
    #[serde(default, alias = "newAmount")]
    pub amount: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub entry_by: String,
}

impl LogEditForm {
    pub fn is_debit(&self) -> bool {
        self.kind == EntryKind::Debit.to_string()
    }

    fn to_credit_form(&self) -> CreditEditForm {
        CreditEditForm {
            id: self.id.clone(),
            customer_name: self.customer_name.clone(),
            customer_number: self.customer_number.clone(),
            company: self.company.clone(),
            selected_account: self.selected_account.clone(),
            selected_number: self.selected_number.clone(),
            new_amount: self.amount.clone(),
            remarks: self.remarks.clone(),
            statement: self.statement.clone(),
            entry_by: self.entry_by.clone(),
        }
    }

    fn to_debit_draft(&self) -> Result<DebitDraft, ApiError> {
        Validator::new()
            .required("company", &self.company, "Company")
            .required("selectedAccount", &self.selected_account, "Number")
            .positive_amount("amount", &self.amount)
            .finish()
            .map_err(|e| ApiError::core("debit.validate", e))?;
        Ok(DebitDraft {
            company: self.company.trim().to_string(),
            selected_account: self.selected_account.trim().to_string(),
            amount: parse_amount(&self.amount).unwrap_or_default(),
            remarks: self.remarks.trim().to_string(),
            statement: self.statement.trim().to_string(),
            entry_by: self.entry_by.trim().to_string(),
        })
    }
}

impl From<&DailyLogEntry> for LogEditForm {
    fn from(entry: &DailyLogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            kind: entry.kind().to_string(),
            customer_name: entry.customer_name.clone(),
            customer_number: entry.customer_number.clone(),
            company: entry.company.clone(),
            selected_account: entry.selected_account.clone(),
            selected_number: entry.selected_number.clone(),
            amount: entry.moved_amount().to_string(),
            remarks: entry.remarks.clone(),
            statement: entry.statement.clone(),
            entry_by: entry.entry_by.clone(),
        }
    }
}

/// Summary cards and the feed for the active period
pub async fn htmx_log_list(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let default_range = DateRange::from_preset(state.config.ui.daily_log_range, today());
    let query = resolve_query(&params, default_range).map_err(|e| ApiError::core("daily-log.list", e))?;

    let mut list = ListController::new("daily-log", query.clone());
    *list.expansion_mut() = RowExpansion::with_expanded(params.expanded());
    let token = list.begin(query.clone());
    let (result, summary) = match state.api.today_log(&query).await {
        Ok(log) => (Ok(log.page), log.summary),
        Err(e) => (Err(e), LogSummary::default()),
    };
    if let RefreshOutcome::Failed(notice) = list.complete(token, result) {
        return Err(ApiError::Refresh {
            list: "daily-log".to_string(),
            notice,
        });
    }
    Ok(Html(render_log(&list, &summary, &state.config)))
}

pub fn render_log(list: &ListController<DailyLogEntry>, summary: &LogSummary, config: &Config) -> String {
    let view = LOG_VIEW;
    let query = list.query();
    let expansion = list.expansion();
    let cards = summary_cards(config, summary);

    if list.is_empty() {
        let body = format!("{}{}", cards, empty_state("Nothing was posted in this period."));
        return view.frame(query, expansion, &body);
    }

    let mut rows = String::new();
    for entry in list.rows() {
        let kind = entry.kind();
        let (badge, amount_class) = match kind {
            EntryKind::Credit => ("bg-green-100 text-green-700", "text-green-700"),
            EntryKind::Debit => ("bg-red-100 text-red-700", "text-red-700"),
        };
        let label = format!(
            "{} {} on {}",
            kind.label(),
            money(&config.currency, entry.moved_amount()),
            entry.selected_account
        );
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50 cursor-pointer' {toggle}>
                <td class='px-4 py-3 text-gray-500'>{date}</td>
                <td class='px-4 py-3'><span class='px-2 py-1 text-xs rounded {badge}'>{kind}</span></td>
                <td class='px-4 py-3'>{company}</td>
                <td class='px-4 py-3 font-mono'>{account}</td>
                <td class='px-4 py-3'>{customer}</td>
                <td class='px-4 py-3 text-right font-medium {amount_class}'>{amount}</td>
                <td class='px-4 py-3'>{entry_by}</td>
                <td class='px-4 py-3'>{actions}</td>
            </tr>"#,
            toggle = view.toggle_attrs(query, expansion, &entry.id),
            date = escape_html(date_part(&entry.created_at)),
            badge = badge,
            kind = kind.label(),
            company = escape_html(&entry.company),
            account = escape_html(&entry.selected_account),
            customer = escape_html(&entry.customer_name),
            amount_class = amount_class,
            amount = money(&config.currency, entry.moved_amount()),
            entry_by = escape_html(&entry.entry_by),
            actions = row_actions(BASE, &entry.id, &LogEditForm::from(entry), &label),
        ));
        if expansion.is_expanded(&entry.id) {
            rows.push_str(&format!(
                "<tr class='bg-indigo-50'><td colspan='8' class='px-4 py-3 text-sm text-gray-700'><div class='grid grid-cols-3 gap-4'><div><span class='text-gray-500'>Customer number</span><p>{}</p></div><div><span class='text-gray-500'>Remarks</span><p>{}</p></div><div><span class='text-gray-500'>Statement</span><p>{}</p></div></div></td></tr>",
                escape_html(&entry.customer_number),
                escape_html(&entry.remarks),
                escape_html(&entry.statement)
            ));
        }
    }

    let inner = format!(
        r#"{cards}
        <div class='bg-white rounded-xl shadow-sm overflow-x-auto'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-sm text-gray-600'><tr><th class='px-4 py-3'>Date</th><th class='px-4 py-3'>Type</th><th class='px-4 py-3'>Company</th><th class='px-4 py-3'>Account</th><th class='px-4 py-3'>Customer</th><th class='px-4 py-3 text-right'>Amount</th><th class='px-4 py-3'>Entry By</th><th class='px-4 py-3'></th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>{pagination}"#,
        cards = cards,
        rows = rows,
        pagination = view.pagination(list.pager(), list.total_items(), query)
    );
    view.frame(query, expansion, &inner)
}

fn debit_fields(values: &LogEditForm, entry_by_options: &[String]) -> String {
    format!(
        r#"<div class='grid grid-cols-2 gap-4'>
            <div>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Company</label>
                <select name='company' class='w-full px-3 py-2 border rounded-lg'>{companies}</select>
            </div>
            {account}{amount}{remarks}{statement}
            <div>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Entry By</label>
                <select name='entryBy' class='w-full px-3 py-2 border rounded-lg'>{staff}</select>
            </div>
        </div>"#,
        companies = company_options(&values.company),
        account = text_input("selectedAccount", "Account Number", &values.selected_account, "text", &[]),
        amount = text_input("amount", "Amount", &values.amount, "text", &[]),
        remarks = text_input("remarks", "Remarks", &values.remarks, "text", &[]),
        statement = text_input("statement", "Statement", &values.statement, "text", &[]),
        staff = options(entry_by_options.iter().map(String::as_str), &values.entry_by, None),
    )
}

/// Credit entries reuse the posted-credit fields
pub async fn htmx_log_edit(state: State<AppState>, Query(values): Query<LogEditForm>) -> Html<String> {
    let id = values.id.clone();
    let staff = &state.config.ui.entry_by_options;
    Html(edit_dialog("entry", &id, values, |id, draft| {
        let fields = if draft.is_debit() {
            debit_fields(draft, staff)
        } else {
            credit_fields(&draft.to_credit_form(), staff)
        };
        format!(
            "<form hx-post='{}/update' hx-target='#modal' hx-swap='innerHTML'><input type='hidden' name='id' value='{}'><input type='hidden' name='kind' value='{}'>{}{}</form>",
            BASE,
            escape_html(id),
            escape_html(&draft.kind),
            fields,
            modal_buttons("Update", false)
        )
    }))
}

pub async fn htmx_log_update(
    state: State<AppState>,
    Form(form): Form<LogEditForm>,
) -> Result<Response, ApiError> {
    let api = &state.api;
    if form.is_debit() {
        let draft = form.to_debit_draft()?;
        update_record("debit", LOG_VIEW.event, &form.id, draft, |id, draft| async move {
            api.update_debit(&id, &draft).await
        })
        .await
    } else {
        let draft = form.to_credit_form().to_draft()?;
        update_record("credit", LOG_VIEW.event, &form.id, draft, |id, draft| async move {
            api.update_credit(&id, &draft).await
        })
        .await
    }
}

pub async fn htmx_log_confirm_delete(Query(params): Query<DeleteParams>) -> Html<String> {
    let resource = if params.kind == EntryKind::Debit.to_string() { "debit" } else { "credit" };
    Html(confirm_delete(resource, BASE, &params))
}

pub async fn htmx_log_delete(
    state: State<AppState>,
    Form(params): Form<DeleteParams>,
) -> Result<Response, ApiError> {
    let api = &state.api;
    if params.kind == EntryKind::Debit.to_string() {
        delete_record("debit", LOG_VIEW.event, &params, |id| async move {
            api.delete_debit(&id).await
        })
        .await
    } else {
        delete_record("credit", LOG_VIEW.event, &params, |id| async move {
            api.delete_credit(&id).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debweb_core::{ListQuery, Page, Pagination};

    fn loaded(rows: Vec<DailyLogEntry>) -> ListController<DailyLogEntry> {
        let mut list = ListController::new("daily-log", ListQuery::new());
        let token = list.begin(ListQuery::new());
        list.complete(token, Ok(Page { records: rows, pagination: Pagination::default() }));
        list
    }

    #[test]
    fn test_summary_cards_render_with_empty_feed() {
        let summary = LogSummary { total_credit: 1500.0, total_debit: 200.0, credit_count: 3, debit_count: 1 };
        let html = render_log(&loaded(vec![]), &summary, &Config::default());
        assert!(html.contains("৳ 1,500.00"));
        assert!(html.contains("Nothing was posted in this period."));
    }

    #[test]
    fn test_entries_show_kind_and_moved_amount() {
        let rows = vec![
            DailyLogEntry { id: "c1".to_string(), new_amount: 300.0, ..Default::default() },
            DailyLogEntry { id: "d1".to_string(), is_debit: true, amount: 75.0, ..Default::default() },
        ];
        let html = render_log(&loaded(rows), &LogSummary::default(), &Config::default());
        assert!(html.contains(">Credit</span>"));
        assert!(html.contains(">Debit</span>"));
        assert!(html.contains("৳ 75.00"));
        assert!(html.contains("&quot;kind&quot;:&quot;debit&quot;"));
    }

    #[test]
    fn test_edit_form_kind() {
        let entry = DailyLogEntry { is_debit: true, amount: 40.0, ..Default::default() };
        let form = LogEditForm::from(&entry);
        assert!(form.is_debit());
        assert_eq!(form.amount, "40");
        let credit = LogEditForm::from(&DailyLogEntry { new_amount: 10.0, ..Default::default() });
        assert!(!credit.is_debit());
        assert_eq!(credit.to_credit_form().new_amount, "10");
    }
}
