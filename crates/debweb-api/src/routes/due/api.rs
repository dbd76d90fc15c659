//! Due ledger HTMX endpoints and PDF export

use crate::components::{empty_state, money, notify, pdf_download};
use crate::error::{ApiError, ExportError};
use crate::{today, AppState};
use axum::extract::{Form, Query, State};
use axum::response::{Html, Response};
use debweb_config::CurrencyConfig;
use debweb_core::validation::parse_amount;
use debweb_core::{CoreError, CoreResult, DateRange, DueDraft, DueEntry, Notice, Validator};
use debweb_utils::{date_part, escape_html};
use serde::Deserialize;

/// Fired after a give or take so the open ledger reloads
pub const DUE_EVENT: &str = "due:refresh";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueParams {
    #[serde(default)]
    pub mobile_number: String,
}

/// Give or take entry as posted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueForm {
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub notes: String,
    /// `YYYY-MM-DD`; today when blank
    #[serde(default)]
    pub date: String,
}

impl DueForm {
    fn to_draft(&self) -> CoreResult<DueDraft> {
        Validator::new()
            .required("mobileNumber", &self.mobile_number, "Mobile number")
            .mobile_number("mobileNumber", &self.mobile_number)
            .positive_amount("amount", &self.amount)
            .finish()?;
        let date = match self.date.trim() {
            "" => today().to_string(),
            raw => chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| CoreError::invalid("date", format!("Invalid date: {}", raw)))?
                .to_string(),
        };
        Ok(DueDraft {
            amount: parse_amount(&self.amount).unwrap_or_default(),
            notes: self.notes.trim().to_string(),
            date,
        })
    }
}

pub(super) fn prompt() -> String {
    empty_state("Enter a customer's mobile number to see their due ledger.")
}

/// Ledger region; reloads itself on [`DUE_EVENT`] once a number is shown
pub(super) fn ledger_frame(mobile_number: &str, inner: &str) -> String {
    if mobile_number.is_empty() {
        return format!("<div id='due-ledger'>{}</div>", inner);
    }
    format!(
        "<div id='due-ledger' hx-get='/due/ledger?mobileNumber={}' hx-trigger='{} from:body' hx-swap='outerHTML' hx-sync='this:replace' hx-disinherit='*'>{}</div>",
        escape_html(&urlencoding::encode(mobile_number)),
        DUE_EVENT,
        inner
    )
}

fn checked_number(raw: &str) -> CoreResult<String> {
    let number = raw.trim();
    Validator::new()
        .required("mobileNumber", number, "Mobile number")
        .mobile_number("mobileNumber", number)
        .finish()?;
    Ok(number.to_string())
}

pub async fn htmx_due_ledger(
    state: State<AppState>,
    Query(params): Query<DueParams>,
) -> Result<Html<String>, ApiError> {
    if params.mobile_number.trim().is_empty() {
        return Ok(Html(ledger_frame("", &prompt())));
    }
    let mobile = checked_number(&params.mobile_number).map_err(|e| ApiError::core("due.ledger", e))?;
    let entries = state
        .api
        .due_ledger(&mobile)
        .await
        .map_err(|e| ApiError::core("due.ledger", e))?;
    Ok(Html(ledger_frame(
        &mobile,
        &render_ledger(&mobile, &entries, &state.config.currency),
    )))
}

/// Balance after the last entry
pub fn current_balance(entries: &[DueEntry]) -> f64 {
    entries.last().map(|e| e.balance).unwrap_or_default()
}

fn entry_form(mobile: &str, action: &str, label: &str, color: &str) -> String {
    format!(
        r#"<form hx-post='/due/{action}' hx-swap='none' class='bg-white rounded-xl shadow-sm p-4 space-y-3'>
            <h4 class='font-semibold'>{label}</h4>
            <input type='hidden' name='mobileNumber' value='{mobile}'>
            <input type='text' name='amount' placeholder='Amount' class='w-full px-3 py-2 border rounded-lg'>
            <input type='text' name='notes' placeholder='Notes' class='w-full px-3 py-2 border rounded-lg'>
            <input type='date' name='date' class='w-full px-3 py-2 border rounded-lg'>
            <button type='submit' class='w-full px-4 py-2 text-white rounded-lg {color}'>{label}</button>
        </form>"#,
        action = action,
        label = label,
        mobile = escape_html(mobile),
        color = color
    )
}

pub fn render_ledger(mobile: &str, entries: &[DueEntry], currency: &CurrencyConfig) -> String {
    let forms = format!(
        "<div class='grid grid-cols-1 md:grid-cols-2 gap-4 mb-4'>{}{}</div>",
        entry_form(mobile, "give", "Give", "bg-red-600 hover:bg-red-700"),
        entry_form(mobile, "take", "Take", "bg-green-600 hover:bg-green-700")
    );

    if entries.is_empty() {
        return format!("{}{}", forms, empty_state("No due entries for this customer yet."));
    }

    let rows: String = entries
        .iter()
        .map(|e| {
            format!(
                "<tr class='border-b'><td class='px-4 py-3 text-gray-500'>{}</td><td class='px-4 py-3'>{}</td><td class='px-4 py-3 text-right text-red-700'>{}</td><td class='px-4 py-3 text-right text-green-700'>{}</td><td class='px-4 py-3 text-right font-medium'>{}</td></tr>",
                escape_html(date_part(&e.date)),
                escape_html(&e.notes),
                if e.given > 0.0 { money(currency, e.given) } else { String::new() },
                if e.taken > 0.0 { money(currency, e.taken) } else { String::new() },
                money(currency, e.balance)
            )
        })
        .collect();
    let given: f64 = entries.iter().map(|e| e.given).sum();
    let taken: f64 = entries.iter().map(|e| e.taken).sum();

    format!(
        r#"<div class='flex items-center justify-between mb-4 flex-wrap gap-3'>
            <div>
                <p class='text-sm text-gray-500'>Customer <span class='font-mono'>{mobile}</span></p>
                <p class='text-2xl font-bold'>Due {balance}</p>
            </div>
            <button type='button' onclick="exportPdf('/due/pdf?mobileNumber={mobile_param}', this)" class='px-4 py-2 bg-emerald-600 text-white rounded-lg hover:bg-emerald-700'>Download PDF</button>
        </div>
        {forms}
        <div class='bg-white rounded-xl shadow-sm overflow-x-auto'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-sm text-gray-600'><tr><th class='px-4 py-3'>Date</th><th class='px-4 py-3'>Notes</th><th class='px-4 py-3 text-right'>Given</th><th class='px-4 py-3 text-right'>Taken</th><th class='px-4 py-3 text-right'>Balance</th></tr></thead>
                <tbody>{rows}</tbody>
                <tfoot><tr class='bg-gray-50 font-semibold'><td class='px-4 py-3' colspan='2'>Total</td><td class='px-4 py-3 text-right'>{given}</td><td class='px-4 py-3 text-right'>{taken}</td><td class='px-4 py-3 text-right'>{balance}</td></tr></tfoot>
            </table>
        </div>"#,
        mobile = escape_html(mobile),
        mobile_param = escape_html(&urlencoding::encode(mobile)),
        balance = money(currency, current_balance(entries)),
        forms = forms,
        rows = rows,
        given = money(currency, given),
        taken = money(currency, taken),
    )
}

pub async fn htmx_due_give(state: State<AppState>, Form(form): Form<DueForm>) -> Result<Response, ApiError> {
    let draft = form.to_draft().map_err(|e| ApiError::core("due.give", e))?;
    let mobile = form.mobile_number.trim();
    state
        .api
        .give_due(mobile, &draft)
        .await
        .map_err(|e| ApiError::core("due.give", e))?;
    log::info!(target: "debweb::api", "due of {} given to {}", draft.amount, mobile);
    Ok(notify(&Notice::success("Due given"), &[DUE_EVENT], String::new()))
}

pub async fn htmx_due_take(state: State<AppState>, Form(form): Form<DueForm>) -> Result<Response, ApiError> {
    let draft = form.to_draft().map_err(|e| ApiError::core("due.take", e))?;
    let mobile = form.mobile_number.trim();
    state
        .api
        .take_due(mobile, &draft)
        .await
        .map_err(|e| ApiError::core("due.take", e))?;
    log::info!(target: "debweb::api", "due of {} taken from {}", draft.amount, mobile);
    Ok(notify(&Notice::success("Payment taken"), &[DUE_EVENT], String::new()))
}

/// Whole ledger of one customer; due reports are not date-filtered
pub async fn export_due_pdf(
    state: State<AppState>,
    Query(params): Query<DueParams>,
) -> Result<Response, ExportError> {
    let mobile = checked_number(&params.mobile_number)?;
    let entries = state.api.due_ledger(&mobile).await?;
    let report = state
        .reports
        .due(&entries, &DateRange::all(), chrono::Local::now().naive_local())?;
    Ok(pdf_download(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(given: f64, taken: f64, balance: f64) -> DueEntry {
        DueEntry { given, taken, balance, ..Default::default() }
    }

    #[test]
    fn test_balance_follows_last_entry() {
        let entries = vec![entry(500.0, 0.0, 500.0), entry(0.0, 200.0, 300.0)];
        assert_eq!(current_balance(&entries), 300.0);
        assert_eq!(current_balance(&[]), 0.0);
    }

    #[test]
    fn test_ledger_totals_and_export_link() {
        let entries = vec![entry(500.0, 0.0, 500.0), entry(0.0, 200.0, 300.0)];
        let html = render_ledger("01711111111", &entries, &CurrencyConfig::default());
        assert!(html.contains("Due ৳ 300.00"));
        assert!(html.contains("৳ 200.00"));
        assert!(html.contains("exportPdf('/due/pdf?mobileNumber=01711111111', this)"));
        assert!(html.contains("hx-post='/due/give'"));
        assert!(html.contains("hx-post='/due/take'"));
    }

    #[test]
    fn test_form_validation_and_default_date() {
        let form = DueForm {
            mobile_number: "01711111111".to_string(),
            amount: "150".to_string(),
            ..Default::default()
        };
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.amount, 150.0);
        assert_eq!(draft.date, today().to_string());

        let bad_date = DueForm { date: "14/10/2024".to_string(), ..form.clone() };
        assert!(bad_date.to_draft().is_err());
        let bad_amount = DueForm { amount: "-5".to_string(), ..form };
        assert!(bad_amount.to_draft().is_err());
    }

    #[test]
    fn test_ledger_frame_reloads_on_due_event() {
        let html = ledger_frame("01711111111", "");
        assert!(html.contains("hx-trigger='due:refresh from:body'"));
        assert!(!ledger_frame("", "").contains("hx-trigger"));
    }
}
