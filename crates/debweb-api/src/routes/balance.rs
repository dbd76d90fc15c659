//! Balance lookup - stored balance of every account matching a number

use crate::components::{empty_state, money, page_header, FilterFields, ListView};
use crate::error::ApiError;
use crate::{page_response, AppState};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use debweb_config::CurrencyConfig;
use debweb_core::{Account, ListParams, ListQuery, RowExpansion};
use debweb_utils::escape_html;

pub const BALANCE_VIEW: ListView<'static> = ListView {
    id: "balance-results",
    url: "/balance/search",
    event: "balance:refresh",
};

pub async fn page_balance(headers: HeaderMap) -> Html<String> {
    let query = ListQuery::new();
    let filters = BALANCE_VIEW.filter_form(
        &query.to_draft(),
        FilterFields {
            search: Some("Mobile number"),
            ..Default::default()
        },
    );
    let inner_content = format!(
        "{}{}{}",
        page_header("Balance", ""),
        filters,
        BALANCE_VIEW.frame(&query, &RowExpansion::new(), &prompt())
    );
    Html(page_response(&headers, "Balance", "/balance", &inner_content))
}

fn prompt() -> String {
    empty_state("Enter a mobile number to see its balance.")
}

/// Matching accounts; a blank search sends nothing
pub async fn htmx_balance_search(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let term = params.search.trim();
    let query = ListQuery::new().with_search(term);
    let expansion = RowExpansion::new();
    if term.is_empty() {
        return Ok(Html(BALANCE_VIEW.frame(&query, &expansion, &prompt())));
    }
    let accounts = state
        .api
        .search_account_balances(term)
        .await
        .map_err(|e| ApiError::core("balance.search", e))?;
    Ok(Html(BALANCE_VIEW.frame(
        &query,
        &expansion,
        &render_balances(&accounts, &state.config.currency),
    )))
}

pub fn render_balances(accounts: &[Account], currency: &CurrencyConfig) -> String {
    if accounts.is_empty() {
        return empty_state("No account matches that number.");
    }
    let total: f64 = accounts.iter().map(|a| a.total_amount).sum();
    let rows: String = accounts
        .iter()
        .map(|a| {
            format!(
                "<tr class='border-b'><td class='px-4 py-3'>{}</td><td class='px-4 py-3 font-mono'>{}</td><td class='px-4 py-3 text-right font-medium'>{}</td></tr>",
                escape_html(&a.select_company),
                escape_html(&a.mobile_number),
                money(currency, a.total_amount)
            )
        })
        .collect();
    format!(
        r#"<div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-sm text-gray-600'><tr><th class='px-4 py-3'>Company</th><th class='px-4 py-3'>Number</th><th class='px-4 py-3 text-right'>Balance</th></tr></thead>
                <tbody>{}</tbody>
                <tfoot><tr class='bg-gray-50 font-semibold'><td class='px-4 py-3' colspan='2'>Total</td><td class='px-4 py-3 text-right'>{}</td></tr></tfoot>
            </table>
        </div>"#,
        rows,
        money(currency, total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balances_total() {
        let accounts = vec![
            Account { select_company: "Bkash Personal".to_string(), total_amount: 250.0, ..Default::default() },
            Account { select_company: "Nagad Agent".to_string(), total_amount: 1000.0, ..Default::default() },
        ];
        let html = render_balances(&accounts, &CurrencyConfig::default());
        assert!(html.contains("৳ 1,250.00"));
        assert!(render_balances(&[], &CurrencyConfig::default()).contains("No account matches"));
    }
}
