//! HTTP server with HTMX pages for the Deb Telecom front end
//!
//! Routes are organized into modules:
//! - routes::accounts: Stored balances per company/number, CRUD
//! - routes::customers: Customer directory, CRUD and search
//! - routes::balance: Balance lookup by number
//! - routes::daily_transactions: Credit transactions with PDF export
//! - routes::daily_log: Combined credit/debit feed with totals
//! - routes::statement: Per-account statement, bulk delete, PDF export
//! - routes::entry: Credit and debit forms
//! - routes::due: Customer due ledger
//! - routes::auth: Password recovery and logout
//!
//! Every handler is a thin step: build the typed query, call
//! [`BackendApi`], render a fragment. Nothing is cached between requests.

pub mod components;
pub mod error;
pub mod routes;

use axum::{
    http::HeaderMap,
    response::Html,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use debweb_config::Config;
use debweb_core::{BackendApi, DateRange, ListQuery, LogSummary};
use debweb_report::ReportGenerator;
use debweb_utils::escape_html;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ExportError};

/// Application state, shared read-only by every handler
#[derive(Clone)]
pub struct AppState {
    pub api: BackendApi,
    pub reports: Arc<ReportGenerator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, api: BackendApi) -> Self {
        Self {
            reports: Arc::new(ReportGenerator::from_config(&config)),
            config: Arc::new(config),
            api,
        }
    }
}

/// Local calendar date, used for "today" defaults
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{
        htmx_account_create, htmx_account_delete, htmx_account_edit, htmx_account_new,
        htmx_account_update, htmx_accounts_confirm_delete, htmx_accounts_list, page_accounts,
    };
    use routes::auth::{htmx_forgot_reset, htmx_forgot_verify, page_forgot_password, page_logout};
    use routes::balance::{htmx_balance_search, page_balance};
    use routes::customers::{
        htmx_customer_create, htmx_customer_delete, htmx_customer_edit, htmx_customer_new,
        htmx_customer_update, htmx_customers_confirm_delete, htmx_customers_list, page_customers,
    };
    use routes::daily_log::{
        htmx_log_confirm_delete, htmx_log_delete, htmx_log_edit, htmx_log_list, htmx_log_update,
        page_daily_log,
    };
    use routes::daily_transactions::{
        export_transactions_pdf, htmx_transaction_confirm_delete, htmx_transaction_delete,
        htmx_transaction_edit, htmx_transaction_update, htmx_transactions_list,
        page_daily_transactions,
    };
    use routes::due::{export_due_pdf, htmx_due_give, htmx_due_ledger, htmx_due_take, page_due};
    use routes::entry::{
        htmx_credit_form, htmx_credit_submit, htmx_customer_suggest, htmx_debit_form,
        htmx_debit_submit, page_credit, page_debit,
    };
    use routes::statement::{
        export_statement_pdf, htmx_statement_confirm_delete, htmx_statement_delete,
        htmx_statement_list, page_statement,
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(index_page))
        // Accounts
        .route("/accounts", get(page_accounts))
        .route("/accounts/list", get(htmx_accounts_list))
        .route("/accounts/new", get(htmx_account_new))
        .route("/accounts/create", post(htmx_account_create))
        .route("/accounts/edit", get(htmx_account_edit))
        .route("/accounts/update", post(htmx_account_update))
        .route("/accounts/confirm-delete", get(htmx_accounts_confirm_delete))
        .route("/accounts/delete", post(htmx_account_delete))
        // Customers
        .route("/customers", get(page_customers))
        .route("/customers/list", get(htmx_customers_list))
        .route("/customers/new", get(htmx_customer_new))
        .route("/customers/create", post(htmx_customer_create))
        .route("/customers/edit", get(htmx_customer_edit))
        .route("/customers/update", post(htmx_customer_update))
        .route("/customers/confirm-delete", get(htmx_customers_confirm_delete))
        .route("/customers/delete", post(htmx_customer_delete))
        // Balance lookup
        .route("/balance", get(page_balance))
        .route("/balance/search", get(htmx_balance_search))
        // Daily credit transactions
        .route("/daily-transactions", get(page_daily_transactions))
        .route("/daily-transactions/list", get(htmx_transactions_list))
        .route("/daily-transactions/edit", get(htmx_transaction_edit))
        .route("/daily-transactions/update", post(htmx_transaction_update))
        .route("/daily-transactions/confirm-delete", get(htmx_transaction_confirm_delete))
        .route("/daily-transactions/delete", post(htmx_transaction_delete))
        .route("/daily-transactions/pdf", get(export_transactions_pdf))
        // Daily log
        .route("/daily-log", get(page_daily_log))
        .route("/daily-log/list", get(htmx_log_list))
        .route("/daily-log/edit", get(htmx_log_edit))
        .route("/daily-log/update", post(htmx_log_update))
        .route("/daily-log/confirm-delete", get(htmx_log_confirm_delete))
        .route("/daily-log/delete", post(htmx_log_delete))
        // Account statement
        .route("/statement", get(page_statement))
        .route("/statement/list", get(htmx_statement_list))
        .route("/statement/confirm-delete", post(htmx_statement_confirm_delete))
        .route("/statement/delete", post(htmx_statement_delete))
        .route("/statement/pdf", get(export_statement_pdf))
        // Credit and debit forms
        .route("/credit", get(page_credit).post(htmx_credit_submit))
        .route("/credit/form", get(htmx_credit_form))
        .route("/credit/customers", get(htmx_customer_suggest))
        .route("/debit", get(page_debit).post(htmx_debit_submit))
        .route("/debit/form", get(htmx_debit_form))
        // Due ledger
        .route("/due", get(page_due))
        .route("/due/ledger", get(htmx_due_ledger))
        .route("/due/give", post(htmx_due_give))
        .route("/due/take", post(htmx_due_take))
        .route("/due/pdf", get(export_due_pdf))
        // Password recovery
        .route("/forgot-password", get(page_forgot_password))
        .route("/forgot-password/verify", post(htmx_forgot_verify))
        .route("/forgot-password/reset", post(htmx_forgot_reset))
        .route("/logout", get(page_logout))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template: toast container, modal container and shared scripts
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Deb Telecom</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {content}
    <div id="modal"></div>
    <div id="toasts" class="fixed top-4 right-4 z-50 space-y-2"></div>
    <script>
    const TOAST_STYLES = {{
        success: 'bg-green-600',
        info: 'bg-blue-600',
        warning: 'bg-yellow-500',
        error: 'bg-red-600'
    }};

    function showToast(level, message) {{
        const toast = document.createElement('div');
        toast.className = 'px-4 py-3 rounded-lg shadow-lg text-white text-sm ' + (TOAST_STYLES[level] || TOAST_STYLES.info);
        toast.textContent = message;
        document.getElementById('toasts').appendChild(toast);
        setTimeout(() => toast.remove(), 4000);
    }}

    function closeModal() {{
        document.getElementById('modal').innerHTML = '';
    }}

    document.body.addEventListener('notify', e => showToast(e.detail.level, e.detail.message));
    document.body.addEventListener('modal:close', closeModal);
    document.body.addEventListener('htmx:sendError', () => showToast('error', 'Server unreachable'));
    document.body.addEventListener('htmx:responseError', e => showToast('error', 'Request failed (' + e.detail.xhr.status + ')'));

    // Downloads a PDF, or shows the notice the server sent instead of a file
    async function exportPdf(url, button) {{
        if (button) button.disabled = true;
        try {{
            const response = await fetch(url);
            const type = response.headers.get('content-type') || '';
            if (type.includes('application/pdf')) {{
                const disposition = response.headers.get('content-disposition') || '';
                const match = disposition.match(/filename="?([^";]+)"?/);
                const blob = await response.blob();
                const link = document.createElement('a');
                link.href = URL.createObjectURL(blob);
                link.download = match ? match[1] : 'report.pdf';
                document.body.appendChild(link);
                link.click();
                link.remove();
                URL.revokeObjectURL(link.href);
                showToast('success', 'PDF downloaded');
            }} else {{
                const notice = await response.json();
                showToast(notice.level, notice.message);
            }}
        }} catch (err) {{
            showToast('error', 'Could not download the PDF');
        }} finally {{
            if (button) button.disabled = false;
        }}
    }}
    </script>
</body>
</html>"#,
        title = escape_html(title),
        content = content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard", "dashboard"),
        ("/accounts", "Accounts", "accounts"),
        ("/customers", "Customers", "customers"),
        ("/balance", "Balance", "balance"),
        ("/credit", "Credit", "credit"),
        ("/debit", "Debit", "debit"),
        ("/daily-transactions", "Transactions", "transactions"),
        ("/daily-log", "Daily Log", "log"),
        ("/statement", "Statement", "statement"),
        ("/due", "Due", "due"),
        ("/logout", "Logout", "logout"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Deb Telecom</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, id) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        let icon = match *id {
            "dashboard" => "📊",
            "accounts" => "💳",
            "customers" => "👥",
            "balance" => "💰",
            "credit" => "➕",
            "debit" => "➖",
            "transactions" => "📋",
            "log" => "🗓️",
            "statement" => "📄",
            "due" => "📒",
            "logout" => "🚪",
            _ => "📄",
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!("<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>", inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Page without the sidebar, for the password recovery and logout screens
pub fn bare_page(headers: &HeaderMap, title: &str, inner_content: &str) -> String {
    let card = format!(
        "<div class='min-h-screen flex items-center justify-center p-6'><div class='bg-white rounded-xl shadow-sm p-8 w-full max-w-md'>{}</div></div>",
        inner_content
    );
    if is_htmx_request(headers) {
        card
    } else {
        base_html(title, &card)
    }
}

/// Dashboard: today's totals and shortcuts
async fn index_page(
    state: axum::extract::State<AppState>,
    headers: HeaderMap,
) -> Html<String> {
    let query = ListQuery::new().with_range(DateRange::from_preset(debweb_config::DatePreset::Today, today()));
    let summary = match state.api.today_log(&query).await {
        Ok(log) => Some(log.summary),
        Err(e) => {
            log::warn!(target: "debweb::api", "dashboard summary unavailable: {}", e);
            None
        }
    };

    let cards = match summary {
        Some(summary) => summary_cards(&state.config, &summary),
        None => "<div class='bg-yellow-50 border border-yellow-200 text-yellow-700 rounded-lg p-4 mb-6'>Today's totals are unavailable. The backend did not respond.</div>".to_string(),
    };

    let shortcuts = [
        ("/credit", "New credit", "Cash in to an account"),
        ("/debit", "New debit", "Cash out of an account"),
        ("/balance", "Check balance", "Look up a number's stored balance"),
        ("/daily-log", "Daily log", "Everything posted today"),
    ];
    let shortcut_html: String = shortcuts
        .iter()
        .map(|(href, label, hint)| {
            format!(
                "<a href='{}' class='block bg-white rounded-xl shadow-sm p-5 hover:shadow-md'><p class='font-semibold text-indigo-600'>{}</p><p class='text-sm text-gray-500 mt-1'>{}</p></a>",
                href, label, hint
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2><p class='text-gray-500'>{}</p></div>
        {}
        <div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4'>{}</div>"#,
        today(),
        cards,
        shortcut_html
    );

    Html(page_response(&headers, "Dashboard", "/", &inner_content))
}

/// Four cards: total credit, total debit and their counts
pub fn summary_cards(config: &Config, summary: &LogSummary) -> String {
    let money = |v: f64| components::money(&config.currency, v);
    format!(
        r#"<div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Total Credit</p><p class='text-2xl font-bold text-green-700'>{}</p></div>
            <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>Total Debit</p><p class='text-2xl font-bold text-red-700'>{}</p></div>
            <div class='bg-blue-50 p-4 rounded-lg border border-blue-200'><p class='text-sm text-blue-600'>Credit Entries</p><p class='text-2xl font-bold text-blue-700'>{}</p></div>
            <div class='bg-yellow-50 p-4 rounded-lg border border-yellow-200'><p class='text-sm text-yellow-600'>Debit Entries</p><p class='text-2xl font-bold text-yellow-700'>{}</p></div>
        </div>"#,
        money(summary.total_credit),
        money(summary.total_debit),
        summary.credit_count,
        summary.debit_count
    )
}

/// Start the HTTP server
///
/// Creates the router, binds to the configured address and serves until
/// the process is stopped.
pub async fn start_server(config: Config, api: BackendApi) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let backend = config.backend_base().to_string();
    let state = AppState::new(config, api);

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting debweb on http://{}", addr);
    log::info!("Backend: {}", backend);

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}
