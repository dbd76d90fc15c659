//! Daily log routes - Credits and debits posted in a period
//!
//! Features:
//! - Summary cards with the backend's totals for the whole period
//! - Paginated feed with date and staff filters, today by default
//! - Edit and delete of either kind of entry
//!
//! Structure:
//! - api.rs: HTMX fragments and mutations
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_log_confirm_delete, htmx_log_delete, htmx_log_edit, htmx_log_list, htmx_log_update,
    LogEditForm, LOG_VIEW,
};
pub use page::page_daily_log;
