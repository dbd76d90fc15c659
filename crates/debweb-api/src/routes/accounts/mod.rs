//! Account routes - Stored balances per company and number
//!
//! Features:
//! - Paginated account list with date filters
//! - Create, edit and delete through modals
//!
//! Structure:
//! - api.rs: HTMX fragments and mutations
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_account_create, htmx_account_delete, htmx_account_edit, htmx_account_new,
    htmx_account_update, htmx_accounts_confirm_delete, htmx_accounts_list, AccountForm,
    ACCOUNTS_VIEW,
};
pub use page::page_accounts;
