//! Daily transaction routes - Posted credit transactions
//!
//! Features:
//! - Paginated credit list with date, staff and text filters
//! - Row expansion with remarks and the balance snapshot
//! - Edit and delete through modals
//! - PDF export of every row matching the active filters
//!
//! Structure:
//! - api.rs: HTMX fragments, mutations and the PDF download
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    export_transactions_pdf, htmx_transaction_confirm_delete, htmx_transaction_delete,
    htmx_transaction_edit, htmx_transaction_update, htmx_transactions_list, credit_fields, CreditEditForm,
    TRANSACTIONS_VIEW,
};
pub use page::page_daily_transactions;
