//! Statement routes - Every entry posted to one account
//!
//! Features:
//! - Account number search with optional date range
//! - Checkbox selection and bulk delete behind a confirmation
//! - PDF export of the full statement
//!
//! Structure:
//! - api.rs: HTMX fragments, bulk delete and the PDF download
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    export_statement_pdf, htmx_statement_confirm_delete, htmx_statement_delete, htmx_statement_list,
    STATEMENT_VIEW,
};
pub use page::page_statement;
