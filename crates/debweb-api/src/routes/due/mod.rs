//! Due routes - Per-customer running balance of amounts given and taken
//!
//! Features:
//! - Ledger lookup by mobile number
//! - Give and take entries, dated today unless a date is given
//! - PDF export of the whole ledger
//!
//! Structure:
//! - api.rs: Ledger fragment, give/take mutations and the PDF download
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{export_due_pdf, htmx_due_give, htmx_due_ledger, htmx_due_take, DueForm, DueParams, DUE_EVENT};
pub use page::page_due;
