//! Entry routes - Credit and debit forms
//!
//! Features:
//! - Company select reloads the number select for that company
//! - Read-only balance of the chosen number
//! - Inline field errors; input kept on any failure
//! - Customer name typeahead on the credit form
//! - Debit submit visually disabled when the amount exceeds the balance
//!
//! Structure:
//! - api.rs: Form fragments, submission and the typeahead
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_credit_form, htmx_credit_submit, htmx_customer_suggest, htmx_debit_form, htmx_debit_submit,
    render_form,
};
pub use page::{page_credit, page_debit};
