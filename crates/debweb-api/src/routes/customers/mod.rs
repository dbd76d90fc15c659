//! Customer routes - Customer directory
//!
//! Features:
//! - Paginated customer list with name/number search
//! - Row expansion with the customer's details
//! - Create, edit and delete through modals
//!
//! Structure:
//! - api.rs: HTMX fragments and mutations
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_customer_create, htmx_customer_delete, htmx_customer_edit, htmx_customer_new,
    htmx_customer_update, htmx_customers_confirm_delete, htmx_customers_list, CustomerForm,
    CUSTOMERS_VIEW,
};
pub use page::page_customers;
