//! Customer HTMX endpoints

use crate::components::{
    confirm_delete, delete_record, edit_dialog, empty_state, modal, modal_buttons, notify,
    row_actions, text_input, update_record, DeleteParams, ListView, MODAL_CLOSE_EVENT,
};
use crate::error::ApiError;
use crate::routes::{load_list, resolve_query};
use crate::AppState;
use axum::extract::{Form, Query, State};
use axum::response::{Html, Response};
use debweb_core::{Customer, CustomerDraft, DateRange, ListController, ListParams, Notice, Validator};
use debweb_utils::{date_part, escape_html};
use serde::{Deserialize, Serialize};

pub const CUSTOMERS_VIEW: ListView<'static> = ListView {
    id: "customers-list",
    url: "/customers/list",
    event: "customers:refresh",
};

const BASE: &str = "/customers";

/// Customer fields as posted by the create and edit modals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub mobile_number: String,
}

impl CustomerForm {
    fn to_draft(&self) -> Result<CustomerDraft, ApiError> {
        Validator::new()
            .required("customerName", &self.customer_name, "Name")
            .required("mobileNumber", &self.mobile_number, "Mobile number")
            .mobile_number("mobileNumber", &self.mobile_number)
            .finish()
            .map_err(|e| ApiError::core("customer.validate", e))?;
        Ok(CustomerDraft {
            customer_name: self.customer_name.trim().to_string(),
            mobile_number: self.mobile_number.trim().to_string(),
        })
    }
}

/// Customer list fragment (search and pagination)
pub async fn htmx_customers_list(
    state: State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let query = resolve_query(&params, DateRange::all()).map_err(|e| ApiError::core("customers.list", e))?;
    let api = &state.api;
    let list = load_list("customers", query, params.expanded(), |q| async move {
        api.list_customers(&q).await
    })
    .await?;
    Ok(Html(render_customers(&list)))
}

pub fn render_customers(list: &ListController<Customer>) -> String {
    let view = CUSTOMERS_VIEW;
    let query = list.query();
    let expansion = list.expansion();

    if list.is_empty() {
        let message = if query.search.is_some() {
            "No customers match your search."
        } else {
            "No customers yet."
        };
        return view.frame(query, expansion, &empty_state(message));
    }

    let mut rows = String::new();
    for customer in list.rows() {
        let values = CustomerForm {
            id: customer.id.clone(),
            customer_name: customer.customer_name.clone(),
            mobile_number: customer.mobile_number.clone(),
        };
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50 cursor-pointer' {toggle}>
                <td class='px-4 py-3 font-medium'>{name}</td>
                <td class='px-4 py-3 font-mono'>{number}</td>
                <td class='px-4 py-3 text-gray-500'>{created}</td>
                <td class='px-4 py-3'>{actions}</td>
            </tr>"#,
            toggle = view.toggle_attrs(query, expansion, &customer.id),
            name = escape_html(&customer.customer_name),
            number = escape_html(&customer.mobile_number),
            created = escape_html(date_part(&customer.created_at)),
            actions = row_actions(BASE, &customer.id, &values, &customer.customer_name),
        ));
        if expansion.is_expanded(&customer.id) {
            rows.push_str(&format!(
                "<tr class='bg-indigo-50'><td colspan='4' class='px-4 py-3 text-sm text-gray-700'><div class='grid grid-cols-3 gap-4'><div><span class='text-gray-500'>Customer id</span><p class='font-mono'>{}</p></div><div><span class='text-gray-500'>Mobile</span><p>{}</p></div><div><span class='text-gray-500'>Added</span><p>{}</p></div></div></td></tr>",
                escape_html(&customer.id),
                escape_html(&customer.mobile_number),
                escape_html(&customer.created_at)
            ));
        }
    }

    let inner = format!(
        r#"<div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-sm text-gray-600'><tr><th class='px-4 py-3'>Name</th><th class='px-4 py-3'>Mobile Number</th><th class='px-4 py-3'>Added</th><th class='px-4 py-3'></th></tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>{}"#,
        rows,
        view.pagination(list.pager(), list.total_items(), query)
    );
    view.frame(query, expansion, &inner)
}

fn customer_fields(values: &CustomerForm) -> String {
    format!(
        "<div class='space-y-4'>{}{}</div>",
        text_input("customerName", "Name", &values.customer_name, "text", &[]),
        text_input("mobileNumber", "Mobile Number", &values.mobile_number, "tel", &[])
    )
}

/// Empty "new customer" modal
pub async fn htmx_customer_new() -> Html<String> {
    let body = format!(
        "<form hx-post='{}/create' hx-target='#modal' hx-swap='innerHTML'>{}{}</form>",
        BASE,
        customer_fields(&CustomerForm::default()),
        modal_buttons("Save", false)
    );
    Html(modal("New customer", &body))
}

pub async fn htmx_customer_create(
    state: State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Result<Response, ApiError> {
    let draft = form.to_draft()?;
    state
        .api
        .create_customer(&draft)
        .await
        .map_err(|e| ApiError::core("customer.create", e))?;
    log::info!(target: "debweb::api", "customer {} created", draft.mobile_number);
    Ok(notify(
        &Notice::success("Customer added"),
        &[CUSTOMERS_VIEW.event, MODAL_CLOSE_EVENT],
        String::new(),
    ))
}

/// Edit modal, pre-filled from the row's values
pub async fn htmx_customer_edit(Query(values): Query<CustomerForm>) -> Html<String> {
    let id = values.id.clone();
    Html(edit_dialog("customer", &id, values, |id, draft| {
        format!(
            "<form hx-post='{}/update' hx-target='#modal' hx-swap='innerHTML'><input type='hidden' name='id' value='{}'>{}{}</form>",
            BASE,
            escape_html(id),
            customer_fields(draft),
            modal_buttons("Update", false)
        )
    }))
}

pub async fn htmx_customer_update(
    state: State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Result<Response, ApiError> {
    let draft = form.to_draft()?;
    let api = &state.api;
    update_record("customer", CUSTOMERS_VIEW.event, &form.id, draft, |id, draft| async move {
        api.update_customer(&id, &draft).await
    })
    .await
}

pub async fn htmx_customers_confirm_delete(Query(params): Query<DeleteParams>) -> Html<String> {
    Html(confirm_delete("customer", BASE, &params))
}

pub async fn htmx_customer_delete(
    state: State<AppState>,
    Form(params): Form<DeleteParams>,
) -> Result<Response, ApiError> {
    let api = &state.api;
    delete_record("customer", CUSTOMERS_VIEW.event, &params, |id| async move {
        api.delete_customer(&id).await
    })
    .await
}
