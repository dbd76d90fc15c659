//! Password recovery and logout screens
//!
//! Recovery is two steps: the backend first confirms the email belongs to
//! a user, then accepts the new password for it.

use crate::components::{notify, text_input};
use crate::error::ApiError;
use crate::{bare_page, AppState};
use axum::extract::{Form, State};
use axum::http::HeaderMap;
use axum::response::{Html, Response};
use debweb_core::{CoreError, FieldError, Notice, Validator, STORAGE_KEYS};
use debweb_utils::escape_html;
use serde::Deserialize;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn step(title: &str, hint: &str, body: &str) -> String {
    format!(
        "<div id='auth-step'><h2 class='text-2xl font-bold mb-1'>{}</h2><p class='text-gray-500 mb-6'>{}</p>{}</div>",
        escape_html(title),
        escape_html(hint),
        body
    )
}

fn submit_button(label: &str) -> String {
    format!(
        "<button type='submit' class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>{}</button>",
        escape_html(label)
    )
}

pub fn verify_step(email: &str, errors: &[FieldError]) -> String {
    step(
        "Forgot password",
        "Enter the email address of your account.",
        &format!(
            "<form hx-post='/forgot-password/verify' hx-target='#auth-step' hx-swap='outerHTML' class='space-y-4'>{}{}</form>",
            text_input("email", "Email", email, "email", errors),
            submit_button("Continue")
        ),
    )
}

pub fn reset_step(email: &str, errors: &[FieldError]) -> String {
    step(
        "Choose a new password",
        &format!("Resetting the password of {}.", email),
        &format!(
            "<form hx-post='/forgot-password/reset' hx-target='#auth-step' hx-swap='outerHTML' class='space-y-4'><input type='hidden' name='email' value='{}'>{}{}{}</form>",
            escape_html(email),
            text_input("password", "New password", "", "password", errors),
            text_input("confirmPassword", "Confirm password", "", "password", errors),
            submit_button("Reset password")
        ),
    )
}

fn done_step() -> String {
    step(
        "Password updated",
        "You can sign in with the new password now.",
        "<a href='/' class='block text-center px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Back to the dashboard</a>",
    )
}

/// Validation failures re-render the step with inline messages
fn invalid(error: CoreError, render: impl FnOnce(&[FieldError]) -> String) -> Response {
    notify(&error.to_notice(), &[], render(error.field_errors()))
}

pub async fn page_forgot_password(headers: HeaderMap) -> Html<String> {
    Html(bare_page(&headers, "Forgot password", &verify_step("", &[])))
}

pub async fn htmx_forgot_verify(
    state: State<AppState>,
    Form(form): Form<VerifyForm>,
) -> Result<Response, ApiError> {
    let email = form.email.trim();
    if let Err(e) = Validator::new()
        .required("email", email, "Email")
        .email("email", email)
        .finish()
    {
        return Ok(invalid(e, |errors| verify_step(email, errors)));
    }
    state
        .api
        .verify_user(email)
        .await
        .map_err(|e| ApiError::core("auth.verify", e))?;
    log::info!(target: "debweb::api", "password recovery started for {}", email);
    Ok(notify(
        &Notice::info("Account found. Choose a new password."),
        &[],
        reset_step(email, &[]),
    ))
}

pub async fn htmx_forgot_reset(
    state: State<AppState>,
    Form(form): Form<ResetForm>,
) -> Result<Response, ApiError> {
    let email = form.email.trim();
    if let Err(e) = Validator::new()
        .required("email", email, "Email")
        .min_len("password", &form.password, MIN_PASSWORD_LEN, "Password")
        .matches("confirmPassword", &form.password, &form.confirm_password, "Passwords do not match")
        .finish()
    {
        return Ok(invalid(e, |errors| reset_step(email, errors)));
    }
    state
        .api
        .reset_password(email, &form.password)
        .await
        .map_err(|e| ApiError::core("auth.reset", e))?;
    log::info!(target: "debweb::api", "password reset for {}", email);
    Ok(notify(&Notice::success("Password updated"), &[], done_step()))
}

/// Clears the stored session in the browser, then offers the way back
pub async fn page_logout(headers: HeaderMap) -> Html<String> {
    let keys = STORAGE_KEYS
        .iter()
        .map(|k| format!("localStorage.removeItem('{}');", k))
        .collect::<String>();
    let body = format!(
        "<script>{}</script>{}",
        keys,
        step(
            "Signed out",
            "The saved session was removed from this browser.",
            "<a href='/' class='block text-center px-4 py-2 border rounded-lg hover:bg-gray-50'>Return to the dashboard</a>",
        )
    );
    Html(bare_page(&headers, "Signed out", &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_step_keeps_email() {
        let html = reset_step("deb@example.com", &[]);
        assert!(html.contains("name='email' value='deb@example.com'"));
        assert!(html.contains("name='confirmPassword'"));
    }

    #[test]
    fn test_reset_step_shows_mismatch() {
        let errors = vec![FieldError::new("confirmPassword", "Passwords do not match")];
        assert!(reset_step("deb@example.com", &errors).contains("Passwords do not match"));
    }

    #[tokio::test]
    async fn test_logout_clears_storage() {
        let Html(html) = page_logout(HeaderMap::new()).await;
        assert!(html.contains("localStorage.removeItem('authToken');"));
        assert!(html.contains("localStorage.removeItem('user');"));
        for key in STORAGE_KEYS {
            assert!(html.contains(&format!("removeItem('{}')", key)));
        }
    }
}
