//! Dependent-select transaction form (credit and debit)
//!
//! Choosing a company loads that company's accounts and resets the
//! number; choosing a number shows its stored balance read-only. The
//! balance is display state only: the backend applies the transaction.

use crate::backend::BackendApi;
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{Account, CreditDraft, DebitDraft};
use crate::notice::Notice;
use crate::validation::{parse_amount, FieldError, Validator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Credit,
    Debit,
}

impl FormKind {
    pub fn label(&self) -> &'static str {
        match self {
            FormKind::Credit => "Credit",
            FormKind::Debit => "Debit",
        }
    }
}

/// Raw form inputs as posted by the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_number: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub selected_account: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub entry_by: String,
}

#[derive(Debug, Clone)]
pub struct TransactionForm {
    kind: FormKind,
    default_entry_by: String,
    fields: TransactionFields,
    accounts: Vec<Account>,
    balance: Option<f64>,
    errors: Vec<FieldError>,
}

impl TransactionForm {
    pub fn new(kind: FormKind, default_entry_by: impl Into<String>) -> Self {
        let default_entry_by = default_entry_by.into();
        Self {
            kind,
            fields: TransactionFields {
                entry_by: default_entry_by.clone(),
                ..Default::default()
            },
            default_entry_by,
            accounts: Vec::new(),
            balance: None,
            errors: Vec::new(),
        }
    }

    /// Rebuild a posted form: reload the company's accounts and the
    /// selected number's balance, keeping every typed input
    pub async fn restore(
        api: &BackendApi,
        kind: FormKind,
        default_entry_by: impl Into<String>,
        fields: TransactionFields,
    ) -> CoreResult<Self> {
        let mut form = Self::new(kind, default_entry_by);
        let company = fields.company.clone();
        let number = fields.selected_account.clone();
        form.fields = fields;
        if form.fields.entry_by.trim().is_empty() {
            form.fields.entry_by = form.default_entry_by.clone();
        }
        if !company.trim().is_empty() {
            form.select_company(api, &company).await?;
            form.select_number(&number);
        }
        Ok(form)
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &TransactionFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut TransactionFields {
        &mut self.fields
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Numbers offered by the selector, for the chosen company only
    pub fn numbers(&self) -> Vec<&str> {
        self.accounts.iter().map(|a| a.mobile_number.as_str()).collect()
    }

    pub fn balance(&self) -> Option<f64> {
        self.balance
    }

    /// Read-only balance field text; empty until a number is chosen
    pub fn balance_display(&self) -> String {
        self.balance.map(|b| b.to_string()).unwrap_or_default()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Switch company: number and balance reset, accounts reloaded
    pub async fn select_company(&mut self, api: &BackendApi, company: &str) -> CoreResult<()> {
        self.fields.company = company.trim().to_string();
        self.fields.selected_account.clear();
        self.balance = None;
        self.accounts.clear();

        if self.fields.company.is_empty() {
            return Ok(());
        }
        let accounts = api.accounts_by_company(&self.fields.company).await?;
        let company = self.fields.company.clone();
        self.accounts = accounts
            .into_iter()
            .filter(|a| a.select_company == company)
            .collect();
        Ok(())
    }

    /// Choose a number of the loaded company; unknown numbers clear the selection
    pub fn select_number(&mut self, number: &str) {
        let number = number.trim();
        match self.accounts.iter().find(|a| a.mobile_number == number) {
            Some(account) => {
                self.fields.selected_account = account.mobile_number.clone();
                self.balance = Some(account.total_amount);
            }
            None => {
                self.fields.selected_account.clear();
                self.balance = None;
            }
        }
    }

    pub fn amount(&self) -> Option<f64> {
        parse_amount(&self.fields.amount)
    }

    /// Debit would take the account below zero; advisory only
    pub fn would_overdraw(&self) -> bool {
        if self.kind != FormKind::Debit {
            return false;
        }
        match (self.amount(), self.balance) {
            (Some(amount), Some(balance)) => amount > balance,
            _ => false,
        }
    }

    /// Reports an overdrawing debit to `logger`; true when it fired
    pub fn warn_if_overdrawn(&self, logger: &dyn ErrorLogger) -> bool {
        if !self.would_overdraw() {
            return false;
        }
        logger.log_warning(
            &format!(
                "debit of {} exceeds balance {} of {}",
                self.fields.amount.trim(),
                self.balance_display(),
                self.fields.selected_account
            ),
            &ErrorContext::new("debit.submit"),
        );
        true
    }

    /// Check inputs and remember field messages for rendering
    pub fn validate(&mut self) -> CoreResult<()> {
        let mut validator = Validator::new();
        validator
            .required("company", &self.fields.company, "Company")
            .required("selectedAccount", &self.fields.selected_account, "Number")
            .positive_amount("amount", &self.fields.amount);
        if self.kind == FormKind::Credit {
            validator.mobile_number("customerNumber", &self.fields.customer_number);
        }
        self.errors = validator.errors().to_vec();
        validator.finish()
    }

    pub fn to_credit_draft(&self) -> CoreResult<CreditDraft> {
        Ok(CreditDraft {
            customer_name: self.fields.customer_name.trim().to_string(),
            customer_number: self.fields.customer_number.trim().to_string(),
            company: self.fields.company.clone(),
            selected_account: self.fields.selected_account.clone(),
            selected_number: self.balance_display(),
            new_amount: self.require_amount()?,
            remarks: self.fields.remarks.trim().to_string(),
            statement: self.fields.statement.trim().to_string(),
            entry_by: self.fields.entry_by.clone(),
        })
    }

    pub fn to_debit_draft(&self) -> CoreResult<DebitDraft> {
        Ok(DebitDraft {
            company: self.fields.company.clone(),
            selected_account: self.fields.selected_account.clone(),
            amount: self.require_amount()?,
            remarks: self.fields.remarks.trim().to_string(),
            statement: self.fields.statement.trim().to_string(),
            entry_by: self.fields.entry_by.clone(),
        })
    }

    fn require_amount(&self) -> CoreResult<f64> {
        self.amount()
            .ok_or_else(|| CoreError::invalid("amount", "Enter a valid amount"))
    }

    /// Validate and post; resets on success, keeps input on failure
    pub async fn submit(&mut self, api: &BackendApi) -> CoreResult<Notice> {
        self.validate()?;
        self.warn_if_overdrawn(&DefaultErrorLogger);
        match self.kind {
            FormKind::Credit => api.create_credit(&self.to_credit_draft()?).await?,
            FormKind::Debit => api.create_debit(&self.to_debit_draft()?).await?,
        }
        log::info!(
            target: "debweb::form",
            "{} of {} posted to {} {}",
            self.kind.label(),
            self.fields.amount.trim(),
            self.fields.company,
            self.fields.selected_account
        );
        let notice = Notice::success(format!("{} saved", self.kind.label()));
        self.reset();
        Ok(notice)
    }

    /// Back to defaults; the account list of the cleared company goes too
    pub fn reset(&mut self) {
        self.fields = TransactionFields {
            entry_by: self.default_entry_by.clone(),
            ..Default::default()
        };
        self.accounts.clear();
        self.balance = None;
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::RecordingTransport;
    use std::sync::Arc;

    fn nagad_accounts() -> serde_json::Value {
        serde_json::json!({
            "success": true,
            "data": [
                { "_id": "a1", "selectCompany": "Nagad Personal", "mobileNumber": "01700000000", "totalAmount": 500 },
                { "_id": "a2", "selectCompany": "Nagad Personal", "mobileNumber": "01800000000", "totalAmount": 20 },
                { "_id": "a3", "selectCompany": "Bkash Personal", "mobileNumber": "01900000000", "totalAmount": 90 }
            ]
        })
    }

    fn setup() -> (Arc<RecordingTransport>, BackendApi) {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond("GET /api/mobileAccounts/company", nagad_accounts());
        let api = BackendApi::new(transport.clone());
        (transport, api)
    }

    #[tokio::test]
    async fn test_credit_scenario() {
        let (transport, api) = setup();
        let mut form = TransactionForm::new(FormKind::Credit, "aditto");
        form.fields_mut().customer_name = "Rahim".to_string();

        form.select_company(&api, "Nagad Personal").await.unwrap();
        assert_eq!(form.numbers(), vec!["01700000000", "01800000000"]);

        form.select_number("01700000000");
        assert_eq!(form.balance_display(), "500");

        form.fields_mut().amount = "100".to_string();
        let notice = form.submit(&api).await.unwrap();
        assert_eq!(notice.message, "Credit saved");

        let requests = transport.requests();
        assert_eq!(requests[0].to_string(), "GET /api/mobileAccounts/company?selectCompany=Nagad%20Personal");
        assert_eq!(requests[1].to_string(), "POST /api/credit");
        let body = requests[1].body.as_ref().unwrap();
        assert_eq!(body["company"], "Nagad Personal");
        assert_eq!(body["selectedAccount"], "01700000000");
        assert_eq!(body["selectedNumber"], "500");
        assert_eq!(body["newAmount"], 100.0);

        assert_eq!(form.fields().entry_by, "aditto");
        assert_eq!(form.fields().customer_name, "");
        assert!(form.accounts().is_empty());
        assert_eq!(form.balance_display(), "");
    }

    #[tokio::test]
    async fn test_company_change_resets_number() {
        let (_transport, api) = setup();
        let mut form = TransactionForm::new(FormKind::Credit, "aditto");
        form.select_company(&api, "Nagad Personal").await.unwrap();
        form.select_number("01700000000");

        form.select_company(&api, "Bkash Personal").await.unwrap();
        assert_eq!(form.fields().selected_account, "");
        assert_eq!(form.balance(), None);
        assert_eq!(form.numbers(), vec!["01900000000"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_input() {
        let (transport, api) = setup();
        transport.fail(
            "POST /api/credit",
            CoreError::Backend { status: 500, message: "down".to_string() },
        );
        let mut form = TransactionForm::new(FormKind::Credit, "aditto");
        form.fields_mut().customer_name = "Rahim".to_string();
        form.select_company(&api, "Nagad Personal").await.unwrap();
        form.select_number("01700000000");
        form.fields_mut().amount = "100".to_string();

        assert!(form.submit(&api).await.is_err());
        assert_eq!(form.fields().customer_name, "Rahim");
        assert_eq!(form.balance_display(), "500");
    }

    #[tokio::test]
    async fn test_validation_blocks_submit() {
        let (transport, api) = setup();
        let mut form = TransactionForm::new(FormKind::Credit, "aditto");
        form.fields_mut().amount = "-5".to_string();
        form.fields_mut().customer_number = "12345".to_string();

        let result = form.submit(&api).await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert_eq!(transport.request_count(), 0);
        assert!(form.error_for("company").is_some());
        assert!(form.error_for("amount").is_some());
        assert!(form.error_for("customerNumber").is_some());
    }

    #[tokio::test]
    async fn test_debit_overdraw_is_advisory() {
        let (transport, api) = setup();
        let mut form = TransactionForm::new(FormKind::Debit, "aditto");
        form.select_company(&api, "Nagad Personal").await.unwrap();
        form.select_number("01800000000");
        form.fields_mut().amount = "50".to_string();
        assert!(form.would_overdraw());

        form.submit(&api).await.unwrap();
        let requests = transport.requests();
        let body = requests.last().unwrap().body.as_ref().unwrap();
        assert_eq!(body["amount"], 50.0);
        assert_eq!(body["selectedAccount"], "01800000000");
    }

    #[derive(Default)]
    struct RecordingLogger {
        warnings: std::cell::RefCell<Vec<(String, String)>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn log_error(&self, _error: &CoreError, _context: &ErrorContext) {}

        fn log_warning(&self, message: &str, context: &ErrorContext) {
            self.warnings
                .borrow_mut()
                .push((message.to_string(), context.operation.clone()));
        }
    }

    #[tokio::test]
    async fn test_overdraw_is_logged_as_warning() {
        let (_transport, api) = setup();
        let mut form = TransactionForm::new(FormKind::Debit, "aditto");
        form.select_company(&api, "Nagad Personal").await.unwrap();
        form.select_number("01700000000");
        let logger = RecordingLogger::default();

        form.fields_mut().amount = "100".to_string();
        assert!(!form.warn_if_overdrawn(&logger));
        assert!(logger.warnings.borrow().is_empty());

        form.fields_mut().amount = "900".to_string();
        assert!(form.warn_if_overdrawn(&logger));
        let warnings = logger.warnings.borrow();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].0.contains("exceeds balance 500"));
        assert!(warnings[0].0.contains("01700000000"));
        assert_eq!(warnings[0].1, "debit.submit");
    }

    #[tokio::test]
    async fn test_restore_keeps_typed_fields() {
        let (_transport, api) = setup();
        let fields = TransactionFields {
            company: "Nagad Personal".to_string(),
            selected_account: "01700000000".to_string(),
            amount: "1,000".to_string(),
            ..Default::default()
        };
        let form = TransactionForm::restore(&api, FormKind::Debit, "aditto", fields)
            .await
            .unwrap();
        assert_eq!(form.balance(), Some(500.0));
        assert_eq!(form.fields().entry_by, "aditto");
        assert!(form.would_overdraw());
    }
}
