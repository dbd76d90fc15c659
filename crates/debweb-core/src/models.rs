//! Records exchanged with the backend
//!
//! Field names follow the backend's camelCase JSON. Record fields are
//! read leniently: a missing key or `null` takes the default, and numbers
//! may arrive as strings. One malformed field never fails the whole list.
//! The backend is trusted and nothing here re-derives balances.

use crate::types::{Company, EntryKind};
use serde::{Deserialize, Serialize};

/// Stored balance for one company/number pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Company label, e.g. "Bkash Personal"
    #[serde(default, deserialize_with = "lenient_string")]
    pub select_company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile_number: String,
    /// Running balance maintained by the backend
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

impl Account {
    /// Parsed company, `None` for labels this build does not know
    pub fn company(&self) -> Option<Company> {
        self.select_company.parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

/// A posted credit (cash in to an account)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransaction {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    /// Account number the credit went to
    #[serde(default, deserialize_with = "lenient_string")]
    pub selected_account: String,
    /// Balance snapshot taken before the credit
    #[serde(default, deserialize_with = "lenient_string")]
    pub selected_number: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub new_amount: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub remarks: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub statement: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub entry_by: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

/// A posted debit (cash out of an account)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitTransaction {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub selected_account: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub remarks: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub statement: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub entry_by: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

/// Credit or debit row of the daily activity feed and account statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_debit: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub selected_account: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_number: String,
    /// Balance snapshot (credits only)
    #[serde(default, deserialize_with = "lenient_string")]
    pub selected_number: String,
    /// Credit amount (credits only)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub new_amount: f64,
    /// Debit amount (debits only)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub remarks: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub statement: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub entry_by: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

impl DailyLogEntry {
    pub fn kind(&self) -> EntryKind {
        if self.is_debit {
            EntryKind::Debit
        } else {
            EntryKind::Credit
        }
    }

    /// The amount that moved, whichever field the backend used for it
    pub fn moved_amount(&self) -> f64 {
        if self.is_debit {
            self.amount
        } else {
            self.new_amount
        }
    }
}

/// Rows of an account statement share the daily log shape
pub type StatementEntry = DailyLogEntry;

/// One line of a customer's due ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueEntry {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Amount handed to the customer
    #[serde(default, deserialize_with = "lenient_f64")]
    pub given: f64,
    /// Amount received from the customer
    #[serde(default, deserialize_with = "lenient_f64")]
    pub taken: f64,
    /// Running balance after this line, computed by the backend
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_credit: bool,
}

/// Server-side pagination block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub current_page: usize,
    #[serde(default = "first_page")]
    pub total_pages: usize,
    #[serde(default, alias = "totalRecords", alias = "total")]
    pub total_items: usize,
}

fn first_page() -> usize {
    1
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
        }
    }
}

/// Totals block of the daily log
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_credit: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_debit: f64,
    #[serde(default)]
    pub credit_count: usize,
    #[serde(default)]
    pub debit_count: usize,
}

/// `{ success, data, pagination?, summary?, message? }`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub summary: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// One page of records plus the backend's pagination block
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            pagination: Pagination::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Daily log page with its totals
#[derive(Debug, Clone, PartialEq)]
pub struct LogPage {
    pub page: Page<DailyLogEntry>,
    pub summary: LogSummary,
}

// ==================== Request bodies ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDraft {
    #[serde(default)]
    pub select_company: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub total_amount: f64,
}

impl From<&Account> for AccountDraft {
    fn from(account: &Account) -> Self {
        Self {
            select_company: account.select_company.clone(),
            mobile_number: account.mobile_number.clone(),
            total_amount: account.total_amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub mobile_number: String,
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_name: customer.customer_name.clone(),
            mobile_number: customer.mobile_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditDraft {
    pub customer_name: String,
    pub customer_number: String,
    pub company: String,
    pub selected_account: String,
    pub selected_number: String,
    pub new_amount: f64,
    pub remarks: String,
    pub statement: String,
    pub entry_by: String,
}

impl From<&CreditTransaction> for CreditDraft {
    fn from(tx: &CreditTransaction) -> Self {
        Self {
            customer_name: tx.customer_name.clone(),
            customer_number: tx.customer_number.clone(),
            company: tx.company.clone(),
            selected_account: tx.selected_account.clone(),
            selected_number: tx.selected_number.clone(),
            new_amount: tx.new_amount,
            remarks: tx.remarks.clone(),
            statement: tx.statement.clone(),
            entry_by: tx.entry_by.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitDraft {
    pub company: String,
    pub selected_account: String,
    pub amount: f64,
    pub remarks: String,
    pub statement: String,
    pub entry_by: String,
}

impl From<&DailyLogEntry> for DebitDraft {
    fn from(entry: &DailyLogEntry) -> Self {
        Self {
            company: entry.company.clone(),
            selected_account: entry.selected_account.clone(),
            amount: entry.amount,
            remarks: entry.remarks.clone(),
            statement: entry.statement.clone(),
            entry_by: entry.entry_by.clone(),
        }
    }
}

/// Body of the give/take due endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueDraft {
    pub amount: f64,
    pub notes: String,
    pub date: String,
}

// ==================== Helpers ====================

/// Accepts a JSON string or number and keeps it as text; `null` is empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Accepts a number, a numeric string (`"1,500"` included) or `null`.
/// Anything else reads as 0 with a warning.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) if s.trim().is_empty() => Some(0.0),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        serde_json::Value::Null => Some(0.0),
        _ => None,
    };
    Ok(match parsed.filter(|n| n.is_finite()) {
        Some(n) => n,
        None => {
            log::warn!(target: "debweb::models", "unreadable amount {}, using 0", value);
            0.0
        }
    })
}

/// Accepts a boolean, `"true"`/`"false"`, 0/1 or `null`
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        serde_json::Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_decodes_backend_shape() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "_id": "66a1",
            "selectCompany": "Nagad Personal",
            "mobileNumber": "01700000000",
            "totalAmount": 500,
            "createdAt": "2024-05-01T10:20:00.000Z"
        }))
        .unwrap();
        assert_eq!(account.id, "66a1");
        assert_eq!(account.total_amount, 500.0);
        assert_eq!(account.company(), Some(Company::NagadPersonal));
    }

    #[test]
    fn test_unknown_company_is_kept() {
        let account: Account =
            serde_json::from_value(serde_json::json!({ "selectCompany": "Cellfin" })).unwrap();
        assert_eq!(account.select_company, "Cellfin");
        assert!(account.company().is_none());
        assert!(account.id.is_empty());
    }

    #[test]
    fn test_credit_balance_snapshot_accepts_number() {
        let tx: CreditTransaction = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "selectedNumber": 500,
            "newAmount": 100
        }))
        .unwrap();
        assert_eq!(tx.id, "c1");
        assert_eq!(tx.selected_number, "500");
        assert_eq!(tx.new_amount, 100.0);
    }

    #[test]
    fn test_null_and_string_fields_decode() {
        let envelope: Envelope<Vec<CreditTransaction>> = serde_json::from_value(serde_json::json!({
            "data": [
                { "_id": "c1", "customerName": "Rahim", "remarks": null, "newAmount": "1,500" },
                { "_id": "c2", "customerName": null, "newAmount": null, "statement": 12 }
            ]
        }))
        .unwrap();
        let records = envelope.data.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].remarks, "");
        assert_eq!(records[0].new_amount, 1500.0);
        assert_eq!(records[1].customer_name, "");
        assert_eq!(records[1].new_amount, 0.0);
        assert_eq!(records[1].statement, "12");

        let account: Account = serde_json::from_value(serde_json::json!({
            "_id": 7,
            "totalAmount": "500",
            "createdAt": null
        }))
        .unwrap();
        assert_eq!(account.id, "7");
        assert_eq!(account.total_amount, 500.0);
        assert!(account.created_at.is_empty());
    }

    #[test]
    fn test_unreadable_amount_reads_as_zero() {
        let entry: DueEntry = serde_json::from_value(serde_json::json!({
            "given": "n/a",
            "taken": [],
            "balance": "250.5",
            "isCredit": "true"
        }))
        .unwrap();
        assert_eq!(entry.given, 0.0);
        assert_eq!(entry.taken, 0.0);
        assert_eq!(entry.balance, 250.5);
        assert!(entry.is_credit);

        let log: DailyLogEntry =
            serde_json::from_value(serde_json::json!({ "isDebit": null, "amount": 40 })).unwrap();
        assert!(!log.is_debit);
    }

    #[test]
    fn test_log_entry_amount_by_kind() {
        let credit = DailyLogEntry { new_amount: 200.0, amount: 0.0, ..Default::default() };
        let debit = DailyLogEntry { is_debit: true, amount: 50.0, new_amount: 0.0, ..Default::default() };
        assert_eq!(credit.kind(), EntryKind::Credit);
        assert_eq!(credit.moved_amount(), 200.0);
        assert_eq!(debit.kind(), EntryKind::Debit);
        assert_eq!(debit.moved_amount(), 50.0);
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: Envelope<Vec<Customer>> =
            serde_json::from_value(serde_json::json!({ "data": [] })).unwrap();
        assert!(envelope.success);
        assert!(envelope.pagination.is_none());

        let envelope: Envelope<Vec<Customer>> = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "Not allowed"
        }))
        .unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_pagination_aliases() {
        let p: Pagination =
            serde_json::from_value(serde_json::json!({ "currentPage": 2, "totalPages": 5, "totalRecords": 48 }))
                .unwrap();
        assert_eq!(p, Pagination { current_page: 2, total_pages: 5, total_items: 48 });
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let draft = CreditDraft {
            customer_name: "Rahim".to_string(),
            new_amount: 100.0,
            entry_by: "aditto".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["customerName"], "Rahim");
        assert_eq!(value["newAmount"], 100.0);
        assert_eq!(value["entryBy"], "aditto");
    }
}
