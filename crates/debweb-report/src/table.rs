//! Report tables: fixed headers per record type, one row per record

use crate::error::{ReportError, ReportResult};
use debweb_config::CurrencyConfig;
use debweb_core::{CreditTransaction, DueEntry, EntryKind, StatementEntry};
use debweb_utils::{date_part, format_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Daily credit transactions
    Credits,
    /// Credit and debit history of one account
    Statement,
    /// Given/taken ledger of one customer
    Due,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Credits => "Daily Credit Transactions",
            ReportKind::Statement => "Account Statement",
            ReportKind::Due => "Due Ledger",
        }
    }

    /// Leading part of the download filename
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportKind::Credits => "credit_transactions",
            ReportKind::Statement => "account_statement",
            ReportKind::Due => "due_ledger",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Credits => &["Date", "Customer", "Number", "Company", "Account", "Amount", "Entry By"],
            ReportKind::Statement => {
                &["Date", "Type", "Company", "Account", "Customer", "Amount", "Remarks", "Entry By"]
            }
            ReportKind::Due => &["Date", "Notes", "Given", "Taken", "Balance"],
        }
    }

    /// Relative column widths, same length as `headers`
    pub fn column_weights(&self) -> &'static [f32] {
        match self {
            ReportKind::Credits => &[1.1, 1.6, 1.3, 1.3, 1.3, 1.1, 1.0],
            ReportKind::Statement => &[1.0, 0.7, 1.2, 1.2, 1.3, 1.0, 1.6, 0.9],
            ReportKind::Due => &[1.0, 2.6, 1.1, 1.1, 1.2],
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            ReportKind::Credits => "credit transaction",
            ReportKind::Statement => "statement",
            ReportKind::Due => "due ledger",
        }
    }
}

/// Amount formatting used inside reports
#[derive(Debug, Clone)]
pub struct AmountFormat {
    pub symbol: String,
    pub decimal_places: u32,
    pub thousands_separator: String,
}

impl AmountFormat {
    pub fn from_currency(currency: &CurrencyConfig) -> Self {
        Self {
            symbol: currency.report_symbol.clone(),
            decimal_places: currency.decimal_places,
            thousands_separator: currency.thousands_separator.clone(),
        }
    }

    /// Bare number, for table cells
    pub fn number(&self, value: f64) -> String {
        format_amount(value, self.decimal_places, &self.thousands_separator)
    }

    /// Number with the currency symbol, for totals
    pub fn money(&self, value: f64) -> String {
        format!("{} {}", self.symbol, self.number(value))
    }
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self::from_currency(&CurrencyConfig::default())
    }
}

/// Rendered cell text of a report, ready for layout
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub rows: Vec<Vec<String>>,
    /// `(label, value)` pairs shown in the metadata block and under the table
    pub totals: Vec<(String, String)>,
}

impl ReportTable {
    pub fn headers(&self) -> &'static [&'static str] {
        self.kind.headers()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn credits(records: &[CreditTransaction], fmt: &AmountFormat) -> ReportResult<Self> {
        let kind = ReportKind::Credits;
        ensure_rows(kind, records.len())?;
        let rows = records
            .iter()
            .map(|tx| {
                vec![
                    date_part(&tx.created_at).to_string(),
                    tx.customer_name.clone(),
                    tx.customer_number.clone(),
                    tx.company.clone(),
                    tx.selected_account.clone(),
                    fmt.number(tx.new_amount),
                    tx.entry_by.clone(),
                ]
            })
            .collect();
        let total: f64 = records.iter().map(|tx| tx.new_amount).sum();
        Ok(Self {
            kind,
            rows,
            totals: vec![
                ("Transactions".to_string(), records.len().to_string()),
                ("Total Credit".to_string(), fmt.money(total)),
            ],
        })
    }

    pub fn statement(records: &[StatementEntry], fmt: &AmountFormat) -> ReportResult<Self> {
        let kind = ReportKind::Statement;
        ensure_rows(kind, records.len())?;
        let rows = records
            .iter()
            .map(|entry| {
                vec![
                    date_part(&entry.created_at).to_string(),
                    entry.kind().label().to_string(),
                    entry.company.clone(),
                    entry.selected_account.clone(),
                    entry.customer_name.clone(),
                    fmt.number(entry.moved_amount()),
                    entry.remarks.clone(),
                    entry.entry_by.clone(),
                ]
            })
            .collect();
        let sum_of = |kind: EntryKind| -> f64 {
            records
                .iter()
                .filter(|e| e.kind() == kind)
                .map(|e| e.moved_amount())
                .sum()
        };
        Ok(Self {
            kind,
            rows,
            totals: vec![
                ("Entries".to_string(), records.len().to_string()),
                ("Total Credit".to_string(), fmt.money(sum_of(EntryKind::Credit))),
                ("Total Debit".to_string(), fmt.money(sum_of(EntryKind::Debit))),
            ],
        })
    }

    pub fn due(records: &[DueEntry], fmt: &AmountFormat) -> ReportResult<Self> {
        let kind = ReportKind::Due;
        ensure_rows(kind, records.len())?;
        let rows = records
            .iter()
            .map(|entry| {
                vec![
                    date_part(&entry.date).to_string(),
                    entry.notes.clone(),
                    fmt.number(entry.given),
                    fmt.number(entry.taken),
                    fmt.number(entry.balance),
                ]
            })
            .collect();
        let given: f64 = records.iter().map(|e| e.given).sum();
        let taken: f64 = records.iter().map(|e| e.taken).sum();
        // Running balance comes from the backend; the last row carries the current one
        let balance = records.last().map(|e| e.balance).unwrap_or_default();
        Ok(Self {
            kind,
            rows,
            totals: vec![
                ("Total Given".to_string(), fmt.money(given)),
                ("Total Taken".to_string(), fmt.money(taken)),
                ("Balance".to_string(), fmt.money(balance)),
            ],
        })
    }
}

fn ensure_rows(kind: ReportKind, count: usize) -> ReportResult<()> {
    if count == 0 {
        return Err(ReportError::EmptyDataset {
            report: kind.subject().to_string(),
        });
    }
    Ok(())
}
