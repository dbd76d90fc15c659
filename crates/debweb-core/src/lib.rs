//! Core records, list state and backend API for the Deb Telecom front end

pub mod backend;
pub mod error;
pub mod form;
pub mod list;
pub mod modal;
pub mod models;
pub mod notice;
pub mod pager;
pub mod query;
pub mod time;
pub mod transport;
pub mod types;
pub mod validation;

pub use backend::BackendApi;
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use form::{FormKind, TransactionFields, TransactionForm};
pub use list::{ListController, RefreshOutcome, RequestSequence, RequestToken};
pub use modal::{DeleteModal, EditModal};
pub use models::{
    Account, AccountDraft, CreditDraft, CreditTransaction, Customer, CustomerDraft, DailyLogEntry,
    DebitDraft, DebitTransaction, DueDraft, DueEntry, LogPage, LogSummary, Page, Pagination,
    StatementEntry,
};
pub use notice::{Notice, NoticeLevel};
pub use pager::{Pager, RowExpansion};
pub use query::{FilterDraft, ListParams, ListQuery};
pub use time::DateRange;
pub use transport::{ApiRequest, Method, Transport};
pub use types::{Company, EntryKind};
pub use validation::{FieldError, Validator};

/// Browser local-storage keys cleared on logout
pub const STORAGE_KEYS: [&str; 2] = ["authToken", "user"];
