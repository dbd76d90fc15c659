//! Typed list queries and the two-stage filter commit
//!
//! A page never keeps ambient filter state. Raw inputs arrive as a
//! [`FilterDraft`]; only [`FilterDraft::apply`] turns them into the
//! active [`ListQuery`], and applying always starts again at page 1.
//! That one discipline holds for every filter on every page, search
//! and dates included.

use crate::error::CoreResult;
use crate::time::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Active filters plus the 1-based page they are shown at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub entry_by: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            start_date: None,
            end_date: None,
            search: None,
            entry_by: None,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.start_date = range.start;
        self.end_date = range.end;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_empty(search.into());
        self
    }

    pub fn with_entry_by(mut self, entry_by: impl Into<String>) -> Self {
        self.entry_by = non_empty(entry_by.into());
        self
    }

    /// Same filters at another page; never below 1
    pub fn at_page(&self, page: usize) -> Self {
        let mut next = self.clone();
        next.page = page.max(1);
        next
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Non-empty filters, in backend parameter names
    pub fn filter_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start_date {
            params.push(("startDate".to_string(), start.to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("endDate".to_string(), end.to_string()));
        }
        if let Some(ref search) = self.search {
            params.push(("search".to_string(), search.clone()));
        }
        if let Some(ref entry_by) = self.entry_by {
            params.push(("entryBy".to_string(), entry_by.clone()));
        }
        params
    }

    /// Parameters of a paginated fetch: non-empty filters, then `page`
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self.filter_params();
        params.push(("page".to_string(), self.page.to_string()));
        params
    }

    /// Parameters of an unpaginated fetch: non-empty filters, then `limit`
    pub fn to_unpaged_params(&self, limit: usize) -> Vec<(String, String)> {
        let mut params = self.filter_params();
        params.push(("limit".to_string(), limit.to_string()));
        params
    }

    /// URL query string for links back into the page
    pub fn to_query_string(&self) -> String {
        encode_params(&self.to_params())
    }

    /// Filters as the draft a filter form is pre-filled with
    pub fn to_draft(&self) -> FilterDraft {
        FilterDraft {
            start_date: self.start_date.map(|d| d.to_string()).unwrap_or_default(),
            end_date: self.end_date.map(|d| d.to_string()).unwrap_or_default(),
            search: self.search.clone().unwrap_or_default(),
            entry_by: self.entry_by.clone().unwrap_or_default(),
        }
    }
}

/// Raw, not yet applied filter inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDraft {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub entry_by: String,
}

impl FilterDraft {
    /// Promote to the active query, starting at page 1
    pub fn apply(&self) -> CoreResult<ListQuery> {
        let range = DateRange::parse(&self.start_date, &self.end_date)?;
        Ok(ListQuery::new()
            .with_range(range)
            .with_search(self.search.trim())
            .with_entry_by(self.entry_by.trim()))
    }

    /// Discard edits; the draft goes back to what `active` holds
    pub fn reset_to(&mut self, active: &ListQuery) {
        *self = active.to_draft();
    }

    /// Clear every filter input
    pub fn clear(&mut self) {
        *self = FilterDraft::default();
    }
}

/// Query string of a list fragment request, all fields as raw text
///
/// Kept flat and stringly so `serde_urlencoded` can decode it without
/// `flatten`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub entry_by: String,
    #[serde(default)]
    pub page: String,
    /// Id of the expanded row, if any
    #[serde(default)]
    pub expanded: String,
}

impl ListParams {
    pub fn draft(&self) -> FilterDraft {
        FilterDraft {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            search: self.search.clone(),
            entry_by: self.entry_by.clone(),
        }
    }

    /// Requested page, 1 when absent or unparsable
    pub fn page(&self) -> usize {
        self.page.trim().parse::<usize>().unwrap_or(1).max(1)
    }

    /// Applied filters at the requested page
    pub fn to_query(&self) -> CoreResult<ListQuery> {
        Ok(self.draft().apply()?.at_page(self.page()))
    }

    pub fn expanded(&self) -> Option<&str> {
        let id = self.expanded.trim();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    /// True when no filter field was sent at all
    pub fn is_blank(&self) -> bool {
        self.start_date.is_empty()
            && self.end_date.is_empty()
            && self.search.is_empty()
            && self.entry_by.is_empty()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `key=value&...` with percent-encoded values
pub fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
