//! User-visible notifications
//!
//! Every page reports success and failure through one mechanism: a
//! [`Notice`] that the web layer turns into a toast.

use serde::{Deserialize, Serialize};

/// Browser event name the toast script listens for
pub const NOTIFY_EVENT: &str = "notify";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Value for an `HX-Trigger` header, optionally firing extra events
    ///
    /// `{"notify": {"level": "...", "message": "..."}, "<event>": true}`,
    /// ASCII only so it always fits in a header
    pub fn trigger_json(&self, extra_events: &[&str]) -> String {
        let mut map = serde_json::Map::new();
        map.insert(
            NOTIFY_EVENT.to_string(),
            serde_json::json!({ "level": self.level, "message": self.message }),
        );
        for event in extra_events {
            map.insert(event.to_string(), serde_json::Value::Bool(true));
        }
        ascii_json(&serde_json::Value::Object(map).to_string())
    }
}

fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_json() {
        let notice = Notice::success("Customer deleted");
        let value: serde_json::Value =
            serde_json::from_str(&notice.trigger_json(&["customers:refresh"])).unwrap();
        assert_eq!(value["notify"]["level"], "success");
        assert_eq!(value["notify"]["message"], "Customer deleted");
        assert_eq!(value["customers:refresh"], true);
    }

    #[test]
    fn test_trigger_json_is_ascii() {
        let json = Notice::info("৳ 500 credited").trigger_json(&[]);
        assert!(json.is_ascii());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["notify"]["message"], "৳ 500 credited");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(NoticeLevel::Warning.to_string(), "warning");
    }
}
