//! Basic types for the core record module

use serde::{Deserialize, Serialize};

/// Mobile-money provider and channel an account belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "Bkash Personal")]
    BkashPersonal,
    #[serde(rename = "Bkash Agent")]
    BkashAgent,
    #[serde(rename = "Nagad Personal")]
    NagadPersonal,
    #[serde(rename = "Nagad Agent")]
    NagadAgent,
    #[serde(rename = "Rocket Personal")]
    RocketPersonal,
    #[serde(rename = "Rocket Agent")]
    RocketAgent,
    #[serde(rename = "Upay Personal")]
    UpayPersonal,
    #[serde(rename = "Upay Agent")]
    UpayAgent,
}

impl Company {
    /// Every company, in selector order
    pub const ALL: [Company; 8] = [
        Company::BkashPersonal,
        Company::BkashAgent,
        Company::NagadPersonal,
        Company::NagadAgent,
        Company::RocketPersonal,
        Company::RocketAgent,
        Company::UpayPersonal,
        Company::UpayAgent,
    ];

    /// Label exchanged with the backend as `selectCompany`
    pub fn as_str(&self) -> &'static str {
        match self {
            Company::BkashPersonal => "Bkash Personal",
            Company::BkashAgent => "Bkash Agent",
            Company::NagadPersonal => "Nagad Personal",
            Company::NagadAgent => "Nagad Agent",
            Company::RocketPersonal => "Rocket Personal",
            Company::RocketAgent => "Rocket Agent",
            Company::UpayPersonal => "Upay Personal",
            Company::UpayAgent => "Upay Agent",
        }
    }

    /// Provider part of the label ("Bkash", "Nagad", ...)
    pub fn provider(&self) -> &'static str {
        self.as_str().split(' ').next().unwrap_or("")
    }
}

impl std::str::FromStr for Company {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Company::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("Invalid company: {}", s))
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction relative to the account balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Increases the account balance
    Credit,
    /// Decreases the account balance
    Debit,
}

impl EntryKind {
    /// Capitalised label for tables and badges
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Credit => "Credit",
            EntryKind::Debit => "Debit",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Credit => write!(f, "credit"),
            EntryKind::Debit => write!(f, "debit"),
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credit" => Ok(EntryKind::Credit),
            "debit" => Ok(EntryKind::Debit),
            _ => Err(format!("Invalid entry kind: {}", s)),
        }
    }
}
