use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AlertId, AlertTitle, HubId, RichText, TypeConstraintError};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    #[default]
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
        }
    }
}

impl Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertLevel {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "info" => Ok(AlertLevel::Info),
            "warning" => Ok(AlertLevel::Warning),
            "danger" => Ok(AlertLevel::Danger),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown alert level `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: AlertId,
    pub hub_id: HubId,
    pub title: AlertTitle,
    pub message: RichText,
    pub level: AlertLevel,
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Alert {
    /// Whether the alert should be shown at `now`.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.is_active
            && self.starts_at.is_none_or(|start| start <= now)
            && self.expires_at.is_none_or(|end| end > now)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlertFields {
    pub title: AlertTitle,
    pub message: RichText,
    pub level: AlertLevel,
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewAlert {
    pub hub_id: HubId,
    pub fields: AlertFields,
}

pub type UpdateAlert = AlertFields;
