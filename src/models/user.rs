// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::Client;

/// Subscription tier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Basic,
    Premium,
}

impl PlanType {
    /// Lenient mapping from the wire value; anything unrecognized is treated
    /// as the basic tier.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "premium" => PlanType::Premium,
            _ => PlanType::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Basic => "basic",
            PlanType::Premium => "premium",
        }
    }
}

/// A Livria account holder.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub username: String,
    pub email: String,
    pub phrase: Option<String>,
    pub avatar_url: Option<String>,
    pub plan_type: PlanType,
    pub created_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub clients: Vec<Client>,
}

impl User {
    /// Name shown for the account: the nickname when set, the username
    /// otherwise.
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.username
        } else {
            &self.nickname
        }
    }

    pub fn is_premium(&self) -> bool {
        self.plan_type == PlanType::Premium
    }

    pub fn is_basic(&self) -> bool {
        self.plan_type == PlanType::Basic
    }
}
