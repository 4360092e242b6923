// src/models/client.rs

use chrono::{DateTime, Utc};

/// Customer record attached to a user account.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
