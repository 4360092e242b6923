// src/models/order.rs

use chrono::{DateTime, Utc};

/// One line of an order: a catalog item and how many of it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub book_id: i64,
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// A placed order. The status string is carried as the backend sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of the line totals; the backend's `total` should agree.
    pub fn computed_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum()
    }
}
