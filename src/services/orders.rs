// src/services/orders.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log_and_rethrow;
use crate::config::endpoints;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::Order;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemResource {
    pub book_id: i64,
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Order as the commerce backend transmits it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderResource {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<OrderItemResource>,
    pub total: f64,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// One line of an order being placed.
#[derive(Debug, Clone)]
pub struct OrderItemDraft {
    pub book_id: i64,
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Order as submitted by the storefront; the backend assigns id and status.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: i64,
    pub items: Vec<OrderItemDraft>,
}

/// Wire form of a submitted order. The total is derived from the lines at
/// submission time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewOrderResource {
    pub(crate) user_id: i64,
    pub(crate) items: Vec<OrderItemResource>,
    pub(crate) total: f64,
}

/// Pure resource↔entity mapping for orders.
pub mod assembler {
    use serde_json::Value;

    use super::{NewOrderResource, OrderDraft, OrderItemResource, OrderResource};
    use crate::error::ClientError;
    use crate::http::TransportResponse;
    use crate::models::{Order, OrderItem};
    use crate::services::envelope;

    pub fn to_entity(resource: OrderResource) -> Order {
        Order {
            id: resource.id,
            user_id: resource.user_id,
            items: resource
                .items
                .into_iter()
                .map(|item| OrderItem {
                    book_id: item.book_id,
                    title: item.title,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
            total: resource.total,
            status: resource.status.unwrap_or_default(),
            created_at: resource.created_at,
        }
    }

    pub(crate) fn to_resource(draft: &OrderDraft) -> NewOrderResource {
        let items: Vec<OrderItemResource> = draft
            .items
            .iter()
            .map(|item| OrderItemResource {
                book_id: item.book_id,
                title: item.title.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();
        let total = items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum();
        NewOrderResource {
            user_id: draft.user_id,
            items,
            total,
        }
    }

    pub fn entities_from_response(response: &TransportResponse) -> Result<Vec<Order>, ClientError> {
        match envelope::payload_of(response)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    let resource: OrderResource = serde_json::from_value(item)?;
                    Ok(to_entity(resource))
                })
                .collect::<Result<Vec<_>, ClientError>>(),
            single => {
                let resource: OrderResource = serde_json::from_value(single)?;
                Ok(vec![to_entity(resource)])
            }
        }
    }

    pub fn entity_from_response(response: &TransportResponse) -> Result<Order, ClientError> {
        let payload = envelope::payload_of(response)?;
        let resource: OrderResource = serde_json::from_value(payload)?;
        Ok(to_entity(resource))
    }
}

/// Orders endpoints of the commerce catalog. Takes the client configured with
/// the catalog base URL.
pub struct OrderApiService {
    http: Arc<ApiClient>,
}

impl OrderApiService {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>, ClientError> {
        let fetched = async {
            let response = self.http.get(endpoints::ORDERS).await?;
            assembler::entities_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error fetching orders", e))
    }

    /// Submit an order; returns the backend's record of it.
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order, ClientError> {
        let created = async {
            let resource = assembler::to_resource(draft);
            let response = self.http.post(endpoints::ORDERS, &resource).await?;
            assembler::entity_from_response(&response)
        }
        .await;
        created.map_err(|e| log_and_rethrow("Error creating order", e))
    }
}
