// src/services/clients.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::log_and_rethrow;
use crate::config::endpoints;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::Client;

/// Client record as the subscription backend transmits it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientResource {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields the caller supplies when creating or updating a client.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub user_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Pure resource↔entity mapping for clients.
pub mod assembler {
    use serde_json::Value;

    use super::ClientResource;
    use crate::error::ClientError;
    use crate::http::TransportResponse;
    use crate::models::Client;
    use crate::services::envelope;

    pub fn to_entity(resource: ClientResource) -> Client {
        Client {
            id: resource.id,
            user_id: resource.user_id,
            full_name: resource.full_name,
            email: resource.email,
            phone: resource.phone,
            created_at: resource.created_at,
        }
    }

    /// List endpoints answer with a bare array or an enveloped one; a single
    /// resource is promoted to a one-element list.
    pub fn entities_from_response(
        response: &TransportResponse,
    ) -> Result<Vec<Client>, ClientError> {
        match envelope::payload_of(response)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    let resource: ClientResource = serde_json::from_value(item)?;
                    Ok(to_entity(resource))
                })
                .collect::<Result<Vec<_>, ClientError>>(),
            single => {
                let resource: ClientResource = serde_json::from_value(single)?;
                Ok(vec![to_entity(resource)])
            }
        }
    }

    pub fn entity_from_response(response: &TransportResponse) -> Result<Client, ClientError> {
        let payload = envelope::payload_of(response)?;
        let resource: ClientResource = serde_json::from_value(payload)?;
        Ok(to_entity(resource))
    }
}

/// Clients endpoints of the subscription backend.
pub struct ClientService {
    http: Arc<ApiClient>,
}

impl ClientService {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    pub async fn get_all_clients(&self) -> Result<Vec<Client>, ClientError> {
        let fetched = async {
            let response = self.http.get(endpoints::CLIENTS).await?;
            assembler::entities_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error fetching clients", e))
    }

    pub async fn get_client_by_id(&self, id: i64) -> Result<Client, ClientError> {
        let fetched = async {
            let response = self.http.get(&endpoints::client_by_id(id)).await?;
            assembler::entity_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error getting client", e))
    }

    pub async fn get_clients_by_user(&self, user_id: i64) -> Result<Vec<Client>, ClientError> {
        let fetched = async {
            let response = self.http.get(&endpoints::clients_by_user(user_id)).await?;
            assembler::entities_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error getting user clients", e))
    }

    pub async fn create_client(&self, draft: &ClientDraft) -> Result<Client, ClientError> {
        let created = async {
            let response = self.http.post(endpoints::CLIENTS, draft).await?;
            assembler::entity_from_response(&response)
        }
        .await;
        created.map_err(|e| log_and_rethrow("Error creating client", e))
    }

    pub async fn update_client(&self, id: i64, draft: &ClientDraft) -> Result<Client, ClientError> {
        let updated = async {
            let response = self.http.put(&endpoints::client_by_id(id), draft).await?;
            assembler::entity_from_response(&response)
        }
        .await;
        updated.map_err(|e| log_and_rethrow("Error updating client", e))
    }

    /// Raw acknowledgement payload of the delete; callers decide what to read
    /// off it.
    pub async fn delete_client(&self, id: i64) -> Result<Value, ClientError> {
        let deleted = async {
            let response = self.http.delete(&endpoints::client_by_id(id)).await?;
            crate::services::envelope::body_value(&response)
        }
        .await;
        deleted.map_err(|e| log_and_rethrow("Error deleting client", e))
    }
}
