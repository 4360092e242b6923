// src/services/users.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clients::ClientResource;
use super::log_and_rethrow;
use crate::config::endpoints;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{PlanType, User};

/// User as the subscription backend transmits it. Every field except the
/// identity ones is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserResource {
    pub id: i64,
    pub nickname: String,
    pub username: String,
    pub email: String,
    pub phrase: Option<String>,
    pub avatar_url: Option<String>,
    pub plan_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub clients: Option<Vec<ClientResource>>,
}

/// Editable fields sent on update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResource {
    pub nickname: String,
    pub username: String,
    pub email: String,
    pub phrase: Option<String>,
    pub avatar_url: Option<String>,
    pub plan_type: PlanType,
}

/// Data collected for a new registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub nickname: String,
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub phrase: Option<String>,
    pub avatar_url: Option<String>,
    pub plan_type: Option<PlanType>,
}

/// Borrowed wire form of [`NewAccount`]; the secret is exposed only here, at
/// the request boundary.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterResource<'a> {
    pub(crate) nickname: &'a str,
    pub(crate) username: &'a str,
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
    pub(crate) phrase: Option<&'a str>,
    pub(crate) avatar_url: Option<&'a str>,
    pub(crate) plan_type: PlanType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Pure resource↔entity mapping for users.
pub mod assembler {
    use serde_json::Value;

    use super::{NewAccount, RegisterResource, UpdateUserResource, UserResource};
    use crate::error::ClientError;
    use crate::http::TransportResponse;
    use crate::models::{PlanType, User};
    use crate::services::{clients, envelope};
    use secrecy::ExposeSecret;

    pub fn to_entity(resource: UserResource) -> User {
        User {
            id: resource.id,
            nickname: resource.nickname,
            username: resource.username,
            email: resource.email,
            phrase: resource.phrase,
            avatar_url: resource.avatar_url,
            plan_type: resource
                .plan_type
                .as_deref()
                .map(PlanType::from_wire)
                .unwrap_or_default(),
            created_at: resource.created_at,
            is_active: resource.is_active.unwrap_or(true),
            clients: resource
                .clients
                .unwrap_or_default()
                .into_iter()
                .map(clients::assembler::to_entity)
                .collect(),
        }
    }

    /// List endpoints answer with a bare array or an enveloped one; a single
    /// resource is promoted to a one-element list.
    pub fn entities_from_response(response: &TransportResponse) -> Result<Vec<User>, ClientError> {
        match envelope::payload_of(response)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    let resource: UserResource = serde_json::from_value(item)?;
                    Ok(to_entity(resource))
                })
                .collect::<Result<Vec<_>, ClientError>>(),
            single => {
                let resource: UserResource = serde_json::from_value(single)?;
                Ok(vec![to_entity(resource)])
            }
        }
    }

    pub fn entity_from_response(response: &TransportResponse) -> Result<User, ClientError> {
        let payload = envelope::payload_of(response)?;
        let resource: UserResource = serde_json::from_value(payload)?;
        Ok(to_entity(resource))
    }

    pub fn to_update_resource(user: &User) -> UpdateUserResource {
        UpdateUserResource {
            nickname: user.nickname.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phrase: user.phrase.clone(),
            avatar_url: user.avatar_url.clone(),
            plan_type: user.plan_type,
        }
    }

    pub(crate) fn to_register_resource(account: &NewAccount) -> RegisterResource<'_> {
        RegisterResource {
            nickname: &account.nickname,
            username: &account.username,
            email: &account.email,
            password: account.password.expose_secret(),
            phrase: account.phrase.as_deref(),
            avatar_url: account.avatar_url.as_deref(),
            plan_type: account.plan_type.unwrap_or_default(),
        }
    }
}

/// Users endpoints of the subscription backend.
pub struct UserApiService {
    http: Arc<ApiClient>,
}

impl UserApiService {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    /// All users. Requires an authenticated session.
    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        let fetched = async {
            let response = self.http.get(endpoints::USERS).await?;
            assembler::entities_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error fetching users", e))
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, ClientError> {
        let fetched = async {
            let response = self.http.get(&endpoints::user_by_id(id)).await?;
            assembler::entity_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error getting user", e))
    }

    /// Profile of the user owning the current session token.
    pub async fn get_current_user_profile(&self) -> Result<User, ClientError> {
        let fetched = async {
            let response = self.http.get(endpoints::USER_PROFILE).await?;
            assembler::entity_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error getting current user profile", e))
    }

    pub async fn update_user(&self, id: i64, user: &User) -> Result<User, ClientError> {
        let updated = async {
            let resource = assembler::to_update_resource(user);
            let response = self.http.put(&endpoints::user_by_id(id), &resource).await?;
            assembler::entity_from_response(&response)
        }
        .await;
        updated.map_err(|e| log_and_rethrow("Error updating user", e))
    }

    /// Soft delete. Returns the raw acknowledgement payload.
    pub async fn delete_user(&self, id: i64) -> Result<Value, ClientError> {
        let deleted = async {
            let response = self.http.delete(&endpoints::user_by_id(id)).await?;
            crate::services::envelope::body_value(&response)
        }
        .await;
        deleted.map_err(|e| log_and_rethrow("Error deleting user", e))
    }

    pub async fn change_password(
        &self,
        id: i64,
        current_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<Value, ClientError> {
        let changed = async {
            let request = ChangePasswordRequest {
                current_password: current_password.expose_secret(),
                new_password: new_password.expose_secret(),
            };
            let response = self
                .http
                .post(&endpoints::change_password(id), &request)
                .await?;
            crate::services::envelope::body_value(&response)
        }
        .await;
        changed.map_err(|e| log_and_rethrow("Error changing password", e))
    }
}
