use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub uuid: Uuid,                        // assigned at creation, never reused
    pub login: String,                     // set once at creation
    pub name: Option<String>,
    pub email: Option<String>,
    pub external_login: String,            // stable id at the provider
    pub external_provider: String,         // e.g. "oidc"
    pub external_id: Option<String>,
    pub active: bool,
    #[serde(skip_serializing)]
    pub user_local: bool,                  // internal flag, not exposed in JSON
    #[serde(skip_serializing)]
    pub is_root: bool,
}

/// Group record; read-only from this service's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub uuid: Uuid,
    pub name: String,
}
