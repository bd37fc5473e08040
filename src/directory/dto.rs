use serde::{Deserialize, Serialize};

/// Query string for GET /user.
#[derive(Debug, Deserialize)]
pub struct FindUserQuery {
    pub login: String,
    pub provider: Option<String>,
}

/// Form body for POST /user/update.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub login: String,
}

/// Form body for POST /user/create.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub login: String,
    pub name: String,
    pub email: String,
    pub provider: Option<String>,
}

/// Form body for POST /user/activate and /user/deactivate.
#[derive(Debug, Deserialize)]
pub struct ActiveStatusRequest {
    pub login: String,
    pub provider: Option<String>,
}

/// Response body for successful writes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_serializes_as_ok() {
        let json = serde_json::to_string(&StatusResponse::ok()).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }

    #[test]
    fn find_query_provider_is_optional() {
        let q: FindUserQuery = serde_json::from_str(r#"{"login":"johndoe"}"#).unwrap();
        assert_eq!(q.login, "johndoe");
        assert!(q.provider.is_none());
    }
}
