use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error type for directory operations.
///
/// A find miss is not an error (the repository returns `Ok(None)`); `NotFound`
/// here means an update targeted a record that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Update matched no record for the (provider, external_login) key.
    #[error("no directory record for {login}")]
    NotFound { login: String },

    /// Duplicate external identity on create.
    #[error("external identity already registered for {login}")]
    Conflict { login: String },

    /// Manual update blocked while the provider owns identity attributes.
    #[error("manual update not allowed: provider owns identity attributes")]
    PolicyDenied,

    /// Store-level failure, wrapped with the offending login.
    #[error("store error for {login}")]
    Store {
        login: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DirectoryError {
    pub fn store(login: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Store {
            login: login.into(),
            source,
        }
    }
}

/// Fixed status mapping; raw store errors never reach the caller.
impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match self {
            DirectoryError::PolicyDenied => StatusCode::METHOD_NOT_ALLOWED,
            DirectoryError::NotFound { .. }
            | DirectoryError::Conflict { .. }
            | DirectoryError::Store { .. } => StatusCode::BAD_REQUEST,
        };
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_denied_maps_to_405() {
        let res = DirectoryError::PolicyDenied.into_response();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn write_failures_map_to_400() {
        let not_found = DirectoryError::NotFound {
            login: "johndoe".into(),
        };
        assert_eq!(not_found.into_response().status(), StatusCode::BAD_REQUEST);

        let conflict = DirectoryError::Conflict {
            login: "johndoe".into(),
        };
        assert_eq!(conflict.into_response().status(), StatusCode::BAD_REQUEST);

        let store = DirectoryError::store("johndoe", sqlx::Error::PoolClosed);
        assert_eq!(store.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_error_message_names_the_login() {
        let err = DirectoryError::store("johndoe", sqlx::Error::PoolClosed);
        assert_eq!(err.to_string(), "store error for johndoe");
    }
}
