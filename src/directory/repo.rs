use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::directory::error::DirectoryError;
use crate::directory::groups::assign_default_groups;
use crate::directory::model::User;

/// Outcome of a successful create: the new uuid plus any default groups the
/// user could not be linked to (best-effort, surfaced for the caller to log).
#[derive(Debug)]
pub struct CreatedUser {
    pub uuid: Uuid,
    pub skipped_groups: Vec<String>,
}

/// Typed access to the user directory, constructed once at startup with the
/// connection pool and carried in the application state.
#[derive(Clone)]
pub struct DirectoryRepo {
    db: PgPool,
}

impl DirectoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    /// Find a user by its external identity. Returns the first matching row;
    /// absence is `Ok(None)`, never an error.
    pub async fn find_by_external_identity(
        &self,
        external_login: &str,
        provider: &str,
    ) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT uuid, login, name, email, external_login,
                   external_identity_provider AS external_provider,
                   external_id, active, user_local, is_root
            FROM users
            WHERE external_identity_provider = $1 AND external_login = $2
            LIMIT 1
            "#,
        )
        .bind(provider)
        .bind(external_login)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| DirectoryError::store(external_login, e))?;
        Ok(user)
    }

    /// Create a user with a fresh uuid, inactive and non-local. A duplicate
    /// external identity leaves zero rows affected under the unique index and
    /// yields `Conflict`. Group linking runs after the insert and never fails
    /// the create; unlinked groups come back in the outcome.
    pub async fn create_user(
        &self,
        login: &str,
        name: &str,
        email: &str,
        external_login: &str,
        provider: &str,
        default_groups: &[String],
    ) -> Result<CreatedUser, DirectoryError> {
        let uuid = Uuid::new_v4();
        let result = sqlx::query(
            r#"
            INSERT INTO users
                (uuid, login, name, email, external_login, external_identity_provider,
                 external_id, active, user_local, is_root)
            VALUES ($1, $2, $3, $4, $5, $6, $7, false, false, false)
            ON CONFLICT (external_identity_provider, external_login) DO NOTHING
            "#,
        )
        .bind(uuid)
        .bind(login)
        .bind(name)
        .bind(email)
        .bind(external_login)
        .bind(provider)
        .bind(external_login)
        .execute(&self.db)
        .await
        .map_err(|e| DirectoryError::store(login, e))?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::Conflict {
                login: login.to_string(),
            });
        }
        info!(%login, %provider, %uuid, "user created");

        let skipped_groups = assign_default_groups(&self.db, uuid, default_groups).await;
        Ok(CreatedUser {
            uuid,
            skipped_groups,
        })
    }

    /// Update name/email/login for the record keyed by (provider,
    /// external_login). Zero rows matched means the record does not exist.
    pub async fn update_user(
        &self,
        login: &str,
        name: &str,
        email: &str,
        external_login: &str,
        provider: &str,
    ) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, login = $3
            WHERE external_identity_provider = $4 AND external_login = $5
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(login)
        .bind(provider)
        .bind(external_login)
        .execute(&self.db)
        .await
        .map_err(|e| DirectoryError::store(login, e))?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound {
                login: login.to_string(),
            });
        }
        info!(%login, %provider, "user updated");
        Ok(())
    }

    /// Set the active flag. Matching zero rows is indistinguishable from the
    /// flag already holding the target value, and both report success; the
    /// row count is logged for operators.
    pub async fn set_active(
        &self,
        external_login: &str,
        provider: &str,
        active: bool,
    ) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET active = $1
            WHERE external_identity_provider = $2 AND external_login = $3
            "#,
        )
        .bind(active)
        .bind(provider)
        .bind(external_login)
        .execute(&self.db)
        .await
        .map_err(|e| DirectoryError::store(external_login, e))?;

        debug!(
            login = %external_login,
            %provider,
            %active,
            rows = result.rows_affected(),
            "active flag set"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_johndoe(repo: &DirectoryRepo) -> CreatedUser {
        repo.create_user(
            "johndoe",
            "John Doe",
            "john.doe@example.com",
            "johndoe",
            "oidc",
            &["users".to_string()],
        )
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn create_then_find_returns_the_record(pool: PgPool) {
        let repo = DirectoryRepo::new(pool);
        let created = create_johndoe(&repo).await;
        assert!(created.skipped_groups.is_empty());

        let user = repo
            .find_by_external_identity("johndoe", "oidc")
            .await
            .unwrap()
            .expect("created user should be findable");
        assert_eq!(user.uuid, created.uuid);
        assert_eq!(user.login, "johndoe");
        assert_eq!(user.name.as_deref(), Some("John Doe"));
        assert_eq!(user.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(user.external_provider, "oidc");
        assert!(!user.active);
        assert!(!user.user_local);
        assert!(!user.is_root);
    }

    #[sqlx::test]
    async fn find_miss_is_empty_not_an_error(pool: PgPool) {
        let repo = DirectoryRepo::new(pool);
        let user = repo
            .find_by_external_identity("nobody", "oidc")
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[sqlx::test]
    async fn duplicate_create_conflicts_and_keeps_first_record(pool: PgPool) {
        let repo = DirectoryRepo::new(pool);
        create_johndoe(&repo).await;

        let second = repo
            .create_user(
                "johndoe",
                "Someone Else",
                "someone.else@example.com",
                "johndoe",
                "oidc",
                &[],
            )
            .await;
        assert!(matches!(second, Err(DirectoryError::Conflict { .. })));

        let user = repo
            .find_by_external_identity("johndoe", "oidc")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("John Doe"));
        assert_eq!(user.email.as_deref(), Some("john.doe@example.com"));
    }

    #[sqlx::test]
    async fn update_miss_is_not_found(pool: PgPool) {
        let repo = DirectoryRepo::new(pool);
        let result = repo
            .update_user("ghost", "Ghost", "ghost@example.com", "ghost", "oidc")
            .await;
        assert!(matches!(result, Err(DirectoryError::NotFound { .. })));
    }

    #[sqlx::test]
    async fn update_then_find_reflects_new_attributes(pool: PgPool) {
        let repo = DirectoryRepo::new(pool);
        create_johndoe(&repo).await;

        repo.update_user(
            "johndoe",
            "Johnathan Doe",
            "johnathan.doe@example.com",
            "johndoe",
            "oidc",
        )
        .await
        .unwrap();

        let user = repo
            .find_by_external_identity("johndoe", "oidc")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Johnathan Doe"));
        assert_eq!(user.email.as_deref(), Some("johnathan.doe@example.com"));
    }

    #[sqlx::test]
    async fn active_flag_toggles_and_repeats_without_error(pool: PgPool) {
        let repo = DirectoryRepo::new(pool);
        create_johndoe(&repo).await;

        repo.set_active("johndoe", "oidc", true).await.unwrap();
        let user = repo
            .find_by_external_identity("johndoe", "oidc")
            .await
            .unwrap()
            .unwrap();
        assert!(user.active);

        // Already at target value: still ok.
        repo.set_active("johndoe", "oidc", true).await.unwrap();

        repo.set_active("johndoe", "oidc", false).await.unwrap();
        let user = repo
            .find_by_external_identity("johndoe", "oidc")
            .await
            .unwrap()
            .unwrap();
        assert!(!user.active);

        // Unknown login matches zero rows and also reports ok.
        repo.set_active("nobody", "oidc", true).await.unwrap();
    }

    #[sqlx::test]
    async fn unresolved_default_groups_come_back_skipped(pool: PgPool) {
        let repo = DirectoryRepo::new(pool);
        let created = repo
            .create_user(
                "johndoe",
                "John Doe",
                "john.doe@example.com",
                "johndoe",
                "oidc",
                &["users".to_string(), "no-such-group".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(created.skipped_groups, vec!["no-such-group".to_string()]);
    }
}
