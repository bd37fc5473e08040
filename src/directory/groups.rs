use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::directory::model::Group;

/// Links a freshly created user to the configured default groups.
///
/// Each name is resolved against `groups` with an exact, case-sensitive
/// lookup; resolved ids get a `groups_users` row. Names that do not resolve
/// and inserts that fail are skipped, never failures: the returned list names
/// the groups the user did NOT end up in, for the caller to surface.
pub async fn assign_default_groups(
    db: &PgPool,
    user_uuid: Uuid,
    default_groups: &[String],
) -> Vec<String> {
    let mut skipped = Vec::new();
    for name in default_groups {
        match resolve_group(db, name).await {
            Ok(Some(group)) => {
                if let Err(e) = link_user_to_group(db, user_uuid, group.uuid).await {
                    warn!(error = %e, group = %group.name, %user_uuid, "group link failed");
                    skipped.push(name.clone());
                } else {
                    debug!(group = %group.name, group_uuid = %group.uuid, %user_uuid, "group linked");
                }
            }
            Ok(None) => {
                warn!(group = %name, "default group not found, skipping");
                skipped.push(name.clone());
            }
            Err(e) => {
                warn!(error = %e, group = %name, "group lookup failed, skipping");
                skipped.push(name.clone());
            }
        }
    }
    skipped
}

async fn resolve_group(db: &PgPool, name: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT uuid, name
        FROM groups
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await
}

async fn link_user_to_group(
    db: &PgPool,
    user_uuid: Uuid,
    group_uuid: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO groups_users (group_uuid, user_uuid)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(group_uuid)
    .bind(user_uuid)
    .execute(db)
    .await?;
    Ok(())
}
