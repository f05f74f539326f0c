//! Repository for the `directory_actors` table.

use assetdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::directory::DirectoryActorRow;

/// Column list for `directory_actors` queries.
const COLUMNS: &str = "actor_id, tenant_id, organization_id, is_active, created_at, updated_at";

pub struct DirectoryRepo;

impl DirectoryRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        actor_id: DbId,
    ) -> Result<Option<DirectoryActorRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM directory_actors WHERE actor_id = $1");
        sqlx::query_as::<_, DirectoryActorRow>(&query)
            .bind(actor_id)
            .fetch_optional(pool)
            .await
    }
}
