//! Postgres-backed [`AssetStore`] and [`Directory`].

use assetdesk_core::asset::{Asset, AssetFields, NewAsset};
use assetdesk_core::assignment::AssetAssignment;
use assetdesk_core::error::CoreError;
use assetdesk_core::listing::AssetQuery;
use assetdesk_core::scope::{Directory, DirectoryEntry, Scope};
use assetdesk_core::store::{AssetStore, LedgerWrite, LifecycleWrite, StatusCount, WriteOutcome};
use assetdesk_core::types::{ActorId, DbId};
use async_trait::async_trait;

use crate::error::map_db_error;
use crate::models::asset::parse_status;
use crate::repositories::{AssetRepo, AssignmentRepo, DirectoryRepo};
use crate::DbPool;

#[derive(Clone)]
pub struct PgAssetStore {
    pool: DbPool,
}

impl PgAssetStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn insert_asset(&self, asset: &NewAsset) -> Result<Asset, CoreError> {
        AssetRepo::create(&self.pool, asset)
            .await
            .map_err(map_db_error)?
            .try_into()
    }

    async fn find_asset(&self, id: DbId) -> Result<Option<Asset>, CoreError> {
        AssetRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Asset::try_from)
            .transpose()
    }

    async fn update_asset_fields(
        &self,
        id: DbId,
        fields: &AssetFields,
    ) -> Result<Option<Asset>, CoreError> {
        AssetRepo::update_fields(&self.pool, id, fields)
            .await
            .map_err(map_db_error)?
            .map(Asset::try_from)
            .transpose()
    }

    async fn list_assets(
        &self,
        scope: &Scope,
        query: &AssetQuery,
    ) -> Result<Vec<Asset>, CoreError> {
        AssetRepo::list(&self.pool, scope, query)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(Asset::try_from)
            .collect()
    }

    async fn count_by_status(&self, scope: &Scope) -> Result<Vec<StatusCount>, CoreError> {
        AssetRepo::count_by_status(&self.pool, scope)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|row| -> Result<StatusCount, CoreError> {
                Ok(StatusCount {
                    status: parse_status(&row.status)?,
                    count: row.count,
                })
            })
            .collect()
    }

    async fn find_open_assignment(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetAssignment>, CoreError> {
        let row = AssignmentRepo::find_open(&self.pool, asset_id)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(AssetAssignment::from))
    }

    async fn list_assignments(&self, asset_id: DbId) -> Result<Vec<AssetAssignment>, CoreError> {
        let rows = AssignmentRepo::list_for_asset(&self.pool, asset_id)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(AssetAssignment::from).collect())
    }

    /// Runs the conditional asset update and the ledger change in one
    /// transaction. Any early return drops the transaction, which rolls it
    /// back.
    async fn commit_lifecycle_write(
        &self,
        write: &LifecycleWrite,
    ) -> Result<WriteOutcome, CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let Some(row) = AssetRepo::apply_lifecycle(
            &mut *tx,
            write.asset_id,
            write.expected_status,
            write.expected_version,
            write.new_status,
            write.assigned_to,
            write.mark_deleted,
        )
        .await
        .map_err(map_db_error)?
        else {
            tracing::debug!(asset_id = write.asset_id, "Lifecycle write found a stale asset");
            return Ok(WriteOutcome::Stale);
        };

        match &write.ledger {
            LedgerWrite::None => {}
            LedgerWrite::Open(new) => {
                AssignmentRepo::open(&mut *tx, new)
                    .await
                    .map_err(map_db_error)?;
            }
            LedgerWrite::Close {
                assignment_id,
                returned_at,
                returned_by,
            } => {
                let closed = AssignmentRepo::close(
                    &mut *tx,
                    *assignment_id,
                    write.asset_id,
                    *returned_at,
                    *returned_by,
                )
                .await
                .map_err(map_db_error)?;
                if !closed {
                    return Ok(WriteOutcome::Stale);
                }
            }
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(WriteOutcome::Committed(row.try_into()?))
    }
}

/// Identity directory backed by the `directory_actors` table.
#[derive(Clone)]
pub struct PgDirectory {
    pool: DbPool,
}

impl PgDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn find_actor(&self, actor_id: ActorId) -> Result<Option<DirectoryEntry>, CoreError> {
        let row = DirectoryRepo::find_by_id(&self.pool, actor_id)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(DirectoryEntry::from))
    }
}
