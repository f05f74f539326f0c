//! Rows of the `assets` table.

use assetdesk_core::asset::Asset;
use assetdesk_core::asset_status::AssetStatus;
use assetdesk_core::error::CoreError;
use assetdesk_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetRow {
    pub id: DbId,
    pub tenant_id: DbId,
    pub organization_id: Option<DbId>,
    pub asset_tag: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub configuration: Option<String>,
    pub purchase_date: NaiveDate,
    pub purchase_cost_cents: i64,
    pub vendor: Option<String>,
    pub site: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub classification: Option<String>,
    pub photo_url: Option<String>,
    pub status: String,
    pub assigned_to: Option<DbId>,
    pub is_deleted: bool,
    pub lock_version: i32,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Number of live assets in one status, from a `GROUP BY status` query.
#[derive(Debug, Clone, FromRow)]
pub struct StatusCountRow {
    pub status: String,
    pub count: i64,
}

/// Parse a `status` column. The CHECK constraint makes failure a data
/// corruption problem, not a user error.
pub fn parse_status(raw: &str) -> Result<AssetStatus, CoreError> {
    raw.parse()
        .map_err(|_| CoreError::Internal(format!("Unknown asset status in database: {raw}")))
}

impl TryFrom<AssetRow> for Asset {
    type Error = CoreError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        Ok(Asset {
            status: parse_status(&row.status)?,
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            asset_tag: row.asset_tag,
            category: row.category,
            brand: row.brand,
            model: row.model,
            serial_number: row.serial_number,
            description: row.description,
            configuration: row.configuration,
            purchase_date: row.purchase_date,
            purchase_cost_cents: row.purchase_cost_cents,
            vendor: row.vendor,
            site: row.site,
            location: row.location,
            department: row.department,
            classification: row.classification,
            photo_url: row.photo_url,
            assigned_to: row.assigned_to,
            is_deleted: row.is_deleted,
            lock_version: row.lock_version,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
