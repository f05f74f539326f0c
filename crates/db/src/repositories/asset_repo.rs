//! Repository for the `assets` table.

use assetdesk_core::asset::{AssetFields, NewAsset};
use assetdesk_core::asset_status::AssetStatus;
use assetdesk_core::listing::AssetQuery;
use assetdesk_core::scope::Scope;
use assetdesk_core::types::{ActorId, DbId};
use sqlx::{PgConnection, PgPool};

use crate::models::asset::{AssetRow, StatusCountRow};

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, tenant_id, organization_id, asset_tag, category, brand, model, \
    serial_number, description, configuration, purchase_date, purchase_cost_cents, \
    vendor, site, location, department, classification, photo_url, \
    status, assigned_to, is_deleted, lock_version, created_by, created_at, updated_at";

/// Visibility predicate shared by listing queries. `$1` is the tenant and
/// `$2` the organization (NULL for tenant-wide scopes).
const SCOPE_PREDICATE: &str =
    "tenant_id = $1 AND ($2::BIGINT IS NULL OR organization_id = $2) AND NOT is_deleted";

/// Escape `%`, `_`, and `\` so user input matches literally inside `ILIKE`.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}

pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset. Status starts as `available`.
    pub async fn create(pool: &PgPool, input: &NewAsset) -> Result<AssetRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (\
                tenant_id, organization_id, asset_tag, category, brand, model, \
                serial_number, description, configuration, purchase_date, purchase_cost_cents, \
                vendor, site, location, department, classification, photo_url, created_by\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(input.tenant_id)
            .bind(input.organization_id)
            .bind(&input.asset_tag)
            .bind(&input.category)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(&input.description)
            .bind(&input.configuration)
            .bind(input.purchase_date)
            .bind(input.purchase_cost_cents)
            .bind(&input.vendor)
            .bind(&input.site)
            .bind(&input.location)
            .bind(&input.department)
            .bind(&input.classification)
            .bind(&input.photo_url)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID, including soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update descriptive fields. Only non-`None` fields in `input` are
    /// applied; status, holder, and lock version are left alone.
    ///
    /// Returns `None` if the asset is missing or soft-deleted.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        input: &AssetFields,
    ) -> Result<Option<AssetRow>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                asset_tag = COALESCE($2, asset_tag), \
                category = COALESCE($3, category), \
                brand = COALESCE($4, brand), \
                model = COALESCE($5, model), \
                serial_number = COALESCE($6, serial_number), \
                description = COALESCE($7, description), \
                configuration = COALESCE($8, configuration), \
                purchase_date = COALESCE($9, purchase_date), \
                purchase_cost_cents = COALESCE($10, purchase_cost_cents), \
                vendor = COALESCE($11, vendor), \
                site = COALESCE($12, site), \
                location = COALESCE($13, location), \
                department = COALESCE($14, department), \
                classification = COALESCE($15, classification), \
                photo_url = COALESCE($16, photo_url), \
                updated_at = NOW() \
             WHERE id = $1 AND NOT is_deleted \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(id)
            .bind(trimmed(&input.asset_tag))
            .bind(trimmed(&input.category))
            .bind(trimmed(&input.brand))
            .bind(trimmed(&input.model))
            .bind(&input.serial_number)
            .bind(&input.description)
            .bind(&input.configuration)
            .bind(input.purchase_date)
            .bind(input.purchase_cost_cents)
            .bind(&input.vendor)
            .bind(&input.site)
            .bind(&input.location)
            .bind(&input.department)
            .bind(&input.classification)
            .bind(&input.photo_url)
            .fetch_optional(pool)
            .await
    }

    /// Live assets visible to `scope`, filtered and sorted. Without a limit
    /// every match is returned.
    ///
    /// Ties on the sort column are broken by `id ASC` so pages are stable.
    pub async fn list(
        pool: &PgPool,
        scope: &Scope,
        params: &AssetQuery,
    ) -> Result<Vec<AssetRow>, sqlx::Error> {
        let mut conditions = vec![SCOPE_PREDICATE.to_string()];
        let mut bind_idx = 3u32;

        let status = params.filter.status.map(AssetStatus::as_str);
        if status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        let category = params
            .filter
            .category
            .as_deref()
            .map(|c| c.trim().to_ascii_lowercase());
        if category.is_some() {
            conditions.push(format!("LOWER(category) = ${bind_idx}"));
            bind_idx += 1;
        }
        let search = params.filter.search_term().map(like_pattern);
        if search.is_some() {
            conditions.push(format!(
                "(asset_tag ILIKE ${bind_idx} OR brand ILIKE ${bind_idx} \
                 OR model ILIKE ${bind_idx} OR serial_number ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }

        let limit = params.limit();
        let limit_clause = if limit.is_some() {
            let clause = format!("LIMIT ${bind_idx} ");
            bind_idx += 1;
            clause
        } else {
            String::new()
        };

        let query = format!(
            "SELECT {COLUMNS} FROM assets \
             WHERE {} \
             ORDER BY {} {}, id ASC \
             {limit_clause}OFFSET ${bind_idx}",
            conditions.join(" AND "),
            params.sort.column.column_name(),
            params.sort.direction.keyword(),
        );

        let mut q = sqlx::query_as::<_, AssetRow>(&query)
            .bind(scope.tenant_id)
            .bind(scope.organization_id);
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(category) = category {
            q = q.bind(category);
        }
        if let Some(search) = search {
            q = q.bind(search);
        }
        if let Some(limit) = limit {
            q = q.bind(limit);
        }
        q.bind(params.offset()).fetch_all(pool).await
    }

    /// Live asset counts per status visible to `scope`. Statuses with no
    /// assets are omitted.
    pub async fn count_by_status(
        pool: &PgPool,
        scope: &Scope,
    ) -> Result<Vec<StatusCountRow>, sqlx::Error> {
        let query = format!(
            "SELECT status, COUNT(*) AS count FROM assets \
             WHERE {SCOPE_PREDICATE} \
             GROUP BY status"
        );
        sqlx::query_as::<_, StatusCountRow>(&query)
            .bind(scope.tenant_id)
            .bind(scope.organization_id)
            .fetch_all(pool)
            .await
    }

    /// Conditionally apply a lifecycle change inside the caller's transaction.
    ///
    /// The row is only touched if it is live and still carries
    /// `expected_status` and `expected_version`; `lock_version` is bumped on
    /// success. Returns `None` when the condition did not hold.
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_lifecycle(
        conn: &mut PgConnection,
        id: DbId,
        expected_status: AssetStatus,
        expected_version: i32,
        new_status: AssetStatus,
        assigned_to: Option<ActorId>,
        mark_deleted: bool,
    ) -> Result<Option<AssetRow>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                status = $4, \
                assigned_to = $5, \
                is_deleted = $6, \
                lock_version = lock_version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND status = $2 AND lock_version = $3 AND NOT is_deleted \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(id)
            .bind(expected_status.as_str())
            .bind(expected_version)
            .bind(new_status.as_str())
            .bind(assigned_to)
            .bind(mark_deleted)
            .fetch_optional(conn)
            .await
    }
}
