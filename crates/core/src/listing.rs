//! Filtering, sorting, and pagination for asset listings.
//!
//! Stores translate these into their own query language; the in-memory store
//! uses [`AssetFilter::matches`] and [`AssetSort::compare`] directly, so both
//! must agree with the SQL in the db crate. Case folding is ASCII-only to
//! match `LOWER`/`ILIKE` on the `COLLATE "C"` columns of `assets`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::asset_status::AssetStatus;

/// Default page size for asset listing.
pub const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for asset listing.
pub const MAX_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    /// Exact category match, ignoring ASCII case.
    pub category: Option<String>,
    /// Substring over tag, brand, model, and serial number, ignoring ASCII
    /// case.
    pub search: Option<String>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        if self.status.is_some_and(|s| s != asset.status) {
            return false;
        }
        if let Some(category) = &self.category {
            if !asset.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if let Some(needle) = self.search_term() {
            let needle = needle.to_ascii_lowercase();
            let hit = [
                Some(asset.asset_tag.as_str()),
                Some(asset.brand.as_str()),
                Some(asset.model.as_str()),
                asset.serial_number.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|haystack| haystack.to_ascii_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// The trimmed search term, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    AssetTag,
    Category,
    Brand,
    Model,
    Status,
    PurchaseDate,
    PurchaseCost,
    CreatedAt,
}

impl SortColumn {
    /// Column name in the `assets` table. Only ever one of these literals is
    /// interpolated into SQL.
    pub fn column_name(self) -> &'static str {
        match self {
            SortColumn::AssetTag => "asset_tag",
            SortColumn::Category => "category",
            SortColumn::Brand => "brand",
            SortColumn::Model => "model",
            SortColumn::Status => "status",
            SortColumn::PurchaseDate => "purchase_date",
            SortColumn::PurchaseCost => "purchase_cost_cents",
            SortColumn::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl AssetSort {
    /// Order by the chosen column, then by id ascending regardless of
    /// direction so pages are stable.
    pub fn compare(&self, a: &Asset, b: &Asset) -> Ordering {
        // Text columns compare byte-wise to match Postgres' "C" collation used
        // by the `assets` table.
        let primary = match self.column {
            SortColumn::AssetTag => a.asset_tag.cmp(&b.asset_tag),
            SortColumn::Category => a.category.cmp(&b.category),
            SortColumn::Brand => a.brand.cmp(&b.brand),
            SortColumn::Model => a.model.cmp(&b.model),
            SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
            SortColumn::PurchaseDate => a.purchase_date.cmp(&b.purchase_date),
            SortColumn::PurchaseCost => a.purchase_cost_cents.cmp(&b.purchase_cost_cents),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

/// A complete listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    pub filter: AssetFilter,
    pub sort: AssetSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AssetQuery {
    /// Page size, or `None` to return every match. Explicit limits are
    /// clamped to `[1, MAX_LIMIT]`.
    pub fn limit(&self) -> Option<i64> {
        self.limit.map(|limit| limit.clamp(1, MAX_LIMIT))
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}
