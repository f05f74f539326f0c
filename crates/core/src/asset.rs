//! Asset records and the descriptive field set callers create and edit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::asset_status::AssetStatus;
use crate::error::CoreError;
use crate::scope::Scope;
use crate::types::{ActorId, DbId, OrganizationId, TenantId, Timestamp};

/// A registered asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub tenant_id: TenantId,
    pub organization_id: Option<OrganizationId>,
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
    /// Opaque reference into the blob store; never interpreted here.
    pub photo_url: Option<String>,
    pub status: AssetStatus,
    /// Mirrors the holder of the open assignment, if any.
    pub assigned_to: Option<ActorId>,
    pub is_deleted: bool,
    /// Bumped by every lifecycle write; lifecycle writes are conditioned on it.
    pub lock_version: i32,
    pub created_by: Option<ActorId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    /// Overwrite every descriptive field present in `fields`.
    pub fn apply_fields(&mut self, fields: &AssetFields) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.trim().to_string();
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                *target = Some(v.clone());
            }
        }

        set(&mut self.asset_tag, &fields.asset_tag);
        set(&mut self.category, &fields.category);
        set(&mut self.brand, &fields.brand);
        set(&mut self.model, &fields.model);
        set_opt(&mut self.serial_number, &fields.serial_number);
        set_opt(&mut self.description, &fields.description);
        set_opt(&mut self.configuration, &fields.configuration);
        if let Some(date) = fields.purchase_date {
            self.purchase_date = date;
        }
        if let Some(cost) = fields.purchase_cost_cents {
            self.purchase_cost_cents = cost;
        }
        set_opt(&mut self.vendor, &fields.vendor);
        set_opt(&mut self.site, &fields.site);
        set_opt(&mut self.location, &fields.location);
        set_opt(&mut self.department, &fields.department);
        set_opt(&mut self.classification, &fields.classification);
        set_opt(&mut self.photo_url, &fields.photo_url);
    }
}

/// Descriptive asset fields as supplied by a caller.
///
/// Used for both creation (required fields must be present) and partial
/// updates (absent fields are left unchanged). Lifecycle fields are not part
/// of this set: status and holder only change through the transition engine,
/// and a payload naming them is rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AssetFields {
    #[validate(length(min = 1, max = 64, message = "asset_tag must be 1-64 characters"))]
    pub asset_tag: Option<String>,
    #[validate(length(min = 1, max = 100, message = "category must be 1-100 characters"))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 100, message = "brand must be 1-100 characters"))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 100, message = "model must be 1-100 characters"))]
    pub model: Option<String>,
    #[validate(length(max = 100, message = "serial_number must be at most 100 characters"))]
    pub serial_number: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 2000, message = "configuration must be at most 2000 characters"))]
    pub configuration: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "purchase_cost_cents must not be negative"))]
    pub purchase_cost_cents: Option<i64>,
    #[validate(length(max = 200))]
    pub vendor: Option<String>,
    #[validate(length(max = 200))]
    pub site: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 200))]
    pub department: Option<String>,
    #[validate(length(max = 200))]
    pub classification: Option<String>,
    pub photo_url: Option<String>,
}

impl AssetFields {
    /// Validate whatever fields are present.
    pub fn validate_present(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;

        let required_text = [
            ("asset_tag", &self.asset_tag),
            ("category", &self.category),
            ("brand", &self.brand),
            ("model", &self.model),
        ];
        for (name, value) in required_text {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(CoreError::Validation(format!("{name} must not be blank")));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.asset_tag.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.model.is_none()
            && self.serial_number.is_none()
            && self.description.is_none()
            && self.configuration.is_none()
            && self.purchase_date.is_none()
            && self.purchase_cost_cents.is_none()
            && self.vendor.is_none()
            && self.site.is_none()
            && self.location.is_none()
            && self.department.is_none()
            && self.classification.is_none()
            && self.photo_url.is_none()
    }
}

/// A fully validated asset ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub tenant_id: TenantId,
    pub organization_id: Option<OrganizationId>,
    pub created_by: ActorId,
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
}

impl NewAsset {
    /// Validate creation input and bind it to the caller's scope.
    pub fn from_fields(scope: &Scope, fields: AssetFields) -> Result<Self, CoreError> {
        fields.validate_present()?;

        fn required<T>(name: &str, value: Option<T>) -> Result<T, CoreError> {
            value.ok_or_else(|| CoreError::Validation(format!("{name} is required")))
        }

        Ok(Self {
            tenant_id: scope.tenant_id,
            organization_id: scope.organization_id,
            created_by: scope.actor_id,
            asset_tag: required("asset_tag", fields.asset_tag)?.trim().to_string(),
            category: required("category", fields.category)?.trim().to_string(),
            brand: required("brand", fields.brand)?.trim().to_string(),
            model: required("model", fields.model)?.trim().to_string(),
            purchase_date: required("purchase_date", fields.purchase_date)?,
            purchase_cost_cents: required("purchase_cost_cents", fields.purchase_cost_cents)?,
            serial_number: fields.serial_number,
            description: fields.description,
            configuration: fields.configuration,
            vendor: fields.vendor,
            site: fields.site,
            location: fields.location,
            department: fields.department,
            classification: fields.classification,
            photo_url: fields.photo_url,
        })
    }
}
