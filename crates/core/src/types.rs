/// Asset, assignment, and directory primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Tenants and organizations are owned by the identity directory; the core
/// only ever sees their numeric ids.
pub type TenantId = DbId;
pub type OrganizationId = DbId;

/// Actors (operators) and holders (people an asset is issued to) share the
/// directory's id space.
pub type ActorId = DbId;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
