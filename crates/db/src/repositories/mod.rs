//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a transaction's `&mut PgConnection`) as the first
//! argument.

pub mod asset_repo;
pub mod assignment_repo;
pub mod directory_repo;

pub use asset_repo::AssetRepo;
pub use assignment_repo::AssignmentRepo;
pub use directory_repo::DirectoryRepo;
