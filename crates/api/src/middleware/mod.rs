//! Request extractors.
//!
//! - [`actor::ActorScope`] -- Resolves the calling actor's tenant scope.

pub mod actor;
