//! Aggregate repositories built from the record store adapters.
//!
//! # Responsibility
//! - Expose aggregate-level add/get/list/remove contracts.
//! - Perform the relationship cleanup the store does not cascade.

pub mod student_repo;

use crate::model::RecordId;
use crate::session::StoreResult;

/// Aggregate-level persistence contract.
pub trait Repository<T> {
    /// Persists a new aggregate root and returns it with its identity.
    fn add(&self, entity: T) -> StoreResult<T>;
    fn get_by_id(&self, id: RecordId) -> Option<T>;
    fn find_all(&self) -> Vec<T>;
    /// Removes the root together with every dependent relationship row.
    fn remove(&self, entity: &mut T) -> StoreResult<()>;
}
