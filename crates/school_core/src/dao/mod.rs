//! Record store adapters.
//!
//! # Responsibility
//! - Translate entity-level find/save/remove into SQL on the session.
//! - Provide the unique-key finders and the ordered student listing.
//!
//! # Invariants
//! - Read paths soft-fail: store errors become `None` or an empty `Vec`
//!   and are logged at `warn`.
//! - Write paths return `StoreResult` so callers may inspect the kind.
//! - The store never cascades; callers remove dependent rows first.

pub mod course_dao;
pub mod generic_dao;
pub mod grade_dao;
pub mod student_dao;
