//! Course entity and its enrolled-student memo cell.

use super::grade::Grade;
use super::student::{Student, StudentId};
use super::{validate_name, RecordId, ValidationError};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type CourseId = RecordId;

/// A course together with its enrolled student ids and grades.
///
/// # Invariants
/// - `enrolled_cache` is filled at most once per value and is never
///   refreshed by enrollment changes; only
///   [`Course::invalidate_enrolled_cache`] clears it.
/// - The cache is not part of equality and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub(crate) id: Option<CourseId>,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) student_ids: BTreeSet<StudentId>,
    #[serde(default)]
    pub(crate) grades: Vec<Grade>,
    #[serde(skip)]
    pub(crate) enrolled_cache: OnceCell<Vec<Student>>,
}

impl Course {
    /// Creates an unsaved course with nobody enrolled.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            student_ids: BTreeSet::new(),
            grades: Vec::new(),
            enrolled_cache: OnceCell::new(),
        }
    }

    pub fn id(&self) -> Option<CourseId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn student_ids(&self) -> &BTreeSet<StudentId> {
        &self.student_ids
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn has_student(&self, student_id: StudentId) -> bool {
        self.student_ids.contains(&student_id)
    }

    /// Returns the memoized enrolled-student list, if it was computed.
    pub fn cached_students(&self) -> Option<&[Student]> {
        self.enrolled_cache.get().map(Vec::as_slice)
    }

    /// Drops the memoized enrolled-student list.
    ///
    /// Nothing in this crate calls this automatically.
    pub fn invalidate_enrolled_cache(&mut self) {
        self.enrolled_cache.take();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Course {}
