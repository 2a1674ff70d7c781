//! Student entity.

use super::course::CourseId;
use super::grade::Grade;
use super::{validate_name, RecordId, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type StudentId = RecordId;

/// University-wide student number; unique across all students.
pub type IndexNumber = u32;

/// A student together with its grades and enrolled course ids.
///
/// Equality looks at identity and scalar columns only, so a student loaded
/// again from the store equals the value it was created from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub(crate) id: Option<StudentId>,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) index_number: IndexNumber,
    #[serde(default)]
    pub(crate) grades: Vec<Grade>,
    #[serde(default)]
    pub(crate) course_ids: BTreeSet<CourseId>,
}

impl Student {
    /// Creates an unsaved student with no grades and no enrollments.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        index_number: IndexNumber,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            index_number,
            grades: Vec::new(),
            course_ids: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> Option<StudentId> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// `"{first_name} {last_name}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn index_number(&self) -> IndexNumber {
        self.index_number
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn course_ids(&self) -> &BTreeSet<CourseId> {
        &self.course_ids
    }

    pub fn is_enrolled_in(&self, course_id: CourseId) -> bool {
        self.course_ids.contains(&course_id)
    }

    /// Grades this student holds in one course, in attachment order.
    pub fn grades_in(&self, course_id: CourseId) -> impl Iterator<Item = &Grade> {
        self.grades
            .iter()
            .filter(move |grade| grade.course_id() == course_id)
    }

    /// Checks column constraints before the student is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;
        if self.index_number == 0 {
            return Err(ValidationError::ZeroIndexNumber);
        }
        Ok(())
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.index_number == other.index_number
            && self.first_name == other.first_name
            && self.last_name == other.last_name
    }
}

impl Eq for Student {}

#[cfg(test)]
mod tests {
    use super::Student;
    use crate::model::ValidationError;

    #[test]
    fn full_name_joins_first_and_last() {
        let student = Student::new("Kasia", "Kowalska", 1);
        assert_eq!(student.full_name(), "Kasia Kowalska");
    }

    #[test]
    fn new_student_is_unsaved_and_unlinked() {
        let student = Student::new("Adam", "Kowalski", 100122);
        assert_eq!(student.id(), None);
        assert!(student.grades().is_empty());
        assert!(student.course_ids().is_empty());
    }

    #[test]
    fn equality_ignores_relationship_sets() {
        let plain = Student::new("Jan", "Nowak", 100123);
        let mut enrolled = plain.clone();
        enrolled.course_ids.insert(7);
        assert_eq!(plain, enrolled);

        let mut other_index = plain.clone();
        other_index.index_number = 100124;
        assert_ne!(plain, other_index);
    }

    #[test]
    fn validate_rejects_zero_index_number() {
        let student = Student::new("Piotr", "Budynek", 0);
        assert_eq!(student.validate(), Err(ValidationError::ZeroIndexNumber));
    }
}
