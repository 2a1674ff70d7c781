//! Grade entity.

use super::course::CourseId;
use super::student::StudentId;
use super::RecordId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub type GradeId = RecordId;

/// One numeric grade given to one student in one course.
///
/// Both references are mandatory: a grade can only be built from the ids of
/// an already persisted student and course. The value is not range-checked;
/// NaN and infinities are stored as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub(crate) id: Option<GradeId>,
    pub(crate) value: f32,
    pub(crate) student_id: StudentId,
    pub(crate) course_id: CourseId,
}

impl Grade {
    pub fn new(student_id: StudentId, course_id: CourseId, value: f32) -> Self {
        Self {
            id: None,
            value,
            student_id,
            course_id,
        }
    }

    pub fn id(&self) -> Option<GradeId> {
        self.id
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }
}

// Total ordering keeps equality reflexive even for NaN values.
impl PartialEq for Grade {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.student_id == other.student_id
            && self.course_id == other.course_id
            && self.value.total_cmp(&other.value) == Ordering::Equal
    }
}

impl Eq for Grade {}
