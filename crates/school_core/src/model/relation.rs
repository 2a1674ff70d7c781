//! Two-sided relationship updates.
//!
//! Every mutation of a Student↔Course or Student/Course→Grade link goes
//! through this module so both sides change together. Callers are expected
//! to have persisted the matching rows in the same transaction first.

use super::course::{Course, CourseId};
use super::grade::Grade;
use super::student::{Student, StudentId};
use std::collections::BTreeSet;
use std::mem;

/// Links student and course on both sides.
///
/// Returns `false` without touching either side when the course already
/// lists the student or when one of them has no identity yet.
pub(crate) fn enroll(student: &mut Student, course: &mut Course) -> bool {
    let (Some(student_id), Some(course_id)) = (student.id, course.id) else {
        return false;
    };
    if course.student_ids.contains(&student_id) {
        return false;
    }
    course.student_ids.insert(student_id);
    student.course_ids.insert(course_id);
    true
}

/// Adds a persisted grade to the grade lists of its student and course.
pub(crate) fn attach_grade(grade: &Grade, student: &mut Student, course: &mut Course) {
    debug_assert_eq!(student.id, Some(grade.student_id));
    debug_assert_eq!(course.id, Some(grade.course_id));
    push_unique(&mut student.grades, grade);
    push_unique(&mut course.grades, grade);
}

/// Empties a student's enrollment set and grade list, handing both back.
pub(crate) fn detach_student(student: &mut Student) -> (BTreeSet<CourseId>, Vec<Grade>) {
    (
        mem::take(&mut student.course_ids),
        mem::take(&mut student.grades),
    )
}

/// Empties a course's enrollment set and grade list, handing both back.
pub(crate) fn detach_course(course: &mut Course) -> (BTreeSet<StudentId>, Vec<Grade>) {
    (
        mem::take(&mut course.student_ids),
        mem::take(&mut course.grades),
    )
}

fn push_unique(grades: &mut Vec<Grade>, grade: &Grade) {
    let already_attached = grade.id.is_some() && grades.iter().any(|held| held.id == grade.id);
    if !already_attached {
        grades.push(grade.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{attach_grade, detach_student, enroll};
    use crate::model::course::Course;
    use crate::model::grade::Grade;
    use crate::model::student::Student;

    fn persisted_pair() -> (Student, Course) {
        let mut student = Student::new("Kasia", "Kowalska", 700124);
        student.id = Some(3);
        let mut course = Course::new("MOWNIT");
        course.id = Some(5);
        (student, course)
    }

    #[test]
    fn enroll_updates_both_sides_once() {
        let (mut student, mut course) = persisted_pair();

        assert!(enroll(&mut student, &mut course));
        assert!(course.has_student(3));
        assert!(student.is_enrolled_in(5));

        assert!(!enroll(&mut student, &mut course));
        assert_eq!(course.student_ids().len(), 1);
        assert_eq!(student.course_ids().len(), 1);
    }

    #[test]
    fn enroll_refuses_unsaved_entities() {
        let mut student = Student::new("Jan", "Nowak", 1);
        let mut course = Course::new("TO");
        assert!(!enroll(&mut student, &mut course));
        assert!(course.student_ids().is_empty());
        assert!(student.course_ids().is_empty());
    }

    #[test]
    fn attach_grade_is_idempotent_per_grade_id() {
        let (mut student, mut course) = persisted_pair();
        let mut grade = Grade::new(3, 5, 4.5);
        grade.id = Some(11);

        attach_grade(&grade, &mut student, &mut course);
        attach_grade(&grade, &mut student, &mut course);

        assert_eq!(student.grades().len(), 1);
        assert_eq!(course.grades().len(), 1);
    }

    #[test]
    fn detach_student_clears_and_returns_links() {
        let (mut student, mut course) = persisted_pair();
        enroll(&mut student, &mut course);
        let mut grade = Grade::new(3, 5, 3.0);
        grade.id = Some(1);
        attach_grade(&grade, &mut student, &mut course);

        let (courses, grades) = detach_student(&mut student);

        assert!(courses.contains(&5));
        assert_eq!(grades.len(), 1);
        assert!(student.course_ids().is_empty());
        assert!(student.grades().is_empty());
    }
}
