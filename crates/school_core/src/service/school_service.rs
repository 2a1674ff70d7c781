//! School use-case service.
//!
//! # Responsibility
//! - Enroll, grade and remove students as single units of work.
//! - Build per-course and per-student grade reports.
//! - Serve the memoized enrolled-student list of a course.
//!
//! # Invariants
//! - Both sides of a relationship change in the same unit of work that
//!   persists it, and only after the persisting statement succeeded.
//! - Reports are keyed by derived names; equal names collide.

use crate::dao::course_dao::CourseDao;
use crate::dao::generic_dao::{Entity, GenericDao};
use crate::dao::grade_dao::GradeDao;
use crate::dao::student_dao::StudentDao;
use crate::model::course::{Course, CourseId};
use crate::model::grade::Grade;
use crate::model::relation;
use crate::model::student::{IndexNumber, Student};
use crate::repo::student_repo::StudentRepository;
use crate::repo::Repository;
use crate::session::{SessionService, StoreResult};
use log::{info, warn};
use std::collections::BTreeMap;

/// Full name -> ascending grade values in one course.
pub type GradeReport = BTreeMap<String, Vec<f32>>;

/// Course name -> mean grade of one student in that course.
pub type StudentReport = BTreeMap<String, f32>;

/// Relationship and aggregate operations over one session.
pub struct SchoolService<'s> {
    session: &'s SessionService,
    student_dao: StudentDao<'s>,
    course_dao: CourseDao<'s>,
    grade_dao: GradeDao<'s>,
    student_repository: StudentRepository<'s>,
}

impl<'s> SchoolService<'s> {
    pub fn new(session: &'s SessionService) -> Self {
        Self {
            session,
            student_dao: StudentDao::new(session),
            course_dao: CourseDao::new(session),
            grade_dao: GradeDao::new(session),
            student_repository: StudentRepository::new(session),
        }
    }

    /// Enrolls `student` in `course`.
    ///
    /// Returns `Ok(false)` and changes nothing when the course already lists
    /// the student; otherwise stores the enrollment and links both values.
    pub fn enroll_student(&self, course: &mut Course, student: &mut Student) -> StoreResult<bool> {
        let course_id = course.persisted_id()?;
        let student_id = student.persisted_id()?;

        self.session.run_in_transaction(|_| {
            if course.has_student(student_id) {
                return Ok(false);
            }
            self.course_dao.add_enrollment(student_id, course_id)?;
            let linked = relation::enroll(student, course);
            info!(
                "event=enroll module=service status=ok student_id={student_id} course_id={course_id}"
            );
            Ok(linked)
        })
    }

    /// Stores a new grade and attaches it to both the student and the course.
    ///
    /// Any value is accepted and repeated grading adds further grades.
    pub fn grade_student(
        &self,
        student: &mut Student,
        course: &mut Course,
        value: f32,
    ) -> StoreResult<Grade> {
        let student_id = student.persisted_id()?;
        let course_id = course.persisted_id()?;

        self.session.run_in_transaction(|_| {
            let grade = self.grade_dao.save(Grade::new(student_id, course_id, value))?;
            relation::attach_grade(&grade, student, course);
            Ok(grade)
        })
    }

    /// Removes the student with `index_number` and everything referencing it.
    ///
    /// Returns `Ok(false)` when no such student exists. A failure in any
    /// cleanup step rolls the whole removal back and is returned as `Err`.
    ///
    /// Only the store is updated: `Course` values the caller already holds
    /// still list the removed student and its grades. Refetch them.
    pub fn remove_student(&self, index_number: IndexNumber) -> StoreResult<bool> {
        self.session.run_in_transaction(|_| {
            let Some(mut student) = self.student_dao.find_by_index_number(index_number) else {
                return Ok(false);
            };
            self.student_repository.remove(&mut student)?;
            Ok(true)
        })
    }

    /// Removes the named course, its enrollment rows and its grades.
    ///
    /// Returns `Ok(false)` when no such course exists.
    pub fn remove_course(&self, course_name: &str) -> StoreResult<bool> {
        self.session.run_in_transaction(|_| {
            let Some(mut course) = self.course_dao.find_by_name(course_name) else {
                return Ok(false);
            };
            let course_id = course.persisted_id()?;
            let (student_ids, grades) = relation::detach_course(&mut course);
            for student_id in &student_ids {
                self.course_dao.remove_enrollment(*student_id, course_id)?;
            }
            for grade in &grades {
                self.grade_dao.remove(grade)?;
            }
            self.course_dao.remove(&course)?;
            info!(
                "event=course_remove module=service status=ok course_id={course_id} students={} grades={}",
                student_ids.len(),
                grades.len()
            );
            Ok(true)
        })
    }

    /// Grades of every student enrolled in the named course.
    ///
    /// An unknown course yields an empty report. Values are ascending.
    pub fn student_grades(&self, course_name: &str) -> StoreResult<GradeReport> {
        let Some(course) = self.course_dao.find_by_name(course_name) else {
            return Ok(GradeReport::new());
        };
        let course_id = course.persisted_id()?;

        self.session.run_in_transaction(|_| {
            let mut report = GradeReport::new();
            for student in self.student_repository.find_all_by_course_name(course_name) {
                let mut values: Vec<f32> =
                    student.grades_in(course_id).map(Grade::value).collect();
                values.sort_by(f32::total_cmp);
                report.insert(student.full_name(), values);
            }
            Ok(report)
        })
    }

    /// Mean grade per course for one student, keyed by course name.
    ///
    /// Courses that cannot be loaded any more are skipped.
    pub fn student_report(&self, student: &Student) -> StoreResult<StudentReport> {
        student.persisted_id()?;

        self.session.run_in_transaction(|_| {
            let mut per_course: BTreeMap<CourseId, Vec<f32>> = BTreeMap::new();
            for grade in student.grades() {
                per_course
                    .entry(grade.course_id())
                    .or_default()
                    .push(grade.value());
            }

            let mut report = StudentReport::new();
            for (course_id, values) in per_course {
                let Some(course) = self.course_dao.find_by_id(course_id) else {
                    warn!(
                        "event=student_report module=service status=skip course_id={course_id}"
                    );
                    continue;
                };
                let mean = values.iter().sum::<f32>() / values.len() as f32;
                report.insert(course.name().to_string(), mean);
            }
            Ok(report)
        })
    }

    /// Students enrolled in `course`, memoized on first read.
    ///
    /// The first call resolves the course's current student ids into
    /// students and stores the list on the course value; every later call
    /// returns that same list, even after enrollments changed. Use
    /// [`Course::invalidate_enrolled_cache`] to force a recomputation.
    pub fn cached_enrolled_students<'c>(&self, course: &'c Course) -> StoreResult<&'c [Student]> {
        course
            .enrolled_cache
            .get_or_try_init(|| {
                self.session.run_in_transaction(|_| {
                    Ok(course
                        .student_ids()
                        .iter()
                        .filter_map(|id| self.student_dao.find_by_id(*id))
                        .collect())
                })
            })
            .map(Vec::as_slice)
    }
}
