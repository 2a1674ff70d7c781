//! Student aggregate repository.
//!
//! # Invariants
//! - Removing a student deletes its enrollment rows and grades before the
//!   student row, all in one unit of work.
//! - The removed value comes back with empty relationship sets.

use super::Repository;
use crate::dao::course_dao::CourseDao;
use crate::dao::generic_dao::{Entity, GenericDao};
use crate::dao::grade_dao::GradeDao;
use crate::dao::student_dao::StudentDao;
use crate::model::relation;
use crate::model::student::Student;
use crate::model::RecordId;
use crate::session::{SessionService, StoreResult};
use log::{info, warn};

/// Student repository over the student, course and grade adapters.
pub struct StudentRepository<'s> {
    session: &'s SessionService,
    student_dao: StudentDao<'s>,
    course_dao: CourseDao<'s>,
    grade_dao: GradeDao<'s>,
}

impl<'s> StudentRepository<'s> {
    pub fn new(session: &'s SessionService) -> Self {
        Self {
            session,
            student_dao: StudentDao::new(session),
            course_dao: CourseDao::new(session),
            grade_dao: GradeDao::new(session),
        }
    }

    /// Students listed by the named course, in id order.
    ///
    /// Returns an empty list for an unknown course or on store failure.
    pub fn find_all_by_course_name(&self, course_name: &str) -> Vec<Student> {
        self.session
            .run_in_transaction(|_| {
                let Some(course) = self.course_dao.find_by_name(course_name) else {
                    return Ok(Vec::new());
                };
                Ok(course
                    .student_ids()
                    .iter()
                    .filter_map(|id| self.student_dao.find_by_id(*id))
                    .collect())
            })
            .unwrap_or_else(|err| {
                warn!(
                    "event=students_by_course module=repo status=error error_kind={} error={err}",
                    err.kind()
                );
                Vec::new()
            })
    }
}

impl Repository<Student> for StudentRepository<'_> {
    fn add(&self, student: Student) -> StoreResult<Student> {
        self.student_dao.save(student)
    }

    fn get_by_id(&self, id: RecordId) -> Option<Student> {
        self.student_dao.find_by_id(id)
    }

    fn find_all(&self) -> Vec<Student> {
        self.student_dao.find_all()
    }

    fn remove(&self, student: &mut Student) -> StoreResult<()> {
        let student_id = student.persisted_id()?;
        self.session.run_in_transaction(|_| {
            let (course_ids, grades) = relation::detach_student(student);
            for course_id in &course_ids {
                self.course_dao.remove_enrollment(student_id, *course_id)?;
            }
            for grade in &grades {
                self.grade_dao.remove(grade)?;
            }
            self.student_dao.remove(student)?;

            info!(
                "event=student_remove module=repo status=ok student_id={student_id} courses={} grades={}",
                course_ids.len(),
                grades.len()
            );
            Ok(())
        })
    }
}
