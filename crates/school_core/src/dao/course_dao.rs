//! Course table mapping, finder and enrollment rows.

use super::generic_dao::{Entity, GenericDao};
use super::grade_dao::parse_grade_row;
use crate::model::course::{Course, CourseId};
use crate::model::student::StudentId;
use crate::model::RecordId;
use crate::session::{SessionService, StoreError, StoreResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Record store access for courses and the `student_course` join relation.
pub struct CourseDao<'s> {
    session: &'s SessionService,
}

impl<'s> CourseDao<'s> {
    pub fn new(session: &'s SessionService) -> Self {
        Self { session }
    }

    /// Creates and saves a course; fails when the name is taken.
    pub fn create(&self, name: &str) -> StoreResult<Course> {
        self.save(Course::new(name))
    }

    /// Exact match on the unique course name.
    pub fn find_by_name(&self, name: &str) -> Option<Course> {
        self.session
            .run_in_transaction(|conn| {
                let id = conn
                    .query_row("SELECT id FROM course WHERE name = ?1;", [name], |row| {
                        row.get::<_, RecordId>(0)
                    })
                    .optional()?;
                match id {
                    Some(id) => Ok(Course::load(conn, id)?),
                    None => Ok(None),
                }
            })
            .unwrap_or_else(|err| {
                warn!(
                    "event=course_find module=dao status=error error_kind={} error={err}",
                    err.kind()
                );
                None
            })
    }

    /// Persists one enrollment row.
    ///
    /// Fails with a constraint violation when the pair is already stored or
    /// either side does not exist.
    pub fn add_enrollment(&self, student_id: StudentId, course_id: CourseId) -> StoreResult<()> {
        self.session.run_in_transaction(|conn| {
            conn.execute(
                "INSERT INTO student_course (student_id, course_id) VALUES (?1, ?2);",
                params![student_id, course_id],
            )?;
            Ok(())
        })
    }

    /// Deletes one enrollment row; a missing row is an error.
    pub fn remove_enrollment(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> StoreResult<()> {
        self.session.run_in_transaction(|conn| {
            let changed = conn.execute(
                "DELETE FROM student_course WHERE student_id = ?1 AND course_id = ?2;",
                params![student_id, course_id],
            )?;
            if changed == 0 {
                return Err(StoreError::MissingRecord {
                    table: "student_course",
                    id: student_id,
                });
            }
            Ok(())
        })
    }
}

impl GenericDao for CourseDao<'_> {
    type Entity = Course;

    fn session(&self) -> &SessionService {
        self.session
    }
}

impl Entity for Course {
    const TABLE: &'static str = "course";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn validate_for_write(&self) -> StoreResult<()> {
        Ok(self.validate()?)
    }

    fn load(conn: &Connection, id: RecordId) -> rusqlite::Result<Option<Self>> {
        let Some(mut course) = conn
            .query_row(
                "SELECT id, name FROM course WHERE id = ?1;",
                [id],
                parse_course_row,
            )
            .optional()?
        else {
            return Ok(None);
        };

        let mut students = conn.prepare(
            "SELECT student_id FROM student_course WHERE course_id = ?1 ORDER BY student_id;",
        )?;
        course.student_ids = students
            .query_map([id], |row| row.get::<_, StudentId>(0))?
            .collect::<rusqlite::Result<_>>()?;

        let mut grades = conn.prepare(
            "SELECT id, grade, student_id, course_id FROM grade WHERE course_id = ?1 ORDER BY id;",
        )?;
        course.grades = grades
            .query_map([id], parse_grade_row)?
            .collect::<rusqlite::Result<_>>()?;

        Ok(Some(course))
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<RecordId> {
        conn.execute("INSERT INTO course (name) VALUES (?1);", [&self.name])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, conn: &Connection, id: RecordId) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE course SET name = ?2 WHERE id = ?1;",
            params![id, self.name],
        )
    }

    fn delete(conn: &Connection, id: RecordId) -> rusqlite::Result<usize> {
        conn.execute("DELETE FROM course WHERE id = ?1;", [id])
    }
}

fn parse_course_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    let mut course = Course::new(row.get::<_, String>("name")?);
    course.id = Some(row.get("id")?);
    Ok(course)
}
