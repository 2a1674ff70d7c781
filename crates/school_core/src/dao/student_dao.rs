//! Student table mapping and finders.

use super::generic_dao::{Entity, GenericDao};
use super::grade_dao::parse_grade_row;
use crate::model::course::CourseId;
use crate::model::student::{IndexNumber, Student};
use crate::model::RecordId;
use crate::session::{SessionService, StoreResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};

const STUDENT_SELECT_SQL: &str = "SELECT id, first_name, last_name, index_number FROM student";

/// Record store access for students.
pub struct StudentDao<'s> {
    session: &'s SessionService,
}

impl<'s> StudentDao<'s> {
    pub fn new(session: &'s SessionService) -> Self {
        Self { session }
    }

    /// Creates and saves a student in one step.
    ///
    /// Fails with a constraint violation when the index number is taken.
    pub fn create(
        &self,
        first_name: &str,
        last_name: &str,
        index_number: IndexNumber,
    ) -> StoreResult<Student> {
        self.save(Student::new(first_name, last_name, index_number))
    }

    /// Exact match on the unique index number.
    pub fn find_by_index_number(&self, index_number: IndexNumber) -> Option<Student> {
        self.session
            .run_in_transaction(|conn| {
                let id = conn
                    .query_row(
                        "SELECT id FROM student WHERE index_number = ?1;",
                        [index_number],
                        |row| row.get::<_, RecordId>(0),
                    )
                    .optional()?;
                match id {
                    Some(id) => Ok(Student::load(conn, id)?),
                    None => Ok(None),
                }
            })
            .unwrap_or_else(|err| {
                warn!(
                    "event=student_find module=dao status=error index_number={index_number} error_kind={} error={err}",
                    err.kind()
                );
                None
            })
    }

    /// Every student ordered by last name; ties keep insertion order.
    pub fn find_all(&self) -> Vec<Student> {
        self.session
            .run_in_transaction(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "{STUDENT_SELECT_SQL} ORDER BY last_name ASC, id ASC;"
                ))?;
                let mut rows = stmt.query([])?;
                let mut students = Vec::new();
                while let Some(row) = rows.next()? {
                    students.push(load_relations(conn, parse_student_row(row)?)?);
                }
                Ok(students)
            })
            .unwrap_or_else(|err| {
                warn!(
                    "event=student_list module=dao status=error error_kind={} error={err}",
                    err.kind()
                );
                Vec::new()
            })
    }
}

impl GenericDao for StudentDao<'_> {
    type Entity = Student;

    fn session(&self) -> &SessionService {
        self.session
    }
}

impl Entity for Student {
    const TABLE: &'static str = "student";

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
        let student = conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_student_row,
            )
            .optional()?;
        student.map(|student| load_relations(conn, student)).transpose()
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<RecordId> {
        conn.execute(
            "INSERT INTO student (first_name, last_name, index_number) VALUES (?1, ?2, ?3);",
            params![self.first_name, self.last_name, self.index_number],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, conn: &Connection, id: RecordId) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE student
             SET first_name = ?2, last_name = ?3, index_number = ?4
             WHERE id = ?1;",
            params![id, self.first_name, self.last_name, self.index_number],
        )
    }

    fn delete(conn: &Connection, id: RecordId) -> rusqlite::Result<usize> {
        conn.execute("DELETE FROM student WHERE id = ?1;", [id])
    }
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    let mut student = Student::new(
        row.get::<_, String>("first_name")?,
        row.get::<_, String>("last_name")?,
        row.get("index_number")?,
    );
    student.id = Some(row.get("id")?);
    Ok(student)
}

fn load_relations(conn: &Connection, mut student: Student) -> rusqlite::Result<Student> {
    let Some(id) = student.id else {
        return Ok(student);
    };

    let mut courses = conn.prepare(
        "SELECT course_id FROM student_course WHERE student_id = ?1 ORDER BY course_id;",
    )?;
    student.course_ids = courses
        .query_map([id], |row| row.get::<_, CourseId>(0))?
        .collect::<rusqlite::Result<_>>()?;

    let mut grades = conn.prepare(
        "SELECT id, grade, student_id, course_id FROM grade WHERE student_id = ?1 ORDER BY id;",
    )?;
    student.grades = grades
        .query_map([id], parse_grade_row)?
        .collect::<rusqlite::Result<_>>()?;

    Ok(student)
}
