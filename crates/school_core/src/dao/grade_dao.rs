//! Grade table mapping.

use super::generic_dao::{Entity, GenericDao};
use crate::model::grade::Grade;
use crate::model::RecordId;
use crate::session::{SessionService, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Record store access for grades; only the generic primitives.
pub struct GradeDao<'s> {
    session: &'s SessionService,
}

impl<'s> GradeDao<'s> {
    pub fn new(session: &'s SessionService) -> Self {
        Self { session }
    }
}

impl GenericDao for GradeDao<'_> {
    type Entity = Grade;

    fn session(&self) -> &SessionService {
        self.session
    }
}

impl Entity for Grade {
    const TABLE: &'static str = "grade";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    // Any value is accepted; the foreign keys do the checking.
    fn validate_for_write(&self) -> StoreResult<()> {
        Ok(())
    }

    fn load(conn: &Connection, id: RecordId) -> rusqlite::Result<Option<Self>> {
        conn.query_row(
            "SELECT id, grade, student_id, course_id FROM grade WHERE id = ?1;",
            [id],
            parse_grade_row,
        )
        .optional()
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<RecordId> {
        conn.execute(
            "INSERT INTO grade (grade, student_id, course_id) VALUES (?1, ?2, ?3);",
            params![f64::from(self.value), self.student_id, self.course_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, conn: &Connection, id: RecordId) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE grade SET grade = ?2, student_id = ?3, course_id = ?4 WHERE id = ?1;",
            params![id, f64::from(self.value), self.student_id, self.course_id],
        )
    }

    fn delete(conn: &Connection, id: RecordId) -> rusqlite::Result<usize> {
        conn.execute("DELETE FROM grade WHERE id = ?1;", [id])
    }
}

/// Maps a `grade` row selected as `id, grade, student_id, course_id`.
pub(crate) fn parse_grade_row(row: &Row<'_>) -> rusqlite::Result<Grade> {
    let value = row
        .get::<_, Option<f64>>("grade")?
        .map_or(f32::NAN, |value| value as f32);
    let mut grade = Grade::new(row.get("student_id")?, row.get("course_id")?, value);
    grade.id = Some(row.get("id")?);
    Ok(grade)
}
