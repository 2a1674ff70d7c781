//! Core domain logic for the school records store.
//! Students, courses and grades persisted in SQLite through one session.

pub mod dao;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use dao::course_dao::CourseDao;
pub use dao::generic_dao::{Entity, GenericDao};
pub use dao::grade_dao::GradeDao;
pub use dao::student_dao::StudentDao;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::course::{Course, CourseId};
pub use model::grade::{Grade, GradeId};
pub use model::student::{IndexNumber, Student, StudentId};
pub use model::{RecordId, ValidationError, MAX_NAME_CHARS};
pub use repo::student_repo::StudentRepository;
pub use repo::Repository;
pub use service::school_service::{GradeReport, SchoolService, StudentReport};
pub use session::{ErrorKind, SessionService, StoreError, StoreResult};
