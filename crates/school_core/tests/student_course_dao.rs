use school_core::{
    Course, CourseDao, ErrorKind, GenericDao, GradeDao, SessionService, StoreError, Student,
    StudentDao, ValidationError,
};

#[test]
fn create_student_assigns_positive_id() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);

    let student = students.create("Jan", "Kowalski", 100).unwrap();

    assert!(student.id().unwrap() > 0);
    assert_eq!(student.full_name(), "Jan Kowalski");
    assert!(student.grades().is_empty());
    assert!(student.course_ids().is_empty());
}

#[test]
fn duplicate_index_number_is_a_constraint_violation() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);

    students.create("Jan", "Kowalski", 100).unwrap();
    let err = students.create("Adam", "Nowak", 100).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_eq!(students.find_all().len(), 1);
}

#[test]
fn find_all_orders_by_last_name() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);

    students.create("Jan", "Nowak", 1).unwrap();
    students.create("Kasia", "Kowalski", 2).unwrap();
    students.create("Piotr", "Budynek", 3).unwrap();

    let last_names: Vec<String> = students
        .find_all()
        .iter()
        .map(|student| student.last_name().to_string())
        .collect();
    assert_eq!(last_names, ["Budynek", "Kowalski", "Nowak"]);
}

#[test]
fn find_all_keeps_insertion_order_for_equal_last_names() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);

    students.create("Zofia", "Nowak", 30).unwrap();
    students.create("Adam", "Kowalski", 20).unwrap();
    students.create("Anna", "Nowak", 10).unwrap();

    let names: Vec<String> = students
        .find_all()
        .iter()
        .map(Student::full_name)
        .collect();
    assert_eq!(names, ["Adam Kowalski", "Zofia Nowak", "Anna Nowak"]);
}

#[test]
fn find_by_index_number_and_id_return_equal_students() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);

    let created = students.create("Kasia", "Kowalska", 7).unwrap();

    let by_index = students.find_by_index_number(7).unwrap();
    let by_id = students.find_by_id(created.id().unwrap()).unwrap();
    assert_eq!(by_index, created);
    assert_eq!(by_id, created);

    assert!(students.find_by_index_number(8).is_none());
    assert!(students.find_by_id(999).is_none());
}

#[test]
fn course_names_are_unique() {
    let session = SessionService::open_in_memory().unwrap();
    let courses = CourseDao::new(&session);

    let algebra = courses.create("Algebra").unwrap();
    let err = courses.create("Algebra").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_eq!(courses.find_by_name("Algebra"), Some(algebra));
    assert!(courses.find_by_name("Geometry").is_none());
}

#[test]
fn save_of_persisted_entity_updates_in_place() {
    let session = SessionService::open_in_memory().unwrap();
    let courses = CourseDao::new(&session);

    let mut course = courses.create("Algebra").unwrap();
    let id = course.id();
    course = courses.save(course).unwrap();
    assert_eq!(course.id(), id);

    let reloaded = courses.find_by_id(id.unwrap()).unwrap();
    assert_eq!(reloaded.name(), "Algebra");
}

#[test]
fn invalid_fields_are_rejected_before_reaching_the_store() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);
    let courses = CourseDao::new(&session);

    let blank = students.create("  ", "Kowalski", 1).unwrap_err();
    assert!(matches!(
        blank,
        StoreError::Validation(ValidationError::BlankField("first_name"))
    ));

    let zero = students.create("Jan", "Kowalski", 0).unwrap_err();
    assert!(matches!(
        zero,
        StoreError::Validation(ValidationError::ZeroIndexNumber)
    ));

    let long = courses.create(&"x".repeat(51)).unwrap_err();
    assert!(matches!(
        long,
        StoreError::Validation(ValidationError::FieldTooLong { field: "name", .. })
    ));
    assert_eq!(long.kind(), ErrorKind::ConstraintViolation);

    assert!(students.find_all().is_empty());
}

#[test]
fn remove_of_unsaved_or_missing_entity_fails() {
    let session = SessionService::open_in_memory().unwrap();
    let courses = CourseDao::new(&session);

    let unsaved = Course::new("Algebra");
    assert!(matches!(
        courses.remove(&unsaved),
        Err(StoreError::Unpersisted { table: "course" })
    ));

    let course = courses.create("Algebra").unwrap();
    courses.remove(&course).unwrap();
    assert!(courses.find_by_name("Algebra").is_none());
    assert!(matches!(
        courses.remove(&course),
        Err(StoreError::MissingRecord { table: "course", .. })
    ));
}

#[test]
fn enrollment_rows_are_visible_from_both_sides() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);
    let courses = CourseDao::new(&session);

    let student = students.create("Jan", "Kowalski", 100).unwrap();
    let course = courses.create("Algebra").unwrap();
    let student_id = student.id().unwrap();
    let course_id = course.id().unwrap();

    courses.add_enrollment(student_id, course_id).unwrap();
    let duplicate = courses.add_enrollment(student_id, course_id).unwrap_err();
    assert_eq!(duplicate.kind(), ErrorKind::ConstraintViolation);

    let student = students.find_by_id(student_id).unwrap();
    let course = courses.find_by_id(course_id).unwrap();
    assert!(student.is_enrolled_in(course_id));
    assert!(course.has_student(student_id));

    courses.remove_enrollment(student_id, course_id).unwrap();
    assert!(matches!(
        courses.remove_enrollment(student_id, course_id),
        Err(StoreError::MissingRecord {
            table: "student_course",
            ..
        })
    ));
    assert!(!students.find_by_id(student_id).unwrap().is_enrolled_in(course_id));
}

#[test]
fn grade_for_unknown_student_violates_foreign_key() {
    let session = SessionService::open_in_memory().unwrap();
    let courses = CourseDao::new(&session);
    let grades = GradeDao::new(&session);

    let course = courses.create("Algebra").unwrap();
    let err = grades
        .save(school_core::Grade::new(999, course.id().unwrap(), 4.0))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
}

#[test]
fn loaded_student_serializes_with_relationship_ids() {
    let session = SessionService::open_in_memory().unwrap();
    let students = StudentDao::new(&session);

    let student = students.create("Kasia", "Kowalska", 7).unwrap();
    let value = serde_json::to_value(&student).unwrap();

    assert_eq!(value["first_name"], "Kasia");
    assert_eq!(value["index_number"], 7);
    assert_eq!(value["course_ids"], serde_json::json!([]));

    let restored: Student = serde_json::from_value(value).unwrap();
    assert_eq!(restored, student);
}
