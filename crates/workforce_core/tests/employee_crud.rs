use rusqlite::Connection;
use std::rc::Rc;
use workforce_core::{
    open_db_in_memory, DbConfig, Employee, EmployeeRepository, SqliteEmployeeRepository,
};

fn open_with_departments() -> Connection {
    let conn = open_db_in_memory(&DbConfig::default()).unwrap();
    conn.execute_batch(
        "CREATE TABLE departments (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            location TEXT NOT NULL
        );
        INSERT INTO departments (id, name, location) VALUES
            (1, 'Engineering', 'Building A'),
            (2, 'Payroll', 'Building B');",
    )
    .unwrap();
    conn
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_find_by_name_and_delete_scenario() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let ann = repo.create("Ann", "Engineer", 1).unwrap();
    assert_eq!(ann.borrow().id, Some(1));

    let by_name = repo.find_by_name("Ann").unwrap().unwrap();
    assert!(Rc::ptr_eq(&ann, &by_name));

    repo.delete(&ann).unwrap();
    assert_eq!(ann.borrow().id, None);
    assert!(repo.find_by_id(1).unwrap().is_none());
}

#[test]
fn save_transient_assigns_fresh_id_and_registers_handle() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let first = Employee::new("Ann", "Engineer", 1).into_handle();
    let second = Employee::new("Bob", "Accountant", 2).into_handle();
    repo.save(&first).unwrap();
    repo.save(&second).unwrap();

    let first_id = first.borrow().id.unwrap();
    let second_id = second.borrow().id.unwrap();
    assert!(first_id > 0);
    assert_ne!(first_id, second_id);
    assert!(repo.identity_map().contains(first_id));
    assert!(repo.identity_map().contains(second_id));

    let loaded = repo.find_by_id(second_id).unwrap().unwrap();
    assert_eq!(
        *loaded.borrow(),
        Employee::with_id(second_id, "Bob", "Accountant", 2)
    );
}

#[test]
fn save_persisted_record_updates_row_without_inserting() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let ann = repo.create("Ann", "Engineer", 1).unwrap();
    {
        let mut record = ann.borrow_mut();
        record.name = "Ann Lee".to_string();
        record.job_title = "Staff Engineer".to_string();
        record.department_id = 2;
    }
    repo.save(&ann).unwrap();

    assert_eq!(row_count(&conn), 1);
    let (name, job_title, department_id): (String, String, i64) = conn
        .query_row(
            "SELECT name, job_title, department_id FROM employees WHERE id = ?1;",
            [ann.borrow().id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(name, "Ann Lee");
    assert_eq!(job_title, "Staff Engineer");
    assert_eq!(department_id, 2);
}

#[test]
fn update_missing_row_is_not_an_error() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let ghost = Employee::with_id(99, "Ghost", "Nobody", 1).into_handle();
    repo.update(&ghost).unwrap();

    let transient = Employee::new("Ann", "Engineer", 1).into_handle();
    repo.update(&transient).unwrap();

    assert_eq!(row_count(&conn), 0);
}

#[test]
fn delete_twice_is_safe() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let ann = repo.create("Ann", "Engineer", 1).unwrap();
    repo.delete(&ann).unwrap();
    repo.delete(&ann).unwrap();

    assert_eq!(ann.borrow().id, None);
    assert!(repo.identity_map().is_empty());
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn deleted_record_is_reinserted_with_new_id() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let ann = repo.create("Ann", "Engineer", 1).unwrap();
    repo.create("Bob", "Accountant", 2).unwrap();
    let old_id = ann.borrow().id.unwrap();

    repo.delete(&ann).unwrap();
    repo.save(&ann).unwrap();

    let new_id = ann.borrow().id.unwrap();
    assert_ne!(new_id, old_id);
    assert!(repo.find_by_id(old_id).unwrap().is_none());
    assert!(Rc::ptr_eq(&ann, &repo.find_by_id(new_id).unwrap().unwrap()));
    assert_eq!(row_count(&conn), 2);
}

#[test]
fn get_all_returns_live_rows_in_insertion_order() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let ann = repo.create("Ann", "Engineer", 1).unwrap();
    let bob = repo.create("Bob", "Accountant", 2).unwrap();
    let cam = repo.create("Cam", "Designer", 1).unwrap();
    repo.delete(&bob).unwrap();

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(Rc::ptr_eq(&all[0], &ann));
    assert!(Rc::ptr_eq(&all[1], &cam));
}

#[test]
fn find_by_name_returns_first_match_only() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let first = repo.create("Sam", "Engineer", 1).unwrap();
    repo.create("Sam", "Accountant", 2).unwrap();

    let found = repo.find_by_name("Sam").unwrap().unwrap();
    assert!(Rc::ptr_eq(&found, &first));
    assert!(repo.find_by_name("Nobody").unwrap().is_none());
}

#[test]
fn invalid_department_is_constraint_violation_and_inserts_nothing() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let err = repo.create("Ann", "Engineer", 404).unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");

    let orphan = Employee::new("Bob", "Accountant", 405).into_handle();
    let err = repo.save(&orphan).unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
    assert_eq!(orphan.borrow().id, None);

    assert_eq!(row_count(&conn), 0);
    assert!(repo.identity_map().is_empty());
}

#[test]
fn unenforced_foreign_keys_accept_unknown_department() {
    let config = DbConfig {
        foreign_keys: false,
        ..DbConfig::default()
    };
    let conn = open_db_in_memory(&config).unwrap();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();

    let ann = repo.create("Ann", "Engineer", 404).unwrap();
    assert!(ann.borrow().is_persisted());
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn table_ddl_is_idempotent_and_drop_surfaces_db_errors() {
    let conn = open_with_departments();
    let mut repo = SqliteEmployeeRepository::new(&conn);
    repo.create_table().unwrap();
    repo.create_table().unwrap();
    repo.create("Ann", "Engineer", 1).unwrap();

    repo.drop_table().unwrap();
    repo.drop_table().unwrap();

    let err = repo.get_all().unwrap_err();
    assert!(!err.is_constraint_violation());
    assert!(err.to_string().contains("no such table"));
    assert_eq!(repo.identity_map().len(), 1);
}
