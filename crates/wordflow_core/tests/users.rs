use chrono::NaiveDate;
use wordflow_core::db::open_db_in_memory;
use wordflow_core::{SqliteUserRepository, UserService, UserServiceError};

#[test]
fn register_normalizes_and_rejects_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let users = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let now = NaiveDate::from_ymd_opt(2026, 1, 2)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();

    let user = users.register("  Ana@Example.com ", now).unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(users.get_user(user.uuid).unwrap(), user);
    assert_eq!(
        users.find_by_email("ANA@example.com").unwrap(),
        Some(user.clone())
    );

    let err = users.register("ana@example.com", now).unwrap_err();
    assert!(matches!(err, UserServiceError::DuplicateEmail));
}

#[test]
fn malformed_email_and_unknown_user_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let users = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let now = NaiveDate::from_ymd_opt(2026, 1, 2)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();

    assert!(matches!(
        users.register("not-an-email", now),
        Err(UserServiceError::InvalidEmail(_))
    ));
    let missing = uuid::Uuid::new_v4();
    assert!(matches!(
        users.get_user(missing),
        Err(UserServiceError::UserNotFound(id)) if id == missing
    ));
}
