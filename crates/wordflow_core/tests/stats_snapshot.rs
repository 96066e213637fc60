use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use wordflow_core::db::open_db_in_memory;
use wordflow_core::{
    SqliteStatsRepository, SqliteTermRepository, SqliteUserRepository, StageTable,
    StatsService, StatsSnapshot, Term, TermId, TermRepository, UserId, UserService,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn register(conn: &Connection, email: &str) -> UserId {
    UserService::new(SqliteUserRepository::try_new(conn).unwrap())
        .register(email, now() - Duration::days(600))
        .unwrap()
        .uuid
}

fn seed_term(
    conn: &Connection,
    user: UserId,
    created_at: NaiveDateTime,
    next_review: NaiveDate,
) -> TermId {
    let mut term = Term::new(Some(user), "palabra", "word", created_at);
    term.next_review = next_review;
    SqliteTermRepository::try_new(conn)
        .unwrap()
        .create_term(&term)
        .unwrap()
}

fn seed_review(conn: &Connection, term: TermId, user: UserId, reviewed_at: NaiveDateTime) {
    conn.execute(
        "INSERT INTO reviews (uuid, term_uuid, user_uuid, outcome, reviewed_at, next_review_assigned)
         VALUES (?1, ?2, ?3, 'good', ?4, ?5);",
        params![
            uuid::Uuid::new_v4().to_string(),
            term.to_string(),
            user.to_string(),
            reviewed_at.and_utc().timestamp_millis(),
            reviewed_at.date().format("%Y-%m-%d").to_string(),
        ],
    )
    .unwrap();
}

fn stats(conn: &Connection) -> StatsService<SqliteStatsRepository<'_>> {
    StatsService::new(
        SqliteStatsRepository::try_new(conn).unwrap(),
        StageTable::default(),
    )
}

#[test]
fn empty_user_has_all_zero_counters() {
    let conn = open_db_in_memory().unwrap();
    let user = register(&conn, "ana@example.com");

    assert_eq!(stats(&conn).snapshot(user, now()).unwrap(), StatsSnapshot::default());
}

#[test]
fn snapshot_counts_due_new_and_review_windows() {
    let conn = open_db_in_memory().unwrap();
    let user = register(&conn, "ana@example.com");
    let other = register(&conn, "bo@example.com");
    let today = now().date();

    let fresh = seed_term(&conn, user, now() - Duration::hours(2), today);
    seed_term(&conn, user, now() - Duration::days(3), today - Duration::days(1));
    seed_term(&conn, user, now() - Duration::days(20), today + Duration::days(3));
    seed_term(&conn, user, now() - Duration::days(100), today + Duration::days(10));
    seed_term(&conn, user, now() - Duration::days(400), today + Duration::days(7));
    let foreign = seed_term(&conn, other, now() - Duration::hours(1), today);

    for ago in [
        Duration::hours(1),
        Duration::hours(13),
        Duration::days(3),
        Duration::days(20),
        Duration::days(200),
        Duration::days(500),
    ] {
        seed_review(&conn, fresh, user, now() - ago);
    }
    seed_review(&conn, foreign, other, now() - Duration::minutes(5));

    let snapshot = stats(&conn).snapshot(user, now()).unwrap();
    assert_eq!(
        snapshot,
        StatsSnapshot {
            due_today: 2,
            reviewed_today: 1,
            new_1d: 1,
            new_7d: 2,
            new_30d: 3,
            new_365d: 4,
            reviews_1d: 2,
            reviews_7d: 3,
            reviews_30d: 4,
            reviews_365d: 5,
            due_next_7d: 2,
        }
    );
}

#[test]
fn window_boundary_is_inclusive_at_start() {
    let conn = open_db_in_memory().unwrap();
    let user = register(&conn, "ana@example.com");
    let today = now().date();

    seed_term(&conn, user, now() - Duration::days(7), today + Duration::days(30));
    seed_term(
        &conn,
        user,
        now() - Duration::days(7) - Duration::milliseconds(1),
        today + Duration::days(30),
    );

    let snapshot = stats(&conn).snapshot(user, now()).unwrap();
    assert_eq!(snapshot.new_7d, 1);
    assert_eq!(snapshot.new_30d, 2);
}
