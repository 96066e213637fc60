use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use wordflow_core::db::open_db_in_memory;
use wordflow_core::{
    LeaderboardEntry, SqliteStatsRepository, SqliteTermRepository, SqliteUserRepository,
    StageTable, StatsError, StatsService, StatsServiceError, Term, TermRepository, UserId,
    UserService,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 9, 1)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn register(conn: &Connection, email: &str) -> UserId {
    UserService::new(SqliteUserRepository::try_new(conn).unwrap())
        .register(email, now() - Duration::days(800))
        .unwrap()
        .uuid
}

fn seed_mastered(conn: &Connection, user: UserId, mastered_ago: Duration) {
    let mastered_at = now() - mastered_ago;
    let mut term = Term::new(Some(user), "palabra", "word", mastered_at - Duration::days(60));
    term.stage = 4;
    term.mastered_at = Some(mastered_at);
    term.next_review = mastered_at.date() + Duration::days(30);
    SqliteTermRepository::try_new(conn)
        .unwrap()
        .create_term(&term)
        .unwrap();
}

fn seed_learning(conn: &Connection, user: UserId) {
    let mut term = Term::new(Some(user), "palabra", "word", now() - Duration::days(2));
    term.stage = 2;
    SqliteTermRepository::try_new(conn)
        .unwrap()
        .create_term(&term)
        .unwrap();
}

fn stats(conn: &Connection) -> StatsService<SqliteStatsRepository<'_>> {
    StatsService::new(
        SqliteStatsRepository::try_new(conn).unwrap(),
        StageTable::default(),
    )
}

fn counts(entries: &[LeaderboardEntry]) -> Vec<u64> {
    entries.iter().map(|entry| entry.learned_words).collect()
}

#[test]
fn users_without_terms_are_excluded_and_zero_counts_kept() {
    let conn = open_db_in_memory().unwrap();
    let top = register(&conn, "alpha@example.com");
    let mid = register(&conn, "bo@example.com");
    let idle = register(&conn, "carla@example.com");
    register(&conn, "dora@example.com");

    for _ in 0..5 {
        seed_mastered(&conn, top, Duration::days(1));
    }
    for _ in 0..2 {
        seed_mastered(&conn, mid, Duration::days(3));
    }
    seed_learning(&conn, idle);

    let board = stats(&conn).leaderboard("7d", Some(10), now()).unwrap();
    assert_eq!(counts(&board), vec![5, 2, 0]);
    assert_eq!(board[0].user, "f a***a@example.com");
    assert_eq!(board[1].user, "b***@example.com");
    assert_eq!(board[2].user, "f c***a@example.com");
}

#[test]
fn ranges_filter_on_mastery_time() {
    let conn = open_db_in_memory().unwrap();
    let user = register(&conn, "alpha@example.com");
    let other = register(&conn, "omar@example.com");

    for ago in [1, 6, 10, 29, 300] {
        seed_mastered(&conn, user, Duration::days(ago));
    }
    seed_learning(&conn, other);

    let service = stats(&conn);
    for (range, expected) in [("7d", 2), ("30d", 4), ("365d", 5), ("all", 5)] {
        let board = service.leaderboard(range, None, now()).unwrap();
        assert_eq!(counts(&board), vec![expected, 0], "range {range}");
    }
}

#[test]
fn mastery_older_than_a_year_only_counts_for_all() {
    let conn = open_db_in_memory().unwrap();
    let user = register(&conn, "alpha@example.com");
    seed_mastered(&conn, user, Duration::days(400));

    let service = stats(&conn);
    assert_eq!(counts(&service.leaderboard("365d", None, now()).unwrap()), vec![0]);
    assert_eq!(counts(&service.leaderboard("all", None, now()).unwrap()), vec![1]);
}

#[test]
fn ties_break_by_user_id_and_limit_is_clamped() {
    let conn = open_db_in_memory().unwrap();
    let mut users = Vec::new();
    for index in 0..3 {
        let user = register(&conn, &format!("user{index}@example.com"));
        seed_mastered(&conn, user, Duration::days(1));
        users.push(user);
    }
    users.sort();

    let service = stats(&conn);
    let board = service.leaderboard("all", Some(0), now()).unwrap();
    assert_eq!(board.len(), 1);

    let full = service.leaderboard("all", Some(500), now()).unwrap();
    assert_eq!(full.len(), 3);

    let repo = SqliteStatsRepository::try_new(&conn).unwrap();
    let rows = wordflow_core::StatsRepository::leaderboard_rows(&repo, 4, None, 10).unwrap();
    let ids: Vec<_> = rows.iter().map(|row| row.user_id).collect();
    assert_eq!(ids, users);
}

#[test]
fn unknown_range_is_rejected() {
    let conn = open_db_in_memory().unwrap();

    let err = stats(&conn).leaderboard("1d", None, now()).unwrap_err();
    assert!(matches!(
        err,
        StatsServiceError::InvalidRange(StatsError::InvalidRange { .. })
    ));
}

#[test]
fn entries_serialize_without_raw_identity() {
    let conn = open_db_in_memory().unwrap();
    let user = register(&conn, "alpha@example.com");
    seed_mastered(&conn, user, Duration::days(1));

    let board = stats(&conn).leaderboard("all", None, now()).unwrap();
    let json = serde_json::to_value(&board).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "user": "f a***a@example.com", "learned_words": 1 }])
    );
    assert!(!json.to_string().contains(&user.to_string()));
}

#[test]
fn mastery_after_now_is_outside_bounded_ranges() {
    let conn = open_db_in_memory().unwrap();
    let user = register(&conn, "alpha@example.com");
    seed_mastered(&conn, user, Duration::days(-3));
    seed_mastered(&conn, user, Duration::zero());

    let service = stats(&conn);
    for range in ["7d", "30d", "365d"] {
        let board = service.leaderboard(range, None, now()).unwrap();
        assert_eq!(counts(&board), vec![1], "range {range}");
    }
    assert_eq!(counts(&service.leaderboard("all", None, now()).unwrap()), vec![2]);
}
