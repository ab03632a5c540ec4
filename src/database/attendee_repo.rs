use chrono::NaiveDateTime;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

use crate::models::AttendeeRow;

/// Insertion order (rowid) is what "first record" means throughout.
pub const SQL_LIST_ATTENDEES: &str = r#"
SELECT
    id,
    sno,
    name,
    details,
    attendance,
    attendance_time,
    ticket_shared_status
FROM attendees
ORDER BY rowid ASC
"#;

/// Works on the pool or inside a transaction (`&mut *tx`).
pub async fn list_attendees<'e, E>(executor: E) -> sqlx::Result<Vec<AttendeeRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AttendeeRow>(SQL_LIST_ATTENDEES)
        .fetch_all(executor)
        .await
}

const SQL_MARK_FIRST_PRESENT: &str = r#"
UPDATE attendees
SET attendance = 1,
    attendance_time = ?1,
    ticket_shared_status = 1
WHERE id = (
    SELECT id
    FROM attendees
    WHERE sno = ?2
    ORDER BY rowid ASC
    LIMIT 1
)
"#;

/// Marks the first attendee with `sno` present. Returns rows updated (0 or 1).
pub async fn mark_first_present(
    pool: &SqlitePool,
    sno: i64,
    at: NaiveDateTime,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_FIRST_PRESENT)
        .bind(at)
        .bind(sno)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_COUNT_PRESENT: &str = r#"
SELECT COUNT(*)
FROM attendees
WHERE attendance = 1
"#;

pub async fn count_present(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_PRESENT)
        .fetch_one(pool)
        .await
}

const SQL_COUNT_ALL: &str = r#"
SELECT COUNT(*)
FROM attendees
"#;

pub async fn count_all(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_ALL)
        .fetch_one(pool)
        .await
}

const SQL_ANY_ATTENDEE: &str = r#"
SELECT EXISTS(SELECT 1 FROM attendees LIMIT 1)
"#;

pub async fn any_attendee(pool: &SqlitePool) -> sqlx::Result<bool> {
    let exists = sqlx::query_scalar::<_, i64>(SQL_ANY_ATTENDEE)
        .fetch_one(pool)
        .await?;
    Ok(exists != 0)
}

// ticket_shared_status is left as it was.
const SQL_RESET_ATTENDANCE: &str = r#"
UPDATE attendees
SET attendance = 0,
    attendance_time = NULL
"#;

pub async fn reset_attendance(pool: &SqlitePool) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_RESET_ATTENDANCE).execute(pool).await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_ATTENDEE: &str = r#"
DELETE FROM attendees
WHERE id = ?1
"#;

pub async fn delete_attendee(conn: &mut SqliteConnection, id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_ATTENDEE)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

pub struct NewAttendee<'a> {
    pub id: &'a str,
    pub sno: Option<i64>,
    pub name: Option<&'a str>,
    pub details: Option<&'a str>, // JSON object
    pub attendance: Option<bool>,
    pub attendance_time: Option<NaiveDateTime>,
    pub ticket_shared_status: Option<bool>,
}

const SQL_INSERT_ATTENDEE: &str = r#"
INSERT INTO attendees (
  id,
  sno,
  name,
  details,
  attendance,
  attendance_time,
  ticket_shared_status
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub async fn insert_attendee(pool: &SqlitePool, attendee: NewAttendee<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_ATTENDEE)
        .bind(attendee.id)
        .bind(attendee.sno)
        .bind(attendee.name)
        .bind(attendee.details)
        .bind(attendee.attendance)
        .bind(attendee.attendance_time)
        .bind(attendee.ticket_shared_status)
        .execute(pool)
        .await?;
    Ok(())
}
