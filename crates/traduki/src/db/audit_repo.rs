//! Audit event repository — append-only rows in the `audit_events` table.

use rusqlite::{params, Connection, Row};

use super::DatabaseError;

/// One immutable audit event. Created once per observable job transition,
/// never updated.
#[derive(Debug, Clone)]
pub struct AuditEventRow {
    pub id: i64,
    pub job_id: i64,
    pub kind: String,
    pub description: String,
    pub created_at: String,
}

impl AuditEventRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            job_id: row.get("job_id")?,
            kind: row.get("kind")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Appends one audit event for a job.
pub fn insert(
    conn: &Connection,
    job_id: i64,
    kind: &str,
    description: &str,
    created_at: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO audit_events (job_id, kind, description, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![job_id, kind, description, created_at],
    )?;
    Ok(())
}

/// Events for one job, oldest first — the canonical history.
pub fn list_for_job(conn: &Connection, job_id: i64) -> Result<Vec<AuditEventRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM audit_events WHERE job_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;
    let rows: Vec<AuditEventRow> = stmt
        .query_map(params![job_id], AuditEventRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Number of events recorded for a job.
pub fn count_for_job(conn: &Connection, job_id: i64) -> Result<u64, DatabaseError> {
    let count: u64 = conn.query_row(
        "SELECT COUNT(*) FROM audit_events WHERE job_id = ?1",
        params![job_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{job_repo, Database};

    fn test_db_with_job() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let job_id = db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO jobs (external_id, source_lang, target_lang, created_at, updated_at)
                     VALUES ('a1', 'de', 'en', '2026-01-01', '2026-01-01')",
                    [],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .unwrap();
        (db, job_id)
    }

    #[test]
    fn test_insert_and_list_ordered() {
        let (db, job_id) = test_db_with_job();
        db.with_conn(|conn| {
            insert(conn, job_id, "upload", "Received pasted text", "2026-01-01T00:00:01+00:00")?;
            insert(conn, job_id, "status_change", "-> translating", "2026-01-01T00:00:02+00:00")?;
            insert(conn, job_id, "status_change", "-> done", "2026-01-01T00:00:03+00:00")?;

            let events = list_for_job(conn, job_id)?;
            assert_eq!(events.len(), 3);
            assert_eq!(events[0].kind, "upload");
            assert_eq!(events[1].description, "-> translating");
            assert_eq!(events[2].description, "-> done");
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_count_for_job() {
        let (db, job_id) = test_db_with_job();
        db.with_conn(|conn| {
            assert_eq!(count_for_job(conn, job_id)?, 0);
            insert(conn, job_id, "upload", "x", "2026-01-01T00:00:01+00:00")?;
            assert_eq!(count_for_job(conn, job_id)?, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_event_requires_existing_job() {
        let db = Database::open_in_memory().unwrap();
        let result = db.with_conn(|conn| insert(conn, 12345, "upload", "x", "2026-01-01"));
        assert!(result.is_err());
    }

    #[test]
    fn test_events_removed_with_job() {
        let (db, job_id) = test_db_with_job();
        db.with_conn(|conn| {
            insert(conn, job_id, "upload", "x", "2026-01-01T00:00:01+00:00")?;
            insert(conn, job_id, "error", "boom", "2026-01-01T00:00:02+00:00")?;
            job_repo::delete(conn, job_id)?;
            assert_eq!(count_for_job(conn, job_id)?, 0);
            Ok(())
        })
        .unwrap();
    }
}
