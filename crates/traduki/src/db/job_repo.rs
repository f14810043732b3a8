//! Job repository — row-level operations on the `jobs` table.
//!
//! Functions take a `&Connection` so callers can compose them inside a
//! transaction (`Database::with_txn`) or run them standalone
//! (`Database::with_conn`).

use rusqlite::{params, Connection, Row};

use super::DatabaseError;

/// A raw job row from the database.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub id: i64,
    pub external_id: String,
    pub contact: String,
    pub source_lang: String,
    pub target_lang: String,
    pub domain: String,
    pub tone: String,
    pub deadline: String,
    pub intent: String,
    pub glossary_raw: String,
    pub original_filename: Option<String>,
    pub original_text: String,
    pub translated_text: Option<String>,
    pub error: Option<String>,
    pub word_count: u64,
    pub price: f64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            external_id: row.get("external_id")?,
            contact: row.get("contact")?,
            source_lang: row.get("source_lang")?,
            target_lang: row.get("target_lang")?,
            domain: row.get("domain")?,
            tone: row.get("tone")?,
            deadline: row.get("deadline")?,
            intent: row.get("intent")?,
            glossary_raw: row.get("glossary_raw")?,
            original_filename: row.get("original_filename")?,
            original_text: row.get("original_text")?,
            translated_text: row.get("translated_text")?,
            error: row.get("error")?,
            word_count: row.get("word_count")?,
            price: row.get("price")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Inserts a new job row. Returns the internal row id.
pub fn insert(conn: &Connection, job: &JobRow) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO jobs (external_id, contact, source_lang, target_lang, domain, tone,
         deadline, intent, glossary_raw, original_filename, original_text, translated_text,
         error, word_count, price, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            job.external_id,
            job.contact,
            job.source_lang,
            job.target_lang,
            job.domain,
            job.tone,
            job.deadline,
            job.intent,
            job.glossary_raw,
            job.original_filename,
            job.original_text,
            job.translated_text,
            job.error,
            job.word_count,
            job.price,
            job.status,
            job.created_at,
            job.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Updates only the status and updated_at of a job.
pub fn update_status(
    conn: &Connection,
    id: i64,
    status: &str,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE jobs SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, status, updated_at],
    )?;
    Ok(())
}

/// Sets the original text and its word count once intake/extraction resolved it.
pub fn update_source_text(
    conn: &Connection,
    id: i64,
    original_text: &str,
    word_count: u64,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE jobs SET original_text = ?2, word_count = ?3, updated_at = ?4 WHERE id = ?1",
        params![id, original_text, word_count, updated_at],
    )?;
    Ok(())
}

/// Success terminal write: translated text, price, status in one statement.
/// `error` is cleared so Done and Error stay mutually exclusive.
pub fn complete(
    conn: &Connection,
    id: i64,
    translated_text: &str,
    price: f64,
    status: &str,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE jobs SET translated_text = ?2, price = ?3, status = ?4, error = NULL,
         updated_at = ?5 WHERE id = ?1",
        params![id, translated_text, price, status, updated_at],
    )?;
    Ok(())
}

/// Failure terminal write: error message and status; any partial
/// translated text is discarded.
pub fn fail(
    conn: &Connection,
    id: i64,
    error: &str,
    status: &str,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE jobs SET error = ?2, status = ?3, translated_text = NULL, updated_at = ?4
         WHERE id = ?1",
        params![id, error, status, updated_at],
    )?;
    Ok(())
}

/// Finds a job by its internal id.
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM jobs WHERE id = ?1")?;
    let mut rows = stmt.query_map(params![id], JobRow::from_row)?;
    match rows.next() {
        Some(Ok(row)) => Ok(Some(row)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Finds a job by its externally shared identifier.
pub fn find_by_external_id(
    conn: &Connection,
    external_id: &str,
) -> Result<Option<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM jobs WHERE external_id = ?1")?;
    let mut rows = stmt.query_map(params![external_id], JobRow::from_row)?;
    match rows.next() {
        Some(Ok(row)) => Ok(Some(row)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// All jobs, most recent first.
pub fn list_all(conn: &Connection) -> Result<Vec<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM jobs ORDER BY created_at DESC, id DESC")?;
    let rows: Vec<JobRow> = stmt
        .query_map([], JobRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Deletes a job row. The audit trail goes with it via the FK cascade.
/// Returns the number of deleted rows.
pub fn delete(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let changed = conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    pub(crate) fn sample_job(external_id: &str) -> JobRow {
        JobRow {
            id: 0,
            external_id: external_id.to_string(),
            contact: "client@example.com".to_string(),
            source_lang: "de".to_string(),
            target_lang: "en".to_string(),
            domain: "other".to_string(),
            tone: String::new(),
            deadline: String::new(),
            intent: String::new(),
            glossary_raw: String::new(),
            original_filename: None,
            original_text: "hallo dokument".to_string(),
            translated_text: None,
            error: None,
            word_count: 2,
            price: 0.0,
            status: "uploaded".to_string(),
            created_at: "2026-01-01T00:00:00.000000+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00.000000+00:00".to_string(),
        }
    }

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        db.with_conn(|conn| {
            let id = insert(conn, &sample_job("job-1"))?;
            assert!(id > 0);

            let found = find_by_id(conn, id)?.unwrap();
            assert_eq!(found.external_id, "job-1");
            assert_eq!(found.status, "uploaded");
            assert_eq!(found.word_count, 2);

            let by_ext = find_by_external_id(conn, "job-1")?.unwrap();
            assert_eq!(by_ext.id, id);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_find_nonexistent() {
        let db = test_db();
        db.with_conn(|conn| {
            assert!(find_by_external_id(conn, "missing")?.is_none());
            assert!(find_by_id(conn, 999)?.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_duplicate_external_id_rejected() {
        let db = test_db();
        db.with_conn(|conn| {
            insert(conn, &sample_job("dup"))?;
            assert!(insert(conn, &sample_job("dup")).is_err());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_update_status() {
        let db = test_db();
        db.with_conn(|conn| {
            let id = insert(conn, &sample_job("s1"))?;
            update_status(conn, id, "translating", "2026-01-01T01:00:00.000000+00:00")?;

            let found = find_by_id(conn, id)?.unwrap();
            assert_eq!(found.status, "translating");
            assert_eq!(found.updated_at, "2026-01-01T01:00:00.000000+00:00");
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_complete_clears_error() {
        let db = test_db();
        db.with_conn(|conn| {
            let mut job = sample_job("c1");
            job.error = Some("stale".to_string());
            let id = insert(conn, &job)?;

            complete(conn, id, "hello document", 0.10, "done", "2026-01-01T01:00:00+00:00")?;

            let found = find_by_id(conn, id)?.unwrap();
            assert_eq!(found.status, "done");
            assert_eq!(found.translated_text.as_deref(), Some("hello document"));
            assert!(found.error.is_none());
            assert_eq!(found.price, 0.10);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_fail_clears_translated_text() {
        let db = test_db();
        db.with_conn(|conn| {
            let mut job = sample_job("f1");
            job.translated_text = Some("partial".to_string());
            let id = insert(conn, &job)?;

            fail(conn, id, "backend down", "error", "2026-01-01T01:00:00+00:00")?;

            let found = find_by_id(conn, id)?.unwrap();
            assert_eq!(found.status, "error");
            assert_eq!(found.error.as_deref(), Some("backend down"));
            assert!(found.translated_text.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_list_all_newest_first() {
        let db = test_db();
        db.with_conn(|conn| {
            for i in 0..3 {
                let mut job = sample_job(&format!("l{}", i));
                job.created_at = format!("2026-01-0{}T00:00:00.000000+00:00", i + 1);
                insert(conn, &job)?;
            }

            let rows = list_all(conn)?;
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0].external_id, "l2");
            assert_eq!(rows[2].external_id, "l0");
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_delete() {
        let db = test_db();
        db.with_conn(|conn| {
            let id = insert(conn, &sample_job("d1"))?;
            assert_eq!(delete(conn, id)?, 1);
            assert!(find_by_id(conn, id)?.is_none());
            assert_eq!(delete(conn, id)?, 0);
            Ok(())
        })
        .unwrap();
    }
}
