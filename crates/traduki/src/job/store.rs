//! Durable job store enforcing the lifecycle state machine.
//!
//! Every status mutation commits together with its audit event: if the
//! event cannot be written the transition did not happen. Different jobs'
//! writes are independent; a single job is only ever advanced by the one
//! pipeline run that owns it.

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::db::audit_repo::AuditEventRow;
use crate::db::job_repo::JobRow;
use crate::db::{audit_repo, job_repo, Database, DatabaseError};
use crate::job::{AuditKind, JobMeta, JobStatus};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("Job {id} has unrecognized status '{status}'")]
    CorruptStatus { id: i64, status: String },
}

#[derive(Clone)]
pub struct JobStore {
    db: Database,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl JobStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates a job in status Uploaded and records the `upload` audit
    /// event, atomically. The external id is a fresh opaque token.
    pub fn create(
        &self,
        meta: &JobMeta,
        original_filename: Option<&str>,
    ) -> Result<JobRow, StoreError> {
        let ts = now();
        let row = JobRow {
            id: 0,
            external_id: Uuid::new_v4().simple().to_string(),
            contact: meta.contact.clone(),
            source_lang: meta.source_lang.clone(),
            target_lang: meta.target_lang.clone(),
            domain: meta.domain.as_str().to_string(),
            tone: meta.tone.clone(),
            deadline: meta.deadline.clone(),
            intent: meta.intent.clone(),
            glossary_raw: meta.glossary_raw.clone(),
            original_filename: original_filename.map(str::to_string),
            original_text: String::new(),
            translated_text: None,
            error: None,
            word_count: 0,
            price: 0.0,
            status: JobStatus::Uploaded.as_str().to_string(),
            created_at: ts.clone(),
            updated_at: ts.clone(),
        };

        let description = match original_filename {
            Some(name) => format!("Received file '{}'", name),
            None => "Received pasted text".to_string(),
        };

        let id = self.db.with_txn::<_, _, StoreError>(|txn| {
            let id = job_repo::insert(txn, &row)?;
            audit_repo::insert(txn, id, AuditKind::Upload.as_str(), &description, &ts)?;
            Ok(id)
        })?;

        tracing::debug!(job = %row.external_id, "Job created");
        Ok(JobRow { id, ..row })
    }

    /// Uploaded -> Translating.
    pub fn begin_translating(&self, job_id: i64) -> Result<(), StoreError> {
        self.transition(job_id, JobStatus::Translating, |_| {
            "-> translating".to_string()
        })
    }

    /// Translating -> Done. Sets the translated text and price; the only
    /// writer of `translated_text`.
    pub fn complete(
        &self,
        job_id: i64,
        translated_text: &str,
        price: f64,
    ) -> Result<(), StoreError> {
        let ts = now();
        self.db.with_txn::<_, _, StoreError>(|txn| {
            let current = Self::current_status(txn, job_id)?;
            Self::check_transition(job_id, current, JobStatus::Done)?;
            job_repo::complete(
                txn,
                job_id,
                translated_text,
                price,
                JobStatus::Done.as_str(),
                &ts,
            )?;
            audit_repo::insert(
                txn,
                job_id,
                AuditKind::StatusChange.as_str(),
                "-> done",
                &ts,
            )?;
            Ok(())
        })
    }

    /// Translating -> Error. Records the failure message; no partial
    /// translated text survives.
    pub fn fail(&self, job_id: i64, message: &str) -> Result<(), StoreError> {
        let ts = now();
        self.db.with_txn::<_, _, StoreError>(|txn| {
            let current = Self::current_status(txn, job_id)?;
            Self::check_transition(job_id, current, JobStatus::Error)?;
            job_repo::fail(txn, job_id, message, JobStatus::Error.as_str(), &ts)?;
            audit_repo::insert(
                txn,
                job_id,
                AuditKind::Error.as_str(),
                &format!("error: {}", message),
                &ts,
            )?;
            Ok(())
        })
    }

    /// Stores the resolved original text and its word count. Not a status
    /// transition, so no audit event is written.
    pub fn set_source_text(
        &self,
        job_id: i64,
        original_text: &str,
        word_count: u64,
    ) -> Result<(), StoreError> {
        let ts = now();
        self.db
            .with_conn(|conn| job_repo::update_source_text(conn, job_id, original_text, word_count, &ts))?;
        Ok(())
    }

    pub fn find_by_id(&self, job_id: i64) -> Result<JobRow, StoreError> {
        self.db
            .with_conn(|conn| job_repo::find_by_id(conn, job_id))?
            .ok_or_else(|| StoreError::NotFound(format!("internal id {}", job_id)))
    }

    pub fn find_by_external_id(&self, external_id: &str) -> Result<JobRow, StoreError> {
        self.db
            .with_conn(|conn| job_repo::find_by_external_id(conn, external_id))?
            .ok_or_else(|| StoreError::NotFound(external_id.to_string()))
    }

    /// All jobs, most recent first.
    pub fn list_all(&self) -> Result<Vec<JobRow>, StoreError> {
        Ok(self.db.with_conn(job_repo::list_all)?)
    }

    /// The job's audit trail, oldest first.
    pub fn audit_trail(&self, job_id: i64) -> Result<Vec<AuditEventRow>, StoreError> {
        Ok(self.db.with_conn(|conn| audit_repo::list_for_job(conn, job_id))?)
    }

    /// Removes a job and its whole audit trail atomically. A `delete`
    /// event is appended inside the same transaction; the FK cascade
    /// removes it with the rest of the trail, so nothing survives.
    pub fn delete_by_external_id(&self, external_id: &str) -> Result<(), StoreError> {
        let ts = now();
        self.db.with_txn::<_, _, StoreError>(|txn| {
            let row = job_repo::find_by_external_id(txn, external_id)?
                .ok_or_else(|| StoreError::NotFound(external_id.to_string()))?;
            audit_repo::insert(
                txn,
                row.id,
                AuditKind::Delete.as_str(),
                "Job deleted by administrator",
                &ts,
            )?;
            job_repo::delete(txn, row.id)?;
            Ok(())
        })?;
        tracing::info!(job = external_id, "Job deleted");
        Ok(())
    }

    fn transition(
        &self,
        job_id: i64,
        to: JobStatus,
        describe: impl FnOnce(JobStatus) -> String,
    ) -> Result<(), StoreError> {
        let ts = now();
        self.db.with_txn::<_, _, StoreError>(|txn| {
            let current = Self::current_status(txn, job_id)?;
            Self::check_transition(job_id, current, to)?;
            job_repo::update_status(txn, job_id, to.as_str(), &ts)?;
            audit_repo::insert(
                txn,
                job_id,
                AuditKind::StatusChange.as_str(),
                &describe(current),
                &ts,
            )?;
            Ok(())
        })
    }

    fn current_status(
        conn: &rusqlite::Connection,
        job_id: i64,
    ) -> Result<JobStatus, StoreError> {
        let row = job_repo::find_by_id(conn, job_id)?
            .ok_or_else(|| StoreError::NotFound(format!("internal id {}", job_id)))?;
        JobStatus::parse(&row.status).ok_or(StoreError::CorruptStatus {
            id: job_id,
            status: row.status,
        })
    }

    fn check_transition(
        job_id: i64,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<(), StoreError> {
        if !from.can_transition_to(to) {
            tracing::warn!(job_id, %from, %to, "Rejected status transition");
            return Err(StoreError::InvalidTransition { from, to });
        }
        Ok(())
    }
}
