//! Intake boundary and administrative surface.
//!
//! [`TranslationService`] validates incoming requests before any job
//! exists, runs them through the pipeline (inline for single submissions,
//! over a worker pool for batches), and exposes job snapshots, downloads,
//! audit trails, and the token-gated administrative operations.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::db::audit_repo::AuditEventRow;
use crate::db::job_repo::JobRow;
use crate::db::Database;
use crate::error::{IntakeError, WorkerError};
use crate::extract::{extension_of, SourceFormat};
use crate::job::store::StoreError;
use crate::job::{IntakeUnit, JobMeta};
use crate::pipeline::{Pipeline, PipelineError};
use crate::worker::{WorkItem, WorkOutcome, WorkerPool};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Intake rejected: {0}")]
    Intake(#[from] IntakeError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Deliberately carries no detail: every administrative rejection
    /// looks the same from outside.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Job is not finished (status: {status})")]
    NotFinished { status: String },
}

/// An uploaded file: raw bytes plus the client-declared name.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// One incoming submission: pasted text or a file, plus request metadata.
#[derive(Debug, Clone, Default)]
pub struct IntakeRequest {
    pub pasted_text: Option<String>,
    pub file: Option<FileUpload>,
    pub meta: JobMeta,
}

/// The externally visible view of a job. Internal row ids never leave the
/// crate.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub external_id: String,
    pub status: String,
    pub contact: String,
    pub source_lang: String,
    pub target_lang: String,
    pub domain: String,
    pub original_filename: Option<String>,
    pub word_count: u64,
    pub price: f64,
    pub translated_text: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&JobRow> for JobSnapshot {
    fn from(row: &JobRow) -> Self {
        Self {
            external_id: row.external_id.clone(),
            status: row.status.clone(),
            contact: row.contact.clone(),
            source_lang: row.source_lang.clone(),
            target_lang: row.target_lang.clone(),
            domain: row.domain.clone(),
            original_filename: row.original_filename.clone(),
            word_count: row.word_count,
            price: row.price,
            translated_text: row.translated_text.clone(),
            error: row.error.clone(),
            created_at: row.created_at.clone(),
            updated_at: row.updated_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEventSnapshot {
    pub kind: String,
    pub description: String,
    pub created_at: String,
}

impl From<&AuditEventRow> for AuditEventSnapshot {
    fn from(row: &AuditEventRow) -> Self {
        Self {
            kind: row.kind.clone(),
            description: row.description.clone(),
            created_at: row.created_at.clone(),
        }
    }
}

/// The finished translation as a downloadable text file.
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Validates one request into a unit of work. Rejections here happen
/// before any job record exists.
pub fn validate_intake(request: &IntakeRequest) -> Result<IntakeUnit, IntakeError> {
    let text = request
        .pasted_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match (text, &request.file) {
        (Some(_), Some(_)) => Err(IntakeError::BothSources),
        (None, None) => Err(IntakeError::Empty),
        (Some(text), None) => Ok(IntakeUnit::Text(text.to_string())),
        (None, Some(file)) => {
            let ext = extension_of(&file.filename);
            if SourceFormat::from_extension(ext).is_none() {
                return Err(IntakeError::UnsupportedExtension(ext.to_string()));
            }
            Ok(IntakeUnit::File {
                bytes: file.bytes.clone(),
                filename: file.filename.clone(),
            })
        }
    }
}

pub struct TranslationService {
    pipeline: Arc<Pipeline>,
    admin_token: String,
    worker_count: usize,
}

impl TranslationService {
    pub fn from_config(config: &Config, db: Database) -> Result<Self, ServiceError> {
        Ok(Self {
            pipeline: Arc::new(Pipeline::from_config(config, db)?),
            admin_token: config.admin_token.clone(),
            worker_count: config.worker_count.max(1),
        })
    }

    #[cfg(test)]
    pub fn new(pipeline: Pipeline, admin_token: &str, worker_count: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            admin_token: admin_token.to_string(),
            worker_count: worker_count.max(1),
        }
    }

    /// Runs one submission through the whole pipeline and returns the
    /// final snapshot. A job that ended in status Error is still `Ok`.
    pub fn submit(&self, request: IntakeRequest) -> Result<JobSnapshot, ServiceError> {
        let unit = validate_intake(&request)?;
        let row = self.pipeline.run(unit, request.meta)?;
        Ok(JobSnapshot::from(&row))
    }

    /// Processes a batch over a worker pool. Items are independent: an
    /// invalid item is rejected in place and the rest still run. Results
    /// come back in submission order.
    pub fn submit_batch(
        &self,
        requests: Vec<IntakeRequest>,
    ) -> Vec<Result<JobSnapshot, ServiceError>> {
        let mut slots: Vec<Result<JobSnapshot, ServiceError>> = Vec::with_capacity(requests.len());
        let mut accepted: Vec<WorkItem> = Vec::new();

        for (index, request) in requests.into_iter().enumerate() {
            match validate_intake(&request) {
                Ok(unit) => {
                    slots.push(Err(ServiceError::Worker(WorkerError::ChannelClosed)));
                    accepted.push(WorkItem {
                        index,
                        unit,
                        meta: request.meta,
                    });
                }
                Err(e) => slots.push(Err(ServiceError::Intake(e))),
            }
        }

        if accepted.is_empty() {
            return slots;
        }

        let workers = self.worker_count.min(accepted.len());
        let pool = WorkerPool::new(Arc::clone(&self.pipeline), workers);

        // Both pool channels are bounded, so finished results must be
        // drained while submitting: a full result channel stalls every
        // worker mid-`send`, and with the item channel also full a plain
        // submit loop would block forever on batches larger than the
        // channel capacity.
        let mut pending = 0usize;
        for item in accepted {
            let index = item.index;
            while let Some(outcome) = pool.try_recv_result() {
                Self::record_outcome(&mut slots, outcome);
                pending -= 1;
            }
            match pool.submit(item) {
                Ok(()) => pending += 1,
                Err(e) => slots[index] = Err(ServiceError::Worker(e)),
            }
        }

        while pending > 0 {
            match pool.recv_result() {
                Some(outcome) => {
                    Self::record_outcome(&mut slots, outcome);
                    pending -= 1;
                }
                None => break,
            }
        }

        pool.shutdown();
        pool.wait();
        slots
    }

    fn record_outcome(slots: &mut [Result<JobSnapshot, ServiceError>], outcome: WorkOutcome) {
        slots[outcome.index] = outcome
            .result
            .map(|row| JobSnapshot::from(&row))
            .map_err(ServiceError::Pipeline);
    }

    pub fn snapshot(&self, external_id: &str) -> Result<JobSnapshot, ServiceError> {
        let row = self.pipeline.store().find_by_external_id(external_id)?;
        Ok(JobSnapshot::from(&row))
    }

    /// The finished translation as a download. Only jobs in status Done
    /// have one.
    pub fn download(&self, external_id: &str) -> Result<DownloadArtifact, ServiceError> {
        let row = self.pipeline.store().find_by_external_id(external_id)?;
        let Some(translated) = row.translated_text else {
            return Err(ServiceError::NotFinished { status: row.status });
        };

        let filename = match row.original_filename.as_deref() {
            Some(name) => {
                let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
                format!("{}.txt", stem)
            }
            None => format!("translation_{}.txt", row.external_id),
        };

        Ok(DownloadArtifact {
            filename,
            bytes: translated.into_bytes(),
        })
    }

    pub fn audit_trail(&self, external_id: &str) -> Result<Vec<AuditEventSnapshot>, ServiceError> {
        let row = self.pipeline.store().find_by_external_id(external_id)?;
        let events = self.pipeline.store().audit_trail(row.id)?;
        Ok(events.iter().map(AuditEventSnapshot::from).collect())
    }

    /// All jobs newest-first. Administrative.
    pub fn admin_list(&self, token: &str) -> Result<Vec<JobSnapshot>, ServiceError> {
        self.authorize(token)?;
        let rows = self.pipeline.store().list_all()?;
        Ok(rows.iter().map(JobSnapshot::from).collect())
    }

    /// Removes a job and its audit trail. Administrative.
    pub fn admin_delete(&self, token: &str, external_id: &str) -> Result<(), ServiceError> {
        self.authorize(token)?;
        self.pipeline.store().delete_by_external_id(external_id)?;
        Ok(())
    }

    // Token check runs before anything else so every rejection is
    // indistinguishable from outside.
    fn authorize(&self, token: &str) -> Result<(), ServiceError> {
        if token != self.admin_token {
            tracing::warn!("Rejected administrative request");
            return Err(ServiceError::Unauthorized);
        }
        Ok(())
    }
}
