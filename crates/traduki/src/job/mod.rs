pub mod store;

use std::fmt;

/// Lifecycle states of a translation job.
///
/// Transitions are monotonic: `Uploaded -> Translating -> {Done, Error}`.
/// Done and Error are terminal; a failed job is resubmitted as a new job,
/// never retried in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Uploaded,
    Translating,
    Done,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Translating => "translating",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploaded" => Some(Self::Uploaded),
            "translating" => Some(Self::Translating),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Uploaded, Self::Translating)
                | (Self::Translating, Self::Done)
                | (Self::Translating, Self::Error)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject-matter category of a job, used for pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Domain {
    Legal,
    Medical,
    Technical,
    #[default]
    Other,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Medical => "medical",
            Self::Technical => "technical",
            Self::Other => "other",
        }
    }

    /// Unknown or empty values map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "legal" => Self::Legal,
            "medical" => Self::Medical,
            "technical" => Self::Technical,
            _ => Self::Other,
        }
    }
}

/// Kinds of audit events recorded against a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    Upload,
    StatusChange,
    Error,
    Delete,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::StatusChange => "status_change",
            Self::Error => "error",
            Self::Delete => "delete",
        }
    }
}

/// Request metadata accompanying one unit of work. Languages fall back to
/// the configured defaults when empty.
#[derive(Debug, Clone, Default)]
pub struct JobMeta {
    pub contact: String,
    pub source_lang: String,
    pub target_lang: String,
    pub domain: Domain,
    pub tone: String,
    pub deadline: String,
    pub intent: String,
    pub glossary_raw: String,
}

/// One validated unit of work: pasted text or an uploaded file.
#[derive(Debug, Clone)]
pub enum IntakeUnit {
    Text(String),
    File { bytes: Vec<u8>, filename: String },
}

impl IntakeUnit {
    pub fn original_filename(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::File { filename, .. } => Some(filename),
        }
    }
}
