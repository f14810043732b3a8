use thiserror::Error;

use crate::job::store::StoreError;
use crate::translator::TranslateError;

/// Infrastructure failures that abort a pipeline run.
///
/// Extraction and translation failures are NOT in this enum: they are
/// recorded on the job (status Error) and the run still returns the job
/// row. Only a store that cannot be written makes the run itself fail.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Translator setup failed: {0}")]
    TranslatorSetup(#[from] TranslateError),
}
