use crate::job::{IntakeUnit, JobMeta};

pub struct PipelineContext {
    // Input
    pub unit: IntakeUnit,
    pub meta: JobMeta,

    // Step 3 result — guaranteed Some after step_resolve_text
    pub source_text: Option<String>,
    pub word_count: u64,

    // Step 5 result — effective direction after detection
    pub source_lang: String,
    pub target_lang: String,

    // Step 6/7 result — guaranteed Some after step_translate
    pub translated_text: Option<String>,
    pub price: f64,
}

impl PipelineContext {
    pub fn new(unit: IntakeUnit, meta: JobMeta) -> Self {
        let source_lang = meta.source_lang.clone();
        let target_lang = meta.target_lang.clone();
        Self {
            unit,
            meta,
            source_text: None,
            word_count: 0,
            source_lang,
            target_lang,
            translated_text: None,
            price: 0.0,
        }
    }
}
