use tracing::{debug, info_span, warn};

use crate::config::Config;
use crate::db::job_repo::JobRow;
use crate::db::Database;
use crate::extract::ExtractorRegistry;
use crate::glossary::Glossary;
use crate::job::store::JobStore;
use crate::job::{IntakeUnit, JobMeta};
use crate::pricing;
use crate::translator::{resolve_direction, FallbackChain, Translator};

use super::context::PipelineContext;
use super::error::PipelineError;

pub struct Pipeline {
    store: JobStore,
    extractor: ExtractorRegistry,
    translator: FallbackChain,
    default_source: String,
    default_target: String,
}

impl Pipeline {
    /// Production constructor — builds all sub-components from config.
    pub fn from_config(config: &Config, db: Database) -> Result<Self, PipelineError> {
        Ok(Self {
            store: JobStore::new(db),
            extractor: ExtractorRegistry::new(),
            translator: FallbackChain::from_config(&config.translator)?,
            default_source: config.source_lang.clone(),
            default_target: config.target_lang.clone(),
        })
    }

    /// Test constructor — inject specific sub-components.
    #[cfg(test)]
    pub fn new(
        store: JobStore,
        extractor: ExtractorRegistry,
        translator: FallbackChain,
        default_source: &str,
        default_target: &str,
    ) -> Self {
        Self {
            store,
            extractor,
            translator,
            default_source: default_source.to_string(),
            default_target: default_target.to_string(),
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Run the full pipeline for one unit of work. Returns the final job
    /// row; a job that ends in status Error is still an `Ok` result, since
    /// the outcome is recorded where it belongs.
    pub fn run(&self, unit: IntakeUnit, meta: JobMeta) -> Result<JobRow, PipelineError> {
        let mut ctx = PipelineContext::new(unit, self.normalize_meta(meta));

        // Step 1: Create the job record
        let (job_id, external_id) = {
            let _step = info_span!("create_job").entered();
            self.step_create(&mut ctx)?
        };

        let _pipeline_span = info_span!("pipeline", job = %external_id).entered();

        // Step 2: Claim the job for translation
        {
            let _step = info_span!("begin_translating").entered();
            self.store.begin_translating(job_id)?;
        }

        // Step 3: Resolve the source text (extract when a file was uploaded)
        {
            let _step = info_span!("resolve_text").entered();
            if let Err(e) = self.step_resolve_text(&mut ctx) {
                warn!(job = %external_id, error = %e, "Text extraction failed");
                self.store.fail(job_id, &e)?;
                return self.store.find_by_id(job_id).map_err(Into::into);
            }
        }

        // Step 4: Persist the original text and word count
        {
            let _step = info_span!("store_source_text").entered();
            self.step_store_source(&mut ctx, job_id)?;
        }

        // Step 5: Pick the effective direction
        {
            let _step = info_span!("resolve_direction").entered();
            self.step_resolve_direction(&mut ctx);
        }

        // Step 6: Translate
        {
            let _step = info_span!("translate").entered();
            if let Err(e) = self.step_translate(&mut ctx) {
                warn!(job = %external_id, error = %e, "Translation failed");
                self.store.fail(job_id, &e)?;
                return self.store.find_by_id(job_id).map_err(Into::into);
            }
        }

        // Step 7: Apply the job's glossary
        {
            let _step = info_span!("apply_glossary").entered();
            self.step_apply_glossary(&mut ctx);
        }

        // Step 8: Price and finish
        {
            let _step = info_span!("complete_job").entered();
            self.step_complete(&mut ctx, job_id)?;
        }

        self.store.find_by_id(job_id).map_err(Into::into)
    }

    /// Empty languages fall back to the configured defaults.
    fn normalize_meta(&self, mut meta: JobMeta) -> JobMeta {
        if meta.source_lang.trim().is_empty() {
            meta.source_lang = self.default_source.clone();
        }
        if meta.target_lang.trim().is_empty() {
            meta.target_lang = self.default_target.clone();
        }
        meta
    }

    /// Creates the job row and hands its identifiers back to the caller,
    /// so later steps never have to guess whether a job exists yet.
    fn step_create(&self, ctx: &mut PipelineContext) -> Result<(i64, String), PipelineError> {
        let filename = ctx.unit.original_filename().map(str::to_string);
        let job = self.store.create(&ctx.meta, filename.as_deref())?;
        ctx.source_lang = job.source_lang.clone();
        ctx.target_lang = job.target_lang.clone();
        Ok((job.id, job.external_id))
    }

    fn step_resolve_text(&self, ctx: &mut PipelineContext) -> Result<(), String> {
        let text = match &ctx.unit {
            IntakeUnit::Text(text) => text.clone(),
            IntakeUnit::File { bytes, filename } => self
                .extractor
                .extract(bytes, filename)
                .map_err(|e| e.to_string())?,
        };
        ctx.source_text = Some(text);
        Ok(())
    }

    fn step_store_source(&self, ctx: &mut PipelineContext, job_id: i64) -> Result<(), PipelineError> {
        let text = ctx.source_text.as_deref().unwrap_or_default();
        ctx.word_count = pricing::word_count(text);
        self.store.set_source_text(job_id, text, ctx.word_count)?;
        Ok(())
    }

    fn step_resolve_direction(&self, ctx: &mut PipelineContext) {
        let text = ctx.source_text.as_deref().unwrap_or_default();
        let (source, target) = resolve_direction(text, &ctx.source_lang, &ctx.target_lang);
        debug!(source, target, "Resolved translation direction");
        ctx.source_lang = source;
        ctx.target_lang = target;
    }

    fn step_translate(&self, ctx: &mut PipelineContext) -> Result<(), String> {
        let text = ctx.source_text.as_deref().unwrap_or_default();
        let translated = self
            .translator
            .translate(text, &ctx.source_lang, &ctx.target_lang)
            .map_err(|e| e.to_string())?;
        ctx.translated_text = Some(translated);
        Ok(())
    }

    fn step_apply_glossary(&self, ctx: &mut PipelineContext) {
        if ctx.meta.glossary_raw.trim().is_empty() {
            return;
        }
        let glossary = Glossary::parse(&ctx.meta.glossary_raw);
        if let Some(translated) = ctx.translated_text.take() {
            ctx.translated_text = Some(glossary.apply(&translated));
        }
    }

    fn step_complete(&self, ctx: &mut PipelineContext, job_id: i64) -> Result<(), PipelineError> {
        ctx.price = pricing::price(ctx.word_count, ctx.meta.domain);
        let translated = ctx.translated_text.as_deref().unwrap_or_default();
        self.store.complete(job_id, translated, ctx.price)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::RuleTranslator;
    use crate::Domain;

    fn test_pipeline() -> Pipeline {
        let db = Database::open_in_memory().unwrap();
        Pipeline::new(
            JobStore::new(db),
            ExtractorRegistry::new(),
            FallbackChain::new(vec![Box::new(RuleTranslator::new())]),
            "de",
            "en",
        )
    }

    fn meta() -> JobMeta {
        JobMeta {
            contact: "client@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_text_job_reaches_done() {
        let pipeline = test_pipeline();
        let job = pipeline
            .run(IntakeUnit::Text("hallo dokument".to_string()), meta())
            .unwrap();

        assert_eq!(job.status, "done");
        assert_eq!(job.translated_text.as_deref(), Some("hello document"));
        assert_eq!(job.word_count, 2);
        assert_eq!(job.price, 0.10);
        assert!(job.error.is_none());
    }

    #[test]
    fn test_default_languages_applied() {
        let pipeline = test_pipeline();
        let job = pipeline
            .run(IntakeUnit::Text("hallo".to_string()), meta())
            .unwrap();
        assert_eq!(job.source_lang, "de");
        assert_eq!(job.target_lang, "en");
    }

    #[test]
    fn test_txt_file_job() {
        let pipeline = test_pipeline();
        let job = pipeline
            .run(
                IntakeUnit::File {
                    bytes: b"angebot kontakt".to_vec(),
                    filename: "anfrage.txt".to_string(),
                },
                meta(),
            )
            .unwrap();

        assert_eq!(job.status, "done");
        assert_eq!(job.original_filename.as_deref(), Some("anfrage.txt"));
        assert_eq!(job.translated_text.as_deref(), Some("quote contact"));
    }

    #[test]
    fn test_corrupt_file_ends_in_error() {
        let pipeline = test_pipeline();
        let job = pipeline
            .run(
                IntakeUnit::File {
                    bytes: b"not a zip archive".to_vec(),
                    filename: "broken.docx".to_string(),
                },
                meta(),
            )
            .unwrap();

        assert_eq!(job.status, "error");
        assert!(job.error.is_some());
        assert!(job.translated_text.is_none());

        let trail = pipeline.store().audit_trail(job.id).unwrap();
        assert!(trail.len() >= 2);
        assert_eq!(trail.last().unwrap().kind, "error");
    }

    #[test]
    fn test_glossary_overrides_translation() {
        let pipeline = test_pipeline();
        let job = pipeline
            .run(
                IntakeUnit::Text("hallo dokument".to_string()),
                JobMeta {
                    glossary_raw: "document => paper".to_string(),
                    ..meta()
                },
            )
            .unwrap();

        assert_eq!(job.translated_text.as_deref(), Some("hello paper"));
    }

    #[test]
    fn test_domain_affects_price() {
        let pipeline = test_pipeline();
        let job = pipeline
            .run(
                IntakeUnit::Text("hallo hallo hallo hallo".to_string()),
                JobMeta {
                    domain: Domain::Legal,
                    ..meta()
                },
            )
            .unwrap();
        // 4 words x 0.05 x 1.5
        assert_eq!(job.price, 0.30);
    }

    #[test]
    fn test_english_input_flips_direction() {
        let pipeline = test_pipeline();
        let text = "The contracting parties hereby agree that the document must be \
                    certified and translated before signing the final hello contract.";
        let job = pipeline
            .run(IntakeUnit::Text(text.to_string()), meta())
            .unwrap();

        assert_eq!(job.status, "done");
        // Direction flipped to en->de, so known English tokens map to German.
        let translated = job.translated_text.unwrap();
        assert!(translated.contains("dokument"));
        assert!(translated.contains("hallo"));
    }

    #[test]
    fn test_failing_translator_records_error() {
        struct AlwaysFails;
        impl Translator for AlwaysFails {
            fn name(&self) -> &'static str {
                "always-fails"
            }
            fn translate(
                &self,
                _: &str,
                _: &str,
                _: &str,
            ) -> Result<String, crate::translator::TranslateError> {
                Err(crate::translator::TranslateError::Remote("boom".into()))
            }
        }

        let db = Database::open_in_memory().unwrap();
        let pipeline = Pipeline::new(
            JobStore::new(db),
            ExtractorRegistry::new(),
            FallbackChain::new(vec![Box::new(AlwaysFails)]),
            "de",
            "en",
        );

        let job = pipeline
            .run(IntakeUnit::Text("hallo".to_string()), meta())
            .unwrap();
        assert_eq!(job.status, "error");
        assert!(job.error.as_deref().unwrap_or_default().contains("boom"));
        // Word count survives even though translation failed.
        assert_eq!(job.word_count, 1);
    }

    #[test]
    fn test_empty_text_prices_to_zero() {
        let pipeline = test_pipeline();
        let job = pipeline
            .run(IntakeUnit::Text("   ".to_string()), meta())
            .unwrap();
        assert_eq!(job.status, "done");
        assert_eq!(job.word_count, 0);
        assert_eq!(job.price, 0.0);
    }
}
