//! End-to-end tests over the full service: intake, pipeline, job store,
//! downloads, and the administrative surface, on an in-memory database.

use traduki::config::{Config, TranslatorBackend};
use traduki::db::Database;
use traduki::job::{Domain, JobMeta};
use traduki::{FileUpload, IntakeError, IntakeRequest, ServiceError, StoreError, TranslationService};

const ADMIN_TOKEN: &str = "test-admin-token";

fn test_config() -> Config {
    Config {
        admin_token: ADMIN_TOKEN.to_string(),
        worker_count: 2,
        ..Default::default()
    }
}

fn test_service() -> TranslationService {
    service_with_config(test_config())
}

fn service_with_config(config: Config) -> TranslationService {
    let db = Database::open_in_memory().expect("in-memory database");
    TranslationService::from_config(&config, db).expect("service")
}

fn text_request(text: &str) -> IntakeRequest {
    IntakeRequest {
        pasted_text: Some(text.to_string()),
        ..Default::default()
    }
}

fn file_request(filename: &str, bytes: &[u8]) -> IntakeRequest {
    IntakeRequest {
        file: Some(FileUpload {
            bytes: bytes.to_vec(),
            filename: filename.to_string(),
        }),
        ..Default::default()
    }
}

#[test]
fn pasted_text_job_end_to_end() {
    let service = test_service();
    let snapshot = service
        .submit(text_request("hallo dokument angebot"))
        .unwrap();

    assert_eq!(snapshot.status, "done");
    assert_eq!(snapshot.translated_text.as_deref(), Some("hello document quote"));
    assert_eq!(snapshot.word_count, 3);
    assert_eq!(snapshot.price, 0.15);
    assert!(snapshot.error.is_none());
    assert!(snapshot.original_filename.is_none());

    let trail = service.audit_trail(&snapshot.external_id).unwrap();
    assert!(trail.len() >= 2);
    assert_eq!(trail[0].kind, "upload");
    assert_eq!(trail.last().unwrap().description, "-> done");
}

#[test]
fn glossary_rewrites_translated_text() {
    let service = test_service();
    let snapshot = service
        .submit(IntakeRequest {
            pasted_text: Some("hallo dokument".to_string()),
            meta: JobMeta {
                glossary_raw: "document => paper\nnot a rule line\nhello => hi".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

    assert_eq!(snapshot.translated_text.as_deref(), Some("hi paper"));
}

#[test]
fn legal_domain_raises_price() {
    let service = test_service();
    let snapshot = service
        .submit(IntakeRequest {
            pasted_text: Some("hallo hallo hallo hallo".to_string()),
            meta: JobMeta {
                domain: Domain::Legal,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

    // 4 words x 0.05 x 1.5
    assert_eq!(snapshot.price, 0.30);
}

#[test]
fn unsupported_extension_creates_no_job() {
    let service = test_service();
    let result = service.submit(file_request("payload.exe", b"MZ\x90\x00"));

    match result {
        Err(ServiceError::Intake(IntakeError::UnsupportedExtension(ext))) => {
            assert_eq!(ext, "exe")
        }
        other => panic!("Expected UnsupportedExtension, got {:?}", other.map(|s| s.status)),
    }

    assert!(service.admin_list(ADMIN_TOKEN).unwrap().is_empty());
}

#[test]
fn corrupt_file_ends_in_error_with_trail() {
    let service = test_service();
    let snapshot = service
        .submit(file_request("broken.docx", b"this is not a zip archive"))
        .unwrap();

    assert_eq!(snapshot.status, "error");
    assert!(snapshot.error.is_some());
    assert!(snapshot.translated_text.is_none());

    let kinds: Vec<String> = service
        .audit_trail(&snapshot.external_id)
        .unwrap()
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(kinds, vec!["upload", "status_change", "error"]);
}

#[test]
fn missing_remote_credentials_degrade_to_placeholder() {
    let mut config = test_config();
    config.translator.backend = TranslatorBackend::Remote;
    config.translator.api_url = "https://translate.example/translate".to_string();
    config.translator.api_key = None;
    let service = service_with_config(config);

    let snapshot = service.submit(text_request("hallo welt")).unwrap();

    assert_eq!(snapshot.status, "done");
    assert_eq!(
        snapshot.translated_text.as_deref(),
        Some("[untranslated de->en] hallo welt")
    );
}

#[test]
fn download_uses_original_filename_stem() {
    let service = test_service();
    let snapshot = service
        .submit(file_request("brief.txt", b"hallo kontakt"))
        .unwrap();
    assert_eq!(snapshot.status, "done");

    let artifact = service.download(&snapshot.external_id).unwrap();
    assert_eq!(artifact.filename, "brief.txt");
    assert_eq!(artifact.bytes, b"hello contact");
}

#[test]
fn download_for_pasted_text_uses_job_id() {
    let service = test_service();
    let snapshot = service.submit(text_request("hallo")).unwrap();

    let artifact = service.download(&snapshot.external_id).unwrap();
    assert_eq!(
        artifact.filename,
        format!("translation_{}.txt", snapshot.external_id)
    );
}

#[test]
fn failed_job_has_no_download() {
    let service = test_service();
    let snapshot = service
        .submit(file_request("broken.pdf", b"garbage bytes"))
        .unwrap();
    assert_eq!(snapshot.status, "error");

    match service.download(&snapshot.external_id) {
        Err(ServiceError::NotFinished { status }) => assert_eq!(status, "error"),
        other => panic!("Expected NotFinished, got {:?}", other.map(|a| a.filename)),
    }
}

#[test]
fn batch_items_are_independent_and_ordered() {
    let service = test_service();
    let results = service.submit_batch(vec![
        text_request("hallo"),
        file_request("nope.zip", b"x"),
        text_request("dokument"),
    ]);

    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap().translated_text.as_deref(),
        Some("hello")
    );
    assert!(matches!(
        results[1],
        Err(ServiceError::Intake(IntakeError::UnsupportedExtension(_)))
    ));
    assert_eq!(
        results[2].as_ref().unwrap().translated_text.as_deref(),
        Some("document")
    );
}

#[test]
fn large_batch_completes_with_few_workers() {
    // Far more items than the pool's channel capacity, on a single
    // worker: every item must still reach a terminal state.
    let mut config = test_config();
    config.worker_count = 1;
    let service = service_with_config(config);

    let requests: Vec<IntakeRequest> = (0..32)
        .map(|i| text_request(&format!("hallo dokument {}", i)))
        .collect();
    let results = service.submit_batch(requests);

    assert_eq!(results.len(), 32);
    for (i, result) in results.iter().enumerate() {
        let snapshot = result
            .as_ref()
            .unwrap_or_else(|e| panic!("item {} failed: {}", i, e));
        assert_eq!(snapshot.status, "done");
        assert_eq!(
            snapshot.translated_text.as_deref(),
            Some(format!("hello document {}", i).as_str())
        );
    }
}

#[test]
fn admin_rejection_is_uniform() {
    let service = test_service();
    let snapshot = service.submit(text_request("hallo")).unwrap();

    // Wrong token fails the same way for both operations, even when the
    // target job does not exist.
    let list_err = service.admin_list("wrong").unwrap_err();
    let delete_err = service.admin_delete("wrong", &snapshot.external_id).unwrap_err();
    let ghost_err = service.admin_delete("wrong", "no-such-job").unwrap_err();
    assert_eq!(list_err.to_string(), "Unauthorized");
    assert_eq!(delete_err.to_string(), "Unauthorized");
    assert_eq!(ghost_err.to_string(), "Unauthorized");
}

#[test]
fn admin_delete_removes_job_and_trail() {
    let service = test_service();
    let snapshot = service.submit(text_request("hallo")).unwrap();

    service
        .admin_delete(ADMIN_TOKEN, &snapshot.external_id)
        .unwrap();

    assert!(matches!(
        service.snapshot(&snapshot.external_id),
        Err(ServiceError::Store(StoreError::NotFound(_)))
    ));
    assert!(service.admin_list(ADMIN_TOKEN).unwrap().is_empty());
}

#[test]
fn admin_list_is_newest_first() {
    let service = test_service();
    let first = service.submit(text_request("hallo")).unwrap();
    let second = service.submit(text_request("dokument")).unwrap();

    let jobs = service.admin_list(ADMIN_TOKEN).unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].external_id, second.external_id);
    assert_eq!(jobs[1].external_id, first.external_id);
}

#[test]
fn snapshot_matches_submission() {
    let service = test_service();
    let submitted = service
        .submit(IntakeRequest {
            pasted_text: Some("beglaubigte übersetzung".to_string()),
            meta: JobMeta {
                contact: "client@example.com".to_string(),
                domain: Domain::Medical,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

    let fetched = service.snapshot(&submitted.external_id).unwrap();
    assert_eq!(fetched.status, "done");
    assert_eq!(fetched.contact, "client@example.com");
    assert_eq!(fetched.domain, "medical");
    assert_eq!(fetched.word_count, 2);
    // 2 words x 0.05 x 1.6
    assert_eq!(fetched.price, 0.16);
}
