//! Command-line front end for the translation job service.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use traduki::db::{default_database_path, Database};
use traduki::job::{Domain, JobMeta};
use traduki::{
    load_config, Config, FileUpload, IntakeRequest, ServiceError, TranslationService,
};

const USAGE: &str = "\
traduki — translation job service

USAGE:
    traduki [--config <path>] <command> [args]

COMMANDS:
    submit-text <text> [meta options]      Submit pasted text
    submit-file <path> [meta options]      Submit a document (txt, pdf, docx)
    status <job-id>                        Show one job
    download <job-id> [--out <dir>]        Save the finished translation
    trail <job-id>                         Show a job's audit trail
    list --token <token>                   List all jobs (administrative)
    delete <job-id> --token <token>        Delete a job (administrative)

META OPTIONS:
    --contact <email>    --source <lang>   --target <lang>
    --domain <name>      --glossary <rules, lines of 'a => b'>
";

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    // Library internals log via `log`; route everything through tracing.
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn run(mut args: Vec<String>) -> Result<(), String> {
    let config = match take_option(&mut args, "--config")? {
        Some(path) => load_config(PathBuf::from(path)).map_err(|e| e.to_string())?,
        None => Config::default(),
    };

    let mut args = args.into_iter();
    let command = args.next().ok_or_else(|| USAGE.to_string())?;
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "submit-text" => cmd_submit_text(&config, rest),
        "submit-file" => cmd_submit_file(&config, rest),
        "status" => cmd_status(&config, rest),
        "download" => cmd_download(&config, rest),
        "trail" => cmd_trail(&config, rest),
        "list" => cmd_list(&config, rest),
        "delete" => cmd_delete(&config, rest),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => Err(format!("Unknown command '{}'\n\n{}", other, USAGE)),
    }
}

fn service(config: &Config) -> Result<TranslationService, String> {
    let path = match &config.database_path {
        Some(path) => path.clone(),
        None => default_database_path().ok_or("Cannot determine the home directory")?,
    };
    let db = Database::open(&path).map_err(|e| e.to_string())?;
    TranslationService::from_config(config, db).map_err(|e| e.to_string())
}

/// Removes `--name value` from the argument list if present.
fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(format!("{} requires a value", name));
    }
    args.remove(pos);
    Ok(Some(args.remove(pos)))
}

fn parse_meta(config: &Config, args: &mut Vec<String>) -> Result<JobMeta, String> {
    Ok(JobMeta {
        contact: take_option(args, "--contact")?.unwrap_or_default(),
        source_lang: take_option(args, "--source")?.unwrap_or_else(|| config.source_lang.clone()),
        target_lang: take_option(args, "--target")?.unwrap_or_else(|| config.target_lang.clone()),
        domain: Domain::parse(&take_option(args, "--domain")?.unwrap_or_default()),
        glossary_raw: take_option(args, "--glossary")?.unwrap_or_default(),
        ..Default::default()
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", rendered);
    Ok(())
}

fn cmd_submit_text(config: &Config, mut args: Vec<String>) -> Result<(), String> {
    let meta = parse_meta(config, &mut args)?;
    let text = args
        .first()
        .cloned()
        .ok_or("submit-text requires the text argument")?;

    let snapshot = service(config)?
        .submit(IntakeRequest {
            pasted_text: Some(text),
            file: None,
            meta,
        })
        .map_err(|e| e.to_string())?;
    print_json(&snapshot)
}

fn cmd_submit_file(config: &Config, mut args: Vec<String>) -> Result<(), String> {
    let meta = parse_meta(config, &mut args)?;
    let path = PathBuf::from(
        args.first()
            .cloned()
            .ok_or("submit-file requires the file path")?,
    );
    let bytes =
        std::fs::read(&path).map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| format!("No filename in {}", path.display()))?;

    let snapshot = service(config)?
        .submit(IntakeRequest {
            pasted_text: None,
            file: Some(FileUpload { bytes, filename }),
            meta,
        })
        .map_err(|e| e.to_string())?;
    print_json(&snapshot)
}

fn cmd_status(config: &Config, args: Vec<String>) -> Result<(), String> {
    let id = args.first().ok_or("status requires the job id")?;
    let snapshot = service(config)?.snapshot(id).map_err(|e| e.to_string())?;
    print_json(&snapshot)
}

fn cmd_download(config: &Config, mut args: Vec<String>) -> Result<(), String> {
    let out_dir = take_option(&mut args, "--out")?.map(PathBuf::from);
    let id = args.first().ok_or("download requires the job id")?;

    let artifact = service(config)?.download(id).map_err(|e| e.to_string())?;
    let target = out_dir.unwrap_or_else(|| PathBuf::from(".")).join(&artifact.filename);
    std::fs::write(&target, &artifact.bytes)
        .map_err(|e| format!("Cannot write {}: {}", target.display(), e))?;
    println!("{}", target.display());
    Ok(())
}

fn cmd_trail(config: &Config, args: Vec<String>) -> Result<(), String> {
    let id = args.first().ok_or("trail requires the job id")?;
    let events = service(config)?.audit_trail(id).map_err(|e| e.to_string())?;
    print_json(&events)
}

fn cmd_list(config: &Config, mut args: Vec<String>) -> Result<(), String> {
    let token = take_option(&mut args, "--token")?.unwrap_or_default();
    let jobs = service(config)?
        .admin_list(&token)
        .map_err(render_admin_error)?;
    print_json(&jobs)
}

fn cmd_delete(config: &Config, mut args: Vec<String>) -> Result<(), String> {
    let token = take_option(&mut args, "--token")?.unwrap_or_default();
    let id = args.first().ok_or("delete requires the job id")?;
    service(config)?
        .admin_delete(&token, id)
        .map_err(render_admin_error)?;
    println!("deleted {}", id);
    Ok(())
}

fn render_admin_error(e: ServiceError) -> String {
    match e {
        ServiceError::Unauthorized => "Unauthorized".to_string(),
        other => other.to_string(),
    }
}
