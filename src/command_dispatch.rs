//! Purpose: Hold top-level CLI command dispatch for `meshwire`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Command output envelopes and exit code semantics stay unchanged.
//! Invariants: Decoded payload bytes never land on stdout; only sizes and addresses do.

use super::*;

use meshwire::api::{
    HttpTransport, PayloadKind, Session, export, normalize, parse_normalized,
};
use std::io::Read;

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::aot::generate(shell, &mut cmd, "meshwire", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Parse {
            file,
            normalized_only,
        } => {
            let raw = read_input(file.as_deref())?;
            let normalized = normalize(&raw);
            if normalized_only {
                println!("{normalized}");
                return Ok(RunOutcome::ok());
            }
            let record = parse_normalized(&normalized)?;
            let record_value = serde_json::to_value(&record).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to encode record json")
                    .with_source(err)
            })?;
            emit_json(record_value);
            Ok(RunOutcome::ok())
        }
        Command::Send {
            prompt,
            url,
            session,
            save_model,
            save_image,
        } => {
            let transport = HttpTransport::new(url)?;
            let mut driver = Session::new(Box::new(transport));
            if let Some(id) = session {
                driver = driver.with_session_id(id);
            }

            let exchange = driver.send(&prompt)?;
            for warning in &exchange.warnings {
                emit_notice(&degraded_notice(warning));
            }

            let mut out = Map::new();
            out.insert("message".to_string(), json!(exchange.record.message));
            out.insert("session_id".to_string(), json!(driver.session_id()));
            for handle in [exchange.image, exchange.asset].into_iter().flatten() {
                if let Some(resource) = driver.resource(handle) {
                    out.insert(
                        handle.slot().field_name().to_string(),
                        json!({
                            "media_type": resource.media_type(),
                            "bytes": resource.len(),
                            "address": handle.address(),
                        }),
                    );
                }
            }

            if let Some(path) = save_model {
                let path = resolve_export_path(path, PayloadKind::Asset);
                let written = driver.export_asset(&path)?;
                out.insert(
                    "model_path".to_string(),
                    json!(written.display().to_string()),
                );
            }
            if let Some(path) = save_image {
                let path = resolve_export_path(path, PayloadKind::Image);
                let written = save_image_payload(&driver, &path)?;
                out.insert(
                    "image_path".to_string(),
                    json!(written.display().to_string()),
                );
            }

            emit_json(Value::Object(out));
            Ok(RunOutcome::ok())
        }
    }
}

// A directory target gets the payload's conventional filename appended.
fn resolve_export_path(path: PathBuf, kind: PayloadKind) -> PathBuf {
    if path.is_dir() {
        path.join(kind.default_filename())
    } else {
        path
    }
}

fn save_image_payload(driver: &Session, path: &std::path::Path) -> Result<PathBuf, Error> {
    let handle = driver.live_handle(PayloadKind::Image).ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("no image payload available to export")
            .with_hint("Send a prompt that produces an image first.")
    })?;
    let resource = driver
        .resource(handle)
        .ok_or_else(|| Error::new(ErrorKind::Internal).with_message("live image handle has no backing resource"))?;
    export(resource, path)
}

fn read_input(file: Option<&std::path::Path>) -> Result<String, Error> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read input file")
                .with_path(path)
                .with_source(err)
        }),
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(raw)
        }
    }
}
