//! Purpose: `meshwire` CLI entry point and command dispatch bootstrap.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable stdout formats (human or JSON by command/flags).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: All handle mutation goes through `api::Session` / `HandleStore`.
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};

mod command_dispatch;

use meshwire::api::{Error, ErrorKind, to_exit_code};
use meshwire::notice::{Notice, notice_json};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage).with_message(err.to_string()));
            }
        },
    };

    command_dispatch::dispatch_command(cli.command)
}

#[derive(Parser)]
#[command(
    name = "meshwire",
    version,
    about = "Repair and decode generation-service responses (message, image, 3D asset)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Normalize and parse captured response text (stdin when FILE absent)
    Parse {
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Print only the normalized JSON text, without validating the record
        #[arg(long)]
        normalized_only: bool,
    },
    /// Send a prompt to a running generation service and decode the response
    Send {
        prompt: String,
        /// Base URL of the service, e.g. http://localhost:8888
        #[arg(long)]
        url: String,
        /// Resume an existing conversation
        #[arg(long)]
        session: Option<String>,
        /// Write the decoded glTF payload to this path
        #[arg(long, value_hint = ValueHint::FilePath)]
        save_model: Option<PathBuf>,
        /// Write the decoded image payload to this path
        #[arg(long, value_hint = ValueHint::FilePath)]
        save_image: Option<PathBuf>,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {}", error_message(err));
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    err.message()
        .map(|message| message.to_string())
        .unwrap_or_else(|| format!("{:?}", err.kind()))
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn notice_time_now() -> Option<String> {
    use time::format_description::well_known::Rfc3339;
    let duration = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let ts = time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()?;
    ts.format(&Rfc3339).ok()
}

fn emit_notice(notice: &Notice) {
    if io::stderr().is_terminal() {
        eprintln!("notice: {} (stage: {})", notice.message, notice.stage);
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn degraded_notice(err: &Error) -> Notice {
    let mut details = Map::new();
    if let Some(field) = err.field() {
        details.insert("field".to_string(), json!(field));
    }
    Notice {
        kind: "degraded".to_string(),
        time: notice_time_now().unwrap_or_default(),
        stage: "decode".to_string(),
        message: format!("payload dropped: {}", error_message(err)),
        details,
    }
}
