mod command;
mod terminal;

use std::sync::Arc;
use std::time::Instant;
use std::{fs, path::Path};

use anyhow::{Context, Result};
use command::{Command, HELP};
use config::{AppConfig, ConfigStore};
use scribe_ai::{GeminiClient, WritingAssistant};
use scribe_services::{Session, SessionBuilder};
use scribe_store::{KeyValueStore, NoteStore, SqliteKeyValueStore};
use terminal::Osc52Clipboard;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let mut data_dir = dirs::data_local_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    data_dir.push("scribe");
    if let Err(err) = fs::create_dir_all(&data_dir) {
        eprintln!("failed to prepare data dir: {err}");
    }
    let _log_guard = init_local_logger(&data_dir.join("logs"));

    let config_store = config_store(&data_dir);
    info!(path = %config_store.path().display(), "loading config");
    let config = match config_store.load_or_init() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to load config: {err}");
            AppConfig::default()
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to create tokio runtime: {err}");
            return;
        }
    };

    let session = match build_session(&config, &data_dir) {
        Ok(session) => session,
        Err(err) => {
            error!("failed to start session: {err:#}");
            eprintln!("failed to start: {err:#}");
            return;
        }
    };

    if let Err(err) = runtime.block_on(run(session)) {
        error!("session ended with error: {err:#}");
        eprintln!("{err:#}");
    }
}

/// The platform config dir, or `<data_dir>/config` when it cannot be resolved.
fn config_store(data_dir: &Path) -> ConfigStore {
    ConfigStore::from_default_location().unwrap_or_else(|err| {
        error!("{err:#}, falling back to the data dir");
        ConfigStore::from_dir(data_dir.join("config"))
    })
}

fn build_session(config: &AppConfig, data_dir: &Path) -> Result<Session> {
    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::open(
        data_dir.join(&config.storage.database_file),
    )?);
    let notes = match NoteStore::load(kv.clone(), &config.storage.notes_key) {
        Ok(notes) => notes,
        Err(err) => {
            error!("failed to load notes, starting empty: {err:#}");
            NoteStore::empty(kv, &config.storage.notes_key)
        }
    };

    let backend = GeminiClient::new(&config.ai).context("failed to build model client")?;
    info!(model = backend.model(), "model client ready");
    let assistant = WritingAssistant::new(Arc::new(backend));

    Ok(SessionBuilder::new(notes, assistant)
        .with_config(config)
        .with_clipboard(Arc::new(Osc52Clipboard))
        .build())
}

async fn run(mut session: Session) -> Result<()> {
    println!("{}", session.i18n().t("app.title"));
    println!("{}", session.header_label());
    let mut last_shown = print_notice(&session, None);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        dispatch(&mut session, command).await;
        last_shown = print_notice(&session, last_shown);
    }

    info!("session closed");
    Ok(())
}

async fn dispatch(session: &mut Session, command: Command) {
    match command {
        Command::Type(text) => {
            let mut draft = session.draft().to_owned();
            if !draft.is_empty() {
                draft.push('\n');
            }
            draft.push_str(&text);
            session.set_draft(draft);
        }
        Command::Replace(text) => session.set_draft(text),
        Command::Show => {
            println!("{}", session.header_label());
            println!("{}", session.draft());
        }
        Command::Analyze => {
            session.request_analysis().await;
            print_suggestions(session);
        }
        Command::Rewrite(tone) => {
            session.request_rewrite(tone).await;
            print_suggestions(session);
        }
        Command::Suggestions => print_suggestions(session),
        Command::Apply(index) => match session.apply_suggestion(index) {
            Ok(_) => println!("{}", session.draft()),
            Err(err) => println!("{err}"),
        },
        Command::Dismiss(index) => {
            if let Err(err) = session.dismiss_suggestion(index) {
                println!("{err}");
            }
        }
        Command::Save => {
            if let Err(err) = session.save().await {
                error!("save failed: {err:#}");
            }
            println!("{}", session.header_label());
        }
        Command::New => {
            session.new_note();
            println!("{}", session.header_label());
        }
        Command::Notes => print_notes(session),
        Command::Open(index) => match note_id_at(session, index) {
            Some(id) => match session.open_note(&id) {
                Ok(()) => {
                    println!("{}", session.header_label());
                    println!("{}", session.draft());
                }
                Err(err) => println!("{err}"),
            },
            None => println!("no note {}", index + 1),
        },
        Command::Delete(index) => match note_id_at(session, index) {
            Some(id) => {
                if let Err(err) = session.delete_note(&id) {
                    error!("delete failed: {err:#}");
                }
            }
            None => println!("no note {}", index + 1),
        },
        Command::Copy => {
            session.copy_draft();
        }
        Command::Record => {
            session.toggle_recording();
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn note_id_at(session: &Session, index: usize) -> Option<String> {
    session.notes().get(index).map(|note| note.id.clone())
}

fn print_suggestions(session: &Session) {
    for (position, suggestion) in session.suggestions().iter().enumerate() {
        println!(
            "{}. [{:?}] {} -> {} ({})",
            position + 1,
            suggestion.kind,
            suggestion.original,
            suggestion.replacement,
            suggestion.explanation
        );
    }
}

fn print_notes(session: &Session) {
    let active = session.active_note_id();
    for (position, note) in session.notes().iter().enumerate() {
        let marker = if Some(note.id.as_str()) == active { "*" } else { " " };
        println!("{marker}{}. {}", position + 1, note.title);
    }
}

/// Prints the current notice unless it was already shown. Returns the
/// timestamp of the last notice printed.
fn print_notice(session: &Session, last_shown: Option<Instant>) -> Option<Instant> {
    let Some(notice) = session.notice() else {
        return last_shown;
    };
    if Some(notice.raised_at) == last_shown {
        return last_shown;
    }
    println!("» {}", notice.message);
    Some(notice.raised_at)
}

fn init_local_logger(log_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    if let Err(err) = fs::create_dir_all(log_dir) {
        eprintln!("failed to create log dir `{}`: {err}", log_dir.display());
    }
    let file_appender = tracing_appender::rolling::daily(log_dir, "scribe.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,scribe_app=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_writer(writer)
        .init();

    guard
}
