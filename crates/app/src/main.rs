use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::catalog::QuestionCatalog;
use quiz_core::learning::LearningMode;
use quiz_core::metrics::MetricsConfig;
use services::{Clock, LoadOutcome, ProgressError, ProgressService, QuizSession};
use storage::Storage;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod play;

const DEFAULT_SAVE_PATH: &str = "quiz_progress.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidTargetTime { raw: String },
    InvalidPath { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
            ArgsError::InvalidTargetTime { raw } => {
                write!(f, "invalid --target-time value: {raw}")
            }
            ArgsError::InvalidPath { flag } => write!(f, "{flag} requires a non-empty path"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_path(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<PathBuf, ArgsError> {
    let value = require_value(args, flag)?;
    if value.trim().is_empty() {
        return Err(ArgsError::InvalidPath { flag });
    }
    Ok(PathBuf::from(value))
}

struct Args {
    save_path: PathBuf,
    mode: LearningMode,
    target_time: f64,
    fresh: bool,
    report_path: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--save <path>] [--mode <mode>] [--target-time <secs>] [--fresh] [--report <path>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --save {DEFAULT_SAVE_PATH}");
    eprintln!("  --mode adaptive        (adaptive, quiz, study, review)");
    eprintln!("  --target-time {}", MetricsConfig::DEFAULT_TARGET_SECONDS);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SAVE_PATH, QUIZ_MODE, QUIZ_TARGET_TIME, QUIZ_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut save_path = std::env::var("QUIZ_SAVE_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH), PathBuf::from);
        let mut mode = std::env::var("QUIZ_MODE")
            .ok()
            .and_then(|value| value.parse::<LearningMode>().ok())
            .unwrap_or_default();
        let mut target_time = std::env::var("QUIZ_TARGET_TIME")
            .ok()
            .and_then(|value| value.trim().parse::<f64>().ok())
            .unwrap_or(MetricsConfig::DEFAULT_TARGET_SECONDS);
        let mut fresh = false;
        let mut report_path = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--save" => save_path = require_path(args, "--save")?,
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    mode = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidMode { raw: value.clone() })?;
                }
                "--target-time" => {
                    let value = require_value(args, "--target-time")?;
                    target_time = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidTargetTime { raw: value.clone() })?;
                }
                "--fresh" => fresh = true,
                "--report" => report_path = Some(require_path(args, "--report")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            save_path,
            mode,
            target_time,
            fresh,
            report_path,
        })
    }
}

/// Whether leaving the game may overwrite the save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SavePolicy {
    OnExit,
    /// The existing save could not be loaded; it is only replaced by an
    /// explicit save.
    ExplicitOnly,
}

async fn resume(
    progress: &ProgressService,
    session: &mut QuizSession,
    save_path: &Path,
) -> SavePolicy {
    match progress.load_into(session).await {
        Ok(LoadOutcome::Restored { saved_at, answered }) => {
            println!(
                "Resumed progress saved at {saved_at}: {answered} answers, {} points.",
                session.achievements().total_points()
            );
            SavePolicy::OnExit
        }
        Ok(LoadOutcome::NoPriorSave) => {
            println!("No saved progress found; starting a new session.");
            SavePolicy::OnExit
        }
        Err(err) => {
            warn!(error = %err, path = %save_path.display(), "could not resume");
            println!("Saved progress could not be loaded ({err}); starting a new session.");
            println!("{} is kept as is unless you save with s.", save_path.display());
            SavePolicy::ExplicitOnly
        }
    }
}

/// Returns whether the session was written.
async fn save_on_exit(
    progress: &ProgressService,
    session: &QuizSession,
    policy: SavePolicy,
) -> Result<bool, ProgressError> {
    match policy {
        SavePolicy::OnExit => {
            progress.save(session).await?;
            Ok(true)
        }
        SavePolicy::ExplicitOnly => Ok(false),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).inspect_err(|_| print_usage())?;

    init_logging();

    let config = MetricsConfig::new(args.target_time)?;
    let catalog = QuestionCatalog::builtin()?;
    let mut session = QuizSession::new(catalog, config, args.mode, Clock::default_clock())?;

    // The save file lives outside core/services; the binary decides where.
    let storage = Storage::json_file(&args.save_path);
    let progress = ProgressService::from_storage(&storage);

    let mut policy = if args.fresh {
        println!("Starting a fresh session ({} mode).", session.mode());
        SavePolicy::OnExit
    } else {
        resume(&progress, &mut session, &args.save_path).await
    };

    play::play(&mut session, &progress, &mut policy).await?;

    if !save_on_exit(&progress, &session, policy).await? {
        println!("Progress not saved; {} was left untouched.", args.save_path.display());
    }
    play::print_summary(&session.report());

    if let Some(path) = args.report_path {
        progress.export_report(&session, &path).await?;
        println!("Report written to {}.", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use tempfile::tempdir;

    fn new_session() -> QuizSession {
        let catalog = QuestionCatalog::builtin().unwrap();
        QuizSession::new(catalog, MetricsConfig::default(), LearningMode::Study, fixed_clock())
            .unwrap()
    }

    #[tokio::test]
    async fn unreadable_save_survives_exit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{ not json").unwrap();
        let progress = ProgressService::from_storage(&Storage::json_file(&path));
        let mut session = new_session();

        let policy = resume(&progress, &mut session, &path).await;
        assert_eq!(policy, SavePolicy::ExplicitOnly);
        assert!(session.history().is_empty());

        assert!(!save_on_exit(&progress, &session, policy).await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn missing_save_is_written_on_exit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let progress = ProgressService::from_storage(&Storage::json_file(&path));
        let mut session = new_session();

        let policy = resume(&progress, &mut session, &path).await;
        assert_eq!(policy, SavePolicy::OnExit);
        assert!(save_on_exit(&progress, &session, policy).await.unwrap());

        let mut resumed = new_session();
        let policy = resume(&progress, &mut resumed, &path).await;
        assert_eq!(policy, SavePolicy::OnExit);
    }
}
