use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use quiz_core::model::{SourceLocation, Topic};
use services::{AppServices, Clock, QuizObserver, QuizSessionEngine, SessionState};
use tracing::debug;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTopic { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopic { raw } => write!(f, "invalid topic number: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  iquiz topics          [--db <sqlite_url>]");
    eprintln!("  iquiz play <n>        [--db <sqlite_url>]");
    eprintln!("  iquiz source [<url>]  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:iquiz.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  IQUIZ_DB_URL      database URL, overridden by --db");
    eprintln!("  IQUIZ_SOURCE_URL  topic list URL for this run only (not saved)");
    eprintln!("  RUST_LOG          log filter, default services=info");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Topics,
    Play { topic: usize },
    Source { set: Option<String> },
}

struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("IQUIZ_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("iquiz.sqlite3".into()), normalize_sqlite_url);
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("topics") => Command::Topics,
            Some("play") => {
                let raw = positional
                    .next()
                    .ok_or(ArgsError::MissingValue { flag: "play" })?;
                let topic = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ArgsError::InvalidTopic { raw })?;
                Command::Play { topic }
            }
            Some("source") => Command::Source {
                set: positional.next(),
            },
            Some(other) => return Err(ArgsError::UnknownArg(other.to_string())),
        };
        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self { db_url, command })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}?mode=rwc", absolute.display())
}

/// Terminal stand-in for the topic list and quiz screens.
struct Console;

impl QuizObserver for Console {
    fn on_topics_loaded(&self, topics: &[Arc<Topic>]) {
        for (n, topic) in topics.iter().enumerate() {
            println!(
                "{:>2}. [{}] {} ({} questions)",
                n + 1,
                topic.icon(),
                topic.title(),
                topic.question_count()
            );
            if !topic.description().is_empty() {
                println!("    {}", topic.description());
            }
        }
    }

    fn on_fetch_failed(&self, message: &str) {
        eprintln!("Could not load topics: {message}");
    }

    fn on_state_changed(&self, state: &SessionState) {
        debug!(%state, "screen update");
    }
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn play(engine: &mut QuizSessionEngine, input: &mut impl BufRead) -> io::Result<()> {
    loop {
        match engine.state() {
            SessionState::AwaitingAnswer { question } | SessionState::AnswerSelected { question, .. } => {
                let Some(q) = engine.current_question() else {
                    break;
                };
                println!();
                println!("Question {}: {}", question + 1, q.text());
                for (n, answer) in q.answers().iter().enumerate() {
                    println!("  {}. {answer}", n + 1);
                }
                println!("(answer number, or q to quit)");

                let Some(line) = read_line(input)? else {
                    let _ = engine.abandon();
                    break;
                };
                if line.eq_ignore_ascii_case("q") {
                    let _ = engine.abandon();
                    println!("Quiz abandoned.");
                    break;
                }
                let choice = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                let outcome = match choice {
                    Some(index) => engine.select_answer(index).and_then(|_| engine.submit()),
                    None => engine.submit(),
                };
                if let Err(err) = outcome {
                    println!("{err}");
                }
            }
            SessionState::Reviewing { correct, .. } => {
                if let Some(q) = engine.current_question() {
                    if correct {
                        println!("Correct!");
                    } else {
                        println!("Wrong. The answer was: {}", q.correct_answer_text());
                    }
                }
                println!("(press enter to continue)");
                if read_line(input)?.is_none() {
                    let _ = engine.abandon();
                    break;
                }
                if let Err(err) = engine.next() {
                    println!("{err}");
                }
            }
            SessionState::Finished { score, total } => {
                if let Some(result) = engine.result() {
                    println!();
                    println!("{}: {score} of {total} correct", result.topic_title());
                    println!("{}", result.performance());
                }
                let _ = engine.acknowledge_finish();
                break;
            }
            SessionState::Browsing => break,
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv = std::env::args().skip(1);
    let argv: Vec<String> = argv.collect();
    if argv.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let parsed = Args::parse(argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut services = AppServices::new_sqlite(&parsed.db_url, Clock::system()).await?;
    if let Ok(override_url) = std::env::var("IQUIZ_SOURCE_URL") {
        services = services.with_source_override(SourceLocation::parse(&override_url)?);
    }

    match parsed.command {
        Command::Source { set: None } => {
            println!("{}", services.app_settings().source_location().await);
            Ok(())
        }
        Command::Source { set: Some(url) } => {
            let location = services.app_settings().set_source_location(&url).await?;
            println!("Source set to {location}");
            Ok(())
        }
        Command::Topics => {
            let mut feed = services.topic_feed();
            feed.refresh(&Console).await;
            Ok(())
        }
        Command::Play { topic } => {
            let console = Arc::new(Console);
            let mut feed = services.topic_feed();
            feed.refresh(console.as_ref()).await;
            let Some(chosen) = feed.topics().get(topic - 1).cloned() else {
                return Err(ArgsError::InvalidTopic {
                    raw: topic.to_string(),
                }
                .into());
            };

            let mut engine = services.session_engine(console);
            engine.select_topic(chosen)?;
            let stdin = io::stdin();
            play(&mut engine, &mut stdin.lock())?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("services=info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
