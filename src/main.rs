use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use deskfolio_core::{AnswerService, AnswerSource, ChatSession, Config, KnowledgeBase, LocalAnswers};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod handler;
mod peripherals;
mod tui;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "deskfolio")]
#[command(about = "Interactive terminal portfolio with an assistant that answers questions about its owner")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Answering endpoint (overrides the config file and DESKFOLIO_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Answer from the built-in knowledge base only
    #[arg(long, global = true)]
    offline: bool,
    /// Always use the compact single-page layout
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive desk (default)
    Tui,
    /// Ask the assistant one question and print the answer
    Ask {
        /// Your question
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// List the knowledge base topics
    Topics,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    let filter = match &config {
        Ok(config) if interactive => config.log_filter().to_string(),
        _ if interactive => "info".to_string(),
        _ => "warn".to_string(),
    };
    init_logging(&filter, interactive);

    let config = config.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });
    let (source, label) = answer_source(&cli, &config);

    match cli.command {
        None | Some(Commands::Tui) => run_tui(source, label, &config, cli.compact).await,
        Some(Commands::Ask { question }) => ask(source, &question.join(" ")).await,
        Some(Commands::Topics) => {
            list_topics();
            Ok(())
        }
    }
}

fn answer_source(cli: &Cli, config: &Config) -> (Arc<dyn AnswerSource>, String) {
    if cli.offline {
        return (Arc::new(LocalAnswers::default()), "offline".to_string());
    }
    let endpoint = cli.endpoint.clone().unwrap_or_else(|| config.endpoint());
    tracing::info!(endpoint = %endpoint, "using remote answers with local fallback");
    (Arc::new(AnswerService::with_endpoint(&endpoint)), endpoint)
}

/// The desk owns the terminal, so interactive runs log to a file.
fn init_logging(filter: &str, to_file: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    if to_file {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(tui_log_writer(Config::get_log_path()))
                    .with_ansi(false),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Log file writer for the desk, or a sink when the file is unavailable.
/// Raw mode is not on yet, so the warning still reaches the terminal.
fn tui_log_writer(path: Result<PathBuf>) -> BoxMakeWriter {
    match path.and_then(|path| open_log_file(&path)) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(e) => {
            eprintln!("deskfolio: logging disabled: {e:#}");
            BoxMakeWriter::new(io::sink)
        }
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

async fn run_tui(
    source: Arc<dyn AnswerSource>,
    label: String,
    config: &Config,
    force_compact: bool,
) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let compact_width = if force_compact { u16::MAX } else { config.compact_width() };
    let width = terminal.size()?.width;
    let mut app = App::new(source, label, compact_width, width);
    let mut events = tui::EventHandler::new();

    let result: Result<()> = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }
        }
        Ok(())
    }
    .await;

    tui::restore()?;
    result
}

async fn ask(source: Arc<dyn AnswerSource>, question: &str) -> Result<()> {
    let mut session = ChatSession::new(source);
    if session.send(question).is_none() {
        bail!("Please enter a question.");
    }
    session.settle().await;

    if let Some(reply) = session.messages().last() {
        println!("{}", reply.content);
    }
    Ok(())
}

fn list_topics() {
    let knowledge = KnowledgeBase::builtin();
    for (topic, answer) in knowledge.entries() {
        println!("{} ({})", topic.display_name(), topic.as_str());
        println!("  {}\n", answer);
    }
}
