//! Line-oriented terminal driver for the assistant.
mod console;
mod dirs;
mod input;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use assistant_core::{
    AppDomain, Assistant, AssistantConfig, DEFAULT_PROFILE, ErrorRecord, FileHistoryRepository,
    NlpModels,
};
use clap::Parser;
use console::ConsoleUi;
use input::Input;
use tokio::sync::broadcast;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Upper bound on ticks run after a single input line.
const SETTLE_TICKS: usize = 64;

/// Contextual assistant for creative tools
#[derive(Parser, Debug)]
#[command(name = "assistant")]
#[command(about = "Ask questions and simulate editor activity", long_about = None)]
#[command(version)]
struct Args {
    /// RON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Application domain: game, cad, animation or general
    #[arg(long)]
    domain: Option<AppDomain>,

    /// Directory for saved learning history (default: platform data dir)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Keep learning history in memory only
    #[arg(long)]
    no_persist: bool,

    /// Profile the learning history is stored under
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Print one JSON object per output line
    #[arg(long)]
    json: bool,

    /// Log session id (default: timestamp)
    #[arg(long)]
    session: Option<String>,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let _guard = setup_logging(args.session.clone())?;

    let config = load_config(&args)?;
    Session::start(args, config)?.run()
}

/// Defaults or the RON file, then `ASSISTANT_*` variables, then flags.
fn load_config(args: &Args) -> Result<AssistantConfig> {
    let mut config = match &args.config {
        Some(path) => AssistantConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AssistantConfig::default(),
    };
    config.apply_env();
    if let Some(domain) = args.domain {
        config.domain = domain;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

struct Session {
    assistant: Assistant,
    ui: Arc<ConsoleUi>,
    errors: broadcast::Receiver<ErrorRecord>,
    persist: bool,
    json: bool,
}

impl Session {
    fn start(args: Args, config: AssistantConfig) -> Result<Self> {
        let ui = Arc::new(ConsoleUi::new(args.json));
        let persist = !args.no_persist;

        let mut builder = Assistant::builder()
            .config(config)
            .models(NlpModels::keyword())
            .ui(ui.clone())
            .profile(args.profile);
        if persist {
            let dir = args.save_dir.unwrap_or_else(dirs::data_dir);
            let repository = FileHistoryRepository::new(&dir)
                .with_context(|| format!("failed to open save dir {}", dir.display()))?;
            tracing::info!("History directory: {}", repository.base_dir().display());
            builder = builder.repository(Arc::new(repository));
        }

        let mut assistant = builder.build()?;
        let errors = assistant.subscribe_errors();

        if persist {
            match assistant.load_state() {
                Ok(true) => {
                    if !args.json {
                        let summary = assistant.learning().summary();
                        println!(
                            "Welcome back: {} interactions, skill {:.2}",
                            summary.total_interactions, summary.skill_level
                        );
                    }
                }
                Ok(false) => {}
                // Already reported on the error channel
                Err(error) => tracing::warn!(%error, "starting with empty history"),
            }
        }

        Ok(Self {
            assistant,
            ui,
            errors,
            persist,
            json: args.json,
        })
    }

    fn run(mut self) -> Result<()> {
        if !self.json {
            println!(
                "Assistant ready ({} domain). Type /help for commands.",
                self.assistant.config().domain
            );
        }

        self.prompt()?;
        for line in io::stdin().lock().lines() {
            let line = line?;
            match input::parse(&line) {
                Ok(Input::Quit) => break,
                Ok(command) => self.handle(command)?,
                Err(error) => println!("  ? {error}"),
            }
            self.drain_errors();
            self.prompt()?;
        }

        if self.persist {
            self.save();
        }
        tracing::info!(tick = self.assistant.tick(), "session finished");
        Ok(())
    }

    fn handle(&mut self, command: Input) -> Result<()> {
        match command {
            Input::Query(text) => {
                self.assistant.submit_query(&text)?;
                self.settle();
            }
            Input::Activity(kind, subject) => {
                self.assistant.record_activity(kind, subject);
                self.settle();
            }
            Input::Tick(ticks) => {
                for _ in 0..ticks {
                    self.assistant.update();
                }
            }
            Input::Cancel => {
                self.assistant.cancel();
                self.assistant.update();
            }
            Input::Save => {
                if self.persist {
                    self.save();
                } else {
                    println!("  ? persistence is disabled (--no-persist)");
                }
            }
            Input::Stats => self.stats(),
            Input::Help => println!("{}", input::HELP),
            Input::Empty | Input::Quit => {}
        }
        Ok(())
    }

    /// Run until the assistant goes idle again.
    fn settle(&mut self) {
        let reports = self.assistant.run_until_idle(SETTLE_TICKS);
        if let Some(last) = reports.last() {
            tracing::debug!(ticks = reports.len(), state = %last.state, "settled");
        }
    }

    fn save(&self) {
        match self.assistant.save_state() {
            Ok(()) if !self.json => println!("  (history saved)"),
            Ok(()) => {}
            Err(error) => tracing::warn!(%error, "saving history failed"),
        }
    }

    fn stats(&self) {
        let summary = self.assistant.learning().summary();
        let milestones = self.assistant.learning().milestones();

        if self.json {
            let payload = serde_json::json!({
                "tick": self.assistant.tick(),
                "state": self.assistant.state().to_string(),
                "summary": summary,
                "milestones": milestones,
                "complexity": self.assistant.complexity(),
            });
            self.ui.emit_json("stats", &payload);
            return;
        }

        println!("  tick {} ({})", self.assistant.tick(), self.assistant.state());
        println!(
            "  {} interactions, {} answered, success {:.0}%, skill {:.2}",
            summary.total_interactions,
            summary.answered,
            summary.success_rate * 100.0,
            summary.skill_level
        );
        if let Some(target) = self.assistant.complexity() {
            println!("  interface: {} {:.2}", target.level, target.score);
        }
        for milestone in milestones {
            println!(
                "  * {} x{} (tick {})",
                milestone.category, milestone.threshold, milestone.reached_at
            );
        }
    }

    fn drain_errors(&mut self) {
        loop {
            match self.errors.try_recv() {
                Ok(record) => self.ui.error(&record),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "error channel lagged");
                }
                Err(_) => break,
            }
        }
    }

    fn prompt(&self) -> Result<()> {
        if !self.json {
            print!("> ");
            io::stdout().flush()?;
        }
        Ok(())
    }
}

/// Log to a per-session file under the platform cache directory.
///
/// Nothing is written to the terminal; stdout belongs to the assistant.
fn setup_logging(
    session_id: Option<String>,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let session_id = session_id.unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    });

    let session_log_dir = dirs::log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "assistant.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/assistant.log", session_log_dir.display());

    Ok(guard)
}
