// scriptlens: step through wallet template script evaluations

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scriptlens::editor::{EditorSession, NewScriptRequest, ScriptType};
use scriptlens::trace::{TemplateDocument, TemplateScript};
use scriptlens::ui::{App, ViewerConfig};

/// Environment variable holding the log filter
const LOG_ENV: &str = "SCRIPTLENS_LOG";
const DEFAULT_FILTER: &str = "scriptlens=info";

#[derive(Parser)]
#[command(name = "scriptlens")]
#[command(about = "A terminal viewer for wallet template script evaluations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Step through a script's evaluation in the terminal UI
    View {
        template: PathBuf,
        /// Script ID to open (defaults to the first script)
        #[arg(long)]
        script: Option<String>,
        #[arg(long, default_value = "1000")]
        play_interval_ms: u64,
        /// Write logs here; the UI owns the terminal otherwise
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Print the outcome of every evaluated script
    Check {
        template: PathBuf,
        #[arg(long)]
        script: Option<String>,
    },

    /// Add a new, uncompiled script to a template
    AddScript {
        template: PathBuf,
        /// locking, unlocking, isolated or test-setup
        #[arg(long = "type")]
        script_type: ScriptType,
        #[arg(long)]
        name: String,
        /// Defaults to an ID derived from the name
        #[arg(long)]
        id: Option<String>,
        /// ID of the script to attach to (unlocking scripts and tests)
        #[arg(long)]
        parent: Option<String>,
    },
}

fn init_logging(log_file: Option<&Path>, to_stderr: bool) -> io::Result<()> {
    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(File::create(path)?))
                .with_ansi(false),
        ),
        None => None,
    };
    let stderr_layer = to_stderr.then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn run_view(
    template: &Path,
    script: Option<String>,
    config: ViewerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = EditorSession::open(template, script)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_check(template: &Path, script: Option<String>) -> Result<bool, Box<dyn std::error::Error>> {
    let session = EditorSession::open(template, script)?;
    let state = session.state();

    let Some(script_mode) = state.script_mode() else {
        println!("Nothing to evaluate ({})", state.editor_mode().title());
        return Ok(true);
    };

    println!("{}", script_mode.editor_mode.title());
    for frame in &script_mode.frames {
        println!("  {} ({}): {}", frame.id, frame.script_type, frame.summary());
    }
    Ok(script_mode.passed())
}

fn run_add_script(
    template: &Path,
    request: NewScriptRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut document = TemplateDocument::load(template)?;
    let script = request
        .validate(&document.scripts)
        .inspect_err(|_| eprintln!("{}\n", request.help(&document.scripts)))?;
    let summary = format!(
        "Added {} '{}' ({})",
        script.script_type.label(),
        script.id,
        script.internal_id
    );

    document.scripts.push(TemplateScript::from(script));
    document.validate()?;
    document.save(template)?;
    println!("{}", summary);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::View {
            template,
            script,
            play_interval_ms,
            log_file,
        } => {
            init_logging(log_file.as_deref(), false)?;
            let config = ViewerConfig {
                play_interval: Duration::from_millis(play_interval_ms),
            };
            run_view(&template, script, config)
        }
        Command::Check { template, script } => {
            init_logging(None, true)?;
            if !run_check(&template, script)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::AddScript {
            template,
            script_type,
            name,
            id,
            parent,
        } => {
            init_logging(None, true)?;
            let request = NewScriptRequest {
                id,
                parent,
                ..NewScriptRequest::new(script_type, name)
            };
            run_add_script(&template, request)
        }
    }
}
