use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use mailclass_core::config_file;
use mailclass_core::{
    ClientConfig, HttpTransport, Overrides, Provider, SelectedFile, SelectionSource,
};

mod action;
mod app;
mod backend;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;
use backend::run_backend_listener;
use tui_event::{BackendCommand, BackendEvent};

/// mailclass TUI - classify a .pdf or .txt e-mail from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File to preselect
    file: Option<PathBuf>,

    /// Base URL of the classification backend
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Model provider: openai or huggingface
    #[arg(long)]
    provider: Option<Provider>,

    /// Start with stemming enabled
    #[arg(long, overrides_with = "no_stemming")]
    stemming: bool,

    /// Start with stemming disabled, whatever the config file says
    #[arg(long, overrides_with = "stemming")]
    no_stemming: bool,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    let file_config = config_file::load_config();

    // Resolve config from CLI flags > env vars > config file > defaults
    let overrides = Overrides {
        base_url: args.base_url.clone(),
        timeout_secs: args.timeout,
    }
    .or_env(|key| std::env::var(key).ok())?;
    let client_config = ClientConfig::resolve(&file_config, &overrides)?;

    let stemming = match (args.stemming, args.no_stemming) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let options =
        config_file::initial_options(&file_config)?.with_overrides(stemming, args.provider);

    let theme_name = args
        .theme
        .clone()
        .or_else(|| file_config.display.as_ref().and_then(|d| d.theme.clone()))
        .unwrap_or_else(|| "hacker".to_string());
    let theme = theme::Theme::from_name(&theme_name);

    let preselected = match &args.file {
        Some(path) => Some(
            SelectedFile::from_path(path)
                .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", path.display(), e))?,
        ),
        None => None,
    };

    let base_url = client_config.base_url.clone();
    let transport = Arc::new(HttpTransport::new(client_config)?);
    tracing::info!(%base_url, "mailclass-tui starting");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(options, theme, base_url);
    if let Some(file) = preselected {
        let _ = app.selection.select_file(SelectionSource::Picker, file);
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<BackendEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(run_backend_listener(
        transport,
        cmd_rx,
        event_tx,
        cancel.clone(),
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt));
                }
            } => {}
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;

    Ok(())
}

/// Log to a daily rolling file; the terminal belongs to the UI.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    let log_dir = dirs::cache_dir()?.join("mailclass").join("logs");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::daily(log_dir, "mailclass-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
