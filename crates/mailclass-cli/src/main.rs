use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mailclass_core::config_file::{self, ConfigFile};
use mailclass_core::{
    ClassificationOptions, ClassifyTransport, ClientConfig, FileSelectionManager, HttpTransport,
    Overrides, Provider, RequestOrchestrator, RequestState, ResultPresenter, SelectedFile,
    SelectionSource,
};

mod output;

use output::ColorMode;

/// E-mail classifier client - send a .pdf or .txt e-mail to the classification
/// service and print the verdict and suggested reply
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the classification backend
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a .pdf or .txt e-mail
    Classify {
        /// Path to the document to classify
        file_path: PathBuf,

        /// Enable Portuguese stemming before classification
        #[arg(long, overrides_with = "no_stemming")]
        stemming: bool,

        /// Disable stemming even if the config file enables it
        #[arg(long, overrides_with = "stemming")]
        no_stemming: bool,

        /// Model provider: openai or huggingface
        #[arg(long)]
        provider: Option<Provider>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Check that the backend is reachable
    Health {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show the resolved configuration
    Config {
        /// Write the resolved settings to the platform config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = config_file::load_config();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout,
    }
    .or_env(|key| std::env::var(key).ok())?;
    let client_config = ClientConfig::resolve(&file_config, &overrides)?;
    tracing::debug!(
        base_url = %client_config.base_url,
        timeout_secs = client_config.timeout.as_secs(),
        "resolved backend"
    );

    match cli.command {
        Command::Classify {
            file_path,
            stemming,
            no_stemming,
            provider,
            json,
            no_color,
        } => {
            let options = config_file::initial_options(&file_config)?
                .with_overrides(stemming_flag(stemming, no_stemming), provider);
            classify(file_path, options, client_config, json, ColorMode(!no_color)).await
        }
        Command::Health { no_color } => health(client_config, ColorMode(!no_color)).await,
        Command::Config { save } => show_config(&file_config, &client_config, save),
    }
}

/// `--stemming` / `--no-stemming`; neither keeps the configured value.
fn stemming_flag(on: bool, off: bool) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        None
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn classify(
    file_path: PathBuf,
    options: ClassificationOptions,
    client_config: ClientConfig,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    let mut selection = FileSelectionManager::new();
    match SelectedFile::from_path(&file_path) {
        Ok(file) => {
            // Bad extensions are reported by the submission below.
            let _ = selection.select_file(SelectionSource::Picker, file);
        }
        Err(e) => {
            anyhow::bail!("Cannot open {}: {}", file_path.display(), e);
        }
    }

    if !json && let Some(file) = selection.selected() {
        output::print_selection(&mut stdout, file, &options, color)?;
    }

    let transport = HttpTransport::new(client_config)?;
    let mut orchestrator = RequestOrchestrator::new();

    let pending = match orchestrator.begin_submit(&selection, &options) {
        Ok(pending) => pending,
        Err(err) => {
            output::print_error(&mut stderr, &err, color)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let spinner = (!json).then(|| output::spinner("Processando arquivo..."));

    let outcome = tokio::select! {
        outcome = transport.classify(&pending.file, &pending.options) => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };

    if let Some(ref bar) = spinner {
        bar.finish_and_clear();
    }

    let Some(outcome) = outcome else {
        orchestrator.cancel();
        writeln!(stderr, "Cancelled.")?;
        return Ok(ExitCode::from(130));
    };
    orchestrator.complete(pending.generation, outcome);

    match orchestrator.state() {
        RequestState::Success(result) => {
            if json {
                output::print_json(&mut stdout, result)?;
            } else {
                let presenter = ResultPresenter::new(result, orchestrator.requested_provider());
                output::print_result(&mut stdout, &presenter, color)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        RequestState::Failure(err) => {
            output::print_error(&mut stderr, err, color)?;
            Ok(ExitCode::FAILURE)
        }
        RequestState::Idle | RequestState::Loading { .. } => Ok(ExitCode::FAILURE),
    }
}

async fn health(client_config: ClientConfig, color: ColorMode) -> anyhow::Result<ExitCode> {
    let url = client_config.health_url();
    let transport = HttpTransport::new(client_config)?;
    let spinner = output::spinner("Contacting backend...");
    let outcome = transport.health().await;
    spinner.finish_and_clear();

    let mut stdout = std::io::stdout();
    match outcome {
        Ok(status) => {
            output::print_health(&mut stdout, &url, &status, color)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            output::print_error(&mut std::io::stderr(), &err, color)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn show_config(
    file_config: &ConfigFile,
    client_config: &ClientConfig,
    save: bool,
) -> anyhow::Result<ExitCode> {
    let options = config_file::initial_options(file_config)?;
    let mut stdout = std::io::stdout();
    output::print_config(&mut stdout, client_config, &options)?;

    writeln!(stdout)?;
    let sources = config_file::config_path()
        .into_iter()
        .chain(std::iter::once(config_file::local_config_path()));
    for path in sources {
        let marker = if path.is_file() { "loaded" } else { "not found" };
        writeln!(stdout, "# {} ({})", path.display(), marker)?;
    }

    if save {
        let mut to_save = file_config.clone();
        let backend = to_save.backend.get_or_insert_with(Default::default);
        backend.base_url = Some(client_config.base_url.clone());
        backend.timeout_secs = Some(client_config.timeout.as_secs());
        let defaults = to_save.defaults.get_or_insert_with(Default::default);
        defaults.provider = Some(options.provider.as_str().to_string());
        defaults.stemming = Some(options.stemming_enabled);

        let path = config_file::save_config(&to_save).map_err(anyhow::Error::msg)?;
        writeln!(stdout, "Saved to {}", path.display())?;
    } else {
        let rendered = toml::to_string_pretty(file_config)?;
        if !rendered.trim().is_empty() {
            writeln!(stdout)?;
            writeln!(stdout, "# merged config file contents")?;
            write!(stdout, "{}", rendered)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
