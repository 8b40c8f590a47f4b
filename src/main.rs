//! Team Admin - Desktop dashboard for departments and team members.

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use eframe::egui;
use team_admin as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use app::config::{AppConfig, ConfigLoadResult};
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop dashboard for departments and team members.
#[derive(Parser)]
#[command(name = "team-admin")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Load configuration from this file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the API base URL for this run
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging();

    tracing::info!("Team Admin starting...");

    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => {
            tracing::info!("Dev mode: loading config from current directory");
            PathBuf::from("config.toml")
        }
        (None, false) => AppConfig::default_path(),
    };
    tracing::info!("Config path: {:?}", config_path);

    // Command line wins over the environment
    let base_url_override = cli.api_url.clone().or_else(AppConfig::env_base_url);

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            checked(config.with_base_url_override(base_url_override))
        }
        ConfigLoadResult::Missing if base_url_override.is_some() => {
            tracing::info!("Config missing, using defaults with the API URL override");
            checked(AppConfig::default().with_base_url_override(base_url_override))
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, starting setup wizard");
            LaunchMode::Setup(SetupWizard::default(), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            LaunchMode::Setup(SetupWizard::default(), Some(e.to_string()))
        }
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    match launch_mode {
        LaunchMode::Normal(config) => run_main_app(config, config_path, rt),
        LaunchMode::Setup(wizard, error) => run_setup_wizard(wizard, error, config_path, rt),
    }
}

/// Re-validate after overrides were applied.
fn checked(config: AppConfig) -> LaunchMode {
    match config.validate() {
        Ok(()) => LaunchMode::Normal(config),
        Err(e) => {
            tracing::warn!("Config invalid after overrides: {}", e);
            let message = e.to_string();
            LaunchMode::Setup(SetupWizard::new(config), Some(message))
        }
    }
}

/// Install stdout and daily rolling file logging.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let (file_layer, guard) = match log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "team-admin.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// `<data dir>/logs`, created if needed.
fn log_dir() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("com", "Gianged", "TeamAdmin")?;
    let dir = dirs.data_local_dir().join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Run the setup wizard.
fn run_setup_wizard(
    wizard: SetupWizard,
    initial_error: Option<String>,
    config_path: PathBuf,
    rt: tokio::runtime::Runtime,
) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Team Admin - Setup")
            .with_inner_size([600.0, 500.0])
            .with_min_inner_size([500.0, 400.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Team Admin - Setup",
        options,
        Box::new(|_cc| Ok(Box::new(SetupApp::new(wizard, initial_error, config_path, rt)))),
    )
}

/// Run the main application.
fn run_main_app(config: AppConfig, config_path: PathBuf, rt: tokio::runtime::Runtime) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Team Admin")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    tracing::info!("API: {}", config.api.base_url);

    eframe::run_native(
        "Team Admin",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            install_icon_font(&cc.egui_ctx);

            match App::new(config.clone(), rt) {
                Ok(app) => Ok(Box::new(app) as Box<dyn eframe::App>),
                Err(e) => {
                    tracing::error!("Failed to start: {}", e);
                    let runtime = tokio::runtime::Runtime::new()?;
                    Ok(Box::new(SetupApp::new(
                        SetupWizard::new(config),
                        Some(e.to_string()),
                        config_path,
                        runtime,
                    )))
                }
            }
        }),
    )
}

/// Register the phosphor icon font.
fn install_icon_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
