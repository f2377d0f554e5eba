use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagescroll_core::{AppConfig, EasingKind};

mod commands;

#[derive(Parser)]
#[command(name = "pagescroll")]
#[command(author, version, about = "Page through text documents one screen at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of ~/.config/pagescroll/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through a text file
    View {
        /// Text file, pages separated by lines matching `ui.page_separator`
        file: PathBuf,
        /// Page to open at, starting from 1
        #[arg(short = 'p', long)]
        page: Option<usize>,
        /// Easing curve for page transitions (linear, in_out_quint, ...)
        #[arg(short = 'e', long)]
        easing: Option<EasingKind>,
        /// Transition duration in milliseconds, 0 jumps straight to the page
        #[arg(short = 'd', long)]
        duration_ms: Option<u64>,
    },
    /// Print the configuration
    Config {
        /// Only print where the config file lives
        #[arg(long)]
        path: bool,
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

/// Logs go to a file while the terminal UI owns the screen
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        std::fs::create_dir_all(config.data_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)?;

    match cli.command {
        Commands::View {
            file,
            page,
            easing,
            duration_ms,
        } => {
            init_logging(&config, true)?;
            if let Some(easing) = easing {
                config.scroll.animation.easing = Some(easing);
            }
            if let Some(duration_ms) = duration_ms {
                config.scroll.animation.duration_ms = duration_ms;
            }
            commands::view::run(config, &file, page).await
        }
        Commands::Config { path, init } => {
            init_logging(&config, false)?;
            commands::config::run(&config, &config_path, path, init)
        }
    }
}
