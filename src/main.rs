//! datatable-tui: keyboard-driven data table demos
//!
//! Opens the table gallery, or a sample or JSON dataset directly.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::panic;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use datatable_tui::domain::Demo;
use datatable_tui::{App, AppConfig};

/// Browse, sort and edit tables in the terminal
#[derive(Debug, Parser)]
#[command(name = "datatable-tui", version, about)]
struct Cli {
    /// JSON dataset to add to the gallery and open on start
    #[arg(short, long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Built-in sample to open on start
    #[arg(long, value_enum)]
    demo: Option<Demo>,
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Initialize logging with RUST_LOG environment variable support
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();
    install_panic_hook();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = AppConfig::load(Some(&cwd)).unwrap_or_else(|e| {
        tracing::warn!("Falling back to default configuration: {}", e);
        AppConfig::default()
    });

    tracing::info!("Starting datatable-tui in {:?}", cwd);

    let open_dataset = cli.data.is_some();
    let default_demo = config.ui.default_demo;
    let mut app = App::new(config, cli.data)?;
    if let Some(demo) = cli.demo {
        app.open_demo(demo);
    } else if open_dataset && app.error_message.is_none() {
        app.open_source(app.sources.len().saturating_sub(1));
    } else if let Some(demo) = default_demo {
        app.open_demo(demo);
    }

    let mut terminal = setup_terminal()?;

    let result = tokio::select! {
        res = app.run(&mut terminal) => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down gracefully");
            Ok(())
        }
    };

    // Restore terminal (always, even on error)
    restore_terminal(&mut terminal)?;

    result?;

    Ok(())
}
