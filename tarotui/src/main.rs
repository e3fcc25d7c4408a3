mod app;
mod effects;
mod table;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tarotui_core::{CardPopup, PopupConfig};

use app::App;

/// Deal a tarot spread and inspect each card in a popup
#[derive(Parser, Debug)]
#[command(name = "tarotui", version, about)]
struct Args {
    /// JSON file with popup settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Card reference data (tarot-images.json)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Directory holding the card images
    #[arg(long)]
    images: Option<PathBuf>,

    /// Auto-close delay for the popup, in milliseconds
    #[arg(long)]
    auto_close_ms: Option<u64>,

    /// Seed for the particle RNG
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal belongs to the UI
    #[arg(long, default_value = "tarotui.log")]
    log_file: PathBuf,
}

impl Args {
    fn popup_config(&self) -> color_eyre::Result<PopupConfig> {
        let mut config = match &self.config {
            Some(path) => PopupConfig::from_json_file(path)?,
            None => PopupConfig::default(),
        };
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(images) = &self.images {
            config.image_dir = images.clone();
        }
        if let Some(ms) = self.auto_close_ms {
            config.auto_close_ms = ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn init_logging(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = args.popup_config()?;
    info!(data = %config.data_path.display(), "starting tarotui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: PopupConfig,
) -> color_eyre::Result<()> {
    let mut app = App::new(CardPopup::new(config));

    loop {
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        // Poll with ~30fps tick for animations
        if event::poll(Duration::from_millis(33))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && app.handle_key(key) {
                        break; // Quit signal
                    }
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                _ => {}
            }
        }

        app.tick();
    }

    info!(ticks = app.tick, "quitting");
    Ok(())
}
