use anyhow::Result;
use booksmart::event_source::KeyboardEventSource;
use booksmart::panic_handler;
use booksmart::paths::resolve_log_path;
use booksmart::remote::{BooksmartClient, DEFAULT_API_URL};
use booksmart::{App, run_app_with_event_source};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "booksmart",
    version,
    about = "Terminal client for the BookSmart PDF bookmarking service"
)]
struct Args {
    /// Base URL of the BookSmart API
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory scanned for PDF files to upload
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// Write the log somewhere other than the default XDG location
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    panic_handler::initialize_panic_handler();

    // Initialize logging
    let log_path = match args.log_file {
        Some(path) => path,
        None => resolve_log_path().unwrap_or_else(|_| PathBuf::from("booksmart.log")),
    };
    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&log_path)?,
    )?;

    info!("Starting BookSmart client against {}", args.api_url);

    let client = BooksmartClient::new(&args.api_url)?;

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let mut app = App::new(Arc::new(client), args.directory);
    let mut event_source = KeyboardEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {:?}", err);
        println!("{err:?}");
    }

    info!("Shutting down BookSmart");
    Ok(())
}
