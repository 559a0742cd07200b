// src/main.rs
mod config;
mod download;
mod error;
mod handler;
mod input;
mod logging;
mod message;
mod models;
mod network;
mod render;
mod state;
mod theme;
mod ui;
mod upload;
mod utils;

use std::{io, sync::Arc, time::Duration};

use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::config::Settings;
use crate::handler::update;
use crate::message::{Action, Message};
use crate::models::ReportFormat;
use crate::network::{ApiClient, ApiRequest};
use crate::state::{AppState, Tab};
use crate::theme::Theme;

/// Terminal client for the competitor analysis service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend origin, e.g. http://localhost:8000
    #[arg(long)]
    base_url: Option<String>,

    /// Directory exported reports are written to
    #[arg(long)]
    download_dir: Option<String>,

    /// Report format: html, md or pdf
    #[arg(long, value_parser = parse_format)]
    format: Option<ReportFormat>,
}

fn parse_format(value: &str) -> Result<ReportFormat, String> {
    ReportFormat::parse(value).ok_or_else(|| format!("unknown report format: {}", value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::new()?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(dir) = cli.download_dir {
        settings.download_dir = dir;
    }

    // Everything that may warn runs after this
    let log_dir = logging::init(&settings.log_level)?;
    config::ensure_user_config();
    let report_format = cli.format.unwrap_or_else(|| settings.report_format());

    let rt = Runtime::new()?;
    let client = Arc::new(ApiClient::new(&settings.base_url)?);
    info!("Backend {} (logs in {})", client.base_url(), log_dir.display());
    let (tx, rx) = mpsc::unbounded_channel();

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App {
        state: AppState::new(report_format),
        theme: Theme::default(),
        settings,
        rt,
        client,
        tx,
    };
    let result = app.run(&mut terminal, rx);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("Exited with error: {:#}", e);
    }
    result
}

struct App {
    state: AppState,
    theme: Theme,
    settings: Settings,
    rt: Runtime,
    client: Arc<ApiClient>,
    tx: UnboundedSender<Message>,
}

impl App {
    fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
        mut rx: UnboundedReceiver<Message>,
    ) -> anyhow::Result<()> {
        self.dispatch(Message::SwitchTab(Tab::Text));
        self.execute(Action::Request(ApiRequest::CheckHealth));

        while !self.state.should_quit {
            terminal.draw(|f| ui::draw(f, &self.state, &self.theme))?;

            if event::poll(Duration::from_millis(100))? {
                let message = match event::read()? {
                    Event::Key(key) => input::handle_key(key, &self.state),
                    Event::Paste(text) => input::handle_paste(text, &self.state),
                    _ => None,
                };
                if let Some(message) = message {
                    self.dispatch(message);
                }
            }

            // Completions from the runtime
            while let Ok(message) = rx.try_recv() {
                self.dispatch(message);
            }
        }

        info!("Shutting down");
        Ok(())
    }

    /// Runs a message through `update` and every follow-up action it returns.
    fn dispatch(&mut self, message: Message) {
        let mut next = Some(message);
        while let Some(message) = next.take() {
            if let Some(action) = update(&mut self.state, message, &self.theme) {
                next = self.execute(action);
            }
        }
    }

    /// Requests go to the runtime; local side effects answer immediately.
    fn execute(&self, action: Action) -> Option<Message> {
        match action {
            Action::Request(request) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                self.rt.spawn(async move {
                    let message = request.run(&client).await;
                    // The receiver only goes away on shutdown
                    let _ = tx.send(message);
                });
                None
            }
            Action::SaveDownload(download) => {
                let saved = download
                    .save(&self.settings.download_dir())
                    .map_err(|e| format!("{:#}", e));
                Some(Message::DownloadSaved(saved))
            }
            Action::PersistReportFormat(format) => {
                if let Err(e) = config::save_report_format(format) {
                    error!("Could not persist report format: {:#}", e);
                }
                None
            }
        }
    }
}
