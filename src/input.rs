use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::message::Message;
use crate::state::{AppState, Tab};
use crate::upload::{PendingUpload, dropped_path};

/// Maps a key press to a message. Reads state, never writes it.
pub fn handle_key(key: KeyEvent, state: &AppState) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // The confirmation dialog swallows everything else while open
    if state.confirm_dialog.is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(Message::ConfirmDialogAccept)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(Message::ConfirmDialogCancel)
            }
            _ => None,
        };
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(Message::Quit),
        KeyCode::Char('e') if ctrl => Some(Message::ExportReport),
        KeyCode::Char('f') if ctrl => Some(Message::CycleReportFormat),
        KeyCode::Char('l') if ctrl && state.current_tab == Tab::History => {
            Some(Message::RequestClearHistory)
        }
        KeyCode::Char('c') if state.current_tab == Tab::History => Some(Message::RequestClearHistory),
        KeyCode::Tab => Some(Message::NextTab),
        KeyCode::BackTab => Some(Message::PreviousTab),
        KeyCode::F(n @ 1..=4) => Some(Message::SwitchTab(Tab::ALL[n as usize - 1])),
        KeyCode::Esc => Some(Message::CloseResults),
        KeyCode::PageUp => Some(Message::ScrollResultsUp),
        KeyCode::PageDown => Some(Message::ScrollResultsDown),
        KeyCode::Enter => submit(state),
        KeyCode::Delete if state.current_tab == Tab::Image => Some(Message::RemoveImage),
        KeyCode::Backspace => Some(Message::DeleteChar),
        KeyCode::Char(c) if !ctrl => Some(Message::InsertChar(c)),
        _ => None,
    }
}

/// Bracketed paste. On the image tab a pasted path is how terminals deliver
/// a dropped file.
pub fn handle_paste(text: String, state: &AppState) -> Option<Message> {
    if state.confirm_dialog.is_some() {
        return None;
    }
    match state.current_tab {
        Tab::Image => {
            let path = dropped_path(&text);
            Some(match PendingUpload::load(Path::new(&path)) {
                Ok(upload) => Message::DropImage(upload),
                Err(e) => unreadable(&path, e),
            })
        }
        Tab::Parse => Some(Message::InsertText(text.trim().to_string())),
        Tab::Text => Some(Message::InsertText(text)),
        Tab::History => None,
    }
}

fn submit(state: &AppState) -> Option<Message> {
    match state.current_tab {
        Tab::Text => Some(Message::SubmitText),
        Tab::Parse => Some(Message::SubmitUrl),
        Tab::Image => {
            let typed = state.inputs.image_path.trim();
            if typed.is_empty() {
                return Some(Message::SubmitImage);
            }
            let path = shellexpand::tilde(typed).to_string();
            Some(match PendingUpload::load(Path::new(&path)) {
                Ok(upload) => Message::SelectImage(upload),
                Err(e) => unreadable(&path, e),
            })
        }
        Tab::History => None,
    }
}

fn unreadable(path: &str, err: anyhow::Error) -> Message {
    warn!("Cannot load {}: {:#}", path, err);
    Message::ShowError(format!("Не удалось открыть файл: {}", path))
}
