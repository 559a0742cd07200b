//! Update function - the single writer of `AppState`.
//!
//! Every operator action follows the same shape: validate, enter loading,
//! hand a request to the event loop. The matching completion message leaves
//! loading on every path before it renders either the result or an error.

use tracing::{debug, error, info, warn};

use crate::download::Download;
use crate::error::TransportResult;
use crate::message::{Action, Message};
use crate::models::{AnalysisResult, AnalyzeResponse, ReportFormat, ReportResponse};
use crate::network::ApiRequest;
use crate::render::{render_analysis, render_error, render_history, render_parsed_content};
use crate::state::{
    AppState, BackendStatus, ConfirmDialog, ConfirmKind, ImagePreview, Tab, UploadArea,
};
use crate::theme::Theme;
use crate::upload::PendingUpload;
use crate::utils::normalize_url;

pub const MIN_TEXT_LENGTH: usize = 10;

pub const ERR_EMPTY_TEXT: &str = "Введите текст для анализа";
pub const ERR_SHORT_TEXT: &str = "Введите минимум 10 символов";
pub const ERR_NO_IMAGE: &str = "Выберите изображение";
pub const ERR_EMPTY_URL: &str = "Введите URL";
pub const ERR_NO_ANALYSIS: &str = "Нет данных для отчёта";
pub const ERR_ANALYSIS: &str = "Ошибка анализа";
pub const ERR_PARSE: &str = "Ошибка парсинга";
pub const ERR_REPORT: &str = "Ошибка генерации отчёта";
pub const ERR_CONNECTION: &str = "Ошибка соединения";

/// Process a message and update state.
/// Returns the side effect the event loop should perform, if any.
pub fn update(state: &mut AppState, message: Message, theme: &Theme) -> Option<Action> {
    match message {
        Message::SwitchTab(tab) => switch_tab(state, tab),
        Message::NextTab => {
            let tab = state.current_tab.next();
            switch_tab(state, tab)
        }
        Message::PreviousTab => {
            let tab = state.current_tab.previous();
            switch_tab(state, tab)
        }

        Message::InsertChar(c) => {
            if let Some(buffer) = active_input(state) {
                buffer.push(c);
            }
            None
        }
        Message::InsertText(text) => {
            if let Some(buffer) = active_input(state) {
                buffer.push_str(&text);
            }
            None
        }
        Message::DeleteChar => {
            if let Some(buffer) = active_input(state) {
                buffer.pop();
            }
            None
        }

        Message::SubmitText => submit_text(state, theme),
        Message::SelectImage(upload) => {
            select_image(state, upload);
            None
        }
        Message::DropImage(upload) => {
            if upload.is_image() {
                select_image(state, upload);
            } else {
                debug!("Ignoring dropped {} ({})", upload.file_name, upload.media_type);
            }
            None
        }
        Message::RemoveImage => {
            remove_image(state);
            None
        }
        Message::SubmitImage => submit_image(state, theme),
        Message::SubmitUrl => submit_url(state, theme),

        Message::RequestClearHistory => {
            state.confirm_dialog = Some(ConfirmDialog::clear_history());
            None
        }
        Message::ConfirmDialogAccept => match state.confirm_dialog.take() {
            Some(dialog) => match dialog.kind {
                ConfirmKind::ClearHistory => {
                    info!("Clearing history");
                    Some(Action::Request(ApiRequest::ClearHistory))
                }
            },
            None => None,
        },
        Message::ConfirmDialogCancel => {
            state.confirm_dialog = None;
            None
        }

        Message::CloseResults => {
            state.results = None;
            state.last_analysis = None;
            None
        }
        Message::ExportReport => export_report(state, theme),
        Message::CycleReportFormat => {
            state.report_format = state.report_format.next();
            Some(Action::PersistReportFormat(state.report_format))
        }
        Message::ScrollResultsUp => {
            state.results_scroll = state.results_scroll.saturating_sub(1);
            None
        }
        Message::ScrollResultsDown => {
            // Stop at the last line so the panel never scrolls into blank space
            let last = state.results.as_ref().map_or(0, |text| text.height().saturating_sub(1));
            let last = u16::try_from(last).unwrap_or(u16::MAX);
            state.results_scroll = state.results_scroll.saturating_add(1).min(last);
            None
        }
        Message::ShowError(message) => show_error(state, &message, theme),
        Message::Quit => {
            state.should_quit = true;
            None
        }

        Message::TextAnalyzed(result) => {
            if let Some(analysis) = resolve_analysis(state, result, theme) {
                store_analysis(state, AnalysisResult::Text(analysis), theme);
            }
            None
        }
        Message::ImageAnalyzed(result) => {
            if let Some(analysis) = resolve_analysis(state, result, theme) {
                store_analysis(state, AnalysisResult::Image(analysis), theme);
            }
            None
        }
        Message::PageParsed(result) => {
            state.end_loading();
            match result {
                Ok(response) => match response.data {
                    Some(page) if response.success => {
                        state.show_results(render_parsed_content(&page, theme));
                        state.last_analysis = page.analysis.map(AnalysisResult::Text);
                        None
                    }
                    _ => show_error(state, &app_error(response.error, ERR_PARSE), theme),
                },
                Err(e) => connection_error(state, "parse_demo", &e, theme),
            }
        }
        Message::HistoryLoaded { generation, result } => {
            // Fetched before a clear finished; the server has dropped these rows.
            if generation != state.history_generation {
                debug!("Dropping stale history (generation {})", generation);
                return None;
            }
            match result {
                Ok(response) => state.history = render_history(&response.items, theme),
                // A passive refresh must not interrupt navigation.
                Err(e) => error!("Failed to load history: {}", e),
            }
            None
        }
        Message::HistoryCleared(result) => match result {
            Ok(_) => {
                state.history_generation = state.history_generation.wrapping_add(1);
                state.history = render_history(&[], theme);
                None
            }
            Err(e) => connection_error(state, "clear_history", &e, theme),
        },
        Message::ReportGenerated { format, result } => report_generated(state, format, result, theme),
        Message::HealthChecked(online) => {
            state.backend_status = if online {
                BackendStatus::Online
            } else {
                BackendStatus::Offline
            };
            None
        }
        Message::DownloadSaved(result) => {
            match result {
                Ok(path) => {
                    info!("Report saved to {}", path.display());
                    state.notice = Some(format!("Отчёт сохранён: {}", path.display()));
                }
                Err(e) => {
                    warn!("Saving report failed: {}", e);
                    state.show_results(render_error(&format!("Не удалось сохранить отчёт: {}", e), theme));
                }
            }
            None
        }
    }
}

fn active_input(state: &mut AppState) -> Option<&mut String> {
    match state.current_tab {
        Tab::Text => Some(&mut state.inputs.text),
        Tab::Image => Some(&mut state.inputs.image_path),
        Tab::Parse => Some(&mut state.inputs.url),
        Tab::History => None,
    }
}

/// Tab transitions are never blocked by loading; entering History always
/// refetches.
fn switch_tab(state: &mut AppState, tab: Tab) -> Option<Action> {
    state.current_tab = tab;
    if tab == Tab::History {
        Some(Action::Request(ApiRequest::GetHistory {
            generation: state.history_generation,
        }))
    } else {
        None
    }
}

fn submit_text(state: &mut AppState, theme: &Theme) -> Option<Action> {
    let text = state.inputs.text.trim().to_string();
    if text.is_empty() {
        return show_error(state, ERR_EMPTY_TEXT, theme);
    }
    if text.chars().count() < MIN_TEXT_LENGTH {
        return show_error(state, ERR_SHORT_TEXT, theme);
    }
    state.begin_loading();
    Some(Action::Request(ApiRequest::AnalyzeText(text)))
}

fn select_image(state: &mut AppState, upload: PendingUpload) {
    debug!("Selected {} ({} bytes)", upload.file_name, upload.bytes.len());
    state.upload_area = UploadArea {
        preview: Some(ImagePreview::of(&upload)),
        submit_enabled: true,
    };
    state.pending_upload = Some(upload);
    state.inputs.image_path.clear();
}

fn remove_image(state: &mut AppState) {
    state.pending_upload = None;
    state.inputs.image_path.clear();
    state.upload_area = UploadArea::default();
}

fn submit_image(state: &mut AppState, theme: &Theme) -> Option<Action> {
    let Some(upload) = state.pending_upload.clone() else {
        return show_error(state, ERR_NO_IMAGE, theme);
    };
    state.begin_loading();
    Some(Action::Request(ApiRequest::AnalyzeImage(upload)))
}

fn submit_url(state: &mut AppState, theme: &Theme) -> Option<Action> {
    let url = state.inputs.url.trim().to_string();
    if url.is_empty() {
        return show_error(state, ERR_EMPTY_URL, theme);
    }
    state.begin_loading();
    Some(Action::Request(ApiRequest::ParseDemo(normalize_url(&url))))
}

fn export_report(state: &mut AppState, theme: &Theme) -> Option<Action> {
    let Some(analysis) = state.last_analysis.clone() else {
        return show_error(state, ERR_NO_ANALYSIS, theme);
    };
    state.notice = None;
    state.begin_loading();
    Some(Action::Request(ApiRequest::GenerateReport {
        analysis,
        format: state.report_format,
    }))
}

fn report_generated(
    state: &mut AppState,
    format: ReportFormat,
    result: TransportResult<ReportResponse>,
    theme: &Theme,
) -> Option<Action> {
    state.end_loading();
    let response = match result {
        Ok(response) => response,
        Err(e) => return connection_error(state, "generate_report", &e, theme),
    };
    if !response.success {
        return show_error(state, &app_error(response.error, ERR_REPORT), theme);
    }
    let (Some(content), Some(filename)) = (response.content, response.filename) else {
        warn!("Report response is missing content or filename");
        return show_error(state, ERR_CONNECTION, theme);
    };
    match Download::from_report(format, &content, filename) {
        Ok(download) => Some(Action::SaveDownload(download)),
        Err(e) => connection_error(state, "generate_report", &e, theme),
    }
}

fn store_analysis(state: &mut AppState, analysis: AnalysisResult, theme: &Theme) {
    state.show_results(render_analysis(&analysis, theme));
    state.last_analysis = Some(analysis);
}

/// Leaves loading and unwraps a successful analysis envelope, rendering the
/// failure otherwise.
fn resolve_analysis<T>(
    state: &mut AppState,
    result: TransportResult<AnalyzeResponse<T>>,
    theme: &Theme,
) -> Option<T> {
    state.end_loading();
    match result {
        Ok(response) => match response.analysis {
            Some(analysis) if response.success => Some(analysis),
            _ => {
                show_error(state, &app_error(response.error, ERR_ANALYSIS), theme);
                None
            }
        },
        Err(e) => {
            connection_error(state, "analysis", &e, theme);
            None
        }
    }
}

/// Server-supplied text, or the fallback when it is absent or blank.
fn app_error(error: Option<String>, fallback: &str) -> String {
    error
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn connection_error(
    state: &mut AppState,
    request: &str,
    err: &dyn std::fmt::Display,
    theme: &Theme,
) -> Option<Action> {
    warn!("{} failed: {}", request, err);
    show_error(state, ERR_CONNECTION, theme)
}

fn show_error(state: &mut AppState, message: &str, theme: &Theme) -> Option<Action> {
    state.show_results(render_error(message, theme));
    None
}

#[cfg(test)]
mod tests;
