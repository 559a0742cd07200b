//! Application state, owned by the UI loop and written only by `handler::update`.

use ratatui::text::Text;

use crate::models::{AnalysisResult, ReportFormat};
use crate::upload::PendingUpload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Text,
    Image,
    Parse,
    History,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Text, Tab::Image, Tab::Parse, Tab::History];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Text => "Текст [F1]",
            Tab::Image => "Изображение [F2]",
            Tab::Parse => "Сайт [F3]",
            Tab::History => "История [F4]",
        }
    }

    pub fn as_index(self) -> usize {
        match self {
            Tab::Text => 0,
            Tab::Image => 1,
            Tab::Parse => 2,
            Tab::History => 3,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.as_index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Tab::ALL[(self.as_index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// What the image tab shows for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreview {
    pub file_name: String,
    pub media_type: String,
    pub size: usize,
    /// `data:<mime>;base64,...` form of the selection, the same payload a
    /// browser preview would show. Kept so the preview is self-contained and
    /// can be handed to an inline image protocol without rereading the file.
    pub data_url: String,
}

impl ImagePreview {
    pub fn of(upload: &PendingUpload) -> Self {
        Self {
            file_name: upload.file_name.clone(),
            media_type: upload.media_type.clone(),
            size: upload.bytes.len(),
            data_url: upload.data_url(),
        }
    }
}

/// Visible state of the upload area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadArea {
    pub preview: Option<ImagePreview>,
    pub submit_enabled: bool,
}

impl UploadArea {
    /// The drop prompt shows whenever there is no preview.
    pub fn prompt_visible(&self) -> bool {
        self.preview.is_none()
    }
}

/// Operator-typed text, one buffer per input field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inputs {
    pub text: String,
    pub url: String,
    pub image_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialog {
    pub kind: ConfirmKind,
    pub title: String,
    pub message: String,
}

impl ConfirmDialog {
    pub fn clear_history() -> Self {
        Self {
            kind: ConfirmKind::ClearHistory,
            title: "Очистить историю?".to_string(),
            message: "Все записи будут удалены на сервере.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub current_tab: Tab,
    pub pending_upload: Option<PendingUpload>,
    /// Requests dispatched and not yet resolved. Passive history refreshes
    /// are not counted.
    pub in_flight: usize,
    pub last_analysis: Option<AnalysisResult>,

    pub inputs: Inputs,
    pub upload_area: UploadArea,
    /// Results panel content; `None` hides the panel.
    pub results: Option<Text<'static>>,
    pub results_scroll: u16,
    pub history: Text<'static>,
    /// Bumped when history is cleared; fetches tagged with an older value are stale.
    pub history_generation: u64,
    pub report_format: ReportFormat,
    pub confirm_dialog: Option<ConfirmDialog>,
    pub backend_status: BackendStatus,
    /// One-line notice in the status bar (e.g. where a report was saved).
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(report_format: ReportFormat) -> Self {
        Self {
            report_format,
            ..Default::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin_loading(&mut self) {
        self.in_flight += 1;
    }

    pub fn end_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn can_export(&self) -> bool {
        self.last_analysis.is_some()
    }

    pub fn show_results(&mut self, text: Text<'static>) {
        self.results = Some(text);
        self.results_scroll = 0;
    }
}
