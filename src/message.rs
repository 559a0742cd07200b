//! Messages into `handler::update` and the actions it hands back.

use std::path::PathBuf;

use crate::download::Download;
use crate::error::TransportResult;
use crate::models::{
    AnalyzeResponse, ClearResponse, HistoryResponse, ImageAnalysis, ParseResponse, ReportFormat,
    ReportResponse, TextAnalysis,
};
use crate::network::ApiRequest;
use crate::state::Tab;
use crate::upload::PendingUpload;

#[derive(Debug)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    SwitchTab(Tab),
    NextTab,
    PreviousTab,

    // ─────────────────────────────────────────────────────────
    // Input editing
    // ─────────────────────────────────────────────────────────
    InsertChar(char),
    InsertText(String),
    DeleteChar,

    // ─────────────────────────────────────────────────────────
    // Operator actions
    // ─────────────────────────────────────────────────────────
    SubmitText,
    /// File picked explicitly; accepted whatever its type.
    SelectImage(PendingUpload),
    /// File dropped onto the upload area; only `image/*` is accepted.
    DropImage(PendingUpload),
    RemoveImage,
    SubmitImage,
    SubmitUrl,
    RequestClearHistory,
    ConfirmDialogAccept,
    ConfirmDialogCancel,
    CloseResults,
    ExportReport,
    CycleReportFormat,
    ScrollResultsUp,
    ScrollResultsDown,
    /// A failure detected before anything was sent (e.g. unreadable file).
    ShowError(String),
    Quit,

    // ─────────────────────────────────────────────────────────
    // Completions
    // ─────────────────────────────────────────────────────────
    TextAnalyzed(TransportResult<AnalyzeResponse<TextAnalysis>>),
    ImageAnalyzed(TransportResult<AnalyzeResponse<ImageAnalysis>>),
    PageParsed(TransportResult<ParseResponse>),
    HistoryLoaded {
        generation: u64,
        result: TransportResult<HistoryResponse>,
    },
    HistoryCleared(TransportResult<ClearResponse>),
    ReportGenerated {
        format: ReportFormat,
        result: TransportResult<ReportResponse>,
    },
    HealthChecked(bool),
    DownloadSaved(Result<PathBuf, String>),
}

/// Side effects the event loop performs after an update.
#[derive(Debug, PartialEq)]
pub enum Action {
    /// Run a backend call in the background; its completion comes back as a
    /// `Message`.
    Request(ApiRequest),
    /// Write a generated report into the download directory.
    SaveDownload(Download),
    /// Remember the chosen report format in the user config.
    PersistReportFormat(ReportFormat),
}
