//! Tests for the update function

use super::*;
use crate::error::TransportError;
use crate::models::{
    ClearResponse, HistoryEntry, HistoryResponse, ImageAnalysis, ParseResponse, ParsedPage,
    RequestType, TextAnalysis,
};
use crate::render::plain;

fn theme() -> Theme {
    Theme::default()
}

fn new_state() -> AppState {
    AppState::new(ReportFormat::Html)
}

fn results_text(state: &AppState) -> String {
    state.results.as_ref().map(plain).unwrap_or_default()
}

fn history_loaded(result: TransportResult<HistoryResponse>) -> Message {
    Message::HistoryLoaded {
        generation: 0,
        result,
    }
}

fn decode_error() -> TransportError {
    TransportError::Decode(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
}

fn sample_text_analysis() -> TextAnalysis {
    TextAnalysis {
        strengths: vec!["Бесплатная доставка".into()],
        recommendations: vec!["Добавить отзывы".into()],
        design_score: Some(6.0),
        ..Default::default()
    }
}

fn image_upload() -> PendingUpload {
    PendingUpload::new("banner.png", "image/png", b"ABC".to_vec())
}

fn history_entry() -> HistoryEntry {
    HistoryEntry {
        timestamp: "2024-03-05T14:07:00".into(),
        request_type: RequestType::Text,
        request_summary: "Лендинг конкурента".into(),
    }
}

// ─────────────────────────────────────────────────────────
// Submit text
// ─────────────────────────────────────────────────────────

#[test]
fn test_short_text_never_reaches_transport() {
    let theme = theme();
    for input in ["a", "ab", "  abc  ", "123456789", "         x          "] {
        let mut state = new_state();
        state.inputs.text = input.to_string();

        let action = update(&mut state, Message::SubmitText, &theme);

        assert!(action.is_none(), "{input:?} must not produce a request");
        assert!(!state.is_loading());
        assert_eq!(results_text(&state), format!("⚠ {}", ERR_SHORT_TEXT));
    }
}

#[test]
fn test_ab_shows_minimum_length_error() {
    let mut state = new_state();
    state.inputs.text = "ab".into();

    assert!(update(&mut state, Message::SubmitText, &theme()).is_none());
    assert!(results_text(&state).contains("Введите минимум 10 символов"));
}

#[test]
fn test_blank_text_asks_for_input() {
    let mut state = new_state();
    state.inputs.text = "   \n ".into();

    assert!(update(&mut state, Message::SubmitText, &theme()).is_none());
    assert!(results_text(&state).contains(ERR_EMPTY_TEXT));
}

#[test]
fn test_valid_text_is_trimmed_and_enters_loading() {
    let mut state = new_state();
    state.inputs.text = "   Мы доставляем за 30 минут   ".into();

    let action = update(&mut state, Message::SubmitText, &theme());

    assert_eq!(
        action,
        Some(Action::Request(ApiRequest::AnalyzeText(
            "Мы доставляем за 30 минут".into()
        )))
    );
    assert!(state.is_loading());
}

#[test]
fn test_text_success_stores_and_renders_analysis() {
    let mut state = new_state();
    state.inputs.text = "достаточно длинный текст".into();
    update(&mut state, Message::SubmitText, &theme());

    let response = AnalyzeResponse {
        success: true,
        analysis: Some(sample_text_analysis()),
        error: None,
    };
    let action = update(&mut state, Message::TextAnalyzed(Ok(response)), &theme());

    assert!(action.is_none());
    assert!(!state.is_loading());
    assert_eq!(
        state.last_analysis,
        Some(AnalysisResult::Text(sample_text_analysis()))
    );
    let out = results_text(&state);
    assert!(out.contains("Бесплатная доставка"));
    assert!(out.contains("6/10"));
}

#[test]
fn test_application_error_uses_server_text_or_fallback() {
    let mut state = new_state();
    state.begin_loading();
    let response = AnalyzeResponse::<TextAnalysis> {
        success: false,
        analysis: None,
        error: Some("Модель перегружена".into()),
    };
    update(&mut state, Message::TextAnalyzed(Ok(response)), &theme());
    assert_eq!(results_text(&state), "⚠ Модель перегружена");
    assert!(!state.is_loading());

    state.begin_loading();
    let response = AnalyzeResponse::<TextAnalysis> {
        success: true,
        analysis: None,
        error: None,
    };
    update(&mut state, Message::TextAnalyzed(Ok(response)), &theme());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_ANALYSIS));
    assert!(state.last_analysis.is_none());
}

#[test]
fn test_transport_error_collapses_to_connection_error() {
    let mut state = new_state();
    state.begin_loading();

    update(&mut state, Message::TextAnalyzed(Err(decode_error())), &theme());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_CONNECTION));
    assert!(!state.is_loading());

    state.begin_loading();
    let status = TransportError::Status(reqwest::StatusCode::BAD_GATEWAY);
    update(&mut state, Message::ImageAnalyzed(Err(status)), &theme());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_CONNECTION));
    assert!(!state.is_loading());
}

// ─────────────────────────────────────────────────────────
// Image selection and submission
// ─────────────────────────────────────────────────────────

#[test]
fn test_select_then_remove_restores_upload_area() {
    let mut state = new_state();
    let before = state.upload_area.clone();

    update(&mut state, Message::SelectImage(image_upload()), &theme());
    assert!(state.upload_area.submit_enabled);
    assert!(!state.upload_area.prompt_visible());
    let preview = state.upload_area.preview.as_ref().unwrap();
    assert_eq!(preview.data_url, "data:image/png;base64,QUJD");
    assert_eq!(preview.size, 3);

    let action = update(&mut state, Message::RemoveImage, &theme());

    assert!(action.is_none());
    assert_eq!(state.upload_area, before);
    assert!(state.upload_area.prompt_visible());
    assert!(!state.upload_area.submit_enabled);
    assert!(state.pending_upload.is_none());
}

#[test]
fn test_select_accepts_any_type_but_drop_filters_images() {
    let mut state = new_state();
    let pdf = PendingUpload::new("deck.pdf", "application/pdf", b"%PDF".to_vec());

    update(&mut state, Message::DropImage(pdf.clone()), &theme());
    assert!(state.pending_upload.is_none());
    assert!(state.upload_area.prompt_visible());

    update(&mut state, Message::DropImage(image_upload()), &theme());
    assert_eq!(state.pending_upload, Some(image_upload()));

    update(&mut state, Message::SelectImage(pdf.clone()), &theme());
    assert_eq!(state.pending_upload, Some(pdf));
}

#[test]
fn test_selection_makes_no_request() {
    let mut state = new_state();
    assert!(update(&mut state, Message::SelectImage(image_upload()), &theme()).is_none());
    assert!(update(&mut state, Message::DropImage(image_upload()), &theme()).is_none());
    assert!(!state.is_loading());
}

#[test]
fn test_submit_image_requires_pending_upload() {
    let mut state = new_state();
    assert!(update(&mut state, Message::SubmitImage, &theme()).is_none());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_NO_IMAGE));

    update(&mut state, Message::SelectImage(image_upload()), &theme());
    let action = update(&mut state, Message::SubmitImage, &theme());

    assert_eq!(
        action,
        Some(Action::Request(ApiRequest::AnalyzeImage(image_upload())))
    );
    assert!(state.is_loading());
    // Still held for the preview until removed.
    assert!(state.pending_upload.is_some());
}

#[test]
fn test_image_success_stores_image_analysis() {
    let mut state = new_state();
    state.begin_loading();
    let analysis = ImageAnalysis {
        description: "Баннер распродажи".into(),
        visual_style_score: 9.0,
        ..Default::default()
    };
    let response = AnalyzeResponse {
        success: true,
        analysis: Some(analysis.clone()),
        error: None,
    };

    update(&mut state, Message::ImageAnalyzed(Ok(response)), &theme());

    assert_eq!(state.last_analysis, Some(AnalysisResult::Image(analysis)));
    assert!(results_text(&state).contains("Баннер распродажи"));
}

// ─────────────────────────────────────────────────────────
// Parse URL
// ─────────────────────────────────────────────────────────

#[test]
fn test_bare_host_gets_https_scheme() {
    let mut state = new_state();
    state.inputs.url = "  example.com ".into();

    let action = update(&mut state, Message::SubmitUrl, &theme());

    assert_eq!(
        action,
        Some(Action::Request(ApiRequest::ParseDemo("https://example.com".into())))
    );
}

#[test]
fn test_empty_url_is_rejected() {
    let mut state = new_state();
    state.inputs.url = "   ".into();

    assert!(update(&mut state, Message::SubmitUrl, &theme()).is_none());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_EMPTY_URL));
    assert!(!state.is_loading());
}

#[test]
fn test_parsed_page_stores_nested_analysis_only() {
    let mut state = new_state();
    state.last_analysis = Some(AnalysisResult::Text(TextAnalysis::default()));
    state.begin_loading();
    let page = ParsedPage {
        url: "https://example.com".into(),
        title: Some("Example".into()),
        analysis: None,
        ..Default::default()
    };
    let response = ParseResponse {
        success: true,
        data: Some(page.clone()),
        error: None,
    };

    update(&mut state, Message::PageParsed(Ok(response)), &theme());

    assert!(state.last_analysis.is_none());
    assert!(results_text(&state).contains("Title: Example"));
    assert!(!state.is_loading());

    state.begin_loading();
    let response = ParseResponse {
        success: true,
        data: Some(ParsedPage {
            analysis: Some(sample_text_analysis()),
            ..page
        }),
        error: None,
    };
    update(&mut state, Message::PageParsed(Ok(response)), &theme());
    assert_eq!(
        state.last_analysis,
        Some(AnalysisResult::Text(sample_text_analysis()))
    );
}

#[test]
fn test_parse_failure_uses_parse_fallback() {
    let mut state = new_state();
    state.begin_loading();
    let response = ParseResponse {
        success: false,
        data: None,
        error: None,
    };

    update(&mut state, Message::PageParsed(Ok(response)), &theme());

    assert_eq!(results_text(&state), format!("⚠ {}", ERR_PARSE));
    assert!(!state.is_loading());
}

// ─────────────────────────────────────────────────────────
// Tabs and history
// ─────────────────────────────────────────────────────────

#[test]
fn test_entering_history_fetches_every_time() {
    let mut state = new_state();
    for _ in 0..2 {
        let action = update(&mut state, Message::SwitchTab(Tab::History), &theme());
        assert_eq!(action, Some(Action::Request(ApiRequest::GetHistory { generation: 0 })));
        assert_eq!(state.current_tab, Tab::History);
        update(&mut state, Message::SwitchTab(Tab::Text), &theme());
    }
    assert!(!state.is_loading());
}

#[test]
fn test_other_tabs_have_no_side_effect_even_while_loading() {
    let mut state = new_state();
    state.begin_loading();
    assert!(update(&mut state, Message::SwitchTab(Tab::Image), &theme()).is_none());
    assert!(update(&mut state, Message::NextTab, &theme()).is_none());
    assert_eq!(state.current_tab, Tab::Parse);
    assert!(state.is_loading());

    assert_eq!(
        update(&mut state, Message::NextTab, &theme()),
        Some(Action::Request(ApiRequest::GetHistory { generation: 0 }))
    );
}

#[test]
fn test_history_load_renders_rows() {
    let mut state = new_state();
    let response = HistoryResponse {
        items: vec![history_entry()],
    };

    update(&mut state, history_loaded(Ok(response)), &theme());

    let out = plain(&state.history);
    assert!(out.contains("Анализ текста"));
    assert!(out.contains("Лендинг конкурента"));
}

#[test]
fn test_history_failure_is_swallowed() {
    let mut state = new_state();
    update(
        &mut state,
        history_loaded(Ok(HistoryResponse {
            items: vec![history_entry()],
        })),
        &theme(),
    );
    let before = state.history.clone();

    update(&mut state, history_loaded(Err(decode_error())), &theme());

    assert_eq!(state.history, before);
    assert!(state.results.is_none());
}

#[test]
fn test_empty_history_shows_placeholder() {
    let mut state = new_state();
    update(
        &mut state,
        history_loaded(Ok(HistoryResponse { items: vec![] })),
        &theme(),
    );
    assert_eq!(plain(&state.history), "История пуста");
}

#[test]
fn test_clear_history_requires_confirmation() {
    let mut state = new_state();
    update(
        &mut state,
        history_loaded(Ok(HistoryResponse {
            items: vec![history_entry()],
        })),
        &theme(),
    );
    let before = state.history.clone();

    assert!(update(&mut state, Message::RequestClearHistory, &theme()).is_none());
    assert!(state.confirm_dialog.is_some());
    assert!(update(&mut state, Message::ConfirmDialogCancel, &theme()).is_none());

    assert!(state.confirm_dialog.is_none());
    assert_eq!(state.history, before);
    // Accepting with no open dialog does nothing either.
    assert!(update(&mut state, Message::ConfirmDialogAccept, &theme()).is_none());
}

#[test]
fn test_confirmed_clear_empties_history_without_refetch() {
    let mut state = new_state();
    update(&mut state, Message::RequestClearHistory, &theme());

    let action = update(&mut state, Message::ConfirmDialogAccept, &theme());
    assert_eq!(action, Some(Action::Request(ApiRequest::ClearHistory)));
    assert!(state.confirm_dialog.is_none());

    let action = update(
        &mut state,
        Message::HistoryCleared(Ok(ClearResponse { success: true })),
        &theme(),
    );
    assert!(action.is_none());
    assert_eq!(plain(&state.history), "История пуста");
}

#[test]
fn test_fetch_started_before_clear_cannot_restore_rows() {
    let mut state = new_state();
    let fetch = update(&mut state, Message::SwitchTab(Tab::History), &theme());
    let generation = match fetch {
        Some(Action::Request(ApiRequest::GetHistory { generation })) => generation,
        other => panic!("expected a history fetch, got {other:?}"),
    };

    update(&mut state, Message::RequestClearHistory, &theme());
    update(&mut state, Message::ConfirmDialogAccept, &theme());
    update(
        &mut state,
        Message::HistoryCleared(Ok(ClearResponse { success: true })),
        &theme(),
    );

    // The fetch issued on entering the tab resolves last
    update(
        &mut state,
        Message::HistoryLoaded {
            generation,
            result: Ok(HistoryResponse {
                items: vec![history_entry()],
            }),
        },
        &theme(),
    );
    assert_eq!(plain(&state.history), "История пуста");

    // A fetch issued after the clear is current again
    let fetch = update(&mut state, Message::SwitchTab(Tab::History), &theme());
    let generation = match fetch {
        Some(Action::Request(ApiRequest::GetHistory { generation })) => generation,
        other => panic!("expected a history fetch, got {other:?}"),
    };
    update(
        &mut state,
        Message::HistoryLoaded {
            generation,
            result: Ok(HistoryResponse {
                items: vec![history_entry()],
            }),
        },
        &theme(),
    );
    assert!(plain(&state.history).contains("Лендинг конкурента"));
}

// ─────────────────────────────────────────────────────────
// Results and export
// ─────────────────────────────────────────────────────────

#[test]
fn test_scroll_stops_at_last_result_line() {
    let mut state = new_state();
    update(&mut state, Message::ScrollResultsDown, &theme());
    assert_eq!(state.results_scroll, 0);

    state.show_results(plain_text("one line"));
    for _ in 0..50 {
        update(&mut state, Message::ScrollResultsDown, &theme());
    }
    assert_eq!(state.results_scroll, 0);

    state.show_results(plain_text("first\nsecond\nthird"));
    for _ in 0..50 {
        update(&mut state, Message::ScrollResultsDown, &theme());
    }
    assert_eq!(state.results_scroll, 2);

    update(&mut state, Message::ScrollResultsUp, &theme());
    assert_eq!(state.results_scroll, 1);
}

#[test]
fn test_close_results_discards_analysis() {
    let mut state = new_state();
    state.last_analysis = Some(AnalysisResult::Text(sample_text_analysis()));
    state.show_results(plain_text("x"));

    update(&mut state, Message::CloseResults, &theme());

    assert!(state.results.is_none());
    assert!(!state.can_export());
    assert!(update(&mut state, Message::ExportReport, &theme()).is_none());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_NO_ANALYSIS));
}

fn plain_text(s: &str) -> ratatui::text::Text<'static> {
    ratatui::text::Text::from(s.to_string())
}

#[test]
fn test_export_dispatches_with_selected_format() {
    let mut state = AppState::new(ReportFormat::Markdown);
    state.last_analysis = Some(AnalysisResult::Text(sample_text_analysis()));

    let action = update(&mut state, Message::ExportReport, &theme());

    assert_eq!(
        action,
        Some(Action::Request(ApiRequest::GenerateReport {
            analysis: AnalysisResult::Text(sample_text_analysis()),
            format: ReportFormat::Markdown,
        }))
    );
    assert!(state.is_loading());
}

#[test]
fn test_pdf_report_is_decoded_and_keeps_server_filename() {
    let mut state = new_state();
    state.begin_loading();
    let response = ReportResponse {
        success: true,
        content: Some("QUJD".into()),
        filename: Some("Отчёт_конкурент_2024.pdf".into()),
        error: None,
    };

    let action = update(
        &mut state,
        Message::ReportGenerated {
            format: ReportFormat::Pdf,
            result: Ok(response),
        },
        &theme(),
    );

    assert_eq!(
        action,
        Some(Action::SaveDownload(Download {
            filename: "Отчёт_конкурент_2024.pdf".into(),
            media_type: "application/pdf",
            bytes: b"ABC".to_vec(),
        }))
    );
    assert!(!state.is_loading());
}

#[test]
fn test_text_report_is_saved_raw() {
    let mut state = new_state();
    state.begin_loading();
    let response = ReportResponse {
        success: true,
        content: Some("<h1>Отчёт</h1>".into()),
        filename: Some("report.html".into()),
        error: None,
    };

    let action = update(
        &mut state,
        Message::ReportGenerated {
            format: ReportFormat::Html,
            result: Ok(response),
        },
        &theme(),
    );

    match action {
        Some(Action::SaveDownload(download)) => {
            assert_eq!(download.media_type, "text/html");
            assert_eq!(download.bytes, "<h1>Отчёт</h1>".as_bytes());
        }
        other => panic!("expected a download, got {other:?}"),
    }
}

#[test]
fn test_report_failures_exit_loading() {
    let mut state = new_state();
    state.begin_loading();
    let response = ReportResponse {
        success: false,
        content: None,
        filename: None,
        error: None,
    };
    let action = update(
        &mut state,
        Message::ReportGenerated {
            format: ReportFormat::Pdf,
            result: Ok(response),
        },
        &theme(),
    );
    assert!(action.is_none());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_REPORT));
    assert!(!state.is_loading());

    state.begin_loading();
    let action = update(
        &mut state,
        Message::ReportGenerated {
            format: ReportFormat::Pdf,
            result: Err(decode_error()),
        },
        &theme(),
    );
    assert!(action.is_none());
    assert_eq!(results_text(&state), format!("⚠ {}", ERR_CONNECTION));
    assert!(!state.is_loading());
}

#[test]
fn test_cycle_format_asks_to_persist() {
    let mut state = new_state();
    let action = update(&mut state, Message::CycleReportFormat, &theme());
    assert_eq!(action, Some(Action::PersistReportFormat(ReportFormat::Markdown)));
    assert_eq!(state.report_format, ReportFormat::Markdown);
}

#[test]
fn test_download_saved_sets_notice() {
    let mut state = new_state();
    let path = std::path::PathBuf::from("/tmp/report.pdf");
    update(&mut state, Message::DownloadSaved(Ok(path)), &theme());
    assert_eq!(state.notice.as_deref(), Some("Отчёт сохранён: /tmp/report.pdf"));

    update(&mut state, Message::DownloadSaved(Err("disk full".into())), &theme());
    assert!(results_text(&state).contains("disk full"));
}

// ─────────────────────────────────────────────────────────
// Input editing and misc
// ─────────────────────────────────────────────────────────

#[test]
fn test_typing_goes_to_active_tab_buffer() {
    let mut state = new_state();
    update(&mut state, Message::InsertChar('h'), &theme());
    update(&mut state, Message::InsertText("ello".into()), &theme());
    update(&mut state, Message::SwitchTab(Tab::Parse), &theme());
    update(&mut state, Message::InsertText("example.com".into()), &theme());
    update(&mut state, Message::DeleteChar, &theme());
    update(&mut state, Message::SwitchTab(Tab::History), &theme());
    update(&mut state, Message::InsertChar('x'), &theme());

    assert_eq!(state.inputs.text, "hello");
    assert_eq!(state.inputs.url, "example.co");
    assert_eq!(state.inputs.image_path, "");
}

#[test]
fn test_health_and_quit() {
    let mut state = new_state();
    update(&mut state, Message::HealthChecked(false), &theme());
    assert_eq!(state.backend_status, BackendStatus::Offline);
    update(&mut state, Message::HealthChecked(true), &theme());
    assert_eq!(state.backend_status, BackendStatus::Online);

    update(&mut state, Message::Quit, &theme());
    assert!(state.should_quit);
}
