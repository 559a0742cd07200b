use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    symbols,
};

use crate::state::{AppState, BackendStatus, ConfirmDialog, Tab};
use crate::theme::Theme;

/// Draws the whole screen from state. Nothing here writes to state.
pub fn draw(f: &mut Frame, state: &AppState, theme: &Theme) {
    let area = f.area();
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    render_tabs(f, state, theme, vertical_chunks[0]);

    // Results share the body with the active tab when visible
    let body = if state.results.is_some() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(vertical_chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1)])
            .split(vertical_chunks[1])
    };

    match state.current_tab {
        Tab::Text => render_text_tab(f, state, theme, body[0]),
        Tab::Image => render_image_tab(f, state, theme, body[0]),
        Tab::Parse => render_parse_tab(f, state, theme, body[0]),
        Tab::History => render_history_tab(f, state, theme, body[0]),
    }
    if body.len() > 1 {
        render_results(f, state, theme, body[1]);
    }

    render_footer(f, state, theme, vertical_chunks[2]);

    if state.is_loading() {
        render_loading(f, theme);
    }
    if let Some(dialog) = &state.confirm_dialog {
        render_confirm_dialog(f, dialog, theme);
    }
}

fn render_tabs(f: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Мониторинг конкурентов"))
        .style(Style::default().fg(theme.text))
        .highlight_style(theme.tab_active)
        .select(state.current_tab.as_index())
        .divider(symbols::DOT)
        .padding(" ", " ");
    f.render_widget(tabs, area);
}

fn input_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.focus_border))
}

/// An editable field with a trailing cursor.
fn input_line(value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
        Span::styled("▏", Style::default().fg(theme.focus_border).add_modifier(Modifier::SLOW_BLINK)),
    ])
}

fn render_text_tab(f: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let mut lines = vec![
        Line::styled("Вставьте текст конкурента: лендинг, объявление, описание продукта.", theme.placeholder),
        Line::default(),
    ];
    lines.push(input_line(&state.inputs.text, theme));
    let para = Paragraph::new(lines)
        .block(input_block("Анализ текста (Enter — анализ)", theme))
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn render_image_tab(f: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let mut lines = Vec::new();
    if state.upload_area.prompt_visible() {
        lines.push(Line::styled(
            "Перетащите изображение в окно терминала или введите путь и нажмите Enter",
            theme.placeholder,
        ));
        lines.push(Line::styled("PNG, JPG, GIF, WEBP", theme.placeholder));
        lines.push(Line::default());
        lines.push(input_line(&state.inputs.image_path, theme));
    }
    if let Some(preview) = &state.upload_area.preview {
        lines.push(Line::from(vec![
            Span::styled("Файл: ", theme.field_label),
            Span::raw(preview.file_name.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Тип: ", theme.field_label),
            Span::raw(preview.media_type.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Размер: ", theme.field_label),
            Span::raw(format_size(preview.size)),
        ]));
        lines.push(Line::default());
        lines.push(Line::styled("Enter — анализ, Del — удалить", theme.footer));
    }
    if !state.upload_area.prompt_visible() && !state.inputs.image_path.is_empty() {
        lines.push(Line::default());
        lines.push(Line::styled("Заменить на:", theme.field_label));
        lines.push(input_line(&state.inputs.image_path, theme));
    }
    let title = if state.upload_area.submit_enabled {
        "Анализ изображения"
    } else {
        "Анализ изображения (нет файла)"
    };
    let para = Paragraph::new(lines)
        .block(input_block(title, theme))
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn render_parse_tab(f: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::styled("Адрес страницы конкурента; https:// добавится сам.", theme.placeholder),
        Line::default(),
        input_line(&state.inputs.url, theme),
    ];
    let para = Paragraph::new(lines)
        .block(input_block("Парсинг сайта (Enter — анализ)", theme))
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn render_history_tab(f: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let para = Paragraph::new(state.history.clone())
        .block(input_block("История запросов (c — очистить)", theme))
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn render_results(f: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let Some(results) = &state.results else {
        return;
    };
    let export = if state.can_export() {
        format!(" Ctrl+E — отчёт [{}] ", state.report_format.as_str())
    } else {
        String::new()
    };
    let block = Block::default()
        .title("Результаты (Esc — закрыть)")
        .title_bottom(Line::from(export).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    let para = Paragraph::new(results.clone())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.results_scroll, 0));
    f.render_widget(para, area);
}

fn render_footer(f: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let (status, color) = match state.backend_status {
        BackendStatus::Checking => ("● Проверка подключения...", theme.score_medium),
        BackendStatus::Online => ("● Система активна", theme.score_high),
        BackendStatus::Offline => ("● Сервер недоступен", theme.score_low),
    };
    let mut spans = vec![Span::styled(status, Style::default().fg(color)), Span::raw(" | ")];
    if let Some(notice) = &state.notice {
        spans.push(Span::styled(notice.clone(), Style::default().fg(theme.text)));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(
        format!(
            "Tab/F1-F4 вкладки | Ctrl+E отчёт | Ctrl+F формат [{}] | PgUp/PgDn прокрутка | Ctrl+Q выход",
            state.report_format.as_str()
        ),
        theme.footer,
    ));
    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn render_loading(f: &mut Frame, theme: &Theme) {
    let popup_area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, popup_area);
    let para = Paragraph::new("⏳ Анализирую данные...")
        .block(Block::default().borders(Borders::ALL).style(theme.popup_border))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.text));
    f.render_widget(para, popup_area);
}

fn render_confirm_dialog(f: &mut Frame, dialog: &ConfirmDialog, theme: &Theme) {
    let popup_area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, popup_area);
    let lines = vec![
        Line::from(dialog.message.clone()),
        Line::default(),
        Line::from(vec![
            Span::styled("[y] Да", theme.error),
            Span::raw("    "),
            Span::styled("[n] Нет", theme.footer),
        ]),
    ];
    let block = Block::default()
        .title(Span::styled(dialog.title.clone(), theme.popup_title))
        .borders(Borders::ALL)
        .style(theme.popup_border);
    let para = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(para, popup_area);
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} Б", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} КБ", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} МБ", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100-percent_y)/2), Constraint::Percentage(percent_y), Constraint::Percentage((100-percent_y)/2)]).split(r)[1];
    Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100-percent_x)/2), Constraint::Percentage(percent_x), Constraint::Percentage((100-percent_x)/2)]).split(vertical)[1]
}
