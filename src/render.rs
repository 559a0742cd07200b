//! Result views.
//!
//! Pure functions from backend payloads to styled terminal text. Every piece
//! of backend-supplied text is passed through [`sanitize`] before it becomes
//! a span.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span, Text},
};

use crate::models::{AnalysisResult, HistoryEntry, ImageAnalysis, ParsedPage, TextAnalysis};
use crate::theme::Theme;
use crate::utils::{format_score, format_short_datetime, parse_timestamp, sanitize};

const BAR_WIDTH: usize = 20;
pub const EMPTY_HISTORY: &str = "История пуста";
const NOT_FOUND: &str = "Не найден";

/// Colour band of a 0..=10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    /// 70% and above
    High,
    /// 40% up to 70%
    Medium,
    Low,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        let percent = score_percent(score);
        if percent >= 70.0 {
            ScoreTier::High
        } else if percent >= 40.0 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn color(self, theme: &Theme) -> Color {
        match self {
            ScoreTier::High => theme.score_high,
            ScoreTier::Medium => theme.score_medium,
            ScoreTier::Low => theme.score_low,
        }
    }
}

/// `score / 10 * 100`, computed as `score * 10` so tier edges are exact.
pub fn score_percent(score: f64) -> f64 {
    score * 10.0
}

pub fn render_analysis(result: &AnalysisResult, theme: &Theme) -> Text<'static> {
    match result {
        AnalysisResult::Text(analysis) => render_text_analysis(analysis, theme),
        AnalysisResult::Image(analysis) => render_image_analysis(analysis, theme),
    }
}

pub fn render_text_analysis(analysis: &TextAnalysis, theme: &Theme) -> Text<'static> {
    Text::from(text_analysis_lines(analysis, theme))
}

fn text_analysis_lines(analysis: &TextAnalysis, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.extend(render_result_block("Сильные стороны", &analysis.strengths, theme));
    lines.extend(render_result_block("Слабые стороны", &analysis.weaknesses, theme));
    lines.extend(render_result_block("Уникальные предложения", &analysis.unique_offers, theme));
    lines.extend(render_result_block("Рекомендации", &analysis.recommendations, theme));
    if let Some(summary) = analysis.summary.as_deref().filter(|s| !s.is_empty()) {
        lines.push(block_title("Резюме", theme));
        lines.extend(paragraph(summary, theme));
        lines.push(Line::default());
    }
    lines.extend(render_score_block("🎨 Оценка дизайна", analysis.design_score, theme));
    lines.extend(render_score_block(
        "⚡ Технологический потенциал",
        analysis.technology_potential,
        theme,
    ));
    lines
}

pub fn render_image_analysis(analysis: &ImageAnalysis, theme: &Theme) -> Text<'static> {
    let mut lines = vec![block_title("Описание изображения", theme)];
    lines.extend(paragraph(&analysis.description, theme));
    lines.push(Line::default());

    lines.push(block_title("Оценка визуального стиля", theme));
    lines.push(score_line(
        analysis.visual_style_score,
        Style::default().fg(theme.text),
        Style::default().fg(theme.accent),
        theme,
    ));
    lines.extend(paragraph(&analysis.visual_style_analysis, theme));
    lines.push(Line::default());

    lines.extend(render_result_block("Маркетинговые инсайты", &analysis.marketing_insights, theme));
    lines.extend(render_result_block("Рекомендации", &analysis.recommendations, theme));
    lines.extend(render_score_block("🎨 Оценка дизайна", analysis.design_score, theme));
    lines.extend(render_score_block(
        "⚡ Технологический потенциал",
        analysis.technology_potential,
        theme,
    ));
    Text::from(lines)
}

pub fn render_parsed_content(page: &ParsedPage, theme: &Theme) -> Text<'static> {
    let fields = [
        ("URL:", Some(page.url.as_str())),
        ("Title:", page.title.as_deref()),
        ("H1:", page.h1.as_deref()),
        ("Первый абзац:", page.first_paragraph.as_deref()),
    ];
    let mut lines = Vec::new();
    for (label, value) in fields {
        let value = value.filter(|v| !v.is_empty()).unwrap_or(NOT_FOUND);
        lines.push(Line::from(vec![
            Span::styled(label.to_string(), theme.field_label),
            Span::raw(" "),
            Span::styled(sanitize(value), Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::default());
    if let Some(analysis) = &page.analysis {
        lines.extend(text_analysis_lines(analysis, theme));
    }
    Text::from(lines)
}

/// A titled bullet list; nothing at all when `items` is empty.
pub fn render_result_block(title: &str, items: &[String], theme: &Theme) -> Vec<Line<'static>> {
    if items.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![block_title(title, theme)];
    for item in items {
        lines.push(Line::from(vec![
            Span::styled("  • ", theme.list_bullet),
            Span::styled(sanitize(item), Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::default());
    lines
}

/// A titled score bar coloured by [`ScoreTier`]; nothing when `score` is absent.
pub fn render_score_block(title: &str, score: Option<f64>, theme: &Theme) -> Vec<Line<'static>> {
    let Some(score) = score else {
        return Vec::new();
    };
    let color = ScoreTier::for_score(score).color(theme);
    let style = Style::default().fg(color);
    vec![
        block_title(title, theme),
        score_line(score, style, style, theme),
        Line::default(),
    ]
}

fn score_line(score: f64, label_style: Style, fill_style: Style, theme: &Theme) -> Line<'static> {
    let fraction = (score_percent(score) / 100.0).clamp(0.0, 1.0);
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    Line::from(vec![
        Span::styled(format!("{}/10", format_score(score)), label_style),
        Span::raw("  "),
        Span::styled("█".repeat(filled), fill_style),
        Span::styled(
            "░".repeat(BAR_WIDTH - filled),
            Style::default().fg(theme.blurred_border),
        ),
    ])
}

pub fn render_history(items: &[HistoryEntry], theme: &Theme) -> Text<'static> {
    if items.is_empty() {
        return Text::from(Line::styled(EMPTY_HISTORY, theme.placeholder));
    }
    let mut lines = Vec::with_capacity(items.len() * 2);
    for item in items {
        let time = parse_timestamp(&item.timestamp)
            .map(|dt| format_short_datetime(&dt))
            .unwrap_or_else(|| sanitize(&item.timestamp));
        lines.push(Line::from(vec![
            Span::styled(sanitize(item.request_type.label()), theme.history_type),
            Span::raw("  "),
            Span::styled(time, theme.history_time),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", sanitize(&item.request_summary)),
            Style::default().fg(theme.text_secondary),
        )));
    }
    Text::from(lines)
}

pub fn render_error(message: &str, theme: &Theme) -> Text<'static> {
    Text::from(Line::from(vec![
        Span::styled("⚠ ", theme.error),
        Span::styled(sanitize(message), theme.error),
    ]))
}

fn block_title(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), theme.block_title))
}

fn paragraph(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    sanitize(text)
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.text))))
        .collect()
}

#[cfg(test)]
pub(crate) fn plain(text: &Text) -> String {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
