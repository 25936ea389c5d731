use analysis_core::presentation::{group_thousands, readiness_status, ResultPresentation, ResultsTab};
use analysis_core::{InputMode, View};
use protocol::config::Skin;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use super::app::{AppState, Focus};
use super::text::{sanitize_text_for_tui, tail_lines, truncate_with_ellipsis};
use super::theme::{Theme, ValueStyle};

const CONFIRM_QUIT_HINT: &str = "Press Q again to quit / Esc to cancel  ";
const COMPACT_ALL_CLEAR: &str = "No fake data detected.";

pub(crate) fn draw_ui(frame: &mut Frame, app: &AppState) {
    let theme = Theme::for_mode(app.theme_mode());
    frame.render_widget(Block::default().style(theme.base_style()), frame.area());
    match (app.view(), app.presentation()) {
        (View::Results, Some(view)) => match app.skin {
            Skin::Editorial => draw_editorial_results(frame, app, &theme, &view),
            Skin::Compact => draw_compact_results(frame, app, &theme, &view),
        },
        _ => draw_input(frame, app, &theme),
    }
}

fn draw_header(frame: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let readiness = app.session.readiness();
    let line = Line::from(vec![
        Span::styled("VerifAI  ", theme.accent_style()),
        Span::styled(
            readiness_status(readiness, app.session.model()),
            theme.readiness_style(readiness),
        ),
    ]);
    let header = Paragraph::new(line).block(theme.block("Analysis Engine"));
    frame.render_widget(header, area);
}

fn draw_input(frame: &mut Frame, app: &AppState, theme: &Theme) {
    let capture = app.session.capture();
    let notice = app
        .session
        .notice()
        .map(ToString::to_string)
        .or_else(|| app.file_error.clone());
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ];
    if notice.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    draw_header(frame, app, theme, chunks[0]);

    let selected = match capture.mode() {
        InputMode::Text => 0,
        InputMode::File => 1,
    };
    let tabs = Tabs::new(vec!["Paste text", "Upload file"])
        .block(theme.block("Input"))
        .style(theme.value_style(ValueStyle::Dim))
        .highlight_style(theme.highlight_style())
        .select(selected);
    frame.render_widget(tabs, chunks[1]);

    let editor_focused = app.focus == Focus::Editor;
    match capture.mode() {
        InputMode::Text => {
            let block = theme.focused_block("Document text", editor_focused);
            let inner = block.inner(chunks[2]);
            let body = if capture.text().is_empty() {
                Text::styled(
                    "Paste or type the text you want checked…",
                    theme.value_style(ValueStyle::Dim),
                )
            } else {
                let mut lines = tail_lines(
                    &sanitize_text_for_tui(capture.text()),
                    inner.width.saturating_sub(1) as usize,
                    inner.height as usize,
                );
                if editor_focused {
                    if let Some(last) = lines.last_mut() {
                        last.push('▏');
                    }
                }
                Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>())
            };
            let editor = Paragraph::new(body)
                .block(block)
                .style(theme.value_style(ValueStyle::Normal));
            frame.render_widget(editor, chunks[2]);

            let budget = capture.char_budget();
            let mut label = format!(
                "{} / {} characters",
                group_thousands(budget.used as u64),
                group_thousands(budget.max as u64)
            );
            if app.truncated {
                label.push_str(" · limit reached");
            }
            let gauge = Gauge::default()
                .block(theme.block("Capacity"))
                .gauge_style(theme.capacity_style(budget.tier()))
                .ratio((budget.percent() / 100.0).clamp(0.0, 1.0))
                .label(label);
            frame.render_widget(gauge, chunks[3]);
        }
        InputMode::File => {
            let caret = if editor_focused { "▏" } else { "" };
            let prompt = Paragraph::new(Line::from(vec![
                Span::styled("Path: ", theme.key_style()),
                Span::styled(
                    format!("{}{caret}", app.path_input),
                    theme.value_style(ValueStyle::Normal),
                ),
            ]))
            .block(theme.focused_block("Document file (.txt, .pdf) · Enter to load", editor_focused));
            frame.render_widget(prompt, chunks[2]);

            let selected = match capture.file() {
                Some(file) => Line::from(vec![
                    Span::styled(
                        truncate_with_ellipsis(file.name(), chunks[3].width.saturating_sub(20) as usize),
                        theme.value_style(ValueStyle::Important),
                    ),
                    Span::styled(format!("  {}", file.size_label()), theme.key_style()),
                ]),
                None => Line::styled("No file selected", theme.value_style(ValueStyle::Dim)),
            };
            frame.render_widget(
                Paragraph::new(selected).block(theme.block("Selected")),
                chunks[3],
            );
        }
    }

    let query_focused = app.focus == Focus::Query;
    let query_caret = if query_focused { "▏" } else { "" };
    let query_line = if capture.query().is_empty() && !query_focused {
        Line::styled(
            "Optional: what should the analysis focus on?",
            theme.value_style(ValueStyle::Dim),
        )
    } else {
        Line::styled(
            format!("{}{query_caret}", capture.query()),
            theme.value_style(ValueStyle::Normal),
        )
    };
    frame.render_widget(
        Paragraph::new(query_line).block(theme.focused_block("Focus query", query_focused)),
        chunks[4],
    );

    let submit_focused = app.focus == Focus::Submit;
    let submit_line = if app.session.is_submitting() {
        let secs = app
            .session
            .controller()
            .elapsed()
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        Line::styled(
            format!("[ Analysing… {secs}s ]"),
            theme.value_style(ValueStyle::Dim),
        )
    } else if !app.can_submit() {
        Line::styled("[ Analyse → ]  engine offline", theme.value_style(ValueStyle::Dim))
    } else if submit_focused {
        Line::styled("[ Analyse → ]", theme.highlight_style())
    } else {
        Line::styled("[ Analyse → ]", theme.accent_style())
    };
    frame.render_widget(
        Paragraph::new(submit_line).block(theme.focused_block("Submit", submit_focused)),
        chunks[5],
    );

    let mut next = 6;
    if let Some(message) = notice {
        let notice_widget = Paragraph::new(Line::from(vec![
            Span::styled(message, theme.error_style()),
            Span::styled("  (Esc to dismiss)", theme.help_style()),
        ]))
        .block(theme.block("Error"))
        .wrap(Wrap { trim: true });
        frame.render_widget(Clear, chunks[next]);
        frame.render_widget(notice_widget, chunks[next]);
        next += 1;
    }

    draw_footer(
        frame,
        app,
        theme,
        chunks[next],
        "Ctrl+S/F5=analyse  F2=mode  Tab=focus  Ctrl+R=results  Ctrl+T=theme  Esc=dismiss  Ctrl+Q=quit  ",
    );
}

fn draw_editorial_results(frame: &mut Frame, app: &AppState, theme: &Theme, view: &ResultPresentation) {
    let scale = app.scale();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, theme, chunks[0]);

    let banner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    let tone = theme.tone_style(view.risk.tone, scale);
    let verdict = Text::from(vec![
        Line::from(vec![
            Span::styled(format!("{} RISK", view.badge.to_uppercase()), tone),
            Span::styled(
                format!("   {} {}", view.flag_count, view.flag_headline),
                theme.value_style(ValueStyle::Normal),
            ),
        ]),
        Line::styled(view.flag_detail, theme.value_style(ValueStyle::Dim)),
    ]);
    frame.render_widget(
        Paragraph::new(verdict)
            .block(theme.block("Verdict"))
            .wrap(Wrap { trim: true }),
        banner[0],
    );
    let meter = Gauge::default()
        .block(theme.block("Risk"))
        .gauge_style(tone)
        .percent(u16::from(view.risk.percent))
        .label(format!("{}%", view.risk.percent));
    frame.render_widget(meter, banner[1]);

    frame.render_widget(
        Paragraph::new(chips_line(theme, view)).block(theme.block("Details")),
        chunks[2],
    );
    draw_tabs(frame, app, theme, view, chunks[3], "Sections");

    let body = tab_body(app, theme, view, view.flag_headline, Some(view.flag_detail));
    frame.render_widget(
        Paragraph::new(body)
            .block(theme.block(app.results_tab.title()))
            .wrap(Wrap { trim: false }),
        chunks[4],
    );

    draw_footer(
        frame,
        app,
        theme,
        chunks[5],
        "Tab=section  e=save report  t=theme  Esc=back  q=quit  ",
    );
}

fn draw_compact_results(frame: &mut Frame, app: &AppState, theme: &Theme, view: &ResultPresentation) {
    let scale = app.scale();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, theme, chunks[0]);

    let card_title = format!("Result · {} risk {}%", view.badge, view.risk.percent);
    let card = theme.block(&card_title);
    let inner = card.inner(chunks[1]);
    frame.render_widget(card, chunks[1]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let tone = theme.tone_style(view.risk.tone, scale);
    frame.render_widget(
        Gauge::default()
            .gauge_style(tone)
            .percent(u16::from(view.risk.percent))
            .label(format!("{} · {}%", view.badge, view.risk.percent)),
        rows[0],
    );
    frame.render_widget(Paragraph::new(chips_line(theme, view)), rows[1]);
    frame.render_widget(tabs_widget(app, theme, view), rows[2]);

    let body = tab_body(app, theme, view, COMPACT_ALL_CLEAR, None);
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), rows[3]);

    draw_footer(
        frame,
        app,
        theme,
        chunks[2],
        "Tab=tab  e=save report  s=save summary  t=theme  Esc=back  q=quit  ",
    );
}

fn chips_line<'a>(theme: &Theme, view: &'a ResultPresentation) -> Line<'a> {
    let mut spans = Vec::new();
    if let Some(confidence) = &view.confidence {
        spans.push(Span::styled("Confidence ", theme.key_style()));
        spans.push(Span::styled(confidence.as_str(), theme.value_style(ValueStyle::Important)));
        spans.push(Span::raw("   "));
    }
    if let Some(words) = &view.word_count {
        spans.push(Span::styled(words.as_str(), theme.value_style(ValueStyle::Normal)));
        spans.push(Span::raw("   "));
    }
    if let Some(query) = &view.query {
        spans.push(Span::styled("Focus: ", theme.key_style()));
        spans.push(Span::styled(query.as_str(), theme.accent_style()));
    }
    if spans.is_empty() {
        spans.push(Span::styled("General summary", theme.value_style(ValueStyle::Dim)));
    }
    Line::from(spans)
}

fn tabs_widget<'a>(app: &AppState, theme: &Theme, view: &ResultPresentation) -> Tabs<'a> {
    let titles = [ResultsTab::Summary, ResultsTab::Flagged]
        .into_iter()
        .map(|tab| match tab.badge(view.flag_count) {
            Some(count) => format!("{} ({count})", tab.title()),
            None => tab.title().to_string(),
        })
        .collect::<Vec<_>>();
    let selected = match app.results_tab {
        ResultsTab::Summary => 0,
        ResultsTab::Flagged => 1,
    };
    Tabs::new(titles)
        .style(theme.value_style(ValueStyle::Dim))
        .highlight_style(theme.highlight_style())
        .select(selected)
}

fn draw_tabs(
    frame: &mut Frame,
    app: &AppState,
    theme: &Theme,
    view: &ResultPresentation,
    area: Rect,
    title: &str,
) {
    frame.render_widget(tabs_widget(app, theme, view).block(theme.block(title)), area);
}

fn tab_body<'a>(
    app: &AppState,
    theme: &Theme,
    view: &ResultPresentation,
    all_clear: &'a str,
    all_clear_detail: Option<&'a str>,
) -> Text<'a> {
    match app.results_tab {
        ResultsTab::Summary => Text::styled(
            sanitize_text_for_tui(&view.summary),
            theme.value_style(ValueStyle::Normal),
        ),
        ResultsTab::Flagged if view.flags.is_empty() => {
            let mut lines = vec![Line::styled(all_clear, theme.value_style(ValueStyle::Important))];
            if let Some(detail) = all_clear_detail {
                lines.push(Line::styled(detail, theme.value_style(ValueStyle::Dim)));
            }
            Text::from(lines)
        }
        ResultsTab::Flagged => {
            let mut lines = vec![
                Line::styled(view.flag_detail, theme.value_style(ValueStyle::Dim)),
                Line::default(),
            ];
            lines.extend(view.flags.iter().enumerate().map(|(idx, sentence)| {
                Line::from(vec![
                    Span::styled(format!("{}. ", idx + 1), theme.warn_style()),
                    Span::styled(
                        sanitize_text_for_tui(sentence),
                        theme.value_style(ValueStyle::Normal),
                    ),
                ])
            }));
            Text::from(lines)
        }
    }
}

fn draw_footer(frame: &mut Frame, app: &AppState, theme: &Theme, area: Rect, controls: &str) {
    let mut footer_spans = vec![Span::styled(controls.to_string(), theme.help_style())];
    if app.confirm_quit {
        footer_spans.push(Span::styled(CONFIRM_QUIT_HINT, theme.warn_style()));
    }
    if let Some(message) = &app.status_message {
        footer_spans.push(Span::styled(message.clone(), theme.accent_style()));
    }
    let footer = Paragraph::new(Line::from(footer_spans))
        .block(theme.block("Controls"))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}
