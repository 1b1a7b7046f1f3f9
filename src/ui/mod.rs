pub mod layout;
pub mod theme;

pub use theme::Theme;

use crate::app::App;
use crate::controller::MoodView;
use crate::embed::EmbedState;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const HINTS: &str = concat!(
    "←/→ wheel · 1-9 mood · space play · n/p track · ",
    "s share · m menu · b/f hide/show · q quit",
);

pub fn ui(f: &mut Frame, app: &App) {
    let view = app.view();
    let theme = &app.theme;
    let main = layout::get_main_layout(f.area());

    render_header(f, main.header, &view, theme);
    render_wheel(f, main.wheel, &view, theme);
    render_panel(f, main.panel, &view, theme);
    render_controls(f, main.controls, &view, theme);

    let hints = Paragraph::new(Line::from(Span::styled(
        HINTS,
        Style::default().fg(theme.overlay),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hints, main.footer);

    if let Some(ref toast) = app.toast {
        render_toast(f, &toast.message, theme);
    }
}

fn render_header(f: &mut Frame, area: Rect, view: &MoodView, theme: &Theme) {
    let line = match (&view.emoji, &view.label) {
        (Some(emoji), Some(label)) => Line::from(vec![
            Span::raw(format!("{}  ", emoji)),
            Span::styled(
                label.as_str(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ]),
        _ => Line::from(Span::styled(
            "How are you feeling?",
            Style::default().fg(theme.overlay),
        )),
    };
    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.surface)),
        );
    f.render_widget(header, area);
}

fn render_wheel(f: &mut Frame, area: Rect, view: &MoodView, theme: &Theme) {
    let mut spans = Vec::with_capacity(view.options.len() * 2);
    for (i, option) in view.options.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(theme.surface)));
        }
        let style = if option.active {
            Style::default()
                .fg(theme.base)
                .bg(theme.magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        spans.push(Span::styled(
            format!(" {} {} {} ", i + 1, option.emoji, option.name),
            style,
        ));
    }

    let wheel = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(wheel, area);
}

fn render_panel(f: &mut Frame, area: Rect, view: &MoodView, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.surface))
        .title(" Playlist ");

    if !view.panel_visible {
        let hidden = Paragraph::new(Span::styled(
            "Playlist hidden (f to show)",
            Style::default().fg(theme.overlay),
        ))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(hidden, area);
        return;
    }

    let dim = Style::default().fg(theme.overlay);
    let lines: Vec<Line> = match (&view.embed_state, &view.embed) {
        (EmbedState::Loading, Some(embed)) => vec![
            Line::from(Span::styled("⏳ Loading player…", Style::default().fg(theme.yellow))),
            Line::from(Span::styled(embed.url.as_str(), dim)),
        ],
        (EmbedState::Ready, Some(embed)) => vec![
            Line::from(Span::styled("🎵 Player ready", Style::default().fg(theme.green))),
            Line::from(Span::styled(embed.url.as_str(), dim)),
            Line::from(Span::styled(
                format!("{} × {}", embed.size.width, embed.size.height),
                dim,
            )),
        ],
        (EmbedState::Failed(e), _) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Couldn't start the player here.",
                    Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(e.to_string(), dim)),
            ];
            if let Some(ref link) = view.fallback_link {
                lines.push(Line::from(vec![
                    Span::raw("Listen on Spotify: "),
                    Span::styled(
                        link.as_str(),
                        Style::default()
                            .fg(theme.blue)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                ]));
            }
            lines
        }
        _ => vec![Line::from(Span::styled("Pick a mood to get a playlist", dim))],
    };

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(panel, area);
}

fn render_controls(f: &mut Frame, area: Rect, view: &MoodView, theme: &Theme) {
    let btn_style = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let line = if view.fallback_visible() {
        Line::from(Span::styled("🔗  s / space: open playlist in browser", btn_style))
    } else {
        Line::from(vec![
            Span::styled("   ⏮   ", btn_style),
            Span::raw("   "),
            Span::styled(format!("   {}   ", view.play_glyph()), btn_style),
            Span::raw("   "),
            Span::styled("   ⏭   ", btn_style),
            Span::raw("      "),
            Span::styled("⇪ share", Style::default().fg(theme.blue)),
        ])
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_toast(f: &mut Frame, message: &str, theme: &Theme) {
    let screen = f.area();
    let width = (message.width() as u16 + 4).min(screen.width.saturating_sub(2));
    let x = screen.width.saturating_sub(width + 1);
    let area = Rect::new(x, 1, width, 3).intersection(screen);
    if area.is_empty() {
        return;
    }

    f.render_widget(Clear, area);
    let toast = Paragraph::new(Span::styled(
        message,
        Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.blue)),
    );
    f.render_widget(toast, area);
}
