use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::theme::Theme;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(64, 30, area);

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("File", theme),
        key_line("o", "Open file picker", theme),
        key_line("x / Del", "Remove selected file", theme),
        key_line("paste / drop", "Select a dropped .pdf or .txt", theme),
        Line::from(""),
        section_header("Classification", theme),
        key_line("s", "Toggle stemming", theme),
        key_line("p", "Cycle model provider", theme),
        key_line("Enter / r", "Classify selected file", theme),
        key_line("c", "Cancel running request", theme),
        key_line("y", "Copy suggested reply (OSC 52)", theme),
        key_line("j / k", "Scroll result", theme),
        Line::from(""),
        section_header("File picker", theme),
        key_line("j / k", "Move down / up", theme),
        key_line("Enter", "Open directory / pick file", theme),
        key_line("Space", "Pick file", theme),
        key_line("Esc", "Back to form", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("t", "Switch theme", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
