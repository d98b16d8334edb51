use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use mailclass_core::{RequestState, ResultPresenter, format_file_size};

use super::{spinner_char, truncate};
use crate::app::App;
use crate::theme::Theme;

/// Render the classification form: file slot, options, status and result.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(4), // file slot
        Constraint::Length(4), // options
        Constraint::Length(2), // status
        Constraint::Min(3),    // result
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, app, chunks[0]);
    render_file_slot(f, app, chunks[1]);
    render_options(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
    render_result(f, app, chunks[4]);

    let footer = Line::from(Span::styled(
        " o:pick file  x:remove  s:stemming  p:model  Enter:classify  c:cancel  y:copy  ?:help  q:quit",
        theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[5]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let header = Line::from(vec![
        Span::styled(" mailclass ", theme.header_style()),
        Span::styled(
            " > Classificador de E-mails",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);

    let backend = Line::from(Span::styled(
        format!("{} ", app.base_url),
        Style::default().fg(theme.dim),
    ))
    .alignment(Alignment::Right);
    f.render_widget(Paragraph::new(backend), area);
}

fn render_file_slot(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let inner_width = area.width.saturating_sub(4) as usize;

    let lines = match app.selection.selected() {
        None => vec![
            Line::from(Span::styled(
                "  Arraste e solte ou pressione o para selecionar",
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                "  Suporte para arquivos .PDF e .TXT",
                Style::default().fg(theme.dim),
            )),
        ],
        Some(file) => {
            let size = format_file_size(file.size_bytes);
            let name_width = inner_width.saturating_sub(size.len() + 6);
            let mut lines = vec![Line::from(vec![
                Span::styled("  \u{1F4C4} ", Style::default().fg(theme.active)),
                Span::styled(
                    truncate(&file.name, name_width),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {size}"), Style::default().fg(theme.dim)),
            ])];
            match app.selection.validation_issue() {
                Some(issue) => lines.push(Line::from(Span::styled(
                    format!("  {issue}"),
                    Style::default().fg(theme.error),
                ))),
                None => lines.push(Line::from(Span::styled(
                    "  x para remover",
                    Style::default().fg(theme.dim),
                ))),
            }
            lines
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Arquivo ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_options(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let check = if app.options.stemming_enabled {
        "[x]"
    } else {
        "[ ]"
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("  {check} "), Style::default().fg(theme.active)),
            Span::styled("Ativar Stemming PT-BR", Style::default().fg(theme.text)),
            Span::styled("  (s)", Style::default().fg(theme.dim)),
        ]),
        Line::from(vec![
            Span::styled("  Modelo: ", Style::default().fg(theme.text)),
            Span::styled(
                app.options.provider.label(),
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (p)", Style::default().fg(theme.dim)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Opções ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = match app.orchestrator.state() {
        RequestState::Loading { .. } => Line::from(vec![
            Span::styled(
                format!("  {} ", spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            ),
            Span::styled(
                "Processando arquivo...",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  c para cancelar", Style::default().fg(theme.dim)),
        ]),
        RequestState::Failure(err) => Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        RequestState::Idle | RequestState::Success(_) => match &app.notice {
            Some(notice) => Line::from(Span::styled(
                format!("  {notice}"),
                Style::default().fg(theme.active),
            )),
            None if app.selection.has_file() => Line::from(Span::styled(
                "  Enter para analisar o e-mail",
                Style::default().fg(theme.dim),
            )),
            None => Line::from(""),
        },
    };

    f.render_widget(
        Paragraph::new(vec![Line::from(""), line]).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_result(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Resultado ");

    let Some(result) = app.orchestrator.result() else {
        f.render_widget(block, area);
        return;
    };

    let presenter = ResultPresenter::new(result, app.orchestrator.requested_provider());
    let lines = result_lines(&presenter, theme);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    f.render_widget(paragraph, area);
}

fn result_lines<'a>(presenter: &ResultPresenter<'a>, theme: &Theme) -> Vec<Line<'a>> {
    let heading = Style::default()
        .fg(theme.active)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                " Análise Concluída: ",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                presenter.category(),
                theme.bucket_style(presenter.is_primary_bucket()),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                " Confiança: {} | Modelo: {}",
                presenter.confidence(),
                presenter.provider_label()
            ),
            Style::default().fg(theme.dim),
        )),
        Line::from(""),
        Line::from(Span::styled(" Resposta Sugerida", heading)),
    ];
    lines.extend(
        presenter
            .suggested_reply()
            .lines()
            .map(|l| Line::from(Span::styled(format!(" {l}"), Style::default().fg(theme.text)))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" Prévia do Conteúdo [{}]", presenter.language()),
        heading,
    )));
    lines.extend(
        presenter
            .preview()
            .lines()
            .map(|l| Line::from(Span::styled(format!(" {l}"), Style::default().fg(theme.dim)))),
    );
    lines
}
