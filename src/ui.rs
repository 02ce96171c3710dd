use deskfolio_core::knowledge::OWNER_NAME;
use deskfolio_core::{AppId, ChatRole};
use ratatui::{
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, ICON_COLUMNS, SUGGESTIONS};
use crate::peripherals::{KEY_ROWS, SPACE_LABEL};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) if end > 0 => {
                if start > 0 {
                    spans.push(Span::raw(rest[..start].to_string()));
                }
                spans.push(Span::styled(
                    after[..end].to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                rest = &after[end + 2..];
            }
            // No closing **, treat as literal
            _ => break,
        }
    }

    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    Line::from(spans)
}

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries for wrapping (doesn't break mid-word)
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    if !app.view.is_started() {
        render_start_screen(frame, area);
    } else if app.is_compact() {
        render_compact(app, frame, area);
    } else {
        render_desk(app, frame, area);
    }
}

fn render_start_screen(frame: &mut Frame, area: Rect) {
    let [card] = Layout::vertical([Constraint::Length(9)])
        .flex(Flex::Center)
        .areas(area);
    let [card] = Layout::horizontal([Constraint::Length(52)])
        .flex(Flex::Center)
        .areas(card);

    let text = Text::from(vec![
        Line::default(),
        Line::from(Span::styled(
            format!("{}'s Desk", OWNER_NAME),
            Style::default().fg(Color::Cyan).bold(),
        ))
        .centered(),
        Line::from(Span::styled(
            "An interactive portfolio",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
        Line::default(),
        Line::from(vec![
            Span::styled(" Enter ", Style::default().bg(Color::Cyan).fg(Color::Black)),
            Span::raw(" start   "),
            Span::styled(" q ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            Span::raw(" quit"),
        ])
        .centered(),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(text).block(block), card);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(14)]).areas(area);

    let title = Line::from(vec![
        Span::styled(format!(" {}'s Desk ", OWNER_NAME), Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("[{}]", app.source_label), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);
    let style = Style::default().bg(Color::DarkGray);
    frame.render_widget(Paragraph::new(title).style(style), left);
    frame.render_widget(
        Paragraph::new(Line::from(app.clock.as_str()).right_aligned()).style(style),
        right,
    );
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::White);

    let hints: &[(&str, &str)] = match (app.input_mode, app.is_compact(), app.view.open_app()) {
        (InputMode::Editing, _, _) => &[("Enter", "send"), ("Esc", "stop typing")],
        (_, true, _) => &[("1-6", "jump"), ("Tab", "next"), ("j/k", "scroll"), ("i", "ask"), ("q", "quit")],
        (_, false, None) => &[("←↑↓→", "select"), ("Enter", "open"), ("1-6", "open"), ("q", "quit")],
        (_, false, Some(AppId::Ai)) => &[("i", "type"), ("1-4", "suggest"), ("j/k", "scroll"), ("Esc", "close")],
        (_, false, Some(_)) => &[("j/k", "scroll"), ("1-6", "switch"), ("Esc", "close")],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {}  ", label), label_style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_desk(app: &mut App, frame: &mut Frame, area: Rect) {
    let [header_area, monitor_area, desk_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let monitor = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(" Monitor ");
    let screen = monitor.inner(monitor_area);
    frame.render_widget(monitor, monitor_area);
    app.screen_area = Some(screen);

    match app.view.open_app() {
        Some(open) => render_window(app, frame, screen, open),
        None => render_icons(app, frame, screen),
    }

    let [keyboard_area, pad_area] =
        Layout::horizontal([Constraint::Min(40), Constraint::Length(26)]).areas(desk_area);
    render_keyboard(app, frame, keyboard_area);
    render_mouse_pad(app, frame, pad_area);

    render_footer(app, frame, footer_area);
}

fn render_icons(app: &mut App, frame: &mut Frame, screen: Rect) {
    let apps = AppId::all();
    let cell_width = screen.width / ICON_COLUMNS as u16;
    let cell_height = 4;

    app.icon_areas.clear();
    for (idx, target) in apps.iter().enumerate() {
        let col = (idx % ICON_COLUMNS) as u16;
        let row = (idx / ICON_COLUMNS) as u16;
        if (row + 1) * cell_height > screen.height {
            continue;
        }
        let cell = Rect::new(
            screen.x + col * cell_width,
            screen.y + row * cell_height,
            cell_width.saturating_sub(1),
            cell_height,
        );

        let selected = idx == app.selected_icon;
        let border = if selected { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let label = Line::from(vec![
            Span::raw(format!("{} ", target.glyph())),
            Span::styled(
                format!("{} {}", idx + 1, target.title()),
                if selected {
                    Style::default().fg(Color::Cyan).bold()
                } else {
                    Style::default()
                },
            ),
        ])
        .centered();
        frame.render_widget(Paragraph::new(label).block(block), cell);
        app.icon_areas.push((*target, cell));
    }
}

fn render_window(app: &mut App, frame: &mut Frame, screen: Rect, open: AppId) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} {} ", open.glyph(), open.title()))
        .title(Line::from(" Esc close ").right_aligned());
    let inner = block.inner(screen);
    frame.render_widget(block, screen);

    if open == AppId::Ai {
        render_chat(app, frame, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for topic in open.topics() {
        lines.push(Line::from(Span::styled(
            topic.display_name(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(app.knowledge.answer(*topic)));
        lines.push(Line::default());
    }

    let content = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .scroll((app.content_scroll, 0));
    frame.render_widget(content, inner);
}

fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    for msg in app.session.messages() {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for wrapped in wrap_text_to_width(&msg.content, width) {
                    lines.push(Line::from(wrapped));
                }
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                if msg.pending {
                    // Animated dots: cycles through ".", "..", "..."
                    let dots = ".".repeat((app.animation_frame as usize) + 1);
                    lines.push(Line::from(Span::styled(
                        format!("typing{}", dots),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                    )));
                } else {
                    for line in msg.content.lines() {
                        for wrapped in wrap_text_to_width(line, width) {
                            lines.push(parse_markdown_line(&wrapped));
                        }
                    }
                }
            }
        }
        lines.push(Line::default());
    }

    lines
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, chips_area, input_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(area);

    app.chat_height = chat_area.height;
    app.chat_width = chat_area.width;

    let chat_text = if app.session.is_empty() {
        Text::from(Span::styled(
            format!("Ask me anything about {}...", OWNER_NAME),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(transcript_lines(app, chat_area.width as usize))
    };
    frame.render_widget(Paragraph::new(chat_text).scroll((app.chat_scroll, 0)), chat_area);

    let mut chips = Vec::new();
    for (idx, question) in SUGGESTIONS.iter().enumerate() {
        chips.push(Span::styled(
            format!(" {} ", idx + 1),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ));
        chips.push(Span::styled(format!(" {}  ", question), Style::default().fg(Color::Gray)));
    }
    frame.render_widget(Paragraph::new(Line::from(chips)), chips_area);

    render_chat_input(app, frame, input_area, " Message ");
}

fn render_chat_input(app: &mut App, frame: &mut Frame, area: Rect, title: &str) {
    let editing = app.input_mode == InputMode::Editing;
    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title.to_string());
    let inner = block.inner(area);

    let input = Paragraph::new(app.chat_input.as_str()).block(block);
    frame.render_widget(input, area);
    app.chat_area = Some(area);

    if editing {
        let cursor_x = inner.x + (app.chat_cursor as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(cursor_x, inner.y));
    }
}

fn render_keyboard(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Keyboard ");

    let key_style = |label: &str| {
        if app.keyboard.is_pressed(label) {
            Style::default().bg(Color::Cyan).fg(Color::Black).bold()
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let mut lines: Vec<Line> = KEY_ROWS
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|label| Span::styled(format!("[{}]", label), key_style(*label)))
                .collect();
            Line::from(spans).centered()
        })
        .collect();
    lines.push(
        Line::from(Span::styled(
            format!("[{:^24}]", SPACE_LABEL),
            key_style(SPACE_LABEL),
        ))
        .centered(),
    );

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_mouse_pad(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Mouse pad ");
    let pad = block.inner(area);
    frame.render_widget(block, area);

    let (x, y) = app.mouse.cell_in(pad, 3, 2);
    let style = if app.mouse.clicked {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let mouse = Paragraph::new(Text::from(vec![
        Line::from(Span::styled("╭┬╮", style)),
        Line::from(Span::styled("╰─╯", style)),
    ]));
    frame.render_widget(mouse, Rect::new(x, y, 3.min(pad.width), 2.min(pad.height)));
}

fn short_label(app: AppId) -> &'static str {
    match app {
        AppId::Ai => "AI",
        AppId::Experience => "Work",
        AppId::Projects => "Projects",
        AppId::Education => "School",
        AppId::Achievements => "Awards",
        AppId::Mail => "Mail",
    }
}

fn render_compact(app: &mut App, frame: &mut Frame, area: Rect) {
    let [topbar_area, page_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    app.screen_area = None;
    let width = page_area.width as usize;

    // Build the page first so the top bar can highlight the visible section
    let mut lines: Vec<Line> = Vec::new();
    let mut offsets = Vec::new();
    for section in AppId::all() {
        offsets.push((section, lines.len() as u16));
        lines.push(Line::from(Span::styled(
            format!("{} {}", section.glyph(), section.title()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));

        if section == AppId::Ai {
            if app.session.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Press i to ask a question.",
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                lines.extend(transcript_lines(app, width));
            }
        }
        for topic in section.topics() {
            for wrapped in wrap_text_to_width(app.knowledge.answer(*topic), width) {
                lines.push(Line::from(wrapped));
            }
        }
        lines.push(Line::default());
    }
    if app.follow_chat {
        app.follow_chat = false;
        // Bottom of the assistant section is the start of the next one
        let chat_end = offsets.get(1).map(|(_, offset)| *offset).unwrap_or(lines.len() as u16);
        app.page_scroll = chat_end.saturating_sub(page_area.height);
    }
    app.section_offsets = offsets;

    let max_scroll = (lines.len() as u16).saturating_sub(page_area.height);
    app.page_scroll = app.page_scroll.min(max_scroll);

    // Top bar links
    let active = app.active_section();
    let mut spans = Vec::new();
    let mut x = topbar_area.x;
    app.link_areas.clear();
    for section in AppId::all() {
        let label = format!(" {} ", short_label(section));
        let len = label.chars().count() as u16;
        let style = if Some(section) == active {
            Style::default().bg(Color::Cyan).fg(Color::Black).bold()
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        if x + len <= topbar_area.x + topbar_area.width {
            app.link_areas.push((section, Rect::new(x, topbar_area.y, len, 1)));
        }
        x = x.saturating_add(len);
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray)),
        topbar_area,
    );

    frame.render_widget(Paragraph::new(Text::from(lines)).scroll((app.page_scroll, 0)), page_area);

    render_chat_input(app, frame, input_area, " Ask me anything ");
    render_footer(app, frame, footer_area);
}
