// UI module for rendering the TUI.
// Contains the per-tab views, status bar, and help overlay.

mod tabs;

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::{ConsoleLevel, LoadingState};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the main content area based on active tab.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.active_tab {
        Tab::Analyze => draw_analyze_tab(frame, app, area),
        Tab::Structure => draw_structure_tab(frame, app, area),
        Tab::Cache => draw_cache_tab(frame, app, area),
        Tab::Console => draw_console_tab(frame, app, area),
    }
}

/// Draw the Analyze tab: input field on top, report below.
fn draw_analyze_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    draw_repo_input(frame, app, chunks[0]);
    draw_report(frame, app, chunks[1]);
}

/// Draw the repository input field.
fn draw_repo_input(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.analyze.input_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Repository (owner/repo or GitHub URL) ");

    let mut spans = vec![Span::raw(app.analyze.input.as_str())];
    if app.analyze.input_focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }

    let input = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(input, area);
}

/// Draw the analysis report view.
fn draw_report(frame: &mut Frame, app: &App, area: Rect) {
    match &app.analyze.report {
        LoadingState::Idle => {
            let block = Block::default().borders(Borders::ALL).title(" Report ");
            let text = Paragraph::new("Enter a repository and press Enter to analyze")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Loading => {
            let block = Block::default().borders(Borders::ALL).title(" Report ");
            let text = Paragraph::new(format!("⏳ {}...", app.analyze.phase.display()))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Error(e) => {
            let block = Block::default().borders(Borders::ALL).title(" Report ");
            let text = Paragraph::new(format!("❌ {}", e))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Loaded(report) => {
            let title = format!(
                " {} · {} ⭐ · generated {} ",
                report.repo.full_name(),
                report.stats.stars,
                report.generated_at.format("%H:%M:%S"),
            );
            let block = Block::default().borders(Borders::ALL).title(title);

            let text = Paragraph::new(report.to_markdown())
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((app.analyze.scroll_y, 0));
            frame.render_widget(text, area);
        }
    }
}

/// Draw the Structure tab: the fetched file tree.
fn draw_structure_tab(frame: &mut Frame, app: &App, area: Rect) {
    match &app.structure.tree {
        LoadingState::Idle => {
            let block = Block::default().borders(Borders::ALL).title(" Structure ");
            let text = Paragraph::new("Analyze a repository to see its file tree")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Loading => {
            let block = Block::default().borders(Borders::ALL).title(" Structure ");
            let text = Paragraph::new("⏳ Fetching file tree...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Error(e) => {
            let block = Block::default().borders(Borders::ALL).title(" Structure ");
            let text = Paragraph::new(format!("❌ {}", e))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
        }
        LoadingState::Loaded(tree) => {
            let branch = app.structure.branch.as_deref().unwrap_or("?");
            let line_count = tree.entries.len();
            let scroll_y = app.structure.scroll_y as usize;
            let title = format!(
                " Structure ({}) [{}-{}/{}]{} ",
                branch,
                scroll_y + 1,
                (scroll_y + area.height.saturating_sub(2) as usize).min(line_count),
                line_count,
                if tree.truncated { " truncated" } else { "" },
            );
            let block = Block::default().borders(Borders::ALL).title(title);

            let lines: Vec<Line> = app
                .structure
                .display_lines()
                .into_iter()
                .enumerate()
                .map(|(i, path)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>5} │ ", i + 1),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(path),
                    ])
                })
                .collect();

            let text = Paragraph::new(lines)
                .block(block)
                .scroll((app.structure.scroll_y, app.structure.scroll_x));
            frame.render_widget(text, area);
        }
    }
}

/// Draw the Cache tab: statistics, key list, and clear actions.
fn draw_cache_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stats summary
            Constraint::Min(1),    // Key list
            Constraint::Length(1), // Action hints
        ])
        .split(area);

    // Stats summary
    let size = app.cache_admin.stats.size;
    let scope = match &app.analyze.current_repo {
        Some(repo) => format!("  ·  managing {}", repo.full_name()),
        None => String::new(),
    };
    let mut summary_lines = vec![Line::from(vec![
        Span::styled("Entries: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} {}", size, if size == 1 { "entry" } else { "entries" }),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  updated ", Style::default().fg(Color::DarkGray)),
        Span::raw(format_relative_time(&app.cache_admin.last_updated)),
        Span::styled(scope, Style::default().fg(Color::DarkGray)),
    ])];
    if let Some(action) = &app.cache_admin.last_action {
        summary_lines.push(Line::from(Span::styled(
            action.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    let summary = Paragraph::new(summary_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Cache Manager "),
    );
    frame.render_widget(summary, chunks[0]);

    // Key list
    let block = Block::default().borders(Borders::ALL).title(" Cached Keys ");
    if app.cache_admin.stats.keys.is_empty() {
        let text = Paragraph::new("Cache is empty")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .cache_admin
            .stats
            .keys
            .iter()
            .map(|key| ListItem::new(Line::from(Span::raw(key.to_string()))))
            .collect();

        let list_widget = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list_widget, chunks[1], &mut app.cache_admin.list_state);
    }

    // Action hints
    let hints = Line::from(vec![
        Span::raw(" r "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
        Span::raw("  d "),
        Span::styled("Remove entry", Style::default().fg(Color::DarkGray)),
        Span::raw("  c "),
        Span::styled("Clear repo cache", Style::default().fg(Color::DarkGray)),
        Span::raw("  C "),
        Span::styled("Clear all", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[2]);
}

/// Draw the Console tab with activity messages.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.console.messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
    } else {
        let items: Vec<ListItem> = app
            .console
            .messages
            .iter()
            .map(|msg| {
                let (icon, color) = match msg.level {
                    ConsoleLevel::Error => ("❌", Color::Red),
                    ConsoleLevel::Warn => ("⚠️", Color::Yellow),
                    ConsoleLevel::Info => ("ℹ️", Color::Cyan),
                };

                let time = format_relative_time(&msg.timestamp);

                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", icon)),
                    Span::styled(time, Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                    Span::styled(msg.message.clone(), Style::default().fg(color)),
                ]))
            })
            .collect();

        let list_widget = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list_widget, area, &mut app.console.list_state);
    }
}

/// Draw the status bar with keybinding hints and rate limit.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.active_tab == Tab::Analyze && app.analyze.input_focused;

    let mut hints = if editing {
        vec![
            Span::raw(" ↵ "),
            Span::styled("Analyze", Style::default().fg(Color::DarkGray)),
            Span::raw("  ↑↓ "),
            Span::styled("History", Style::default().fg(Color::DarkGray)),
            Span::raw("  Tab "),
            Span::styled("Switch", Style::default().fg(Color::DarkGray)),
            Span::raw("  Esc "),
            Span::styled("View report", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![
            Span::raw(" ↑↓ "),
            Span::styled("Scroll/Select", Style::default().fg(Color::DarkGray)),
            Span::raw("  Tab "),
            Span::styled("Switch", Style::default().fg(Color::DarkGray)),
            Span::raw("  s "),
            Span::styled("Export", Style::default().fg(Color::DarkGray)),
            Span::raw("  r "),
            Span::styled("Re-run", Style::default().fg(Color::DarkGray)),
            Span::raw("  ? "),
            Span::styled("Help", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ]
    };

    // Rate limit info on the right when we have seen a GitHub response.
    if app.rate_limit.limit > 0 {
        let rate_color = if app.rate_limit.remaining < 100 {
            Color::Red
        } else if app.rate_limit.remaining < 500 {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        hints.push(Span::styled(
            format!("  API: {}/{}", app.rate_limit.remaining, app.rate_limit.limit),
            Style::default().fg(rate_color),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Format a timestamp as a short relative time ("3m ago").
fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(*dt);
    let seconds = elapsed.num_seconds().max(0);

    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86400)
    }
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 55;
    let popup_height = 20;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter         ", Style::default().fg(Color::Cyan)),
            Span::raw("Analyze repository (input field)"),
        ]),
        Line::from(vec![
            Span::styled("  e or /        ", Style::default().fg(Color::Cyan)),
            Span::raw("Edit repository input"),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓ or j/k    ", Style::default().fg(Color::Cyan)),
            Span::raw("Scroll / navigate lists / history"),
        ]),
        Line::from(vec![
            Span::styled("  Tab           ", Style::default().fg(Color::Cyan)),
            Span::raw("Switch tabs"),
        ]),
        Line::from(vec![
            Span::styled("  PgUp/PgDn     ", Style::default().fg(Color::Cyan)),
            Span::raw("Page scroll"),
        ]),
        Line::from(vec![
            Span::styled("  s             ", Style::default().fg(Color::Cyan)),
            Span::raw("Export report to markdown"),
        ]),
        Line::from(vec![
            Span::styled("  r             ", Style::default().fg(Color::Cyan)),
            Span::raw("Re-run analysis / refresh cache stats"),
        ]),
        Line::from(vec![
            Span::styled("  d             ", Style::default().fg(Color::Cyan)),
            Span::raw("Remove selected cache entry (Cache tab)"),
        ]),
        Line::from(vec![
            Span::styled("  c             ", Style::default().fg(Color::Cyan)),
            Span::raw("Clear cache for current repo (Cache tab)"),
        ]),
        Line::from(vec![
            Span::styled("  C             ", Style::default().fg(Color::Cyan)),
            Span::raw("Clear entire cache (Cache tab)"),
        ]),
        Line::from(vec![
            Span::styled("  ?             ", Style::default().fg(Color::Cyan)),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![
            Span::styled("  q             ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
