//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::UiSettings;
use crate::picker::Picker;
use crate::song::format_duration;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("o", "pick a song");
    map.insert("space/p", "play/pause");
    map.insert("s", "stop");
    map.insert("q", "quit");
    map
});

static PICKER_CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut map = BTreeMap::new();
        map.insert("type", "filter");
        map.insert("↑/↓", "move");
        map.insert("enter", "pick");
        map.insert("esc", "clear/cancel");
        map
    });

/// Render a controls help line in a fixed, human-friendly order.
fn controls_text(map: &BTreeMap<&'static str, &'static str>, order: &[&str]) -> String {
    order
        .iter()
        .filter_map(|k| map.get(k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Text of the song panel.
fn song_text(app: &App) -> String {
    match &app.song {
        Some(song) => {
            let mut text = song.summary();
            if let Some(pos) = app.position {
                text.push_str(&format!(
                    "\nPosition: {}",
                    format_duration(pos.as_millis() as u64)
                ));
            }
            text
        }
        None => "Press o to pick a song".to_string(),
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" onetrack ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let song = Paragraph::new(song_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" song "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(song, chunks[1]);

    // Play/pause control, then any toast.
    let mut spans: Vec<Span> = Vec::new();
    if let Some(label) = app.control.label() {
        spans.push(Span::styled(
            format!("[ {label} ]"),
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ));
    }
    if let Some(text) = app.toast_text() {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::raw(text.to_string()).italic());
    }
    let status = Paragraph::new(Line::from(spans)).block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" control "),
    );
    frame.render_widget(status, chunks[2]);

    let footer = Paragraph::new(controls_text(&CONTROLS_MAP, &["o", "space/p", "s", "q"]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    if let Some(picker) = &app.picker {
        draw_picker(frame, picker, chunks[1]);
    }
}

/// Picker overlay, kept inside the song panel.
fn draw_picker(frame: &mut Frame, picker: &Picker, area: Rect) {
    let popup_area = centered_rect_sized(area.width, area.height, area);
    frame.render_widget(Clear, popup_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(popup_area);

    let display = picker.visible();
    let query = picker.query.trim();

    // Only build items for the window around the selection.
    let total = display.len();
    let list_height = parts[0].height.saturating_sub(2) as usize;
    let sel_pos = display
        .iter()
        .position(|&i| i == picker.selected)
        .unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let label = &picker.entries()[i].label;
            if query.is_empty() {
                return ListItem::new(label.as_str());
            }
            let Some(positions) = picker.match_positions(i) else {
                return ListItem::new(label.as_str());
            };
            let spans: Vec<Span> = label
                .chars()
                .enumerate()
                .map(|(ci, ch)| {
                    if positions.contains(&ci) {
                        Span::styled(
                            ch.to_string(),
                            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                        )
                    } else {
                        Span::raw(ch.to_string())
                    }
                })
                .collect();
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" pick a song: {} ", picker.root().display());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, parts[0], &mut state);

    let filter_line = if query.is_empty() {
        controls_text(&PICKER_CONTROLS_MAP, &["type", "↑/↓", "enter", "esc"])
    } else {
        format!("filter: {}", picker.query)
    };
    let filter = Paragraph::new(filter_line).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(filter, parts[1]);
}
