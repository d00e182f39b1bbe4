//! Rendering of the three-pane layout.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::{App, Pane};
use crate::models::{NarrationStyle, Tone};

fn selected_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn draw_ui(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(28),
            Constraint::Min(30),
            Constraint::Length(40),
        ])
        .split(outer[0]);

    draw_left_sidebar(f, app, columns[0]);
    draw_input(f, app, columns[1]);
    draw_right_sidebar(f, app, columns[2]);
    draw_status(f, app, outer[1]);
    draw_footer(f, outer[2]);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

fn draw_left_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(area);

    let voice_items: Vec<ListItem> = app
        .voices
        .iter()
        .map(|voice| ListItem::new(voice.display_name.clone()))
        .collect();
    let voices = List::new(voice_items)
        .block(pane_block("Select Voice", app.focus == Pane::Voices))
        .highlight_style(selected_style());
    let mut voice_state = ListState::default();
    voice_state.select(Some(app.voice_index));
    f.render_stateful_widget(voices, rows[0], &mut voice_state);

    let style_items: Vec<ListItem> = NarrationStyle::ALL
        .iter()
        .map(|style| ListItem::new(style.label()))
        .collect();
    let styles = List::new(style_items)
        .block(pane_block("Narration Style", app.focus == Pane::Styles))
        .highlight_style(selected_style());
    let mut style_state = ListState::default();
    style_state.select(Some(app.style_index));
    f.render_stateful_widget(styles, rows[1], &mut style_state);

    let tone_items: Vec<ListItem> = Tone::ALL
        .iter()
        .map(|tone| ListItem::new(tone.label()))
        .collect();
    let tones = List::new(tone_items)
        .block(pane_block("Tone", app.focus == Pane::Tones))
        .highlight_style(selected_style());
    let mut tone_state = ListState::default();
    tone_state.select(Some(app.tone_index));
    f.render_stateful_widget(tones, rows[2], &mut tone_state);

    let generate_label = if app.is_generating {
        "Summoning..."
    } else {
        "Awaken the Abyss (Ctrl+G)"
    };
    let generate_style = if app.is_generating {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };
    let generate = Paragraph::new(Line::styled(generate_label, generate_style))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(generate, rows[3]);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Pane::Input;
    let text = if focused {
        format!("{}▌", app.input)
    } else {
        app.input.clone()
    };
    let input = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(pane_block("Enter What You Will....", focused));
    f.render_widget(input, area);
}

fn draw_right_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let track_items: Vec<ListItem> = app
        .tracks
        .iter()
        .map(|entry| ListItem::new(entry.display_name.clone()))
        .collect();
    let tracks = List::new(track_items)
        .block(pane_block(
            "Generated Audio Tracks",
            app.focus == Pane::Tracks,
        ))
        .highlight_style(selected_style());
    let mut track_state = ListState::default();
    if !app.tracks.is_empty() {
        track_state.select(Some(app.track_index));
    }
    f.render_stateful_widget(tracks, rows[0], &mut track_state);

    let now_playing = Paragraph::new(app.now_playing.clone())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Now Playing"));
    f.render_widget(now_playing, rows[1]);

    let transport = Paragraph::new("▶ Enter   ⏸ Space   ⏹ s   Refresh r")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(transport, rows[2]);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let style = if app.is_generating {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    f.render_widget(Paragraph::new(Line::styled(app.status.clone(), style)), area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hints = "Tab panes  ↑/↓ select  Ctrl+G generate  Enter play  Space pause  s stop  r refresh  q/Esc quit";
    f.render_widget(
        Paragraph::new(Line::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}
