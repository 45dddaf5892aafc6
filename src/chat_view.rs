use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::layout::{self, LayoutConfig};
use crate::models::{Message, Sender};

/// Layout parameters in terminal cell units: one row per wrapped line, one
/// header row of chrome per bubble, one blank row between bubbles, four
/// rows reserved for the status and input areas. The renderer below
/// assumes this shape.
pub fn terminal_layout(wrap_cols: usize) -> LayoutConfig {
    LayoutConfig {
        wrap_cols,
        line_height: 1.0,
        message_chrome: 1.0,
        message_spacing: 1.0,
        bubble_width_frac: 0.7,
        side_margin: 1.0,
        input_bar_height: 4.0,
        top_margin: 1.0,
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();
    app.controller.set_viewport_height(size.height as f32);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(size);

    draw_messages(f, app, chunks[0]);
    app.status_indicator.render(f, chunks[1]);
    draw_input(f, app, chunks[2]);
}

fn draw_messages(f: &mut Frame, app: &App, area: Rect) {
    let cfg = app.controller.layout();
    let messages = app.controller.messages();
    let offset = app.controller.scroll_offset();
    let viewport_height = f.area().height as f32;

    for (message, extent) in messages
        .iter()
        .zip(layout::message_extents(cfg, &messages))
    {
        // Culling: bubbles entirely outside the viewport are not drawn.
        // Their extents still accumulate, so everything else keeps its row.
        if !extent.visible(cfg, offset, viewport_height) {
            continue;
        }
        let screen_top = cfg.top_margin + extent.top + offset;
        draw_bubble(f, area, cfg, message, screen_top);
    }
}

fn draw_bubble(f: &mut Frame, area: Rect, cfg: &LayoutConfig, message: &Message, screen_top: f32) {
    let width = layout::bubble_width(cfg, area.width as f32) as u16;
    let margin = cfg.side_margin as u16;
    let x = match message.sender {
        Sender::User => area.x + area.width.saturating_sub(width + margin),
        Sender::Bot => area.x + margin,
    };

    let style = match message.sender {
        Sender::User => Style::default().fg(Color::Rgb(255, 223, 128)),
        Sender::Bot => Style::default().fg(Color::Rgb(144, 238, 144)),
    };

    let mut rows: Vec<Line> = vec![header_line(message, style)];
    for text_line in layout::wrap(&message.text, cfg.wrap_cols) {
        rows.push(Line::from(Span::styled(text_line, style)));
    }

    // Clip partially visible bubbles against the messages area.
    let top = screen_top.round() as i32;
    let skip = (-top).max(0);
    let y = area.y as i32 + top.max(0);
    let bottom = (area.y + area.height) as i32;
    let visible = (rows.len() as i32 - skip).min(bottom - y);
    if visible <= 0 {
        return;
    }

    f.render_widget(
        Paragraph::new(rows).scroll((skip as u16, 0)),
        Rect {
            x,
            y: y as u16,
            width,
            height: visible as u16,
        },
    );
}

fn header_line(message: &Message, style: Style) -> Line<'static> {
    let label = match message.sender {
        Sender::User => "You",
        Sender::Bot => "Bot",
    };
    Line::from(vec![
        Span::styled(label.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" {}", message.timestamp.format("%H:%M")),
            style.add_modifier(Modifier::DIM),
        ),
    ])
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator.clone(),
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    let input = Line::from(vec![
        Span::styled("→ ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.input.as_str(), Style::default().fg(Color::White)),
    ]);

    let visible_width = area.width.saturating_sub(2);
    let text_width = app.input.width() as u16;
    let scroll_offset = text_width.saturating_sub(visible_width);

    f.render_widget(
        Paragraph::new(input).scroll((0, scroll_offset)),
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: 1,
        },
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y + 2,
            width: area.width,
            height: 1,
        },
    );

    let cursor_x = area.x + 2 + text_width.saturating_sub(scroll_offset);
    f.set_cursor_position((cursor_x, area.y + 1));
}
